// crates.io
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::_prelude::*;

/// Filter applied when neither a directive nor `RUST_LOG` is supplied.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Failures raised while installing the global subscriber.
#[derive(Debug, ThisError)]
pub enum ObsError {
	/// The filter directive could not be parsed.
	#[error("Log filter `{directive}` is invalid.")]
	InvalidFilter {
		/// Directive that failed to parse.
		directive: String,
		/// Parser failure.
		#[source]
		source: tracing_subscriber::filter::ParseError,
	},
	/// A global subscriber is already installed.
	#[error("Tracing subscriber could not be installed.")]
	Install {
		/// Registry failure.
		#[source]
		source: tracing_subscriber::util::TryInitError,
	},
}

/// Installs a formatted subscriber filtered by `directive` (for example `info` or
/// `tuya_signer=debug,tower_http=info`).
pub fn init_subscriber(directive: &str) -> Result<(), ObsError> {
	let filter = EnvFilter::try_new(directive)
		.map_err(|source| ObsError::InvalidFilter { directive: directive.to_owned(), source })?;

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_target(true))
		.try_init()
		.map_err(|source| ObsError::Install { source })
}
