//! Crate-level error types shared across signing, flows, stores, and the HTTP surface.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A required credential header or argument is absent.
	#[error("Missing `{header}` in request headers.")]
	MissingCredential {
		/// Name of the missing header.
		header: &'static str,
	},
	/// The caller supplied a malformed identifier, path, or body.
	#[error("Invalid request: {reason}.")]
	InvalidRequest {
		/// Human-readable reason; never contains secret material.
		reason: String,
	},
	/// The vendor token endpoint could not issue a token.
	#[error("Token fetch failed: {0}")]
	TokenFetch(#[source] FetchError),
	/// The vendor resource endpoint rejected or failed the relayed request.
	#[error("Resource fetch failed: {0}")]
	ResourceFetch(#[source] FetchError),
	/// Token store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Unexpected internal failure.
	#[error("Internal error: {message}.")]
	Internal {
		/// Failure summary.
		message: String,
	},
}
impl Error {
	/// Returns the vendor error code carried by a fetch failure, if any.
	pub fn vendor_code(&self) -> Option<i64> {
		match self {
			Self::TokenFetch(FetchError::Vendor { code, .. })
			| Self::ResourceFetch(FetchError::Vendor { code, .. }) => *code,
			_ => None,
		}
	}

	/// Returns `true` when the error was caused by the caller rather than the service or vendor.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::MissingCredential { .. } | Self::InvalidRequest { .. })
	}
}
impl From<crate::auth::IdentifierError> for Error {
	fn from(e: crate::auth::IdentifierError) -> Self {
		Self::InvalidRequest { reason: e.to_string().trim_end_matches('.').to_owned() }
	}
}

/// Configuration and validation failures raised while wiring the service.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Vendor descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::vendor::VendorDescriptorError),
	/// Host + port do not form a socket address.
	#[error("Bind address `{addr}` is invalid.")]
	InvalidBindAddress {
		/// Rejected `host:port` pair.
		addr: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure of a single outbound vendor call.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// The vendor answered but reported `success: false` (or omitted the result).
	#[error("Vendor rejected the request: {message}.")]
	Vendor {
		/// Vendor-supplied message (`msg`), or a generic summary when absent.
		message: String,
		/// Vendor-supplied numeric error code, when present.
		code: Option<i64>,
	},
	/// The call never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Vendor responded with a body that is not the expected JSON envelope.
	#[error("Vendor returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, timeouts, request construction).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The outbound call exceeded the configured timeout.
	#[error("Vendor request timed out.")]
	Timeout,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the vendor.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request could not be built (for example an invalid header value).
	#[error("Vendor request could not be built.")]
	InvalidRequest {
		/// Transport-specific builder error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout
		} else if e.is_builder() {
			Self::InvalidRequest { source: Box::new(e) }
		} else {
			Self::network(e)
		}
	}
}
