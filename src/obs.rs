//! Observability for vendor flows.
//!
//! Every flow runs through [`observe`], which opens a `tuya_signer.flow` span carrying the flow
//! label and the vendor host, counts the attempt and its outcome, and attaches the vendor error
//! `code` when the vendor rejected the call.
//!
//! # Feature Flags
//!
//! - `tracing` emits the spans and enables [`init_subscriber`].
//! - `metrics` increments `tuya_signer_flow_total{flow, outcome}` and
//!   `tuya_signer_vendor_rejection_total{flow, code}`.

#[cfg(feature = "tracing")] mod subscriber;
#[cfg(feature = "tracing")] pub use subscriber::*;

// self
use crate::_prelude::*;

/// Vendor flows observed by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Token endpoint call.
	TokenFetch,
	/// Signed resource call carrying an access token.
	ResourceFetch,
	/// Token call whose result is echoed with signature metadata.
	SignToken,
	/// Token plus resource composition.
	DeviceInfo,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::TokenFetch => "token_fetch",
			FlowKind::ResourceFetch => "resource_fetch",
			FlowKind::SignToken => "sign_token",
			FlowKind::DeviceInfo => "device_info",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// A cached token satisfied the flow without contacting the token endpoint.
	CacheHit,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::CacheHit => "cache_hit",
		}
	}

	/// Maps a flow result onto its terminal outcome.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		match result {
			Ok(_) => FlowOutcome::Success,
			Err(_) => FlowOutcome::Failure,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `flow` against the vendor at `origin` inside its span and records the outcome.
pub async fn observe<F, T>(kind: FlowKind, origin: &Url, flow: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let host = origin.host_str().unwrap_or_default();

	record_flow_outcome(kind, FlowOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let (span, result) = {
		use tracing::Instrument;

		let span = tracing::info_span!(
			"tuya_signer.flow",
			flow = kind.as_str(),
			host,
			vendor_code = tracing::field::Empty,
		);
		let result = flow.instrument(span.clone()).await;

		(span, result)
	};
	#[cfg(not(feature = "tracing"))]
	let result = {
		let _ = host;

		flow.await
	};

	record_flow_outcome(kind, FlowOutcome::of(&result));

	if let Some(code) = result.as_ref().err().and_then(Error::vendor_code) {
		#[cfg(feature = "tracing")]
		span.record("vendor_code", code);

		record_vendor_rejection(kind, code);
	}

	result
}

/// Counts a flow outcome on the global metrics recorder.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"tuya_signer_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts a vendor rejection by its error `code`.
pub fn record_vendor_rejection(kind: FlowKind, code: i64) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"tuya_signer_vendor_rejection_total",
		"flow" => kind.as_str(),
		"code" => code.to_string()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, code);
}
