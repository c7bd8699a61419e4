//! Transport primitives for outbound vendor calls.
//!
//! The module exposes [`VendorHttpClient`] so callers can swap the HTTP stack (or stand in a test
//! double) without touching the signing or flow logic. Every vendor call is a body-less `GET`
//! with a handful of signed headers, so the seam is intentionally narrow: a [`VendorRequest`]
//! goes in, a [`VendorResponse`] (status + raw body) comes out, and transport failures are
//! classified as [`TransportError`] values.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError, sign::SignatureResult};

/// Boxed future returned by [`VendorHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<VendorResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing signed vendor calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// request the service handles, and must enforce [`VendorRequest::timeout`], reporting expiry as
/// [`TransportError::Timeout`].
pub trait VendorHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the raw response.
	fn execute(&self, request: VendorRequest) -> HttpFuture<'_>;
}

/// Outbound `GET` plus the headers that authenticate it.
#[derive(Clone)]
pub struct VendorRequest {
	/// Absolute vendor URL.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(&'static str, String)>,
	/// Upper bound for the whole exchange.
	pub timeout: StdDuration,
}
impl VendorRequest {
	/// Creates a header-less request.
	pub fn get(url: Url, timeout: StdDuration) -> Self {
		Self { url, headers: Vec::new(), timeout }
	}

	/// Attaches the signature headers (`client_id`, `sign`, `t`, `sign_method`, and
	/// `access_token` when present).
	pub fn signed(mut self, signature: &SignatureResult) -> Self {
		self.headers.extend(signature.headers());

		self
	}

	/// Returns the first value recorded for `name`.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
	}
}
impl Debug for VendorRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| match *name {
				"access_token" | "sign" => (*name, "<redacted>"),
				_ => (*name, value.as_str()),
			})
			.collect::<Vec<_>>();

		f.debug_struct("VendorRequest")
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Raw vendor response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Signed headers must never be replayed against another host, so configure any custom
/// [`ReqwestClient`] to disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the default transport: rustls, no redirects.
	pub fn without_redirects() -> Result<Self, crate::error::ConfigError> {
		let client =
			ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl VendorHttpClient for ReqwestHttpClient {
	fn execute(&self, request: VendorRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.get(request.url).timeout(request.timeout);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(VendorResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request() -> VendorRequest {
		let url = Url::parse("https://openapi.tuyaus.com/v1.0/devices/dev1")
			.expect("Fixture URL should parse.");
		let signature = SignatureResult {
			client_id: "abc123".into(),
			t: "1700000000000".into(),
			sign: "DEADBEEF".into(),
			sign_method: "HMAC-SHA256".into(),
			path: Some("/v1.0/devices/dev1".into()),
			access_token: Some("tok-1".into()),
		};

		VendorRequest::get(url, StdDuration::from_secs(1)).signed(&signature)
	}

	#[test]
	fn signed_requests_carry_every_header() {
		let request = request();

		assert_eq!(request.header("client_id"), Some("abc123"));
		assert_eq!(request.header("t"), Some("1700000000000"));
		assert_eq!(request.header("sign_method"), Some("HMAC-SHA256"));
		assert_eq!(request.header("access_token"), Some("tok-1"));
		assert_eq!(request.header("secret"), None);
	}

	#[test]
	fn debug_output_redacts_token_and_sign() {
		let rendered = format!("{:?}", request());

		assert!(rendered.contains("abc123"));
		assert!(!rendered.contains("tok-1"));
		assert!(!rendered.contains("DEADBEEF"));
	}
}
