//! Per-call vendor credentials.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret},
};

/// Client id + secret pair supplied with every call; never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	/// Vendor client identifier.
	pub client_id: ClientId,
	/// Vendor client secret used as the HMAC key.
	pub secret: Secret,
}
impl Credential {
	/// Validates and wraps a raw client id + secret pair.
	///
	/// Empty values surface as [`Error::MissingCredential`] so callers report them exactly like
	/// absent headers.
	pub fn new(client_id: impl AsRef<str>, secret: impl Into<String>) -> Result<Self> {
		let client_id = client_id.as_ref();
		let secret = Secret::new(secret);

		if client_id.is_empty() {
			return Err(Error::MissingCredential { header: "client_id" });
		}
		if secret.is_empty() {
			return Err(Error::MissingCredential { header: "secret" });
		}

		Ok(Self { client_id: ClientId::new(client_id)?, secret })
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("client_id", &self.client_id)
			.field("secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_parts_map_to_missing_credentials() {
		assert!(matches!(
			Credential::new("", "s3cr3t"),
			Err(Error::MissingCredential { header: "client_id" })
		));
		assert!(matches!(
			Credential::new("abc123", ""),
			Err(Error::MissingCredential { header: "secret" })
		));
		assert!(matches!(Credential::new("abc 123", "s3cr3t"), Err(Error::InvalidRequest { .. })));
	}

	#[test]
	fn debug_output_redacts_the_secret() {
		let credential =
			Credential::new("abc123", "s3cr3t").expect("Credential fixture should be valid.");
		let rendered = format!("{credential:?}");

		assert!(rendered.contains("abc123"));
		assert!(!rendered.contains("s3cr3t"));
	}
}
