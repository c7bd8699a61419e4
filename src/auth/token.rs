//! Vendor-issued token records, lifecycle helpers, and builders.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret},
};

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Bearer token issued by the vendor token endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Client the token was issued to.
	pub client_id: ClientId,
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Refresh token secret, if the vendor issued one.
	pub refresh_token: Option<Secret>,
	/// Vendor user id bound to the token, if reported.
	pub uid: Option<String>,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from issued_at plus the vendor's `expire_time`.
	pub expires_at: OffsetDateTime,
}
impl TokenRecord {
	/// Returns a builder for a token issued to `client_id`.
	pub fn builder(client_id: ClientId) -> TokenRecordBuilder {
		TokenRecordBuilder::new(client_id)
	}

	/// Time left before expiry at `instant`; negative once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		self.expires_at - instant
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		!self.remaining_at(instant).is_positive()
	}

	/// Returns `true` if the record stays valid for longer than `window` after `instant`.
	pub fn is_fresh_at(&self, instant: OffsetDateTime, window: Duration) -> bool {
		self.remaining_at(instant) > window
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("client_id", &self.client_id)
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("uid", &self.uid)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug)]
pub struct TokenRecordBuilder {
	client_id: ClientId,
	access_token: Option<Secret>,
	refresh_token: Option<Secret>,
	uid: Option<String>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl TokenRecordBuilder {
	fn new(client_id: ClientId) -> Self {
		Self {
			client_id,
			access_token: None,
			refresh_token: None,
			uid: None,
			issued_at: None,
			expires_at: None,
			expires_in: None,
		}
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(Secret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(token));

		self
	}

	/// Records the vendor user id bound to the token.
	pub fn uid(mut self, uid: impl Into<String>) -> Self {
		self.uid = Some(uid.into());

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		let access_token = self.access_token.ok_or(TokenRecordBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(TokenRecordBuilderError::MissingExpiry),
		};

		Ok(TokenRecord {
			client_id: self.client_id,
			access_token,
			refresh_token: self.refresh_token,
			uid: self.uid,
			issued_at,
			expires_at,
		})
	}
}
