//! Storage contract and the built-in in-memory cache for vendor-issued tokens.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{ClientId, Credential, TokenRecord},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by token caches.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the token for `key`.
	fn save(&self, key: StoreKey, record: TokenRecord) -> StoreFuture<'_, ()>;

	/// Fetches the token cached for `key`, if present and not expired.
	fn fetch<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Drops the token cached for `key`, returning it when one existed.
	fn evict<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TokenRecord>>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Identity a cached token belongs to.
///
/// The secret only contributes its SHA-256 fingerprint, so a caller who knows a client id but
/// not its secret never maps onto another caller's entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
	/// Client identifier.
	pub client_id: ClientId,
	/// Lowercase hex SHA-256 of the client secret.
	pub secret_fingerprint: String,
}
impl StoreKey {
	/// Builds the key for a credential.
	pub fn new(credential: &Credential) -> Self {
		Self {
			client_id: credential.client_id.clone(),
			secret_fingerprint: credential.secret.fingerprint(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn keys_partition_by_secret() {
		let a = Credential::new("abc123", "s3cr3t").expect("First credential should be valid.");
		let b = Credential::new("abc123", "other").expect("Second credential should be valid.");

		assert_eq!(StoreKey::new(&a), StoreKey::new(&a.clone()));
		assert_ne!(StoreKey::new(&a), StoreKey::new(&b));
		assert!(!format!("{:?}", StoreKey::new(&a)).contains("s3cr3t"));
	}
}
