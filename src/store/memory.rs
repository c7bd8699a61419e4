//! Bounded, expiry-aware in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	store::{StoreFuture, StoreKey, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, TokenRecord>>>;

/// Thread-safe token cache that keeps at most `capacity` records in-process.
///
/// Expired records are purged on every write and ignored on read. When the cache is full, the
/// record closest to expiry makes room for the new one.
#[derive(Clone, Debug)]
pub struct MemoryStore {
	map: StoreMap,
	capacity: usize,
}
impl MemoryStore {
	/// Capacity used by [`MemoryStore::default`].
	pub const DEFAULT_CAPACITY: usize = 1_024;

	/// Creates a store holding at most `capacity` records (at least one).
	pub fn with_capacity(capacity: usize) -> Self {
		Self { map: Default::default(), capacity: capacity.max(1) }
	}

	/// Maximum number of records kept.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Number of records currently held, expired ones included until the next write.
	pub fn len(&self) -> usize {
		self.map.read().len()
	}

	/// Returns `true` when no record is held.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn save_now(&self, key: StoreKey, record: TokenRecord, now: OffsetDateTime) {
		let mut guard = self.map.write();

		guard.retain(|_, existing| !existing.is_expired_at(now));

		if !guard.contains_key(&key) && guard.len() >= self.capacity {
			let soonest = guard
				.iter()
				.min_by_key(|(_, existing)| existing.expires_at)
				.map(|(key, _)| key.clone());

			if let Some(soonest) = soonest {
				guard.remove(&soonest);
			}
		}

		guard.insert(key, record);
	}

	fn fetch_now(&self, key: &StoreKey, now: OffsetDateTime) -> Option<TokenRecord> {
		self.map.read().get(key).filter(|record| !record.is_expired_at(now)).cloned()
	}

	fn evict_now(&self, key: &StoreKey) -> Option<TokenRecord> {
		self.map.write().remove(key)
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self::with_capacity(Self::DEFAULT_CAPACITY)
	}
}
impl TokenStore for MemoryStore {
	fn save(&self, key: StoreKey, record: TokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.save_now(key, record, OffsetDateTime::now_utc());

			Ok(())
		})
	}

	fn fetch<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move { Ok(self.fetch_now(key, OffsetDateTime::now_utc())) })
	}

	fn evict<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move { Ok(self.evict_now(key)) })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::auth::Credential;

	fn key(client: &str) -> StoreKey {
		let credential =
			Credential::new(client, "s3cr3t").expect("Credential fixture should be valid.");

		StoreKey::new(&credential)
	}

	fn record(key: &StoreKey, expires_at: OffsetDateTime) -> TokenRecord {
		TokenRecord::builder(key.client_id.clone())
			.access_token(format!("token-{}", key.client_id))
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_at(expires_at)
			.build()
			.expect("Token record fixture should build.")
	}

	#[test]
	fn full_store_evicts_the_soonest_expiry() {
		let store = MemoryStore::with_capacity(2);
		let now = macros::datetime!(2025-01-01 00:10 UTC);
		let (a, b, c) = (key("a"), key("b"), key("c"));

		store.save_now(a.clone(), record(&a, macros::datetime!(2025-01-01 02:00 UTC)), now);
		store.save_now(b.clone(), record(&b, macros::datetime!(2025-01-01 01:00 UTC)), now);
		store.save_now(c.clone(), record(&c, macros::datetime!(2025-01-01 03:00 UTC)), now);

		assert_eq!(store.len(), 2);
		assert!(store.fetch_now(&a, now).is_some());
		assert!(store.fetch_now(&b, now).is_none());
		assert!(store.fetch_now(&c, now).is_some());
	}

	#[test]
	fn replacing_an_entry_does_not_evict_others() {
		let store = MemoryStore::with_capacity(2);
		let now = macros::datetime!(2025-01-01 00:10 UTC);
		let (a, b) = (key("a"), key("b"));

		store.save_now(a.clone(), record(&a, macros::datetime!(2025-01-01 01:00 UTC)), now);
		store.save_now(b.clone(), record(&b, macros::datetime!(2025-01-01 02:00 UTC)), now);
		store.save_now(a.clone(), record(&a, macros::datetime!(2025-01-01 03:00 UTC)), now);

		assert_eq!(store.len(), 2);
		assert_eq!(
			store.fetch_now(&a, now).map(|record| record.expires_at),
			Some(macros::datetime!(2025-01-01 03:00 UTC))
		);
	}

	#[test]
	fn expired_records_are_hidden_and_purged() {
		let store = MemoryStore::with_capacity(4);
		let (a, b) = (key("a"), key("b"));

		store.save_now(
			a.clone(),
			record(&a, macros::datetime!(2025-01-01 01:00 UTC)),
			macros::datetime!(2025-01-01 00:10 UTC),
		);

		assert!(store.fetch_now(&a, macros::datetime!(2025-01-01 01:00 UTC)).is_none());

		store.save_now(
			b.clone(),
			record(&b, macros::datetime!(2025-01-01 03:00 UTC)),
			macros::datetime!(2025-01-01 02:00 UTC),
		);

		assert_eq!(store.len(), 1);
		assert_eq!(MemoryStore::with_capacity(0).capacity(), 1);
	}
}
