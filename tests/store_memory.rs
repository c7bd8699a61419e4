// std
use std::sync::Arc;
// crates.io
use time::{Duration, OffsetDateTime};
// self
use tuya_signer::{
	auth::{Credential, TokenRecord},
	store::{MemoryStore, StoreKey, TokenStore},
};

fn key(client_id: &str, secret: &str) -> StoreKey {
	let credential =
		Credential::new(client_id, secret).expect("Credential fixture should be valid.");

	StoreKey::new(&credential)
}

fn build_record(key: &StoreKey, access: &str, lifetime: Duration) -> TokenRecord {
	let issued = OffsetDateTime::now_utc();

	TokenRecord::builder(key.client_id.clone())
		.access_token(access)
		.issued_at(issued)
		.expires_at(issued + lifetime)
		.build()
		.expect("Token record fixture should build successfully.")
}

#[tokio::test]
async fn save_fetch_and_evict_round_trip() {
	let store = MemoryStore::default();
	let key = key("abc123", "s3cr3t");

	store
		.save(key.clone(), build_record(&key, "access-1", Duration::hours(2)))
		.await
		.expect("Saving a record should succeed.");

	let fetched = store
		.fetch(&key)
		.await
		.expect("Fetching a record should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(fetched.access_token.expose(), "access-1");

	let evicted = store.evict(&key).await.expect("Evicting a record should succeed.");

	assert_eq!(
		evicted.as_ref().map(|record| record.access_token.expose()),
		Some("access-1")
	);
	assert!(store.fetch(&key).await.expect("Fetch after evict should succeed.").is_none());
	assert!(store.is_empty());
}

#[tokio::test]
async fn same_client_with_another_secret_misses() {
	let store = MemoryStore::default();
	let owner = key("abc123", "s3cr3t");
	let impostor = key("abc123", "guessed");

	store
		.save(owner.clone(), build_record(&owner, "owner-token", Duration::hours(2)))
		.await
		.expect("Saving a record should succeed.");

	assert!(store.fetch(&impostor).await.expect("Fetch should succeed.").is_none());
	assert!(store.fetch(&owner).await.expect("Fetch should succeed.").is_some());
}

#[tokio::test]
async fn expired_records_are_not_served() {
	let store = MemoryStore::default();
	let key = key("abc123", "s3cr3t");

	store
		.save(key.clone(), build_record(&key, "stale", Duration::seconds(-1)))
		.await
		.expect("Saving a record should succeed.");

	assert!(store.fetch(&key).await.expect("Fetch should succeed.").is_none());
}

#[tokio::test]
async fn capacity_is_never_exceeded_under_concurrent_writes() {
	let store = Arc::new(MemoryStore::with_capacity(8));
	let writers = (0..32).map(|i| {
		let store = store.clone();

		tokio::spawn(async move {
			let key = key(&format!("client-{i}"), "s3cr3t");
			let record = build_record(&key, &format!("token-{i}"), Duration::minutes(10 + i));

			store.save(key, record).await
		})
	});

	for writer in writers.collect::<Vec<_>>() {
		writer
			.await
			.expect("Writer task should not panic.")
			.expect("Concurrent save should succeed.");
	}

	assert_eq!(store.len(), store.capacity());
}
