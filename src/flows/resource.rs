//! Signed resource relays and the token + resource composition behind `/get-device-info`.
//!
//! Requests are strictly sequential: at most one token call, then one resource call, with no
//! retries. When a [`TokenStore`] is attached, [`VendorClient::device_info`] serves tokens from
//! the cache while they stay outside the preemptive window, serializes token fetches per
//! credential through a singleflight guard, and evicts a cached token the vendor rejects so the
//! next call starts fresh.

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenRecord},
	error::FetchError,
	flows::{VendorClient, common},
	http::{VendorHttpClient, VendorRequest},
	obs::{self, FlowKind, FlowOutcome},
	sign::{self, CanonicalPath, RequestSpec, SignRequest},
	store::{StoreKey, TokenStore},
};

impl<C> VendorClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Signs and relays a `GET` to `path` with `access_token`, returning the vendor `result`
	/// unchanged (`null` when the vendor omits it).
	pub async fn fetch_resource(
		&self,
		credential: &Credential,
		access_token: &str,
		path: &str,
	) -> Result<JsonValue> {
		obs::observe(FlowKind::ResourceFetch, &self.descriptor.base_url, async move {
			self.descriptor.resource_url(path)?;

			let request = SignRequest::Request(RequestSpec::new(access_token, path));
			let signature = sign::sign(credential, &request);
			// Signed with the decoded query; sent with the encoded one.
			let wire = CanonicalPath::new(path, &BTreeMap::new()).wire();
			let url = self.descriptor.resource_url(&wire)?;
			let outbound = VendorRequest::get(url, self.descriptor.timeout).signed(&signature);
			let result = common::send::<C, JsonValue>(self, outbound)
				.await
				.and_then(|envelope| envelope.into_optional_result())
				.map_err(Error::ResourceFetch)?;

			Ok(result.unwrap_or(JsonValue::Null))
		})
		.await
	}

	/// Obtains a token for `credential`, then relays a signed `GET` to `path`.
	///
	/// Without a token store a fresh token is requested on every call.
	pub async fn device_info(&self, credential: &Credential, path: &str) -> Result<JsonValue> {
		obs::observe(FlowKind::DeviceInfo, &self.descriptor.base_url, async move {
			// Reject bad paths before spending a token call.
			self.descriptor.resource_url(path)?;

			let Some(store) = self.store.as_deref() else {
				let token = self.fetch_token(credential).await?;
				let access_token = token.access_token.expose();

				return self.fetch_resource(credential, access_token, path).await;
			};
			let key = StoreKey::new(credential);
			let (token, cached) = self.cached_token(store, credential, &key).await?;
			let result =
				self.fetch_resource(credential, token.access_token.expose(), path).await;
			let rejected =
				matches!(result, Err(Error::ResourceFetch(FetchError::Vendor { .. })));

			if cached && rejected {
				store.evict(&key).await?;
			}

			result
		})
		.await
	}

	/// Returns a fresh token for `key`, and whether it came from the cache.
	async fn cached_token(
		&self,
		store: &dyn TokenStore,
		credential: &Credential,
		key: &StoreKey,
	) -> Result<(TokenRecord, bool)> {
		let guard = common::flow_guard(self, key);
		let result = {
			let _singleflight = guard.lock().await;

			self.cached_token_locked(store, credential, key).await
		};

		common::release_flow_guard(self, key, guard);

		result
	}

	async fn cached_token_locked(
		&self,
		store: &dyn TokenStore,
		credential: &Credential,
		key: &StoreKey,
	) -> Result<(TokenRecord, bool)> {
		let now = OffsetDateTime::now_utc();

		if let Some(current) =
			store.fetch(key).await?.filter(|record| record.is_fresh_at(now, self.preemptive_window))
		{
			obs::record_flow_outcome(FlowKind::DeviceInfo, FlowOutcome::CacheHit);

			return Ok((current, true));
		}

		let record = self.fetch_token(credential).await?;

		store.save(key.clone(), record.clone()).await?;

		Ok((record, false))
	}
}
