//! Shared helpers for flow implementations (outbound calls, singleflight guards).

// self
use crate::{
	_prelude::*,
	auth::TokenRecordBuilderError,
	error::FetchError,
	flows::VendorClient,
	http::{VendorHttpClient, VendorRequest},
	store::StoreKey,
	vendor::{self, VendorEnvelope},
};

/// Executes `request` and decodes the vendor envelope around `T`.
pub(crate) async fn send<C, T>(
	client: &VendorClient<C>,
	request: VendorRequest,
) -> Result<VendorEnvelope<T>, FetchError>
where
	C: ?Sized + VendorHttpClient,
	T: DeserializeOwned,
{
	let response = <C as VendorHttpClient>::execute(client.http_client.as_ref(), request).await?;

	vendor::parse_envelope(&response.body, response.status)
}

/// Returns (and creates on demand) the singleflight guard for a store key.
pub(crate) fn flow_guard<C>(client: &VendorClient<C>, key: &StoreKey) -> Arc<AsyncMutex<()>>
where
	C: ?Sized + VendorHttpClient,
{
	let mut guards = client.flow_guards.lock();

	guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
}

/// Drops the guard for `key` once no other caller holds a handle to it.
pub(crate) fn release_flow_guard<C>(
	client: &VendorClient<C>,
	key: &StoreKey,
	guard: Arc<AsyncMutex<()>>,
) where
	C: ?Sized + VendorHttpClient,
{
	let mut guards = client.flow_guards.lock();

	// One handle lives in the map, the other is `guard`.
	if Arc::strong_count(&guard) <= 2 {
		guards.remove(key);
	}
}

/// Normalizes token builder errors into crate errors.
pub(crate) fn map_token_builder_error(err: TokenRecordBuilderError) -> Error {
	Error::Internal { message: err.to_string().trim_end_matches('.').to_owned() }
}

/// Number of live singleflight guards; exposed for leak checks.
pub fn flow_guard_count<C>(client: &VendorClient<C>) -> usize
where
	C: ?Sized + VendorHttpClient,
{
	client.flow_guards.lock().len()
}
