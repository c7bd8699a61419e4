//! Vendor flow orchestrators: token issuance, signed resource relays, and their composition.

pub mod common;

mod resource;
mod token;

// self
use crate::{
	_prelude::*,
	http::VendorHttpClient,
	store::{StoreKey, TokenStore},
	vendor::VendorDescriptor,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestVendorClient = VendorClient<ReqwestHttpClient>;

/// Drives signed calls against a single vendor deployment.
///
/// The client owns the HTTP transport and the descriptor; credentials travel with every call
/// and are never retained. Attaching a [`TokenStore`] turns on token reuse for
/// [`VendorClient::device_info`]: tokens are cached per credential, refreshed once they enter
/// the preemptive window, and concurrent callers for the same credential share one in-flight
/// token request.
pub struct VendorClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// HTTP client wrapper used for every outbound vendor request.
	pub http_client: Arc<C>,
	/// Vendor endpoints and timeout.
	pub descriptor: VendorDescriptor,
	/// Optional token cache; `None` fetches a fresh token per call.
	pub store: Option<Arc<dyn TokenStore>>,
	/// Cached tokens expiring within this window are treated as stale.
	pub preemptive_window: Duration,
	flow_guards: Arc<Mutex<HashMap<StoreKey, Arc<AsyncMutex<()>>>>>,
}
impl<C> VendorClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Window applied when none is configured.
	pub const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(60);

	/// Creates a client around a caller-provided transport.
	pub fn with_http_client(descriptor: VendorDescriptor, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			store: None,
			preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW,
			flow_guards: Default::default(),
		}
	}

	/// Enables token reuse backed by `store`.
	pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Overrides the preemptive window (negative values clamp to zero).
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}
}
#[cfg(feature = "reqwest")]
impl VendorClient<ReqwestHttpClient> {
	/// Creates a client backed by a fresh reqwest transport that never follows redirects.
	pub fn new(descriptor: VendorDescriptor) -> Result<Self> {
		Ok(Self::with_http_client(descriptor, ReqwestHttpClient::without_redirects()?))
	}
}
impl<C> Clone for VendorClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			store: self.store.clone(),
			preemptive_window: self.preemptive_window,
			flow_guards: self.flow_guards.clone(),
		}
	}
}
impl<C> Debug for VendorClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("VendorClient")
			.field("descriptor", &self.descriptor)
			.field("token_store", &self.store.is_some())
			.field("preemptive_window", &self.preemptive_window)
			.finish()
	}
}
