//! Tuya OpenAPI request signer: HMAC-SHA256 signatures, token relay, and device-info proxying
//! behind a tiny HTTP service.
//!
//! The crate is split the same way a request flows through it: [`sign`] builds the vendor's
//! string-to-sign and HMAC digest, [`flows`] drives the token and resource calls through an
//! injected [`http::VendorHttpClient`], [`store`] optionally caches issued tokens, and
//! `server` (behind the `server` feature) exposes everything over HTTP.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
#[cfg(feature = "server")] pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
#[cfg(feature = "server")] pub mod server;
pub mod sign;
pub mod store;
pub mod vendor;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{flows::VendorClient, http::ReqwestHttpClient, vendor::VendorDescriptor};

	/// Vendor client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = VendorClient<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor pointing at a mock vendor host.
	pub fn test_descriptor(base_url: &str, timeout: std::time::Duration) -> VendorDescriptor {
		VendorDescriptor::builder()
			.base_url(base_url)
			.timeout(timeout)
			.build()
			.expect("Mock vendor descriptor should build successfully.")
	}

	/// Constructs a [`VendorClient`] without a token store, backed by the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_client(base_url: &str) -> ReqwestTestClient {
		VendorClient::with_http_client(
			test_descriptor(base_url, VendorDescriptor::DEFAULT_TIMEOUT),
			test_reqwest_http_client(),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
// The binary reports startup failures through color-eyre.
#[cfg(feature = "server")] use color_eyre as _;
#[cfg(test)] use {http_body_util as _, httpmock as _, tokio as _, tower as _};
