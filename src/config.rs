//! Process configuration read from flags and environment variables.

// std
use std::net::{IpAddr, SocketAddr};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::ReqwestVendorClient,
	obs,
	store::MemoryStore,
	vendor::{Region, VendorDescriptor, VendorDescriptorError},
};

/// Service configuration.
#[derive(Clone, Debug, Parser)]
#[command(name = "tuya-signer", version, about)]
pub struct ServiceConfig {
	/// Interface to bind.
	#[arg(long, env = "HOST", default_value = "0.0.0.0")]
	pub host: String,
	/// Port to listen on.
	#[arg(long, env = "PORT", default_value_t = 3000)]
	pub port: u16,
	/// Vendor data center.
	#[arg(long, env = "TUYA_REGION", value_enum, default_value_t = Region::WesternAmerica)]
	pub region: Region,
	/// Explicit OpenAPI origin; overrides `--region`.
	#[arg(long, env = "TUYA_BASE_URL")]
	pub base_url: Option<String>,
	/// Outbound timeout in milliseconds.
	#[arg(long, env = "TUYA_TIMEOUT_MS", default_value_t = 5_000)]
	pub timeout_ms: u64,
	/// Reuse issued tokens per credential until they near expiry.
	#[arg(long, env = "TUYA_TOKEN_CACHE", default_value_t = false)]
	pub token_cache: bool,
	/// Maximum number of cached tokens.
	#[arg(
		long,
		env = "TUYA_TOKEN_CACHE_CAPACITY",
		default_value_t = MemoryStore::DEFAULT_CAPACITY
	)]
	pub token_cache_capacity: usize,
	/// Log filter directive.
	#[arg(long, env = "RUST_LOG", default_value = obs::DEFAULT_LOG_FILTER)]
	pub log_filter: String,
}
impl ServiceConfig {
	/// Socket address to bind.
	pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
		let ip = self.host.parse::<IpAddr>().map_err(|_| ConfigError::InvalidBindAddress {
			addr: format!("{}:{}", self.host, self.port),
		})?;

		Ok(SocketAddr::new(ip, self.port))
	}

	/// Vendor descriptor derived from region, base URL, and timeout.
	pub fn descriptor(&self) -> Result<VendorDescriptor, VendorDescriptorError> {
		let builder = VendorDescriptor::builder()
			.region(self.region)
			.timeout(StdDuration::from_millis(self.timeout_ms));

		match &self.base_url {
			Some(url) => builder.base_url(url.as_str()).build(),
			None => builder.build(),
		}
	}

	/// Vendor client with the configured transport and optional token cache.
	pub fn build_client(&self) -> Result<ReqwestVendorClient> {
		let descriptor = self.descriptor().map_err(ConfigError::from)?;
		let client = ReqwestVendorClient::new(descriptor)?;

		if self.token_cache {
			let store = MemoryStore::with_capacity(self.token_cache_capacity);

			return Ok(client.with_token_store(Arc::new(store)));
		}

		Ok(client)
	}
}
