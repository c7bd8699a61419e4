//! `tuya-signer` service entry point.

// crates.io
use clap::Parser;
use tokio::net::TcpListener;
// self
use tuya_signer::{
	config::ServiceConfig,
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let config = ServiceConfig::parse();

	obs::init_subscriber(&config.log_filter)?;

	let client = config.build_client()?;
	let addr = config.bind_addr()?;
	let listener = TcpListener::bind(addr).await?;

	tracing::info!(
		%addr,
		base_url = %client.descriptor.base_url,
		token_cache = client.store.is_some(),
		"signature server listening"
	);

	axum::serve(listener, server::router(AppState::new(client)))
		.with_graceful_shutdown(server::shutdown_signal())
		.await?;

	tracing::info!("server shut down gracefully");

	Ok(())
}
