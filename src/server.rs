//! HTTP surface: signing endpoints, the token + device-info relays, and a liveness probe.
//!
//! Credentials arrive as request headers (`client_id`, `secret`, plus `access_token`, `path`, and
//! `method` where relevant) and are never stored. Signing endpoints answer failures with
//! `{ "error": message }`; the relay endpoints answer vendor or transport failures with
//! `{ "success": false, "message": message }`. Caller mistakes are always `400`, everything else
//! is `500`.

// crates.io
use axum::{
	Json, Router,
	body::Bytes,
	extract::{RawQuery, State},
	http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
	response::{IntoResponse, Response},
	routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	flows::VendorClient,
	http::VendorHttpClient,
	sign::{self, DEFAULT_METHOD, RequestSpec, SignRequest, SignatureResult},
};

/// Shared handler state.
pub struct AppState<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Vendor client shared by every request.
	pub client: Arc<VendorClient<C>>,
}
impl<C> AppState<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Wraps a vendor client.
	pub fn new(client: VendorClient<C>) -> Self {
		Self { client: Arc::new(client) }
	}
}
impl<C> Clone for AppState<C>
where
	C: ?Sized + VendorHttpClient,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone() }
	}
}

/// Body layout used when a handler fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorStyle {
	/// `{ "error": message }`.
	Plain,
	/// `{ "success": false, "message": message }`, used by the vendor relays.
	Relay,
}

/// Handler failure rendered as JSON.
#[derive(Debug)]
pub struct ApiError {
	/// Underlying failure.
	pub error: Error,
	/// Body layout.
	pub style: ErrorStyle,
}
impl ApiError {
	fn plain(error: Error) -> Self {
		Self { error, style: ErrorStyle::Plain }
	}

	fn relay(error: Error) -> Self {
		Self { error, style: ErrorStyle::Relay }
	}

	/// Status code the error maps to.
	pub fn status(&self) -> StatusCode {
		if self.error.is_client_error() {
			StatusCode::BAD_REQUEST
		} else {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}
}
impl From<Error> for ApiError {
	fn from(error: Error) -> Self {
		Self::plain(error)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let message = self.error.to_string();

		if status.is_server_error() {
			tracing::warn!(error = %message, vendor_code = ?self.error.vendor_code(), "request failed");
		}

		let body = match self.style {
			ErrorStyle::Relay if status.is_server_error() =>
				serde_json::json!({ "success": false, "message": message }),
			_ => serde_json::json!({ "error": message }),
		};

		(status, Json(body)).into_response()
	}
}

/// Builds the service router with permissive CORS and request tracing.
pub fn router<C>(state: AppState<C>) -> Router
where
	C: ?Sized + VendorHttpClient,
{
	Router::new()
		.route("/generate-signature", get(generate_signature))
		.route("/sign-token", get(sign_token::<C>))
		.route("/getRequestSign", get(get_request_sign))
		.route("/get-device-info", get(get_device_info::<C>))
		.route("/health", get(health))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Resolves once Ctrl-C or SIGTERM arrives.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "failed to install Ctrl-C handler");
			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			},
			Err(e) => {
				tracing::error!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
		_ = terminate => tracing::info!("received SIGTERM, shutting down"),
	}
}

async fn generate_signature(headers: HeaderMap) -> Result<Json<SignatureResult>, ApiError> {
	let credential = credential(&headers)?;

	Ok(Json(sign::sign(&credential, &SignRequest::Simple)))
}

async fn sign_token<C>(
	State(state): State<AppState<C>>,
	headers: HeaderMap,
) -> Result<Json<JsonValue>, ApiError>
where
	C: ?Sized + VendorHttpClient,
{
	let credential = credential(&headers)?;
	let result = state.client.sign_token(&credential).await.map_err(ApiError::relay)?;

	Ok(Json(result))
}

async fn get_request_sign(
	headers: HeaderMap,
	RawQuery(query): RawQuery,
	body: Bytes,
) -> Result<Json<SignatureResult>, ApiError> {
	let credential = credential(&headers)?;
	let access_token = required_header(&headers, "access_token")?;
	let path = required_header(&headers, "path")?;
	let method = optional_header(&headers, "method").unwrap_or(DEFAULT_METHOD);
	let mut spec = RequestSpec::new(access_token, path)
		.with_method(method)
		.with_query(parse_query(query.as_deref()));

	if let Some(body) = json_body(&headers, &body)? {
		spec = spec.with_body(body);
	}

	Ok(Json(sign::sign(&credential, &SignRequest::Request(spec))))
}

async fn get_device_info<C>(
	State(state): State<AppState<C>>,
	headers: HeaderMap,
) -> Result<Json<JsonValue>, ApiError>
where
	C: ?Sized + VendorHttpClient,
{
	let credential = credential(&headers)?;
	let path = required_header(&headers, "path")?;
	let result = state.client.device_info(&credential, path).await.map_err(ApiError::relay)?;

	Ok(Json(result))
}

async fn health() -> &'static str {
	"ok"
}

fn credential(headers: &HeaderMap) -> Result<Credential> {
	Credential::new(required_header(headers, "client_id")?, required_header(headers, "secret")?)
}

fn required_header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str> {
	optional_header(headers, name).ok_or(Error::MissingCredential { header: name })
}

fn optional_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|value| value.to_str().ok()).filter(|value| !value.is_empty())
}

fn parse_query(raw: Option<&str>) -> BTreeMap<String, String> {
	raw.map(|raw| form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
		.unwrap_or_default()
}

/// Parses the body only for JSON content types; an empty JSON body counts as absent.
fn json_body(headers: &HeaderMap, body: &[u8]) -> Result<Option<JsonValue>> {
	let is_json = headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.to_ascii_lowercase().contains("json"));

	if !is_json || body.iter().all(u8::is_ascii_whitespace) {
		return Ok(None);
	}

	serde_json::from_slice(body)
		.map(Some)
		.map_err(|e| Error::InvalidRequest { reason: format!("body is not valid JSON: {e}") })
}
