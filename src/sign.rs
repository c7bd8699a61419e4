//! Vendor request signing (HMAC-SHA256 over the OpenAPI string-to-sign).
//!
//! Three request shapes share one generator:
//!
//! - [`SignRequest::Simple`] signs `client_id + t` for client-credential handshakes.
//! - [`SignRequest::Token`] signs a body-less `GET` to the token endpoint; its content hash is
//!   taken over the empty string because nothing is sent.
//! - [`SignRequest::Request`] signs an arbitrary call carrying an access token; an absent body
//!   is hashed as the JSON text `{}`.
//!
//! Both "no body" conventions are kept on purpose: each matches what the respective vendor
//! endpoint verifies. The timestamp is captured once per call and reused for the message and the
//! reported `t`.

pub mod path;
pub mod timestamp;

pub use path::{CanonicalPath, normalize_path};
pub use timestamp::Timestamp;

// crates.io
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::Credential};

type HmacSha256 = Hmac<Sha256>;

/// Signature method reported to the vendor in the `sign_method` header.
pub const SIGN_METHOD: &str = "HMAC-SHA256";
/// Path of the vendor token endpoint, including its fixed grant query.
pub const TOKEN_PATH: &str = "/v1.0/token?grant_type=1";
/// Method used when a request does not name one.
pub const DEFAULT_METHOD: &str = "GET";

/// How the content-hash line of the string-to-sign is derived.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyHash {
	/// Hash of the empty string; used when no body is transmitted at all.
	Empty,
	/// Hash of the serialized JSON value.
	Json(JsonValue),
}
impl BodyHash {
	/// Lowercase hex SHA-256 of the body text.
	pub fn digest(&self) -> String {
		match self {
			Self::Empty => sha256_hex(""),
			Self::Json(value) => sha256_hex(&value.to_string()),
		}
	}
}

/// Full request-signing inputs for calls made with an access token.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
	/// Access token issued by the token endpoint.
	pub access_token: String,
	/// Upper-case HTTP method.
	pub method: String,
	/// Request path; may embed a query string after the first `?`.
	pub path: String,
	/// Explicit query parameters; they win over embedded ones on key collision.
	pub query: BTreeMap<String, String>,
	/// JSON body; `None` hashes as `{}`.
	pub body: Option<JsonValue>,
}
impl RequestSpec {
	/// Creates a `GET` spec for `path` with no extra query parameters or body.
	pub fn new(access_token: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			access_token: access_token.into(),
			method: DEFAULT_METHOD.into(),
			path: path.into(),
			query: BTreeMap::new(),
			body: None,
		}
	}

	/// Overrides the HTTP method (normalized to upper case).
	pub fn with_method(mut self, method: impl AsRef<str>) -> Self {
		self.method = method.as_ref().to_ascii_uppercase();

		self
	}

	/// Adds explicit query parameters.
	pub fn with_query<I, K, V>(mut self, query: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(query.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Sets the JSON body.
	pub fn with_body(mut self, body: JsonValue) -> Self {
		self.body = Some(body);

		self
	}

	fn body_hash(&self) -> BodyHash {
		BodyHash::Json(self.body.clone().unwrap_or_else(|| JsonValue::Object(JsonMap::new())))
	}
}

/// Signing mode plus its mode-specific inputs.
#[derive(Clone, Debug, PartialEq)]
pub enum SignRequest {
	/// `client_id + t`.
	Simple,
	/// Body-less `GET` to the token endpoint.
	Token {
		/// Token endpoint path.
		path: String,
	},
	/// Arbitrary request carrying an access token.
	Request(RequestSpec),
}
impl SignRequest {
	/// Token-mode request for the standard token path.
	pub fn token() -> Self {
		Self::Token { path: TOKEN_PATH.into() }
	}
}
impl From<RequestSpec> for SignRequest {
	fn from(spec: RequestSpec) -> Self {
		Self::Request(spec)
	}
}

/// Signature plus the metadata the vendor needs to validate it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResult {
	/// Client identifier that signed the request.
	pub client_id: String,
	/// Epoch-millisecond timestamp used in the message.
	pub t: String,
	/// 64 upper-case hex characters.
	pub sign: String,
	/// Always [`SIGN_METHOD`].
	pub sign_method: String,
	/// Normalized path (sorted query) for token and request modes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	/// Access token echoed back for request mode.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<String>,
}
impl SignatureResult {
	/// Headers the vendor expects alongside a signed request.
	pub fn headers(&self) -> Vec<(&'static str, String)> {
		let mut headers = vec![
			("client_id", self.client_id.clone()),
			("sign", self.sign.clone()),
			("t", self.t.clone()),
			("sign_method", self.sign_method.clone()),
		];

		if let Some(token) = &self.access_token {
			headers.push(("access_token", token.clone()));
		}

		headers
	}
}

/// Signs `request` with a freshly captured timestamp.
pub fn sign(credential: &Credential, request: &SignRequest) -> SignatureResult {
	sign_at(credential, request, Timestamp::now())
}

/// Signs `request` at a caller-supplied timestamp.
pub fn sign_at(credential: &Credential, request: &SignRequest, t: Timestamp) -> SignatureResult {
	let client_id = credential.client_id.as_ref();
	let (message, path, access_token) = match request {
		SignRequest::Simple => (format!("{client_id}{t}"), None, None),
		SignRequest::Token { path } => {
			let normalized = normalize_path(path, &BTreeMap::new());
			let string_to_sign = string_to_sign(DEFAULT_METHOD, &BodyHash::Empty, &normalized);

			(format!("{client_id}{t}{string_to_sign}"), Some(normalized), None)
		},
		SignRequest::Request(spec) => {
			let normalized = normalize_path(&spec.path, &spec.query);
			let string_to_sign = string_to_sign(&spec.method, &spec.body_hash(), &normalized);
			let token = &spec.access_token;

			(
				format!("{client_id}{token}{t}{string_to_sign}"),
				Some(normalized),
				Some(token.clone()),
			)
		},
	};

	SignatureResult {
		client_id: client_id.to_owned(),
		sign: hmac_sha256_upper_hex(credential.secret.expose(), &message),
		t: t.into(),
		sign_method: SIGN_METHOD.into(),
		path,
		access_token,
	}
}

/// `method \n content-hash \n headers \n path`; the headers line is always empty.
pub fn string_to_sign(method: &str, body: &BodyHash, normalized_path: &str) -> String {
	format!("{method}\n{}\n\n{normalized_path}", body.digest())
}

/// HMAC-SHA256 of `message` keyed by `secret`, rendered as upper-case hex.
pub fn hmac_sha256_upper_hex(secret: &str, message: &str) -> String {
	// HMAC accepts keys of any length.
	let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
		.expect("HMAC can take key of any size");

	mac.update(message.as_bytes());

	hex::encode_upper(mac.finalize().into_bytes())
}

fn sha256_hex(text: &str) -> String {
	hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
	const EMPTY_OBJECT_SHA256: &str =
		"44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";

	fn credential() -> Credential {
		Credential::new("abc123", "s3cr3t").expect("Credential fixture should be valid.")
	}

	fn t() -> Timestamp {
		Timestamp::from_millis(1_700_000_000_000)
	}

	#[test]
	fn body_hash_conventions_differ() {
		assert_eq!(BodyHash::Empty.digest(), EMPTY_SHA256);
		assert_eq!(BodyHash::Json(serde_json::json!({})).digest(), EMPTY_OBJECT_SHA256);
	}

	#[test]
	fn string_to_sign_has_four_lines_with_empty_headers() {
		let value = string_to_sign("GET", &BodyHash::Empty, "/v1.0/token?grant_type=1");

		assert_eq!(value, format!("GET\n{EMPTY_SHA256}\n\n/v1.0/token?grant_type=1"));
		assert_eq!(value.split('\n').count(), 4);
	}

	#[test]
	fn simple_mode_matches_golden_vector() {
		let result = sign_at(&credential(), &SignRequest::Simple, t());

		assert_eq!(result.sign, "130E0D78A4C6F5AE048B3CDC29477F66D455178EEA5567C1781BC7D88C22FC88");
		assert_eq!(result.t, "1700000000000");
		assert_eq!(result.sign_method, SIGN_METHOD);
		assert_eq!(result.path, None);
		assert_eq!(result.access_token, None);
	}

	#[test]
	fn token_mode_hashes_the_empty_string() {
		let result = sign_at(&credential(), &SignRequest::token(), t());

		assert_eq!(result.sign, "FE0035154634C25E59D44C315441C3FB3987DE2EAC9B22D33D9B4616AF4C9FFC");
		assert_eq!(result.path.as_deref(), Some(TOKEN_PATH));
	}

	#[test]
	fn request_mode_defaults_to_get_and_empty_object() {
		let spec = RequestSpec::new("tok-1", "/v1.0/devices/dev1");

		assert_eq!(spec.method, "GET");
		assert_eq!(spec.body_hash().digest(), EMPTY_OBJECT_SHA256);
		assert_eq!(RequestSpec::new("tok-1", "/").with_method("post").method, "POST");
	}

	#[test]
	fn headers_include_access_token_only_in_request_mode() {
		let simple = sign_at(&credential(), &SignRequest::Simple, t());
		let request = sign_at(
			&credential(),
			&RequestSpec::new("tok-1", "/v1.0/devices/dev1").into(),
			t(),
		);

		assert!(simple.headers().iter().all(|(name, _)| *name != "access_token"));
		assert!(request.headers().contains(&("access_token", "tok-1".to_owned())));
	}

	#[test]
	fn serialization_omits_absent_fields() {
		let value = serde_json::to_value(sign_at(&credential(), &SignRequest::Simple, t()))
			.expect("Signature result should serialize.");
		let object = value.as_object().expect("Signature result should serialize as an object.");

		assert_eq!(object.len(), 4);
		assert_eq!(object["sign_method"], "HMAC-SHA256");
		assert_eq!(object["client_id"], "abc123");
	}
}
