//! Path + query normalization for the string-to-sign.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;
// self
use crate::_prelude::*;

// Characters left untouched by component encoding (`A-Z a-z 0-9 - _ . ! ~ * ' ( )`).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Caller path with its merged, byte-sorted query.
///
/// The vendor verifies the signature against [`CanonicalPath::signed`], where the query is
/// percent-decoded so reserved characters appear verbatim. The request itself must travel as
/// [`CanonicalPath::wire`], which keeps every key and value component-encoded; sending the decoded
/// form would let an encoded `#`, `&`, or `+` change the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalPath {
	uri: String,
	encoded_query: Option<String>,
}
impl CanonicalPath {
	/// Merges the query embedded in `path` (after the first `?`) with `explicit`, explicit values
	/// winning on collision.
	pub fn new(path: &str, explicit: &BTreeMap<String, String>) -> Self {
		let (uri, embedded) = match path.split_once('?') {
			Some((uri, query)) => (uri, Some(query)),
			None => (path, None),
		};
		let mut merged: BTreeMap<String, String> = embedded
			.map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
			.unwrap_or_default();

		merged.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));

		let encoded_query = (!merged.is_empty()).then(|| {
			merged
				.iter()
				.map(|(k, v)| {
					format!(
						"{}={}",
						utf8_percent_encode(k, COMPONENT),
						utf8_percent_encode(v, COMPONENT)
					)
				})
				.collect::<Vec<_>>()
				.join("&")
		});

		Self { uri: uri.to_owned(), encoded_query }
	}

	/// Path as it appears in the string-to-sign; no trailing `?` without parameters.
	pub fn signed(&self) -> String {
		match &self.encoded_query {
			Some(query) => {
				format!("{}?{}", self.uri, percent_decode_str(query).decode_utf8_lossy())
			},
			None => self.uri.clone(),
		}
	}

	/// Path to put on the wire.
	pub fn wire(&self) -> String {
		match &self.encoded_query {
			Some(query) => format!("{}?{query}", self.uri),
			None => self.uri.clone(),
		}
	}
}

/// Shorthand for [`CanonicalPath::signed`].
pub fn normalize_path(path: &str, explicit: &BTreeMap<String, String>) -> String {
	CanonicalPath::new(path, explicit).signed()
}
