//! Epoch-millisecond timestamps carried in the `t` header.

// self
use crate::_prelude::*;

/// Decimal epoch-millisecond timestamp, captured once per signature.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(String);
impl Timestamp {
	/// Captures the current wall-clock time.
	pub fn now() -> Self {
		let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

		Self(millis.to_string())
	}

	/// Wraps a fixed millisecond value.
	pub fn from_millis(millis: u64) -> Self {
		Self(millis.to_string())
	}

	/// Returns the decimal rendering.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for Timestamp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<Timestamp> for String {
	fn from(t: Timestamp) -> Self {
		t.0
	}
}
