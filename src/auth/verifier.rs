//! One-time verifier binding the authorization step to the token exchange.

// self
use crate::_prelude::*;

/// Verifier code returned alongside the authorization callback.
///
/// The value is moved into the token exchange and dropped with it, so it never outlives the
/// leg that needs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Verifier(String);
impl Verifier {
	/// Wraps a verifier string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw verifier for signing.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl From<&str> for Verifier {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Verifier {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for Verifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Verifier").field(&"<redacted>").finish()
	}
}
