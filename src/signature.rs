//! Canonical request signing.
//!
//! [`base_string`] canonicalizes a request (method, normalized URI, merged query and body
//! parameters) and a [`SignatureMethod`] turns it into the `oauth_signature` value. The only
//! shipped method is [`HmacSha1`].

pub mod canonical;
pub mod encoding;
pub mod hmac_sha1;
pub mod params;

pub use canonical::*;
pub use hmac_sha1::HmacSha1;
pub use params::*;

// self
use crate::{_prelude::*, auth::Secret, error::SignatureError, signature::encoding::encode};

/// Produces `oauth_signature` values for canonicalized requests.
pub trait SignatureMethod
where
	Self: Send + Sync,
{
	/// Wire name announced as `oauth_signature_method`.
	fn name(&self) -> &'static str;

	/// Signs the request described by `uri`, `method`, and `parameters`.
	///
	/// Query parameters embedded in `uri` are merged with `parameters`; the latter win on
	/// collisions. Malformed URIs fail with [`SignatureError`].
	fn sign(
		&self,
		uri: &str,
		method: &str,
		parameters: &Parameters,
		key: &SigningKey<'_>,
	) -> Result<String, SignatureError>;
}

/// Consumer secret plus the optional secret of the current token stage.
#[derive(Clone, Copy)]
pub struct SigningKey<'a> {
	consumer_secret: &'a Secret,
	token_secret: Option<&'a Secret>,
}
impl<'a> SigningKey<'a> {
	/// Creates a signing key; pass `None` before any token has been issued.
	pub fn new(consumer_secret: &'a Secret, token_secret: Option<&'a Secret>) -> Self {
		Self { consumer_secret, token_secret }
	}

	/// Renders `encode(consumer_secret)&encode(token_secret)`.
	pub fn to_key_string(&self) -> String {
		format!(
			"{}&{}",
			encode(self.consumer_secret.expose()),
			self.token_secret.map(|secret| encode(secret.expose())).unwrap_or_default()
		)
	}
}
impl Debug for SigningKey<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningKey")
			.field("consumer_secret", self.consumer_secret)
			.field("token_secret", &self.token_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signing_key_leaves_trailing_ampersand_without_token() {
		let consumer = Secret::new("kd94hf93k423kf44");

		assert_eq!(SigningKey::new(&consumer, None).to_key_string(), "kd94hf93k423kf44&");

		let consumer = Secret::new("a&b");
		let token = Secret::new("c d");

		assert_eq!(SigningKey::new(&consumer, Some(&token)).to_key_string(), "a%26b&c%20d");
	}

	#[test]
	fn signing_key_debug_redacts() {
		let consumer = Secret::new("top-secret");
		let rendered = format!("{:?}", SigningKey::new(&consumer, None));

		assert!(!rendered.contains("top-secret"));
	}
}
