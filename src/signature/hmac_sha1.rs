//! `HMAC-SHA1` signature method.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
// self
use crate::{
	error::SignatureError,
	signature::{Parameters, SignatureMethod, SigningKey, base_string},
};

type HmacSha1Mac = Hmac<Sha1>;

/// Signs base strings with HMAC-SHA1 and encodes the digest with padded standard base64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HmacSha1;
impl SignatureMethod for HmacSha1 {
	fn name(&self) -> &'static str {
		"HMAC-SHA1"
	}

	fn sign(
		&self,
		uri: &str,
		method: &str,
		parameters: &Parameters,
		key: &SigningKey<'_>,
	) -> Result<String, SignatureError> {
		let base = base_string(method, uri, parameters)?;
		let mut mac = HmacSha1Mac::new_from_slice(key.to_key_string().as_bytes())
			.map_err(|_| SignatureError::InvalidKey)?;

		mac.update(base.as_bytes());

		Ok(STANDARD.encode(mac.finalize().into_bytes()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Secret;

	#[test]
	fn signatures_are_deterministic_and_parameter_sensitive() {
		let consumer = Secret::new("S");
		let key = SigningKey::new(&consumer, None);
		let params = Parameters::new().with("oauth_nonce", "abc").with("oauth_timestamp", "1700000000");
		let first = HmacSha1
			.sign("http://shop.test/oauth/initiate", "POST", &params, &key)
			.expect("Signing should succeed.");
		let second = HmacSha1
			.sign("http://shop.test/oauth/initiate", "POST", &params, &key)
			.expect("Signing should succeed.");

		assert_eq!(first, second);
		assert_eq!(first.len(), 28);
		assert!(first.ends_with('='));

		let changed = HmacSha1
			.sign(
				"http://shop.test/oauth/initiate",
				"POST",
				&params.clone().with("oauth_nonce", "abd"),
				&key,
			)
			.expect("Signing should succeed.");

		assert_ne!(first, changed);

		let token = Secret::new("T");
		let with_token = HmacSha1
			.sign("http://shop.test/oauth/initiate", "POST", &params, &SigningKey::new(&consumer, Some(&token)))
			.expect("Signing should succeed.");

		assert_ne!(first, with_token);
	}
}
