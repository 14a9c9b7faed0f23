//! `oauth_*` protocol parameters and the `Authorization: OAuth ...` header they render to.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::Verifier,
	error::SignatureError,
	signature::{Parameters, SignatureMethod, SigningKey, encoding::encode},
};

/// Protocol version announced as `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";
/// Callback announced when the client has no callback URI configured.
pub const OUT_OF_BAND_CALLBACK: &str = "oob";
/// Length of generated nonces.
pub const NONCE_LEN: usize = 32;

/// Collects the protocol parameters for one signed request.
///
/// The base set (`oauth_consumer_key`, `oauth_nonce`, `oauth_signature_method`,
/// `oauth_timestamp`, `oauth_version`) is always present. The temporary credentials leg adds
/// `oauth_callback`; later legs add `oauth_token`, and the token exchange alone adds
/// `oauth_verifier`. Nonce and timestamp are generated at signing time unless pinned.
#[derive(Clone)]
pub struct ProtocolParameters {
	consumer_key: String,
	nonce: Option<String>,
	timestamp: Option<i64>,
	callback: Option<String>,
	token: Option<String>,
	verifier: Option<Verifier>,
}
impl ProtocolParameters {
	/// Starts a parameter set for the given consumer key.
	pub fn new(consumer_key: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			nonce: None,
			timestamp: None,
			callback: None,
			token: None,
			verifier: None,
		}
	}

	/// Adds `oauth_callback`.
	pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
		self.callback = Some(callback.into());

		self
	}

	/// Adds `oauth_token`.
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());

		self
	}

	/// Adds `oauth_verifier`; only the token exchange should call this.
	pub fn with_verifier(mut self, verifier: Verifier) -> Self {
		self.verifier = Some(verifier);

		self
	}

	/// Pins `oauth_nonce` instead of drawing a random one.
	pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = Some(nonce.into());

		self
	}

	/// Pins `oauth_timestamp` (Unix seconds) instead of reading the clock.
	pub fn with_timestamp(mut self, timestamp: i64) -> Self {
		self.timestamp = Some(timestamp);

		self
	}

	/// Signs the request and returns the finished header with `oauth_signature` appended last.
	///
	/// `request_parameters` are the query and form parameters sent with the request; they take
	/// part in the signature but are not copied into the header.
	pub fn sign<S>(
		self,
		method: &S,
		http_method: &str,
		uri: &str,
		request_parameters: &Parameters,
		key: &SigningKey<'_>,
	) -> Result<AuthorizationHeader, SignatureError>
	where
		S: ?Sized + SignatureMethod,
	{
		let nonce = self.nonce.unwrap_or_else(|| generate_nonce(NONCE_LEN));
		let timestamp = self.timestamp.unwrap_or_else(|| OffsetDateTime::now_utc().unix_timestamp());
		let mut params = vec![
			("oauth_consumer_key", self.consumer_key),
			("oauth_nonce", nonce),
			("oauth_signature_method", method.name().to_owned()),
			("oauth_timestamp", timestamp.to_string()),
			("oauth_version", OAUTH_VERSION.to_owned()),
		];

		if let Some(callback) = self.callback {
			params.push(("oauth_callback", callback));
		}
		if let Some(token) = self.token {
			params.push(("oauth_token", token));
		}
		if let Some(verifier) = self.verifier {
			params.push(("oauth_verifier", verifier.expose().to_owned()));
		}

		let mut signed = request_parameters.clone();

		for (key, value) in &params {
			signed.insert(*key, value.as_str());
		}

		let signature = method.sign(uri, http_method, &signed, key)?;

		params.push(("oauth_signature", signature));

		Ok(AuthorizationHeader(params))
	}
}
impl Debug for ProtocolParameters {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProtocolParameters")
			.field("consumer_key", &self.consumer_key)
			.field("nonce", &self.nonce)
			.field("timestamp", &self.timestamp)
			.field("callback", &self.callback)
			.field("token", &self.token)
			.field("verifier", &self.verifier)
			.finish()
	}
}

/// Signed protocol parameters in wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationHeader(Vec<(&'static str, String)>);
impl AuthorizationHeader {
	/// Header name the value belongs under.
	pub const NAME: &'static str = "Authorization";

	/// Looks up a protocol parameter by name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
	}

	/// Protocol parameters in the order they are rendered.
	pub fn parameters(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.0.iter().map(|(key, value)| (*key, value.as_str()))
	}

	/// Computed `oauth_signature`.
	pub fn signature(&self) -> &str {
		self.get("oauth_signature").unwrap_or_default()
	}

	/// Renders `OAuth key="value", ...`.
	pub fn to_header_value(&self) -> String {
		self.to_string()
	}
}
impl Display for AuthorizationHeader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OAuth ")?;

		for (i, (key, value)) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}

			write!(f, "{}=\"{}\"", encode(key), encode(value))?;
		}

		Ok(())
	}
}

/// Draws an alphanumeric nonce from the thread-local CSPRNG.
pub fn generate_nonce(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{auth::Secret, signature::HmacSha1};

	fn pinned(consumer_key: &str) -> ProtocolParameters {
		ProtocolParameters::new(consumer_key).with_nonce("abc").with_timestamp(1_700_000_000)
	}

	#[test]
	fn header_lists_base_parameters_then_leg_parameters_then_signature() {
		let secret = Secret::new("S");
		let header = pinned("K")
			.with_callback("http://shop.test/callback")
			.sign(
				&HmacSha1,
				"POST",
				"http://shop.test/oauth/initiate",
				&Parameters::new(),
				&SigningKey::new(&secret, None),
			)
			.expect("Signing should succeed.");
		let names = header.parameters().map(|(name, _)| name).collect::<Vec<_>>();

		assert_eq!(
			names,
			[
				"oauth_consumer_key",
				"oauth_nonce",
				"oauth_signature_method",
				"oauth_timestamp",
				"oauth_version",
				"oauth_callback",
				"oauth_signature",
			]
		);

		let rendered = header.to_header_value();

		assert!(rendered.starts_with(
			"OAuth oauth_consumer_key=\"K\", oauth_nonce=\"abc\", oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", oauth_version=\"1.0\", oauth_callback=\"http%3A%2F%2Fshop.test%2Fcallback\", oauth_signature=\""
		));
		assert!(rendered.ends_with('"'));
		assert!(!header.signature().is_empty());
	}

	#[test]
	fn verifier_is_signed_and_rendered_only_when_supplied() {
		let consumer = Secret::new("S");
		let token = Secret::new("T");
		let key = SigningKey::new(&consumer, Some(&token));
		let without = pinned("K")
			.with_token("tmp")
			.sign(&HmacSha1, "POST", "http://shop.test/oauth/token", &Parameters::new(), &key)
			.expect("Signing should succeed.");
		let with = pinned("K")
			.with_token("tmp")
			.with_verifier(Verifier::new("v3r"))
			.sign(&HmacSha1, "POST", "http://shop.test/oauth/token", &Parameters::new(), &key)
			.expect("Signing should succeed.");

		assert_eq!(without.get("oauth_verifier"), None);
		assert_eq!(with.get("oauth_verifier"), Some("v3r"));
		assert_ne!(without.signature(), with.signature());
	}

	#[test]
	fn generated_nonces_are_alphanumeric_and_fresh() {
		let first = generate_nonce(NONCE_LEN);
		let second = generate_nonce(NONCE_LEN);

		assert_eq!(first.len(), 32);
		assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first, second);
	}
}
