//! Immutable credential pairs for the client, temporary, and token stages.

// self
use crate::{_prelude::*, auth::Secret};

/// Read access shared by every identifier/secret pair that can sign a request.
pub trait CredentialPair {
	/// Public identifier (`oauth_consumer_key` or `oauth_token`).
	fn identifier(&self) -> &str;

	/// Shared secret used to derive the signing key.
	fn secret(&self) -> &Secret;
}

/// Error returned when a credential pair fails validation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialValidationError {
	/// A required component was empty.
	#[error("{kind} credentials require a non-empty {field}.")]
	Empty {
		/// Kind of credentials (client, temporary, token).
		kind: &'static str,
		/// Offending component (identifier or secret).
		field: &'static str,
	},
}

#[derive(Serialize, Deserialize)]
struct RawPair {
	identifier: String,
	secret: String,
}

macro_rules! def_pair {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(try_from = "RawPair", into = "RawPair")]
		pub struct $name {
			identifier: String,
			secret: Secret,
		}
		impl $name {
			/// Creates a new pair after validating that neither component is empty.
			pub fn new(
				identifier: impl Into<String>,
				secret: impl Into<String>,
			) -> Result<Self, CredentialValidationError> {
				let identifier = identifier.into();
				let secret = Secret::new(secret);

				validate_pair($kind, &identifier, &secret)?;

				Ok(Self { identifier, secret })
			}
		}
		impl CredentialPair for $name {
			fn identifier(&self) -> &str {
				&self.identifier
			}

			fn secret(&self) -> &Secret {
				&self.secret
			}
		}
		impl TryFrom<RawPair> for $name {
			type Error = CredentialValidationError;

			fn try_from(raw: RawPair) -> Result<Self, Self::Error> {
				Self::new(raw.identifier, raw.secret)
			}
		}
		impl From<$name> for RawPair {
			fn from(value: $name) -> Self {
				Self { identifier: value.identifier, secret: value.secret.expose().to_owned() }
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_struct(stringify!($name))
					.field("identifier", &self.identifier)
					.field("secret", &self.secret)
					.finish()
			}
		}
	};
}

def_pair! {
	TemporaryCredentials,
	"Short-lived pair issued by the initiate endpoint and consumed by the token exchange.",
	"Temporary"
}
def_pair! {
	TokenCredentials,
	"Long-lived pair representing the authorized session.",
	"Token"
}

/// Consumer credentials identifying the application itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
	identifier: String,
	secret: Secret,
	callback_uri: Option<String>,
}
impl ClientCredentials {
	/// Creates consumer credentials after validating that neither component is empty.
	pub fn new(
		identifier: impl Into<String>,
		secret: impl Into<String>,
	) -> Result<Self, CredentialValidationError> {
		let identifier = identifier.into();
		let secret = Secret::new(secret);

		validate_pair("Client", &identifier, &secret)?;

		Ok(Self { identifier, secret, callback_uri: None })
	}

	/// Attaches the callback URI announced during the temporary credentials leg.
	pub fn with_callback_uri(mut self, callback_uri: impl Into<String>) -> Self {
		self.callback_uri = Some(callback_uri.into());

		self
	}

	/// Callback URI announced as `oauth_callback`, if configured.
	pub fn callback_uri(&self) -> Option<&str> {
		self.callback_uri.as_deref()
	}
}
impl CredentialPair for ClientCredentials {
	fn identifier(&self) -> &str {
		&self.identifier
	}

	fn secret(&self) -> &Secret {
		&self.secret
	}
}
impl Debug for ClientCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentials")
			.field("identifier", &self.identifier)
			.field("secret", &self.secret)
			.field("callback_uri", &self.callback_uri)
			.finish()
	}
}

fn validate_pair(
	kind: &'static str,
	identifier: &str,
	secret: &Secret,
) -> Result<(), CredentialValidationError> {
	if identifier.is_empty() {
		return Err(CredentialValidationError::Empty { kind, field: "identifier" });
	}
	if secret.is_empty() {
		return Err(CredentialValidationError::Empty { kind, field: "secret" });
	}

	Ok(())
}
