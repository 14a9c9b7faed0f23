//! Client configuration: the shop host, consumer credentials, and admin authorization settings.
//!
//! Values come either from [`ClientConfigBuilder`] or from serialized input decoded through
//! [`RawClientConfig`]:
//!
//! ```json
//! {
//! 	"host": "https://shop.test/magento",
//! 	"identifier": "dpf43f3p2l4k3l03",
//! 	"secret": "kd94hf93k423kf44",
//! 	"callback_uri": "https://shop.test/callback",
//! 	"admin": true,
//! 	"admin_user": "admin",
//! 	"admin_password": "hunter2"
//! }
//! ```

/// Fluent builder for [`ClientConfig`].
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, Secret},
	error::ConfigError,
};

/// REST prefix applied by [`ClientConfig::api_url`] unless overridden.
pub const DEFAULT_API_PREFIX: &str = "/api/rest";

/// Serialized configuration as it appears in JSON files or environment-derived maps.
///
/// Every field is optional at the decoding stage; converting into [`ClientConfig`] reports which
/// required key is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawClientConfig {
	/// Shop base URL, optionally with a port and a path prefix.
	pub host: Option<String>,
	/// Consumer key.
	pub identifier: Option<String>,
	/// Consumer secret.
	pub secret: Option<Secret>,
	/// Callback announced during the temporary credentials leg.
	pub callback_uri: Option<String>,
	/// Authorize through the admin panel instead of the customer storefront.
	#[serde(default)]
	pub admin: bool,
	/// Admin panel base URL; defaults to `{host}/admin`.
	pub admin_url: Option<String>,
	/// Admin login name, required when `admin` is set.
	pub admin_user: Option<String>,
	/// Admin password, required when `admin` is set.
	pub admin_password: Option<Secret>,
	/// `User-Agent` header attached to every request.
	pub user_agent: Option<String>,
	/// REST prefix for API calls; defaults to [`DEFAULT_API_PREFIX`].
	pub api_prefix: Option<String>,
}

/// Admin authorization settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminAccess {
	/// Admin login name.
	pub username: String,
	/// Admin password.
	pub password: Secret,
	/// Admin panel base URL without a trailing slash, if configured explicitly.
	pub admin_url: Option<String>,
}

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	base_uri: String,
	credentials: ClientCredentials,
	admin: Option<AdminAccess>,
	user_agent: Option<String>,
	api_prefix: String,
}
impl ClientConfig {
	/// Starts a fluent builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Decodes and validates a JSON document.
	pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(input);
		let raw: RawClientConfig = serde_path_to_error::deserialize(&mut de)?;

		raw.try_into()
	}

	/// Decodes and validates an already-parsed JSON value.
	pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
		let raw: RawClientConfig = serde_path_to_error::deserialize(value)?;

		raw.try_into()
	}

	/// Base URI derived from `host`: `scheme://host[:port][/path]` without a trailing slash.
	pub fn base_uri(&self) -> &str {
		&self.base_uri
	}

	/// Consumer credentials.
	pub fn credentials(&self) -> &ClientCredentials {
		&self.credentials
	}

	/// Admin authorization settings, when the admin flow is enabled.
	pub fn admin(&self) -> Option<&AdminAccess> {
		self.admin.as_ref()
	}

	/// Configured `User-Agent`.
	pub fn user_agent(&self) -> Option<&str> {
		self.user_agent.as_deref()
	}

	/// REST prefix used by [`ClientConfig::api_url`]; empty when disabled.
	pub fn api_prefix(&self) -> &str {
		&self.api_prefix
	}

	/// `{base}/oauth/initiate`.
	pub fn temporary_credentials_uri(&self) -> String {
		format!("{}/oauth/initiate", self.base_uri)
	}

	/// `{base}/oauth/token`.
	pub fn token_credentials_uri(&self) -> String {
		format!("{}/oauth/token", self.base_uri)
	}

	/// Authorization endpoint without the `oauth_token` query.
	///
	/// Admin flows use `{admin_url}/oauth_authorize` or `{base}/admin/oauth_authorize`; customer
	/// flows use `{base}/oauth/authorize`.
	pub fn authorization_endpoint(&self) -> String {
		match &self.admin {
			Some(AdminAccess { admin_url: Some(admin_url), .. }) =>
				format!("{admin_url}/oauth_authorize"),
			Some(_) => format!("{}/admin/oauth_authorize", self.base_uri),
			None => format!("{}/oauth/authorize", self.base_uri),
		}
	}

	/// Resolves an API path against the base URI, inserting the REST prefix when missing.
	///
	/// Absolute `http`/`https` URLs with a host are returned unchanged.
	pub fn api_url(&self, path: &str) -> String {
		if is_absolute_http(path) {
			return path.to_owned();
		}

		let path = if path.starts_with('/') { path.to_owned() } else { format!("/{path}") };

		if self.api_prefix.is_empty() || has_prefix(&path, &self.api_prefix) {
			format!("{}{path}", self.base_uri)
		} else {
			format!("{}{}{path}", self.base_uri, self.api_prefix)
		}
	}
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		ClientConfigBuilder::from(raw).build()
	}
}

fn is_absolute_http(path: &str) -> bool {
	Url::parse(path)
		.is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}

fn has_prefix(path: &str, prefix: &str) -> bool {
	path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
}
