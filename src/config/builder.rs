// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, Secret},
	config::{AdminAccess, ClientConfig, DEFAULT_API_PREFIX, RawClientConfig},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
	/// Shop base URL.
	pub host: Option<String>,
	/// Consumer key.
	pub identifier: Option<String>,
	/// Consumer secret.
	pub secret: Option<Secret>,
	/// Callback URI announced during the temporary credentials leg.
	pub callback_uri: Option<String>,
	/// Whether authorization runs through the admin panel.
	pub admin: bool,
	/// Optional admin panel base URL.
	pub admin_url: Option<String>,
	/// Admin login name.
	pub admin_user: Option<String>,
	/// Admin password.
	pub admin_password: Option<Secret>,
	/// Optional `User-Agent` header.
	pub user_agent: Option<String>,
	/// Optional REST prefix override.
	pub api_prefix: Option<String>,
}
impl ClientConfigBuilder {
	/// Sets the shop base URL.
	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());

		self
	}

	/// Sets the consumer key and secret.
	pub fn consumer(mut self, identifier: impl Into<String>, secret: impl Into<String>) -> Self {
		self.identifier = Some(identifier.into());
		self.secret = Some(Secret::new(secret));

		self
	}

	/// Sets the callback URI.
	pub fn callback_uri(mut self, callback_uri: impl Into<String>) -> Self {
		self.callback_uri = Some(callback_uri.into());

		self
	}

	/// Enables the admin flow with the given login.
	pub fn admin_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.admin = true;
		self.admin_user = Some(username.into());
		self.admin_password = Some(Secret::new(password));

		self
	}

	/// Overrides the admin panel base URL.
	pub fn admin_url(mut self, url: impl Into<String>) -> Self {
		self.admin_url = Some(url.into());

		self
	}

	/// Sets the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Overrides the REST prefix; pass an empty string to disable prefixing.
	pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.api_prefix = Some(prefix.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let host = self.host.ok_or(ConfigError::MissingField { field: "host" })?;
		let identifier = self.identifier.ok_or(ConfigError::MissingField { field: "identifier" })?;
		let secret = self.secret.ok_or(ConfigError::MissingField { field: "secret" })?;
		let base_uri = derive_base_uri(&host)?;
		let mut credentials = ClientCredentials::new(identifier, secret.expose())?;

		if let Some(callback_uri) = self.callback_uri {
			credentials = credentials.with_callback_uri(callback_uri);
		}

		let admin = if self.admin {
			let username = self.admin_user.ok_or(ConfigError::MissingField { field: "admin_user" })?;
			let password =
				self.admin_password.ok_or(ConfigError::MissingField { field: "admin_password" })?;
			let admin_url = self.admin_url.map(|url| validate_admin_url(&url)).transpose()?;

			Some(AdminAccess { username, password, admin_url })
		} else {
			None
		};
		let api_prefix = match self.api_prefix {
			Some(prefix) => normalize_prefix(&prefix),
			None => DEFAULT_API_PREFIX.to_owned(),
		};

		Ok(ClientConfig { base_uri, credentials, admin, user_agent: self.user_agent, api_prefix })
	}
}
impl From<RawClientConfig> for ClientConfigBuilder {
	fn from(raw: RawClientConfig) -> Self {
		Self {
			host: raw.host,
			identifier: raw.identifier,
			secret: raw.secret,
			callback_uri: raw.callback_uri,
			admin: raw.admin,
			admin_url: raw.admin_url,
			admin_user: raw.admin_user,
			admin_password: raw.admin_password,
			user_agent: raw.user_agent,
			api_prefix: raw.api_prefix,
		}
	}
}

fn derive_base_uri(host: &str) -> Result<String, ConfigError> {
	let url = Url::parse(host)
		.map_err(|source| ConfigError::InvalidHost { host: host.into(), source })?;
	let authority =
		url.host_str().ok_or_else(|| ConfigError::HostWithoutAuthority { host: host.into() })?;
	let mut base = format!("{}://{authority}", url.scheme());

	if let Some(port) = url.port() {
		base.push(':');
		base.push_str(&port.to_string());
	}

	let path = url.path().trim_matches('/');

	if !path.is_empty() {
		base.push('/');
		base.push_str(path);
	}

	Ok(base)
}

fn validate_admin_url(url: &str) -> Result<String, ConfigError> {
	Url::parse(url).map_err(|source| ConfigError::InvalidAdminUrl { url: url.into(), source })?;

	Ok(url.trim_end_matches('/').to_owned())
}

fn normalize_prefix(prefix: &str) -> String {
	let trimmed = prefix.trim_matches('/');

	if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::CredentialPair;

	#[test]
	fn builder_validates_and_normalizes() {
		let config = ClientConfig::builder()
			.host("http://shop.test:80/")
			.consumer("K", "S")
			.callback_uri("http://shop.test/callback")
			.user_agent("oauth1-flow-tests")
			.api_prefix("v1/")
			.build()
			.expect("Builder input should be valid.");

		assert_eq!(config.base_uri(), "http://shop.test");
		assert_eq!(config.credentials().callback_uri(), Some("http://shop.test/callback"));
		assert_eq!(config.user_agent(), Some("oauth1-flow-tests"));
		assert_eq!(config.api_prefix(), "/v1");
		assert_eq!(config.api_url("/products"), "http://shop.test/v1/products");
	}

	#[test]
	fn empty_consumer_secret_is_rejected() {
		let err = ClientConfig::builder()
			.host("http://shop.test")
			.consumer("K", "")
			.build()
			.expect_err("Empty secrets must be rejected.");

		assert!(matches!(err, ConfigError::InvalidCredentials(_)));
	}

	#[test]
	fn admin_login_requires_parseable_admin_url() {
		let err = ClientConfig::builder()
			.host("http://shop.test")
			.consumer("K", "S")
			.admin_login("admin", "hunter2")
			.admin_url("backend")
			.build()
			.expect_err("Relative admin URLs must be rejected.");

		assert!(matches!(err, ConfigError::InvalidAdminUrl { .. }));

		let config = ClientConfig::builder()
			.host("http://shop.test")
			.consumer("K", "S")
			.admin_login("admin", "hunter2")
			.build()
			.expect("Admin login should be valid.");
		let admin = config.admin().expect("Admin access should be configured.");

		assert_eq!(admin.username, "admin");
		assert_eq!(admin.password.expose(), "hunter2");
		assert_eq!(config.credentials().identifier(), "K");
	}

	#[test]
	fn empty_prefix_disables_prefixing() {
		let config = ClientConfig::builder()
			.host("http://shop.test")
			.consumer("K", "S")
			.api_prefix("")
			.build()
			.expect("Builder input should be valid.");

		assert_eq!(config.api_url("products"), "http://shop.test/products");
	}
}
