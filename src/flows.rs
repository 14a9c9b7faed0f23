//! Three-legged flow orchestration.
//!
//! [`OAuthClient`] owns the consumer configuration and an explicit [`FlowState`]. Each leg
//! checks the current stage before doing any I/O and only advances the state once the leg
//! has fully succeeded:
//!
//! ```text
//! Initialized -> HaveTemporaryCredentials -> Authorized -> HaveTokenCredentials
//! ```
//!
//! Once token credentials exist, [`OAuthClient::signer`] hands out a cloneable
//! [`RequestSigner`] for API calls.

pub mod authorize;
pub mod response;
pub mod signer;

mod temporary;
mod token;

pub use authorize::*;
pub use signer::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TemporaryCredentials, TokenCredentials},
	browser::{BrowserInteraction, ResourceOwnerLogin},
	config::ClientConfig,
	http::{HttpMethod, HttpRequester},
	protocol::ProtocolParameters,
	signature::{HmacSha1, Parameters, SignatureMethod},
};

/// Label of a [`FlowState`] used in errors, spans, and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// No leg has run yet.
	Initialized,
	/// Temporary credentials were issued.
	HaveTemporaryCredentials,
	/// The resource owner approved the temporary credentials.
	Authorized,
	/// Token credentials were issued.
	HaveTokenCredentials,
}
impl FlowStage {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Initialized => "initialized",
			FlowStage::HaveTemporaryCredentials => "have_temporary_credentials",
			FlowStage::Authorized => "authorized",
			FlowStage::HaveTokenCredentials => "have_token_credentials",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Flow progress together with the credentials each stage owns.
#[derive(Clone, Debug, Default)]
pub enum FlowState {
	/// No leg has run yet.
	#[default]
	Initialized,
	/// Temporary credentials awaiting approval.
	HaveTemporaryCredentials(TemporaryCredentials),
	/// Approved temporary credentials awaiting the token exchange.
	Authorized {
		/// Credentials issued by the initiate endpoint.
		temporary: TemporaryCredentials,
		/// Redirect intercepted after the resource owner confirmed.
		redirect: AuthorizationRedirect,
	},
	/// Long-lived token credentials.
	HaveTokenCredentials(TokenCredentials),
}
impl FlowState {
	/// Returns the label of the current stage.
	pub fn stage(&self) -> FlowStage {
		match self {
			FlowState::Initialized => FlowStage::Initialized,
			FlowState::HaveTemporaryCredentials(_) => FlowStage::HaveTemporaryCredentials,
			FlowState::Authorized { .. } => FlowStage::Authorized,
			FlowState::HaveTokenCredentials(_) => FlowStage::HaveTokenCredentials,
		}
	}
}

/// Drives one three-legged authorization attempt.
///
/// Legs take `&mut self`; run parallel flows with separate clients.
#[derive(Clone)]
pub struct OAuthClient {
	config: Arc<ClientConfig>,
	signature: Arc<dyn SignatureMethod>,
	state: FlowState,
}
impl OAuthClient {
	/// Creates a client that signs with [`HmacSha1`].
	pub fn new(config: ClientConfig) -> Self {
		Self::with_signature_method(config, Arc::new(HmacSha1))
	}

	/// Creates a client with a custom signature method.
	pub fn with_signature_method(config: ClientConfig, signature: Arc<dyn SignatureMethod>) -> Self {
		Self { config: Arc::new(config), signature, state: FlowState::Initialized }
	}

	/// Client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Current flow state.
	pub fn state(&self) -> &FlowState {
		&self.state
	}

	/// Label of the current flow state.
	pub fn stage(&self) -> FlowStage {
		self.state.stage()
	}

	/// Temporary credentials held by the current stage, if any.
	pub fn temporary_credentials(&self) -> Option<&TemporaryCredentials> {
		match &self.state {
			FlowState::HaveTemporaryCredentials(temporary) | FlowState::Authorized { temporary, .. } =>
				Some(temporary),
			_ => None,
		}
	}

	/// Token credentials, once the flow has completed.
	pub fn token_credentials(&self) -> Option<&TokenCredentials> {
		match &self.state {
			FlowState::HaveTokenCredentials(token) => Some(token),
			_ => None,
		}
	}

	/// Login derived from the configured admin account, if the admin flow is enabled.
	pub fn admin_login(&self) -> Option<ResourceOwnerLogin> {
		self.config.admin().map(ResourceOwnerLogin::from)
	}

	/// Drops any credentials and returns to [`FlowStage::Initialized`].
	pub fn reset(&mut self) {
		self.state = FlowState::Initialized;
	}

	/// Returns a signer bound to the issued token credentials.
	pub fn signer(&self) -> Option<RequestSigner> {
		self.token_credentials().map(|token| self.signer_for(token.clone()))
	}

	/// Builds the headers for a request signed with `credentials`.
	///
	/// The result carries `Authorization`, `Accept: application/json`, and the configured
	/// `User-Agent`. `body_parameters` are the url-encoded form fields sent with the request.
	/// The state machine is not consulted, and `oauth_verifier` is never included.
	pub fn get_headers<C>(
		&self,
		credentials: &C,
		method: HttpMethod,
		url: &str,
		body_parameters: &Parameters,
	) -> Result<Vec<(String, String)>>
	where
		C: ?Sized + CredentialPair,
	{
		let protocol = ProtocolParameters::new(self.config.credentials().identifier())
			.with_token(credentials.identifier());

		signer::signed_headers(
			&self.config,
			self.signature.as_ref(),
			method,
			url,
			body_parameters,
			protocol,
			Some(credentials.secret()),
		)
	}

	/// Runs all three legs and returns a signer for the issued token credentials.
	///
	/// `oauth_token` and `oauth_verifier` are read from the intercepted redirect.
	pub async fn authenticate<R, B>(
		&mut self,
		requester: &R,
		browser: &mut B,
		login: &ResourceOwnerLogin,
	) -> Result<RequestSigner>
	where
		R: ?Sized + HttpRequester,
		B: ?Sized + BrowserInteraction,
	{
		self.get_temporary_credentials(requester).await?;

		let redirect = self.authorize(browser, login).await?;
		let (returned_identifier, verifier) = redirect.callback_params()?;
		let token = self.get_token_credentials(requester, &returned_identifier, verifier).await?;

		Ok(self.signer_for(token))
	}

	fn signer_for(&self, token: TokenCredentials) -> RequestSigner {
		RequestSigner::new(self.config.clone(), self.signature.clone(), token)
	}

	fn ensure_stage(&self, operation: &'static str, expected: FlowStage) -> Result<()> {
		let stage = self.stage();

		if stage == expected { Ok(()) } else { Err(Error::OutOfOrder { operation, stage }) }
	}
}
impl Debug for OAuthClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient")
			.field("config", &self.config)
			.field("signature_method", &self.signature.name())
			.field("state", &self.state)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{RecordingRequester, ScriptedBrowser, test_config},
		error::{CredentialsError, SecurityError},
	};

	fn callback(token: &str) -> Url {
		Url::parse(&format!("http://shop.test/callback?oauth_token={token}&oauth_verifier=v3r"))
			.expect("Fixture URL should parse.")
	}

	#[tokio::test]
	async fn authenticate_runs_all_three_legs() {
		let requester = RecordingRequester::new()
			.respond(200, "oauth_token=tmp&oauth_token_secret=tmp-secret&oauth_callback_confirmed=true")
			.respond(200, "oauth_token=tok&oauth_token_secret=tok-secret");
		let mut browser = ScriptedBrowser::new().intercept_click("[title=Authorize]", callback("tmp"));
		let mut client = OAuthClient::new(test_config());
		let signer = client
			.authenticate(&requester, &mut browser, &ResourceOwnerLogin::new("owner", "hunter2"))
			.await
			.expect("Scripted flow should complete.");

		assert_eq!(client.stage(), FlowStage::HaveTokenCredentials);
		assert_eq!(signer.token().identifier(), "tok");
		assert_eq!(
			client.signer().map(|signer| signer.token().clone()),
			Some(signer.token().clone())
		);

		let requests = requester.requests();

		assert_eq!(requests.len(), 2);
		assert_eq!(requests[0].url, "http://shop.test/oauth/initiate");
		assert_eq!(requests[1].url, "http://shop.test/oauth/token");
		assert_eq!(requests[1].body.as_deref(), Some("oauth_verifier=v3r"));
	}

	#[tokio::test]
	async fn legs_called_out_of_order_fail_before_io() {
		let requester = RecordingRequester::new();
		let mut client = OAuthClient::new(test_config());
		let err = client
			.get_token_credentials(&requester, "tmp", "v3r")
			.await
			.expect_err("The token exchange requires an authorized flow.");

		assert!(matches!(
			err,
			Error::OutOfOrder { operation: "get_token_credentials", stage: FlowStage::Initialized }
		));

		let mut browser = ScriptedBrowser::new();
		let err = client
			.authorize(&mut browser, &ResourceOwnerLogin::new("owner", "hunter2"))
			.await
			.expect_err("Authorization requires temporary credentials.");

		assert!(matches!(err, Error::OutOfOrder { operation: "authorize", .. }));
		assert!(requester.requests().is_empty());
		assert!(browser.actions().is_empty());
	}

	#[tokio::test]
	async fn mismatched_identifier_keeps_the_flow_authorized() {
		let requester = RecordingRequester::new().respond(
			200,
			"oauth_token=tmp&oauth_token_secret=tmp-secret&oauth_callback_confirmed=true",
		);
		let mut browser = ScriptedBrowser::new().intercept_click("[title=Authorize]", callback("evil"));
		let mut client = OAuthClient::new(test_config());

		client.get_temporary_credentials(&requester).await.expect("Initiate leg should succeed.");
		client
			.authorize(&mut browser, &ResourceOwnerLogin::new("owner", "hunter2"))
			.await
			.expect("Authorization should be intercepted.");

		let err = client
			.get_token_credentials(&requester, "evil", "v3r")
			.await
			.expect_err("A foreign identifier must be rejected.");

		assert!(matches!(err, Error::Security(SecurityError::TemporaryIdentifierMismatch { .. })));
		assert!(err.to_string().contains("potential man-in-the-middle"));
		assert_eq!(client.stage(), FlowStage::Authorized);
		assert_eq!(requester.requests().len(), 1);
	}

	#[tokio::test]
	async fn server_error_on_token_leg_keeps_the_flow_authorized() {
		let requester = RecordingRequester::new()
			.respond(200, "oauth_token=tmp&oauth_token_secret=tmp-secret&oauth_callback_confirmed=true")
			.respond(400, "error=invalid_verifier");
		let mut browser = ScriptedBrowser::new().intercept_click("[title=Authorize]", callback("tmp"));
		let mut client = OAuthClient::new(test_config());

		client.get_temporary_credentials(&requester).await.expect("Initiate leg should succeed.");
		client
			.authorize(&mut browser, &ResourceOwnerLogin::new("owner", "hunter2"))
			.await
			.expect("Authorization should be intercepted.");

		let err = client
			.get_token_credentials(&requester, "tmp", "v3r")
			.await
			.expect_err("Server-reported errors must fail the exchange.");

		assert!(matches!(
			&err,
			Error::Credentials(CredentialsError::Server { message, .. }) if message == "invalid_verifier"
		));
		assert_eq!(client.stage(), FlowStage::Authorized);
		assert!(client.signer().is_none());
	}

	#[tokio::test]
	async fn reset_restarts_a_failed_flow() {
		let requester = RecordingRequester::new()
			.respond(200, "oauth_token=tmp&oauth_token_secret=tmp-secret&oauth_callback_confirmed=false")
			.respond(200, "oauth_token=tmp2&oauth_token_secret=s2&oauth_callback_confirmed=true");
		let mut client = OAuthClient::new(test_config());

		assert!(client.get_temporary_credentials(&requester).await.is_err());
		assert_eq!(client.stage(), FlowStage::Initialized);

		let temporary = client
			.get_temporary_credentials(&requester)
			.await
			.expect("Second attempt should succeed.");

		assert_eq!(temporary.identifier(), "tmp2");

		client.reset();

		assert_eq!(client.stage(), FlowStage::Initialized);
		assert!(client.temporary_credentials().is_none());
	}

	#[test]
	fn get_headers_is_stateless_and_never_carries_a_verifier() {
		let client = OAuthClient::new(test_config());
		let token = TokenCredentials::new("tok", "tok-secret").expect("Fixture is valid.");
		let headers = client
			.get_headers(
				&token,
				HttpMethod::Get,
				"http://shop.test/api/rest/products?limit=5",
				&Parameters::new(),
			)
			.expect("Signing should succeed.");
		let authorization = headers
			.iter()
			.find(|(name, _)| name == "Authorization")
			.map(|(_, value)| value.as_str())
			.expect("Authorization header should be present.");

		assert!(authorization.starts_with("OAuth oauth_consumer_key=\"K\""));
		assert!(authorization.contains("oauth_token=\"tok\""));
		assert!(!authorization.contains("oauth_verifier"));
		assert!(headers.contains(&("Accept".into(), "application/json".into())));
		assert!(headers.contains(&("User-Agent".into(), "oauth1-flow-tests".into())));
		assert_eq!(client.stage(), FlowStage::Initialized);
	}
}
