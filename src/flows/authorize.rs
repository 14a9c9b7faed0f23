//! Leg two: resource owner approval through the browser seam.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TemporaryCredentials, Verifier},
	browser::{self, BrowserInteraction, ResourceOwnerLogin},
	error::{CredentialsError, TransportError},
	flows::{FlowState, OAuthClient},
	obs::{self, FlowOutcome, FlowSpan, Leg},
	signature::encoding::encode,
};

/// Callback redirect intercepted after the resource owner granted access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRedirect {
	target: Url,
}
impl AuthorizationRedirect {
	/// Wraps an intercepted redirect target.
	pub fn new(target: Url) -> Self {
		Self { target }
	}

	/// Full redirect target.
	pub fn target(&self) -> &Url {
		&self.target
	}

	/// Returns the first query value named `name`.
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.target.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
	}

	/// Extracts `oauth_token` and `oauth_verifier` for the token exchange.
	pub fn callback_params(&self) -> Result<(String, Verifier), CredentialsError> {
		let token = self.require("oauth_token")?;
		let verifier = self.require("oauth_verifier")?;

		Ok((token, Verifier::new(verifier)))
	}

	fn require(&self, field: &'static str) -> Result<String, CredentialsError> {
		self.query_param(field).ok_or_else(|| CredentialsError::MissingCallbackParameter {
			target: self.target.to_string(),
			field,
		})
	}
}

impl OAuthClient {
	/// Builds the URL the resource owner opens to approve `temporary`.
	pub fn authorization_url(&self, temporary: &TemporaryCredentials) -> String {
		let endpoint = self.config.authorization_endpoint();
		let separator = if endpoint.contains('?') { '&' } else { '?' };

		format!("{endpoint}{separator}oauth_token={}", encode(temporary.identifier()))
	}

	/// Logs the resource owner in and confirms access, stopping at the callback redirect.
	///
	/// On success the flow moves to the
	/// [`Authorized`](crate::flows::FlowStage::Authorized) stage and the intercepted redirect
	/// is returned; reading `oauth_token` and `oauth_verifier` from it is up to the caller.
	pub async fn authorize<B>(
		&mut self,
		browser: &mut B,
		login: &ResourceOwnerLogin,
	) -> Result<AuthorizationRedirect>
	where
		B: ?Sized + BrowserInteraction,
	{
		const LEG: Leg = Leg::Authorization;

		let temporary = match &self.state {
			FlowState::HaveTemporaryCredentials(temporary) => temporary.clone(),
			state => return Err(Error::OutOfOrder { operation: "authorize", stage: state.stage() }),
		};
		let url = self.authorization_url(&temporary);
		let span = FlowSpan::new(LEG, self.stage());

		obs::record_leg_outcome(LEG, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let target = browser::run_authorization_script(browser, &url, login)
					.await
					.map_err(TransportError::browser)?
					.ok_or(CredentialsError::AuthorizationNotIntercepted)?;

				Ok::<_, Error>(AuthorizationRedirect::new(target))
			})
			.await;

		match &result {
			Ok(_) => obs::record_leg_outcome(LEG, FlowOutcome::Success),
			Err(e) => {
				span.record_failure(e);
				obs::record_leg_failure(LEG, e);
			},
		}

		let redirect = result?;

		self.state = FlowState::Authorized { temporary, redirect: redirect.clone() };

		Ok(redirect)
	}
}
