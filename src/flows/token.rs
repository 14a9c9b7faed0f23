//! Leg three: `POST {base}/oauth/token`.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TemporaryCredentials, TokenCredentials, Verifier},
	error::{SecurityError, TransportError},
	flows::{FlowState, OAuthClient, response, signer},
	http::{HttpMethod, HttpRequest, HttpRequester},
	obs::{self, FlowOutcome, FlowSpan, Leg},
	protocol::ProtocolParameters,
	signature::Parameters,
};

/// Inputs of one token exchange; consumed by the request it signs.
struct TokenExchange {
	temporary: TemporaryCredentials,
	verifier: Verifier,
}
impl TokenExchange {
	fn into_request(self, client: &OAuthClient) -> Result<HttpRequest> {
		let uri = client.config.token_credentials_uri();
		let body = Parameters::new().with("oauth_verifier", self.verifier.expose());
		let protocol = ProtocolParameters::new(client.config.credentials().identifier())
			.with_token(self.temporary.identifier())
			.with_verifier(self.verifier);
		let headers = signer::signed_headers(
			&client.config,
			client.signature.as_ref(),
			HttpMethod::Post,
			&uri,
			&body,
			protocol,
			Some(self.temporary.secret()),
		)?;

		Ok(HttpRequest::new(HttpMethod::Post, uri)
			.with_headers(headers)
			.with_header("Content-Type", HttpRequest::FORM_CONTENT_TYPE)
			.with_body(body.to_form_body()))
	}
}

impl OAuthClient {
	/// Exchanges the authorized temporary credentials for token credentials.
	///
	/// `returned_identifier` is the `oauth_token` carried by the authorization redirect and
	/// must match the temporary credentials issued in leg one. The `verifier` is signed into
	/// this single request and dropped with it. On any failure the flow stays
	/// [`Authorized`](crate::flows::FlowStage::Authorized) so the exchange can be retried.
	pub async fn get_token_credentials<R>(
		&mut self,
		requester: &R,
		returned_identifier: &str,
		verifier: impl Into<Verifier>,
	) -> Result<TokenCredentials>
	where
		R: ?Sized + HttpRequester,
	{
		const LEG: Leg = Leg::TokenCredentials;

		let temporary = match &self.state {
			FlowState::Authorized { temporary, .. } => temporary.clone(),
			state => {
				return Err(Error::OutOfOrder {
					operation: "get_token_credentials",
					stage: state.stage(),
				});
			},
		};
		let span = FlowSpan::new(LEG, self.stage());

		obs::record_leg_outcome(LEG, FlowOutcome::Attempt);

		{
			let _guard = span.clone().entered();

			if returned_identifier != temporary.identifier() {
				let err: Error = SecurityError::TemporaryIdentifierMismatch {
					expected: temporary.identifier().to_owned(),
					returned: returned_identifier.to_owned(),
				}
				.into();

				span.record_failure(&err);
				obs::record_leg_failure(LEG, &err);

				return Err(err);
			}
		}

		let exchange = TokenExchange { temporary, verifier: verifier.into() };
		let this = &*self;
		let result = span
			.instrument(async {
				let request = exchange.into_request(this)?;
				let response = requester
					.submit(request)
					.await
					.map_err(|e| TransportError::requester(LEG, e))?;

				span.record_status(response.status);

				Ok::<_, Error>(response::parse_token_credentials(&response)?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_leg_outcome(LEG, FlowOutcome::Success),
			Err(e) => {
				span.record_failure(e);
				obs::record_leg_failure(LEG, e);
			},
		}

		let token = result?;

		self.state = FlowState::HaveTokenCredentials(token.clone());

		Ok(token)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{RecordingRequester, ScriptedBrowser, authorization_params, test_config},
		browser::ResourceOwnerLogin,
		error::CredentialsError,
		flows::FlowStage,
	};

	async fn authorized_client(requester: &RecordingRequester) -> OAuthClient {
		let callback = Url::parse("http://shop.test/callback?oauth_token=tmp&oauth_verifier=v3r")
			.expect("Fixture URL should parse.");
		let mut browser = ScriptedBrowser::new().intercept_click("[title=Authorize]", callback);
		let mut client = OAuthClient::new(test_config());

		client.get_temporary_credentials(requester).await.expect("Initiate leg should succeed.");
		client
			.authorize(&mut browser, &ResourceOwnerLogin::new("owner", "hunter2"))
			.await
			.expect("Authorization should be intercepted.");

		client
	}

	#[tokio::test]
	async fn token_request_signs_verifier_with_temporary_credentials() {
		let requester = RecordingRequester::new()
			.respond(200, "oauth_token=tmp&oauth_token_secret=tmp-secret&oauth_callback_confirmed=true")
			.respond(200, "oauth_token=tok&oauth_token_secret=tok-secret");
		let mut client = authorized_client(&requester).await;
		let token = client
			.get_token_credentials(&requester, "tmp", "v3r")
			.await
			.expect("Token exchange should succeed.");

		assert_eq!(token.identifier(), "tok");
		assert_eq!(token.secret().expose(), "tok-secret");
		assert_eq!(client.token_credentials(), Some(&token));
		assert!(client.temporary_credentials().is_none());

		let requests = requester.requests();
		let request = &requests[1];
		let params = authorization_params(request);

		assert_eq!(request.header("content-type"), Some(HttpRequest::FORM_CONTENT_TYPE));
		assert_eq!(request.body.as_deref(), Some("oauth_verifier=v3r"));
		assert_eq!(params.get("oauth_token").map(String::as_str), Some("tmp"));
		assert_eq!(params.get("oauth_verifier").map(String::as_str), Some("v3r"));
		assert!(!params.contains_key("oauth_callback"));
	}

	#[tokio::test]
	async fn unparseable_token_response_keeps_the_flow_authorized() {
		let requester = RecordingRequester::new()
			.respond(200, "oauth_token=tmp&oauth_token_secret=tmp-secret&oauth_callback_confirmed=true")
			.respond(200, "<html>maintenance</html>")
			.respond(200, "oauth_token=tok&oauth_token_secret=tok-secret");
		let mut client = authorized_client(&requester).await;
		let err = client
			.get_token_credentials(&requester, "tmp", "v3r")
			.await
			.expect_err("Unparseable bodies must be rejected.");

		assert!(matches!(err, Error::Credentials(CredentialsError::Unparseable { .. })));
		assert_eq!(client.stage(), FlowStage::Authorized);

		client
			.get_token_credentials(&requester, "tmp", "v3r")
			.await
			.expect("A retried exchange should succeed.");

		assert_eq!(client.stage(), FlowStage::HaveTokenCredentials);
	}
}
