//! Leg one: `POST {base}/oauth/initiate`.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TemporaryCredentials},
	error::TransportError,
	flows::{FlowStage, FlowState, OAuthClient, response, signer},
	http::{HttpMethod, HttpRequest, HttpRequester},
	obs::{self, FlowOutcome, FlowSpan, Leg},
	protocol::{OUT_OF_BAND_CALLBACK, ProtocolParameters},
	signature::Parameters,
};

impl OAuthClient {
	/// Requests temporary credentials signed with the consumer secret alone.
	///
	/// The request announces the configured callback URI (or `oob`) and carries an empty body.
	/// On success the flow moves to [`FlowStage::HaveTemporaryCredentials`].
	pub async fn get_temporary_credentials<R>(&mut self, requester: &R) -> Result<TemporaryCredentials>
	where
		R: ?Sized + HttpRequester,
	{
		const LEG: Leg = Leg::TemporaryCredentials;

		self.ensure_stage("get_temporary_credentials", FlowStage::Initialized)?;

		let span = FlowSpan::new(LEG, self.stage());

		obs::record_leg_outcome(LEG, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let uri = self.config.temporary_credentials_uri();
				let consumer = self.config.credentials();
				let protocol = ProtocolParameters::new(consumer.identifier())
					.with_callback(consumer.callback_uri().unwrap_or(OUT_OF_BAND_CALLBACK));
				let headers = signer::signed_headers(
					&self.config,
					self.signature.as_ref(),
					HttpMethod::Post,
					&uri,
					&Parameters::new(),
					protocol,
					None,
				)?;
				let request = HttpRequest::new(HttpMethod::Post, uri).with_headers(headers);
				let response = requester
					.submit(request)
					.await
					.map_err(|e| TransportError::requester(LEG, e))?;

				span.record_status(response.status);

				Ok::<_, Error>(response::parse_temporary_credentials(&response)?)
			})
			.await;

		match &result {
			Ok(_) => obs::record_leg_outcome(LEG, FlowOutcome::Success),
			Err(e) => {
				span.record_failure(e);
				obs::record_leg_failure(LEG, e);
			},
		}

		let temporary = result?;

		self.state = FlowState::HaveTemporaryCredentials(temporary.clone());

		Ok(temporary)
	}
}
