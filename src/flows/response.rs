//! Parsing of url-encoded credential endpoint responses.

// self
use crate::{
	_prelude::*,
	auth::{TemporaryCredentials, TokenCredentials},
	error::CredentialsError,
	http::HttpResponse,
	obs::Leg,
};

/// Parses the initiate endpoint response into temporary credentials.
///
/// Non-success statuses fail with [`CredentialsError::BadResponse`]; a body that is not a
/// url-encoded mapping or lacks `oauth_callback_confirmed=true` is rejected as well.
pub fn parse_temporary_credentials(
	response: &HttpResponse,
) -> Result<TemporaryCredentials, CredentialsError> {
	const LEG: Leg = Leg::TemporaryCredentials;

	if !response.is_success() {
		return Err(bad_response(LEG, response));
	}

	let fields = parse_fields(&response.body).ok_or(CredentialsError::Unparseable { leg: LEG })?;

	if fields.get("oauth_callback_confirmed").map(String::as_str) != Some("true") {
		return Err(CredentialsError::CallbackNotConfirmed);
	}

	let (identifier, secret) = credential_fields(LEG, &fields)?;

	Ok(TemporaryCredentials::new(identifier, secret)?)
}

/// Parses the token endpoint response into token credentials.
///
/// A body carrying `error` or `oauth_problem` fails with [`CredentialsError::Server`] even on
/// non-success statuses, so the server's message is never lost.
pub fn parse_token_credentials(
	response: &HttpResponse,
) -> Result<TokenCredentials, CredentialsError> {
	const LEG: Leg = Leg::TokenCredentials;

	let fields = parse_fields(&response.body);

	if let Some(message) =
		fields.as_ref().and_then(|fields| fields.get("error").or_else(|| fields.get("oauth_problem")))
	{
		return Err(CredentialsError::Server { leg: LEG, message: message.clone() });
	}
	if !response.is_success() {
		return Err(bad_response(LEG, response));
	}

	let fields = fields.ok_or(CredentialsError::Unparseable { leg: LEG })?;
	let (identifier, secret) = credential_fields(LEG, &fields)?;

	Ok(TokenCredentials::new(identifier, secret)?)
}

/// Decodes an url-encoded body; `None` when it holds no `key=value` pair.
pub(crate) fn parse_fields(body: &str) -> Option<BTreeMap<String, String>> {
	let body = body.trim();

	if !body.split('&').any(|pair| pair.split_once('=').is_some_and(|(key, _)| !key.is_empty())) {
		return None;
	}

	Some(
		url::form_urlencoded::parse(body.as_bytes())
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect(),
	)
}

fn credential_fields(
	leg: Leg,
	fields: &BTreeMap<String, String>,
) -> Result<(String, String), CredentialsError> {
	let identifier = fields
		.get("oauth_token")
		.ok_or(CredentialsError::MissingField { leg, field: "oauth_token" })?;
	let secret = fields
		.get("oauth_token_secret")
		.ok_or(CredentialsError::MissingField { leg, field: "oauth_token_secret" })?;

	Ok((identifier.clone(), secret.clone()))
}

fn bad_response(leg: Leg, response: &HttpResponse) -> CredentialsError {
	CredentialsError::BadResponse { leg, status: response.status, body: response.body.clone() }
}
