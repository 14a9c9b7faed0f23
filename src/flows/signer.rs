//! Signing of API requests with issued token credentials.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, Secret, TokenCredentials},
	config::ClientConfig,
	error::TransportError,
	http::{HttpMethod, HttpRequest, HttpRequester, HttpResponse},
	protocol::{AuthorizationHeader, ProtocolParameters},
	signature::{Parameters, SignatureMethod, SigningKey},
};

/// Signs requests on behalf of the resource owner once the flow has completed.
///
/// Signers are immutable, cheap to clone, and can be shared across tasks.
#[derive(Clone)]
pub struct RequestSigner {
	config: Arc<ClientConfig>,
	signature: Arc<dyn SignatureMethod>,
	token: TokenCredentials,
}
impl RequestSigner {
	/// Binds token credentials to a client configuration.
	pub fn new(
		config: Arc<ClientConfig>,
		signature: Arc<dyn SignatureMethod>,
		token: TokenCredentials,
	) -> Self {
		Self { config, signature, token }
	}

	/// Token credentials used for signing.
	pub fn token(&self) -> &TokenCredentials {
		&self.token
	}

	/// Resolves an API path under the configured REST prefix.
	pub fn api_url(&self, path: &str) -> String {
		self.config.api_url(path)
	}

	/// Builds signed headers for a request; see [`OAuthClient::get_headers`](crate::flows::OAuthClient::get_headers).
	pub fn headers(
		&self,
		method: HttpMethod,
		url: &str,
		body_parameters: &Parameters,
	) -> Result<Vec<(String, String)>> {
		let protocol = ProtocolParameters::new(self.config.credentials().identifier())
			.with_token(self.token.identifier());

		signed_headers(
			&self.config,
			self.signature.as_ref(),
			method,
			url,
			body_parameters,
			protocol,
			Some(self.token.secret()),
		)
	}

	/// Signs an existing request in place.
	///
	/// Url-encoded form bodies take part in the signature; other bodies do not. An existing
	/// `Authorization` header is replaced, while caller-supplied `Accept` and `User-Agent`
	/// headers are kept.
	pub fn sign_request(&self, mut request: HttpRequest) -> Result<HttpRequest> {
		let body = match &request.body {
			Some(body) if request.has_form_body() => Parameters::from_query(body),
			_ => Parameters::new(),
		};
		let headers = self.headers(request.method, &request.url, &body)?;

		request.headers.retain(|(name, _)| !name.eq_ignore_ascii_case(AuthorizationHeader::NAME));

		for (name, value) in headers {
			if name == AuthorizationHeader::NAME || request.header(&name).is_none() {
				request.headers.push((name, value));
			}
		}

		Ok(request)
	}

	/// Builds and signs a request against an API path, sending `body` as a url-encoded form.
	pub fn api_request(
		&self,
		method: HttpMethod,
		path: &str,
		body: Option<&Parameters>,
	) -> Result<HttpRequest> {
		let mut request = HttpRequest::new(method, self.api_url(path));

		if let Some(body) = body {
			request = request
				.with_header("Content-Type", HttpRequest::FORM_CONTENT_TYPE)
				.with_body(body.to_form_body());
		}

		self.sign_request(request)
	}

	/// Builds and signs a request against an API path, sending `body` as JSON.
	///
	/// JSON bodies do not take part in the signature.
	pub fn api_json_request(
		&self,
		method: HttpMethod,
		path: &str,
		body: &serde_json::Value,
	) -> Result<HttpRequest> {
		let request = HttpRequest::new(method, self.api_url(path))
			.with_header("Content-Type", HttpRequest::JSON_CONTENT_TYPE)
			.with_body(body.to_string());

		self.sign_request(request)
	}

	/// Signs and submits an API request through `requester`.
	pub async fn send_api_request<R>(
		&self,
		requester: &R,
		method: HttpMethod,
		path: &str,
		body: Option<&Parameters>,
	) -> Result<HttpResponse>
	where
		R: ?Sized + HttpRequester,
	{
		let request = self.api_request(method, path, body)?;

		submit(requester, request).await
	}

	/// Signs and submits an API request with a JSON body through `requester`.
	pub async fn send_api_json_request<R>(
		&self,
		requester: &R,
		method: HttpMethod,
		path: &str,
		body: &serde_json::Value,
	) -> Result<HttpResponse>
	where
		R: ?Sized + HttpRequester,
	{
		let request = self.api_json_request(method, path, body)?;

		submit(requester, request).await
	}
}
impl Debug for RequestSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestSigner")
			.field("base_uri", &self.config.base_uri())
			.field("signature_method", &self.signature.name())
			.field("token", &self.token)
			.finish()
	}
}

async fn submit<R>(requester: &R, request: HttpRequest) -> Result<HttpResponse>
where
	R: ?Sized + HttpRequester,
{
	Ok(requester.submit(request).await.map_err(TransportError::api)?)
}

/// Signs `protocol` for the request and assembles the outgoing header list.
pub(crate) fn signed_headers(
	config: &ClientConfig,
	signature: &dyn SignatureMethod,
	method: HttpMethod,
	url: &str,
	body_parameters: &Parameters,
	protocol: ProtocolParameters,
	token_secret: Option<&Secret>,
) -> Result<Vec<(String, String)>> {
	let key = SigningKey::new(config.credentials().secret(), token_secret);
	let authorization = protocol.sign(signature, method.as_str(), url, body_parameters, &key)?;
	let mut headers = vec![
		(AuthorizationHeader::NAME.to_owned(), authorization.to_header_value()),
		("Accept".to_owned(), "application/json".to_owned()),
	];

	if let Some(user_agent) = config.user_agent() {
		headers.push(("User-Agent".to_owned(), user_agent.to_owned()));
	}

	Ok(headers)
}
