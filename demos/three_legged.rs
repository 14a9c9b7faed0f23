//! Runs the full three-legged flow against an emulated shop whose authorization page approves
//! immediately, then signs an API call with the issued token credentials.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth1_flow::{
	auth::CredentialPair,
	browser::{BrowserFuture, BrowserInteraction, BrowserOutcome, ResourceOwnerLogin},
	config::ClientConfig,
	flows::OAuthClient,
	http::{HttpMethod, ReqwestRequester},
	reqwest::{Client, Error as ReqwestError, redirect::Policy},
	url::Url,
};

/// Minimal browser: opens pages without following redirects and never fills real forms.
struct RedirectStoppingBrowser(Client);
impl BrowserInteraction for RedirectStoppingBrowser {
	type Error = ReqwestError;

	fn navigate<'a>(&'a mut self, url: &'a str) -> BrowserFuture<'a, BrowserOutcome, Self::Error> {
		Box::pin(async move {
			let response = self.0.get(url).send().await?;
			let target = response
				.headers()
				.get("location")
				.and_then(|value| value.to_str().ok())
				.and_then(|value| Url::parse(value).ok());

			Ok(match target {
				Some(target) => BrowserOutcome::Intercepted { target },
				None => BrowserOutcome::Completed,
			})
		})
	}

	fn fill_field<'a>(&'a mut self, _: &'a str, _: &'a str) -> BrowserFuture<'a, (), Self::Error> {
		Box::pin(async { Ok(()) })
	}

	fn click<'a>(&'a mut self, _: &'a str) -> BrowserFuture<'a, BrowserOutcome, Self::Error> {
		Box::pin(async { Ok(BrowserOutcome::Completed) })
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/initiate");
			then.status(200).body(
				"oauth_token=demo-temporary&oauth_token_secret=demo-temporary-secret&oauth_callback_confirmed=true",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/authorize");
			then.status(302).header(
				"location",
				"https://demo.shop/callback?oauth_token=demo-temporary&oauth_verifier=demo-verifier",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body("oauth_verifier=demo-verifier");
			then.status(200).body("oauth_token=demo-token&oauth_token_secret=demo-token-secret");
		})
		.await;

	let products_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/rest/products");
			then.status(200).header("content-type", "application/json").body("[{\"sku\":\"demo\"}]");
		})
		.await;
	let config = ClientConfig::builder()
		.host(server.url("/"))
		.consumer("demo-consumer", "demo-consumer-secret")
		.callback_uri("https://demo.shop/callback")
		.user_agent("oauth1-flow-demo")
		.build()?;
	// `httpmock` serves a self-signed certificate.
	let http_client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(Policy::none())
		.build()?;
	let requester = ReqwestRequester::with_client(http_client.clone());
	let mut browser = RedirectStoppingBrowser(http_client);
	let mut client = OAuthClient::new(config);
	let signer = client
		.authenticate(&requester, &mut browser, &ResourceOwnerLogin::new("owner", "hunter2"))
		.await?;

	println!("Issued token credentials for `{}`.", signer.token().identifier());

	let response = signer.send_api_request(&requester, HttpMethod::Get, "/products", None).await?;

	println!("Products: {}.", response.body);

	products_mock.assert_async().await;

	Ok(())
}
