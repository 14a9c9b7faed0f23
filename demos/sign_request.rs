//! Signs an API request with previously issued token credentials and prints the outgoing
//! headers, without touching the network.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use oauth1_flow::{
	auth::TokenCredentials,
	config::ClientConfig,
	flows::RequestSigner,
	http::HttpMethod,
	signature::{HmacSha1, Parameters},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::from_json_str(
		r#"{
			"host": "https://shop.example/magento",
			"identifier": "demo-consumer",
			"secret": "demo-consumer-secret",
			"user_agent": "oauth1-flow-demo"
		}"#,
	)?;
	let token = TokenCredentials::new("demo-token", "demo-token-secret")?;
	let signer = RequestSigner::new(Arc::new(config), Arc::new(HmacSha1), token);
	let body = Parameters::new().with(
		"product",
		Parameters::new().with("sku", "demo-1").with("name", "Demo product"),
	);
	let request = signer.api_request(HttpMethod::Post, "/products", Some(&body))?;

	println!("{} {}", request.method, request.url);

	for (name, value) in &request.headers {
		println!("{name}: {value}");
	}

	println!();
	println!("{}", request.body.unwrap_or_default());

	Ok(())
}
