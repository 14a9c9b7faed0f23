//! Signature base string canonicalization.

// self
use crate::{
	_prelude::*,
	error::SignatureError,
	signature::{
		encoding::{encode, normalize},
		params::Parameters,
	},
};

/// Normalizes `uri` to `scheme://host[:port]/path` and returns it with its query parameters.
///
/// Default ports are dropped by the URL parser, and an empty path becomes `/`.
pub fn split_uri(uri: &str) -> Result<(String, Parameters), SignatureError> {
	let url =
		Url::parse(uri).map_err(|source| SignatureError::InvalidUri { uri: uri.into(), source })?;
	let host = url.host_str().ok_or_else(|| SignatureError::MissingHost { uri: uri.into() })?;
	let mut base = format!("{}://{host}", url.scheme());

	if let Some(port) = url.port() {
		base.push(':');
		base.push_str(&port.to_string());
	}

	match url.path() {
		"" => base.push('/'),
		path => base.push_str(path),
	}

	let query = url.query().map(Parameters::from_query).unwrap_or_default();

	Ok((base, query))
}

/// Builds the `METHOD&uri&params` base string signed by every method.
pub fn base_string(
	method: &str,
	uri: &str,
	parameters: &Parameters,
) -> Result<String, SignatureError> {
	let (base_uri, mut merged) = split_uri(uri)?;

	merged.merge(parameters);

	let mut pairs = merged
		.flatten()
		.into_iter()
		.map(|(key, value)| (normalize(&key), normalize(&value)))
		.collect::<Vec<_>>();

	pairs.sort();

	let parameter_string = pairs
		.iter()
		.map(|(key, value)| encode(&format!("{key}={value}")))
		.collect::<Vec<_>>()
		.join("%26");

	Ok(format!("{}&{}&{parameter_string}", encode(&method.to_ascii_uppercase()), encode(&base_uri)))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn uri_normalization_drops_default_ports_query_and_fragment() {
		let (base, query) = split_uri("HTTP://Shop.Test:80/api/rest/products?b=2&a=1#top")
			.expect("Valid URIs should normalize.");

		assert_eq!(base, "http://shop.test/api/rest/products");
		assert_eq!(query.get_text("a"), Some("1"));

		let (base, _) =
			split_uri("https://shop.test:443").expect("Valid URIs should normalize.");

		assert_eq!(base, "https://shop.test/");

		let (base, _) =
			split_uri("https://shop.test:8443/oauth").expect("Valid URIs should normalize.");

		assert_eq!(base, "https://shop.test:8443/oauth");
	}

	#[test]
	fn malformed_uris_are_rejected() {
		assert!(matches!(split_uri("not a uri"), Err(SignatureError::InvalidUri { .. })));
		assert!(matches!(split_uri("mailto:owner@shop.test"), Err(SignatureError::MissingHost { .. })));
	}

	#[test]
	fn pairs_sort_by_encoded_key() {
		let params = Parameters::new().with("b", "2").with("a", "1");
		let base = base_string("post", "http://shop.test/x", &params)
			.expect("Base string should build.");

		assert_eq!(base, "POST&http%3A%2F%2Fshop.test%2Fx&a%3D1%26b%3D2");
	}

	#[test]
	fn request_parameters_override_query_parameters() {
		let params = Parameters::new().with("page", "2");
		let base = base_string("GET", "http://shop.test/x?page=1&limit=5", &params)
			.expect("Base string should build.");

		assert_eq!(base, "GET&http%3A%2F%2Fshop.test%2Fx&limit%3D5%26page%3D2");
	}

	#[test]
	fn array_query_parameters_keep_every_value() {
		let base = base_string("GET", "http://shop.test/x?ids[]=1&ids[]=2", &Parameters::new())
			.expect("Base string should build.");

		assert_eq!(base, "GET&http%3A%2F%2Fshop.test%2Fx&ids%255B0%255D%3D1%26ids%255B1%255D%3D2");
	}

	#[test]
	fn nested_request_parameters_replace_the_whole_query_entry() {
		let params = Parameters::new().with("filter", Parameters::new().with("sku", "b"));
		let base = base_string("GET", "http://shop.test/x?filter[sku]=a&filter[name]=n", &params)
			.expect("Base string should build.");

		assert_eq!(base, "GET&http%3A%2F%2Fshop.test%2Fx&filter%255Bsku%255D%3Db");
	}

	#[test]
	fn encoded_and_raw_values_produce_the_same_base_string() {
		let raw = Parameters::new().with("q", "red shoes");
		let encoded = Parameters::new().with("q", "red%20shoes");

		assert_eq!(
			base_string("GET", "http://shop.test/search", &raw).expect("Raw input should build."),
			base_string("GET", "http://shop.test/search", &encoded)
				.expect("Encoded input should build.")
		);
	}
}
