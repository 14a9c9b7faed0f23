// self
use oauth1_flow::{
	auth::Secret,
	protocol::ProtocolParameters,
	signature::{HmacSha1, Parameters, SignatureMethod, SigningKey, base_string},
};

#[test]
fn rfc5849_initiate_request_signature() {
	let consumer = Secret::new("kd94hf93k423kf44");
	let params = Parameters::new()
		.with("oauth_consumer_key", "dpf43f3p2l4k3l03")
		.with("oauth_signature_method", "HMAC-SHA1")
		.with("oauth_timestamp", "137131200")
		.with("oauth_nonce", "wIjqoS")
		.with("oauth_callback", "http://printer.example.com/ready");
	let signature = HmacSha1
		.sign(
			"https://photos.example.net/initiate",
			"POST",
			&params,
			&SigningKey::new(&consumer, None),
		)
		.expect("RFC 5849 initiate request should sign.");

	assert_eq!(signature, "74KNZJeDHnMBp0EMJ9ZHt/XKycU=");
}

#[test]
fn rfc5849_protected_resource_signature_merges_query() {
	let consumer = Secret::new("kd94hf93k423kf44");
	let token = Secret::new("pfkkdhi9sl3r4s00");
	let params = Parameters::new()
		.with("oauth_consumer_key", "dpf43f3p2l4k3l03")
		.with("oauth_token", "nnch734d00sl2jdk")
		.with("oauth_signature_method", "HMAC-SHA1")
		.with("oauth_timestamp", "137131202")
		.with("oauth_nonce", "chapoH");
	let signature = HmacSha1
		.sign(
			"http://photos.example.net/photos?file=vacation.jpg&size=original",
			"GET",
			&params,
			&SigningKey::new(&consumer, Some(&token)),
		)
		.expect("RFC 5849 resource request should sign.");

	assert_eq!(signature, "MdpQcU8iPSUjWoN/UDMsK2sui9I=");
}

#[test]
fn twitter_status_update_signature() {
	let consumer = Secret::new("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw");
	let token = Secret::new("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE");
	let body = Parameters::new()
		.with("include_entities", "true")
		.with("status", "Hello Ladies + Gentlemen, a signed OAuth request!");
	let header = ProtocolParameters::new("xvz1evFS4wEEPTGEFPHBog")
		.with_token("370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb")
		.with_nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
		.with_timestamp(1_318_622_958)
		.sign(
			&HmacSha1,
			"POST",
			"https://api.twitter.com/1.1/statuses/update.json",
			&body,
			&SigningKey::new(&consumer, Some(&token)),
		)
		.expect("Twitter reference request should sign.");

	assert_eq!(header.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
	assert!(header.to_header_value().ends_with("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
	assert_eq!(header.get("status"), None);
}

#[test]
fn initiate_scenario_base_string_and_signature() {
	let consumer = Secret::new("S");
	let header = ProtocolParameters::new("K")
		.with_callback("http://shop.test/callback")
		.with_nonce("abc")
		.with_timestamp(1_700_000_000)
		.sign(
			&HmacSha1,
			"POST",
			"http://shop.test/oauth/initiate",
			&Parameters::new(),
			&SigningKey::new(&consumer, None),
		)
		.expect("Initiate scenario should sign.");
	let signed = header
		.parameters()
		.filter(|(name, _)| *name != "oauth_signature")
		.collect::<Parameters>();

	assert_eq!(
		base_string("POST", "http://shop.test/oauth/initiate", &signed)
			.expect("Base string should build."),
		"POST&http%3A%2F%2Fshop.test%2Foauth%2Finitiate&oauth_callback%3Dhttp%253A%252F%252Fshop.test%252Fcallback%26oauth_consumer_key%3DK%26oauth_nonce%3Dabc%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1700000000%26oauth_version%3D1.0"
	);
	assert_eq!(SigningKey::new(&consumer, None).to_key_string(), "S&");
	assert_eq!(header.signature(), "L8A7JqsD2LlpaaRDZNEPR8eytwo=");
}

#[test]
fn token_exchange_scenario_signature_includes_verifier() {
	let consumer = Secret::new("S");
	let temporary = Secret::new("tmp-secret");
	let header = ProtocolParameters::new("K")
		.with_token("tmp")
		.with_verifier("v3r".into())
		.with_nonce("abc")
		.with_timestamp(1_700_000_000)
		.sign(
			&HmacSha1,
			"POST",
			"http://shop.test/oauth/token",
			&Parameters::new().with("oauth_verifier", "v3r"),
			&SigningKey::new(&consumer, Some(&temporary)),
		)
		.expect("Token scenario should sign.");

	assert_eq!(header.signature(), "XO+yAPabB2tphDEYaW8s5Ua5nAI=");
}
