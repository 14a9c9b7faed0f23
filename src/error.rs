//! Client-level error types shared across credentials, signing, and flows.

// self
use crate::{_prelude::*, auth::CredentialValidationError, flows::FlowStage, obs::Leg};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential exchange response was invalid or rejected.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// A protocol invariant guarding the flow against tampering was violated.
	#[error(transparent)]
	Security(#[from] SecurityError),
	/// The request could not be canonicalized or signed.
	#[error(transparent)]
	Signature(#[from] SignatureError),
	/// Failure reported by an external collaborator (requester or browser).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A leg was invoked while the flow sat in a different stage.
	#[error("Cannot call `{operation}` while the flow is in the {stage} stage.")]
	OutOfOrder {
		/// Operation that was attempted.
		operation: &'static str,
		/// Stage the flow was in at the time.
		stage: FlowStage,
	},
}

impl Error {
	/// Stable label classifying the failure for span fields and metric labels.
	pub fn reason(&self) -> &'static str {
		match self {
			Error::Config(_) => "config",
			Error::Credentials(err) => match err {
				CredentialsError::CallbackNotConfirmed => "callback_not_confirmed",
				CredentialsError::Server { .. } => "server_rejected",
				CredentialsError::BadResponse { .. } => "bad_status",
				CredentialsError::AuthorizationNotIntercepted => "not_intercepted",
				CredentialsError::Unparseable { .. }
				| CredentialsError::MissingField { .. }
				| CredentialsError::MissingCallbackParameter { .. }
				| CredentialsError::InvalidCredentials(_) => "malformed_response",
			},
			Error::Security(_) => "identifier_mismatch",
			Error::Signature(_) => "signature",
			Error::Transport(_) => "transport",
			Error::OutOfOrder { .. } => "out_of_order",
		}
	}
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration key is absent.
	#[error("Missing required configuration key `{field}`.")]
	MissingField {
		/// Configuration key name.
		field: &'static str,
	},
	/// The `host` value cannot be parsed as a URL.
	#[error("Configured host `{host}` is not a valid URL.")]
	InvalidHost {
		/// Raw host value.
		host: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The `host` value parsed but lacks a scheme/host authority.
	#[error("Configured host `{host}` must include a scheme and a host name.")]
	HostWithoutAuthority {
		/// Raw host value.
		host: String,
	},
	/// The `admin_url` value cannot be parsed as a URL.
	#[error("Configured admin URL `{url}` is not a valid URL.")]
	InvalidAdminUrl {
		/// Raw admin URL value.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Consumer credentials failed validation.
	#[error("Client credentials are invalid.")]
	InvalidCredentials(#[from] CredentialValidationError),
	/// Serialized configuration could not be decoded.
	#[error("Configuration could not be decoded at `{path}`.")]
	Parse {
		/// Path of the offending field.
		path: String,
		/// Structured decoding failure.
		#[source]
		source: serde_json::Error,
	},
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}

/// Failures raised while turning a credential endpoint response into credentials.
#[derive(Debug, ThisError)]
pub enum CredentialsError {
	/// The response body is not a url-encoded mapping.
	#[error("Unable to parse {leg} response.")]
	Unparseable {
		/// Leg that produced the response.
		leg: Leg,
	},
	/// The server did not confirm the callback during the temporary credentials leg.
	#[error("Error in retrieving temporary credentials: callback was not confirmed.")]
	CallbackNotConfirmed,
	/// A required response field is absent.
	#[error("The {leg} response is missing `{field}`.")]
	MissingField {
		/// Leg that produced the response.
		leg: Leg,
		/// Missing field name.
		field: &'static str,
	},
	/// The server reported an error in the response body.
	#[error("Error [{message}] in retrieving {leg}.")]
	Server {
		/// Leg that produced the response.
		leg: Leg,
		/// Server-supplied error message.
		message: String,
	},
	/// The server answered with a non-success HTTP status.
	#[error("Received HTTP status code [{status}] with message \"{body}\" during {leg}.")]
	BadResponse {
		/// Leg that produced the response.
		leg: Leg,
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// The authorization script finished without the callback redirect being intercepted.
	#[error("Authorization finished without reaching the callback redirect.")]
	AuthorizationNotIntercepted,
	/// The intercepted redirect lacks a required callback parameter.
	#[error("Authorization redirect `{target}` is missing `{field}`.")]
	MissingCallbackParameter {
		/// Intercepted redirect target.
		target: String,
		/// Missing query parameter name.
		field: &'static str,
	},
	/// The response carried credentials that failed validation.
	#[error("Server returned invalid credentials.")]
	InvalidCredentials(#[from] CredentialValidationError),
}

/// Security invariant violations.
#[derive(Debug, ThisError)]
pub enum SecurityError {
	/// The authorization step returned a temporary identifier other than the one requested.
	#[error(
		"Temporary identifier `{returned}` passed back by the server does not match the stored temporary credentials `{expected}`; potential man-in-the-middle."
	)]
	TemporaryIdentifierMismatch {
		/// Identifier obtained during the temporary credentials leg.
		expected: String,
		/// Identifier carried by the authorization callback.
		returned: String,
	},
}

/// Canonicalization and signing failures.
#[derive(Debug, ThisError)]
pub enum SignatureError {
	/// The target URI cannot be parsed.
	#[error("Cannot sign malformed URI `{uri}`.")]
	InvalidUri {
		/// Raw URI value.
		uri: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The target URI has no host component.
	#[error("Cannot sign URI `{uri}` without a host.")]
	MissingHost {
		/// Raw URI value.
		uri: String,
	},
	/// The MAC implementation rejected the signing key.
	#[error("Signing key was rejected by the MAC implementation.")]
	InvalidKey,
}

/// Failures surfaced unchanged from external collaborators.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The HTTP requester failed to deliver a request.
	#[error("HTTP requester failed while calling the {leg} endpoint.")]
	Requester {
		/// Leg being executed.
		leg: Leg,
		/// Requester-specific failure.
		#[source]
		source: BoxError,
	},
	/// The HTTP requester failed to deliver a signed API request.
	#[error("HTTP requester failed while sending a signed API request.")]
	Api {
		/// Requester-specific failure.
		#[source]
		source: BoxError,
	},
	/// The browser collaborator failed while driving the authorization pages.
	#[error("Browser interaction failed during authorization.")]
	Browser {
		/// Browser-specific failure.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a requester-specific failure.
	pub fn requester(leg: Leg, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Requester { leg, source: Box::new(src) }
	}

	/// Wraps a requester failure raised outside the credential legs.
	pub fn api(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Api { source: Box::new(src) }
	}

	/// Wraps a browser-specific failure.
	pub fn browser(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Browser { source: Box::new(src) }
	}
}
