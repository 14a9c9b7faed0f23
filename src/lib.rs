//! Three-legged OAuth 1.0a client: negotiate temporary credentials, walk the resource owner
//! through authorization, exchange the verifier for token credentials, and sign every API call
//! with HMAC-SHA1, all behind pluggable HTTP and browser seams.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod browser;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod protocol;
pub mod signature;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and scripted collaborators for tests; enabled via `cfg(test)` or
	//! the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::{HashMap, VecDeque};
	// crates.io
	use parking_lot::Mutex;
	// self
	use crate::{
		browser::{BrowserFuture, BrowserInteraction, BrowserOutcome},
		config::ClientConfig,
		http::{HttpRequest, HttpRequester, HttpResponse, RequesterFuture},
		protocol::AuthorizationHeader,
		signature::encoding::decode,
	};
	#[cfg(feature = "reqwest")] use crate::http::ReqwestRequester;

	/// Failure returned by [`RecordingRequester`] when scripted to fail or when exhausted.
	#[derive(Debug, ThisError)]
	#[error("{0}")]
	pub struct ScriptedTransportError(pub String);

	/// [`HttpRequester`] that replays scripted responses and records every request.
	#[derive(Debug, Default)]
	pub struct RecordingRequester {
		script: Mutex<VecDeque<Result<HttpResponse, String>>>,
		requests: Mutex<Vec<HttpRequest>>,
	}
	impl RecordingRequester {
		/// Creates a requester with an empty script.
		pub fn new() -> Self {
			Self::default()
		}

		/// Queues a response.
		pub fn respond(mut self, status: u16, body: &str) -> Self {
			self.script.get_mut().push_back(Ok(HttpResponse::new(status, body)));

			self
		}

		/// Queues a transport failure.
		pub fn fail(mut self, message: &str) -> Self {
			self.script.get_mut().push_back(Err(message.to_owned()));

			self
		}

		/// Requests submitted so far.
		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.lock().clone()
		}
	}
	impl HttpRequester for RecordingRequester {
		type TransportError = ScriptedTransportError;

		fn submit(&self, request: HttpRequest) -> RequesterFuture<'_, Self::TransportError> {
			self.requests.lock().push(request);

			let next = self.script.lock().pop_front();

			Box::pin(async move {
				match next {
					Some(Ok(response)) => Ok(response),
					Some(Err(message)) => Err(ScriptedTransportError(message)),
					None => Err(ScriptedTransportError("No scripted response left.".into())),
				}
			})
		}
	}

	/// Step performed against a [`ScriptedBrowser`].
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub enum BrowserAction {
		/// `navigate(url)`.
		Navigate(String),
		/// `fill_field(field, value)`.
		Fill(String, String),
		/// `click(selector)`.
		Click(String),
	}

	/// Failure returned by [`ScriptedBrowser`] for selectors scripted to fail.
	#[derive(Debug, ThisError)]
	#[error("{0}")]
	pub struct ScriptedBrowserError(pub String);

	/// [`BrowserInteraction`] that records every step and intercepts scripted clicks.
	#[derive(Debug, Default)]
	pub struct ScriptedBrowser {
		actions: Vec<BrowserAction>,
		navigation_intercept: Option<Url>,
		click_intercepts: HashMap<String, Url>,
		click_failures: HashMap<String, String>,
	}
	impl ScriptedBrowser {
		/// Creates a browser where every step completes normally.
		pub fn new() -> Self {
			Self::default()
		}

		/// Intercepts a redirect to `target` as soon as any page is opened.
		pub fn intercept_navigation(mut self, target: Url) -> Self {
			self.navigation_intercept = Some(target);

			self
		}

		/// Intercepts a redirect to `target` when `selector` is clicked.
		pub fn intercept_click(mut self, selector: &str, target: Url) -> Self {
			self.click_intercepts.insert(selector.to_owned(), target);

			self
		}

		/// Fails with `message` when `selector` is clicked.
		pub fn fail_on_click(mut self, selector: &str, message: &str) -> Self {
			self.click_failures.insert(selector.to_owned(), message.to_owned());

			self
		}

		/// Steps performed so far.
		pub fn actions(&self) -> &[BrowserAction] {
			&self.actions
		}
	}
	impl BrowserInteraction for ScriptedBrowser {
		type Error = ScriptedBrowserError;

		fn navigate<'a>(
			&'a mut self,
			url: &'a str,
		) -> BrowserFuture<'a, BrowserOutcome, Self::Error> {
			self.actions.push(BrowserAction::Navigate(url.to_owned()));

			let outcome = match &self.navigation_intercept {
				Some(target) => BrowserOutcome::Intercepted { target: target.clone() },
				None => BrowserOutcome::Completed,
			};

			Box::pin(async move { Ok(outcome) })
		}

		fn fill_field<'a>(
			&'a mut self,
			field: &'a str,
			value: &'a str,
		) -> BrowserFuture<'a, (), Self::Error> {
			self.actions.push(BrowserAction::Fill(field.to_owned(), value.to_owned()));

			Box::pin(async { Ok(()) })
		}

		fn click<'a>(
			&'a mut self,
			selector: &'a str,
		) -> BrowserFuture<'a, BrowserOutcome, Self::Error> {
			self.actions.push(BrowserAction::Click(selector.to_owned()));

			let result = if let Some(message) = self.click_failures.get(selector) {
				Err(ScriptedBrowserError(message.clone()))
			} else {
				Ok(match self.click_intercepts.get(selector) {
					Some(target) => BrowserOutcome::Intercepted { target: target.clone() },
					None => BrowserOutcome::Completed,
				})
			};

			Box::pin(async move { result })
		}
	}

	/// Builds a requester that accepts the self-signed certificates produced by `httpmock` and
	/// never follows redirects.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_requester() -> ReqwestRequester {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestRequester::with_client(client)
	}

	/// Client configuration shared by unit tests: `http://shop.test`, consumer `K`/`S`.
	pub fn test_config() -> ClientConfig {
		ClientConfig::builder()
			.host("http://shop.test")
			.consumer("K", "S")
			.callback_uri("http://shop.test/callback")
			.user_agent("oauth1-flow-tests")
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Decodes the `oauth_*` parameters of a request's `Authorization` header.
	pub fn authorization_params(request: &HttpRequest) -> BTreeMap<String, String> {
		request
			.header(AuthorizationHeader::NAME)
			.and_then(|value| value.strip_prefix("OAuth "))
			.map(|params| {
				params
					.split(", ")
					.filter_map(|pair| pair.split_once('='))
					.map(|(key, value)| (decode(key), decode(value.trim_matches('"'))))
					.collect()
			})
			.unwrap_or_default()
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
