//! Transport seam for the credential legs and signed API calls.
//!
//! The client never owns an HTTP stack. Each leg builds an [`HttpRequest`], hands it to an
//! [`HttpRequester`], and parses the returned [`HttpResponse`]. The default `reqwest` feature
//! ships [`ReqwestRequester`]; tests and embedders plug in their own implementations.

// self
use crate::_prelude::*;

/// Boxed future returned by [`HttpRequester::submit`].
pub type RequesterFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// HTTP methods the client signs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
	/// `HEAD`
	Head,
}
impl HttpMethod {
	/// Upper-case wire name.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Head => "HEAD",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request handed to an [`HttpRequester`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute target URL, including any query string.
	pub url: String,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Optional body.
	pub body: Option<String>,
}
impl HttpRequest {
	/// Content type of url-encoded form bodies.
	pub const FORM_CONTENT_TYPE: &'static str = "application/x-www-form-urlencoded";
	/// Content type of JSON bodies.
	pub const JSON_CONTENT_TYPE: &'static str = "application/json";

	/// Creates a request without headers or body.
	pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
		Self { method, url: url.into(), headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends several headers.
	pub fn with_headers<I>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		self.headers.extend(headers);

		self
	}

	/// Sets the body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns the first header matching `name`, case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Whether the body is declared as an url-encoded form.
	pub fn has_form_body(&self) -> bool {
		self.body.is_some()
			&& self.header("content-type").is_some_and(|value| {
				value.split(';').next().is_some_and(|mime| {
					mime.trim().eq_ignore_ascii_case(Self::FORM_CONTENT_TYPE)
				})
			})
	}
}

/// Response returned by an [`HttpRequester`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Body decoded as text.
	pub body: String,
}
impl HttpResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, headers: Vec::new(), body: body.into() }
	}

	/// Whether the status is in the `2xx` range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the first header matching `name`, case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// Abstraction over HTTP stacks able to submit a request and return the full response.
///
/// Implementations must not follow redirects on the credential endpoints and must return
/// non-success statuses as regular responses; only delivery failures belong in
/// [`HttpRequester::TransportError`]. The client surfaces those failures unchanged through
/// [`TransportError::Requester`](crate::error::TransportError::Requester).
pub trait HttpRequester
where
	Self: Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves to the response.
	fn submit(&self, request: HttpRequest) -> RequesterFuture<'_, Self::TransportError>;
}
impl<T> HttpRequester for Arc<T>
where
	T: ?Sized + HttpRequester,
{
	type TransportError = T::TransportError;

	fn submit(&self, request: HttpRequest) -> RequesterFuture<'_, Self::TransportError> {
		T::submit(self, request)
	}
}

/// [`HttpRequester`] backed by a shared [`ReqwestClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestRequester(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestRequester {
	/// Builds a client that never follows redirects, so credential endpoints answer directly.
	pub fn new() -> Result<Self, ReqwestError> {
		let client = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing client. Configure it with `redirect::Policy::none()` when it talks to
	/// credential endpoints.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl HttpRequester for ReqwestRequester {
	type TransportError = ReqwestError;

	fn submit(&self, request: HttpRequest) -> RequesterFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Put => reqwest::Method::PUT,
				HttpMethod::Patch => reqwest::Method::PATCH,
				HttpMethod::Delete => reqwest::Method::DELETE,
				HttpMethod::Head => reqwest::Method::HEAD,
			};
			let mut builder = self.0.request(method, &request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.text().await?;

			Ok(HttpResponse { status, headers, body })
		})
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(key, _)| key.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}
