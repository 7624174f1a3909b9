//! HTTP transport seam.
//!
//! The navigator and the API client only see the [`Transport`] trait.
//! [`ReqwestTransport`] is the production implementation and runs both in the
//! browser (through `fetch`) and natively.

use async_trait::async_trait;
use fragnav_conf::RouterSettings;
use http::{HeaderMap, Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Base URL used natively when the settings do not name one.
pub const NATIVE_BASE_URL: &str = "http://localhost/";

/// Errors that prevent a request from producing an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	/// The request URL could not be resolved.
	#[error("invalid request URL '{url}': {reason}")]
	InvalidUrl {
		/// The URL as given.
		url: String,
		/// Why it was rejected.
		reason: String,
	},
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),
	/// The response body could not be read.
	#[error("failed to read response body: {0}")]
	Body(String),
}

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: Method,
	/// Target URL, usually a path relative to the page origin.
	pub url: String,
	/// Request headers.
	pub headers: HeaderMap,
	/// Optional body.
	pub body: Option<String>,
}

impl HttpRequest {
	/// Creates a GET request.
	pub fn get(url: impl Into<String>, headers: HeaderMap) -> Self {
		Self {
			method: Method::GET,
			url: url.into(),
			headers,
			body: None,
		}
	}

	/// Creates a POST request with a body.
	pub fn post(url: impl Into<String>, headers: HeaderMap, body: impl Into<String>) -> Self {
		Self {
			method: Method::POST,
			url: url.into(),
			headers,
			body: Some(body.into()),
		}
	}
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	/// Response status.
	pub status: StatusCode,
	/// Response body as text.
	pub body: String,
}

impl HttpResponse {
	/// Creates a response.
	pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// A `200 OK` response.
	pub fn ok(body: impl Into<String>) -> Self {
		Self::new(StatusCode::OK, body)
	}
}

/// Sends requests and reads their responses.
#[async_trait(?Send)]
pub trait Transport {
	/// Sends `request` and reads the whole response body.
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: reqwest::Client,
	base: Url,
}

impl ReqwestTransport {
	/// Creates a transport resolving relative URLs against `base`.
	pub fn new(base: Url) -> Self {
		Self {
			client: reqwest::Client::new(),
			base,
		}
	}

	/// Creates a transport from the router settings.
	///
	/// Without an explicit `base_url` the page origin is used in the browser
	/// and [`NATIVE_BASE_URL`] natively.
	pub fn from_settings(settings: &RouterSettings) -> Result<Self, TransportError> {
		let base = match &settings.base_url {
			Some(base) => base.clone(),
			None => default_base()?,
		};
		let base = Url::parse(&base).map_err(|err| TransportError::InvalidUrl {
			url: base.clone(),
			reason: err.to_string(),
		})?;
		Ok(Self::new(base))
	}

	/// The base URL.
	pub fn base(&self) -> &Url {
		&self.base
	}

	/// Resolves a request URL against the base URL.
	pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
		self.base.join(url).map_err(|err| TransportError::InvalidUrl {
			url: url.to_string(),
			reason: err.to_string(),
		})
	}
}

#[cfg(target_arch = "wasm32")]
fn default_base() -> Result<String, TransportError> {
	let window = web_sys::window().ok_or_else(|| TransportError::InvalidUrl {
		url: String::new(),
		reason: "window is not available".to_string(),
	})?;
	window
		.location()
		.origin()
		.map(|origin| format!("{}/", origin))
		.map_err(|err| TransportError::InvalidUrl {
			url: String::new(),
			reason: format!("{:?}", err),
		})
}

#[cfg(not(target_arch = "wasm32"))]
fn default_base() -> Result<String, TransportError> {
	Ok(NATIVE_BASE_URL.to_string())
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let url = self.resolve(&request.url)?;
		let mut builder = self
			.client
			.request(request.method, url)
			.headers(request.headers);
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder
			.send()
			.await
			.map_err(|err| TransportError::Network(err.to_string()))?;
		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|err| TransportError::Body(err.to_string()))?;

		Ok(HttpResponse { status, body })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/home", "https://pong.example/home")]
	#[case("/pong/?opponent=bob", "https://pong.example/pong/?opponent=bob")]
	#[case("https://cdn.example/a.js", "https://cdn.example/a.js")]
	fn test_resolve(#[case] url: &str, #[case] expected: &str) {
		let transport = ReqwestTransport::new(Url::parse("https://pong.example/").unwrap());
		assert_eq!(transport.resolve(url).unwrap().as_str(), expected);
	}

	#[rstest]
	fn test_resolve_invalid() {
		let transport = ReqwestTransport::new(Url::parse("https://pong.example/").unwrap());
		let result = transport.resolve("http://[::1");
		assert!(matches!(result, Err(TransportError::InvalidUrl { .. })));
	}

	#[rstest]
	fn test_from_settings_default_base() {
		let transport = ReqwestTransport::from_settings(&RouterSettings::default()).unwrap();
		assert_eq!(transport.base().as_str(), NATIVE_BASE_URL);
	}

	#[rstest]
	fn test_from_settings_explicit_base() {
		let settings = RouterSettings {
			base_url: Some("https://pong.example/app/".to_string()),
			..RouterSettings::default()
		};
		let transport = ReqwestTransport::from_settings(&settings).unwrap();

		assert_eq!(
			transport.resolve("profile/").unwrap().as_str(),
			"https://pong.example/app/profile/"
		);
	}

	#[rstest]
	fn test_request_constructors() {
		let get = HttpRequest::get("/home", HeaderMap::new());
		assert_eq!(get.method, Method::GET);
		assert!(get.body.is_none());

		let post = HttpRequest::post("/queue/join/", HeaderMap::new(), "{}");
		assert_eq!(post.method, Method::POST);
		assert_eq!(post.body.as_deref(), Some("{}"));
	}
}
