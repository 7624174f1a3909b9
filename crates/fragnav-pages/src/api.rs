//! JSON API client for page scripts and components.
//!
//! Sends the same marker and bearer headers as the navigator, through the
//! same [`Transport`]. A 401 here is returned to the caller as
//! [`ApiError::Server`]; only fragment navigations redirect to the login page.

use crate::credentials::CredentialStore;
use crate::headers::{InvalidCredential, RequestHeaders};
use crate::navigation::RouterContext;
use crate::transport::{HttpRequest, Transport, TransportError};
use http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Errors returned by [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
	/// The request produced no response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The stored credential cannot be sent.
	#[error(transparent)]
	InvalidCredential(#[from] InvalidCredential),
	/// The request body could not be serialized.
	#[error("failed to serialize request body: {0}")]
	Serialization(String),
	/// The response body is not the expected JSON.
	#[error("failed to deserialize response body: {0}")]
	Deserialization(String),
	/// The server answered with a non-success status.
	#[error("server answered {status}")]
	Server {
		/// The response status.
		status: StatusCode,
		/// The response body.
		body: String,
	},
}

impl ApiError {
	/// Returns `true` if the server rejected the credential.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Server { status, .. } if *status == StatusCode::UNAUTHORIZED)
	}
}

/// Result type of [`ApiClient`] calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Authenticated JSON client.
#[derive(Clone)]
pub struct ApiClient {
	transport: Rc<dyn Transport>,
	credentials: Rc<dyn CredentialStore>,
}

impl fmt::Debug for ApiClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiClient")
			.field("has_credential", &self.credentials.get().is_some())
			.finish()
	}
}

impl ApiClient {
	/// Creates a client.
	pub fn new(transport: Rc<dyn Transport>, credentials: Rc<dyn CredentialStore>) -> Self {
		Self {
			transport,
			credentials,
		}
	}

	/// Creates a client sharing the navigator's transport and credential.
	pub fn from_context(context: &RouterContext) -> Self {
		Self::new(context.transport(), context.credentials())
	}

	/// GETs `url` and decodes the JSON response.
	pub async fn get_json<T>(&self, url: &str) -> ApiResult<T>
	where
		T: DeserializeOwned,
	{
		let headers = RequestHeaders::json(self.credentials.get().as_deref())?;
		self.exchange(HttpRequest::get(url, headers)).await
	}

	/// POSTs `body` as JSON to `url` and decodes the JSON response.
	pub async fn post_json<B, T>(&self, url: &str, body: &B) -> ApiResult<T>
	where
		B: Serialize + ?Sized,
		T: DeserializeOwned,
	{
		let payload =
			serde_json::to_string(body).map_err(|err| ApiError::Serialization(err.to_string()))?;
		let headers = RequestHeaders::json(self.credentials.get().as_deref())?;
		self.exchange(HttpRequest::post(url, headers, payload)).await
	}

	async fn exchange<T>(&self, request: HttpRequest) -> ApiResult<T>
	where
		T: DeserializeOwned,
	{
		let method = request.method.clone();
		let url = request.url.clone();
		let response = self.transport.send(request).await?;

		if !response.status.is_success() {
			crate::warn_log!("{} {} answered {}", method, url, response.status);
			return Err(ApiError::Server {
				status: response.status,
				body: response.body,
			});
		}

		serde_json::from_str(&response.body).map_err(|err| ApiError::Deserialization(err.to_string()))
	}
}
