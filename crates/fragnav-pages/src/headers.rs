//! Request headers shared by fragment and API requests.

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// The marker header servers use to tell in-page requests from full loads.
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";

/// Value of [`REQUESTED_WITH_HEADER`].
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Content type announced for fragment requests.
pub const FRAGMENT_CONTENT_TYPE: &str = "text/html";

/// Content type for JSON API requests.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The stored credential cannot be sent as a header value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("credential contains characters not allowed in a header value")]
pub struct InvalidCredential;

/// Builds the header set of a router request.
///
/// # Example
///
/// ```
/// use fragnav_pages::headers::RequestHeaders;
///
/// let headers = RequestHeaders::fragment(Some("abc123")).unwrap();
/// assert_eq!(headers["authorization"], "Bearer abc123");
/// assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestHeaders;

impl RequestHeaders {
	/// Headers for a fragment fetch.
	pub fn fragment(credential: Option<&str>) -> Result<HeaderMap, InvalidCredential> {
		Self::build(FRAGMENT_CONTENT_TYPE, credential)
	}

	/// Headers for a JSON API call.
	pub fn json(credential: Option<&str>) -> Result<HeaderMap, InvalidCredential> {
		Self::build(JSON_CONTENT_TYPE, credential)
	}

	fn build(content_type: &'static str, credential: Option<&str>) -> Result<HeaderMap, InvalidCredential> {
		let mut headers = HeaderMap::new();
		headers.insert(
			HeaderName::from_static(REQUESTED_WITH_HEADER),
			HeaderValue::from_static(REQUESTED_WITH_VALUE),
		);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

		if let Some(token) = credential.filter(|token| !token.is_empty()) {
			let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
				.map_err(|_| InvalidCredential)?;
			value.set_sensitive(true);
			headers.insert(AUTHORIZATION, value);
		}

		Ok(headers)
	}
}
