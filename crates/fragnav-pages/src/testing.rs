//! Scripted transports and documents for tests.
//!
//! Enabled with the `testing` feature.

use crate::dom::{DomError, LiveDocument, MemoryDocument};
use crate::region::RegionName;
use crate::script::Executable;
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use futures::channel::oneshot;
use http::StatusCode;
use std::cell::RefCell;

/// Answers requests from a fixed table and records every request.
///
/// URLs without an entry answer `404 Not Found` with an empty body.
#[derive(Debug, Default)]
pub struct StubTransport {
	routes: Vec<(String, Result<HttpResponse, TransportError>)>,
	requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
	/// Creates a transport with no routes.
	pub fn new() -> Self {
		Self::default()
	}

	/// Answers `url` with `status` and `body`.
	pub fn respond(mut self, url: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
		self.routes
			.push((url.into(), Ok(HttpResponse::new(status, body))));
		self
	}

	/// Fails requests for `url` with `error`.
	pub fn fail(mut self, url: impl Into<String>, error: TransportError) -> Self {
		self.routes.push((url.into(), Err(error)));
		self
	}

	/// Requests received so far, in order.
	pub fn requests(&self) -> Vec<HttpRequest> {
		self.requests.borrow().clone()
	}
}

#[async_trait(?Send)]
impl Transport for StubTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let answer = self
			.routes
			.iter()
			.rev()
			.find(|(url, _)| *url == request.url)
			.map(|(_, answer)| answer.clone())
			.unwrap_or_else(|| Ok(HttpResponse::new(StatusCode::NOT_FOUND, "")));
		self.requests.borrow_mut().push(request);
		answer
	}
}

type PendingAnswer = oneshot::Sender<Result<HttpResponse, TransportError>>;

/// Holds every request open until the test releases it.
///
/// Lets tests decide the order in which overlapping responses arrive.
#[derive(Debug, Default)]
pub struct GatedTransport {
	pending: RefCell<Vec<(String, PendingAnswer)>>,
}

impl GatedTransport {
	/// Creates a transport with no pending requests.
	pub fn new() -> Self {
		Self::default()
	}

	/// URLs of the requests still waiting, oldest first.
	pub fn pending_urls(&self) -> Vec<String> {
		self.pending
			.borrow()
			.iter()
			.map(|(url, _)| url.clone())
			.collect()
	}

	/// Answers the oldest pending request for `url`.
	///
	/// Returns `false` if no such request is waiting.
	pub fn release(&self, url: &str, response: HttpResponse) -> bool {
		let mut pending = self.pending.borrow_mut();
		let Some(index) = pending.iter().position(|(pending_url, _)| pending_url == url) else {
			return false;
		};
		let (_, sender) = pending.remove(index);
		sender.send(Ok(response)).is_ok()
	}
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let (sender, receiver) = oneshot::channel();
		self.pending.borrow_mut().push((request.url, sender));
		receiver
			.await
			.map_err(|_| TransportError::Network("request gate dropped".to_string()))?
	}
}

/// A [`MemoryDocument`] whose remote scripts stay loading until the test
/// finishes or fails them.
///
/// Inline scripts complete as soon as they are appended.
#[derive(Debug, Default)]
pub struct GatedDocument {
	inner: MemoryDocument,
	loading: RefCell<Vec<(String, oneshot::Sender<bool>)>>,
	loaded: RefCell<Vec<String>>,
}

impl GatedDocument {
	/// Creates a document with every region bound.
	pub fn new() -> Self {
		Self::default()
	}

	/// The recording document underneath.
	pub fn document(&self) -> &MemoryDocument {
		&self.inner
	}

	/// Sources of the remote scripts still loading, oldest first.
	pub fn loading(&self) -> Vec<String> {
		self.loading
			.borrow()
			.iter()
			.map(|(src, _)| src.clone())
			.collect()
	}

	/// Sources of the remote scripts that finished loading, in order.
	pub fn loaded(&self) -> Vec<String> {
		self.loaded.borrow().clone()
	}

	/// Fires `load` for the oldest pending script with `src`.
	///
	/// Returns `false` if no such script is loading.
	pub fn finish_load(&self, src: &str) -> bool {
		self.settle(src, true)
	}

	/// Fires `error` for the oldest pending script with `src`.
	pub fn fail_load(&self, src: &str) -> bool {
		self.settle(src, false)
	}

	fn settle(&self, src: &str, ok: bool) -> bool {
		let mut loading = self.loading.borrow_mut();
		let Some(index) = loading.iter().position(|(pending, _)| pending == src) else {
			return false;
		};
		let (_, sender) = loading.remove(index);
		sender.send(ok).is_ok()
	}
}

#[async_trait(?Send)]
impl LiveDocument for GatedDocument {
	fn resolve(&self, tag: &str) -> Option<RegionName> {
		self.inner.resolve(tag)
	}

	fn replace_region(&self, region: RegionName, html: &str) -> Result<(), DomError> {
		self.inner.replace_region(region, html)
	}

	async fn append_script(&self, script: &Executable) -> Result<(), DomError> {
		self.inner.append_script(script).await?;
		let Executable::Remote(src) = script else {
			return Ok(());
		};

		let (sender, receiver) = oneshot::channel();
		self.loading.borrow_mut().push((src.clone(), sender));
		match receiver.await {
			Ok(true) => {
				self.loaded.borrow_mut().push(src.clone());
				Ok(())
			}
			Ok(false) | Err(_) => Err(DomError::ScriptLoad(src.clone())),
		}
	}
}
