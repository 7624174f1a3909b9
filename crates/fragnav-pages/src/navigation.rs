//! Navigation controller.
//!
//! [`Navigator::navigate`] fetches a fragment, merges it into the page and
//! records the navigation in history. It owns the recovery path for rejected
//! credentials and never lets an error escape: every failure is logged and
//! reported as [`NavigationOutcome::Failed`].
//!
//! ## Stale responses
//!
//! Navigations may overlap. Each one takes a new generation number before
//! its request is sent; when the response arrives and a newer navigation has
//! started in the meantime, the response is discarded
//! ([`NavigationOutcome::Superseded`]) without touching regions, history or
//! the credential.
//!
//! ## Example
//!
//! ```ignore
//! use fragnav_pages::navigation::{NavigationKind, Navigator, RouterContext};
//!
//! let navigator = Navigator::new(context);
//! navigator.navigate("/profile/", NavigationKind::Push).await;
//! ```

use crate::credentials::CredentialStore;
use crate::dom::{DomError, LiveDocument};
use crate::fragment::{MergeReport, merge_html};
use crate::headers::{InvalidCredential, RequestHeaders};
use crate::history::{HistoryBackend, HistoryError, HistoryState};
use crate::notice::{Notice, Notifier};
use crate::transport::{HttpRequest, Transport, TransportError};
use crate::{debug_log, error_log, info_log, warn_log};
use fragnav_conf::{RouterSettings, StatusPolicy};
use http::StatusCode;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Where a navigation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
	/// Requested by code or a link; pushes a history entry.
	Push,
	/// Replayed from a back/forward move; pushes nothing.
	Replay,
}

impl NavigationKind {
	/// Returns `true` for replayed navigations.
	pub fn is_replay(self) -> bool {
		matches!(self, Self::Replay)
	}
}

/// Why a navigation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// The server answered 401.
	#[error("unauthorized request for {url}")]
	Unauthorized {
		/// The rejected URL.
		url: String,
	},
	/// The server answered with a non-success status other than 401.
	#[error("server answered {status} for {url}")]
	Server {
		/// The requested URL.
		url: String,
		/// The response status.
		status: StatusCode,
	},
	/// The request produced no response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Merging the fragment failed.
	#[error(transparent)]
	Dom(#[from] DomError),
	/// Recording the navigation in history failed.
	#[error(transparent)]
	History(#[from] HistoryError),
	/// The stored credential cannot be sent.
	#[error(transparent)]
	InvalidCredential(#[from] InvalidCredential),
}

/// Result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The fragment was merged.
	Completed {
		/// The URL that was displayed.
		url: String,
		/// Whether a history entry was pushed.
		history_pushed: bool,
		/// What the merge changed.
		report: MergeReport,
	},
	/// A newer navigation started before the response arrived.
	Superseded {
		/// The URL whose response was discarded.
		url: String,
	},
	/// The navigation failed; the page is unchanged.
	Failed(NavigationError),
}

impl NavigationOutcome {
	/// Returns `true` for [`NavigationOutcome::Completed`].
	pub fn is_completed(&self) -> bool {
		matches!(self, Self::Completed { .. })
	}

	/// The displayed URL of a completed navigation.
	pub fn completed_url(&self) -> Option<&str> {
		match self {
			Self::Completed { url, .. } => Some(url),
			_ => None,
		}
	}
}

/// Everything the navigator talks to.
pub struct RouterContext {
	document: Rc<dyn LiveDocument>,
	transport: Rc<dyn Transport>,
	history: Rc<dyn HistoryBackend>,
	credentials: Rc<dyn CredentialStore>,
	notifier: Rc<dyn Notifier>,
	settings: RouterSettings,
}

impl fmt::Debug for RouterContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterContext")
			.field("settings", &self.settings)
			.field("has_credential", &self.credentials.get().is_some())
			.finish()
	}
}

impl RouterContext {
	/// Assembles a context.
	pub fn new(
		document: Rc<dyn LiveDocument>,
		transport: Rc<dyn Transport>,
		history: Rc<dyn HistoryBackend>,
		credentials: Rc<dyn CredentialStore>,
		notifier: Rc<dyn Notifier>,
		settings: RouterSettings,
	) -> Self {
		Self {
			document,
			transport,
			history,
			credentials,
			notifier,
			settings,
		}
	}

	/// The live document.
	pub fn document(&self) -> &dyn LiveDocument {
		&*self.document
	}

	/// The HTTP transport.
	pub fn transport(&self) -> Rc<dyn Transport> {
		Rc::clone(&self.transport)
	}

	/// The history stack.
	pub fn history(&self) -> &dyn HistoryBackend {
		&*self.history
	}

	/// The credential store.
	pub fn credentials(&self) -> Rc<dyn CredentialStore> {
		Rc::clone(&self.credentials)
	}

	/// The notice sink.
	pub fn notifier(&self) -> &dyn Notifier {
		&*self.notifier
	}

	/// The router settings.
	pub fn settings(&self) -> &RouterSettings {
		&self.settings
	}
}

/// The navigation controller.
pub struct Navigator {
	context: RouterContext,
	generation: Cell<u64>,
}

impl fmt::Debug for Navigator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Navigator")
			.field("context", &self.context)
			.field("generation", &self.generation.get())
			.finish()
	}
}

impl Navigator {
	/// Creates a navigator over `context`.
	pub fn new(context: RouterContext) -> Self {
		Self {
			context,
			generation: Cell::new(0),
		}
	}

	/// The injected collaborators.
	pub fn context(&self) -> &RouterContext {
		&self.context
	}

	/// Generation of the most recently started navigation.
	pub fn generation(&self) -> u64 {
		self.generation.get()
	}

	/// Navigates to `url`.
	///
	/// A 401 clears the credential and navigates to the login page with
	/// [`NavigationKind::Push`], whatever `kind` was. The returned outcome is
	/// then the outcome of the login navigation.
	pub async fn navigate(&self, url: &str, kind: NavigationKind) -> NavigationOutcome {
		let settings = &self.context.settings;
		let mut target = url.to_string();
		let mut kind = kind;

		loop {
			match self.attempt(&target, kind).await {
				Ok(outcome) => return outcome,
				Err(NavigationError::Unauthorized { url }) => {
					warn_log!("{} was rejected with 401, clearing credential", url);
					if let Err(err) = self.context.credentials.clear() {
						error_log!("failed to clear credential: {}", err);
					}
					if settings.is_login_path(&url) {
						error_log!("login page itself answered 401, giving up");
						return NavigationOutcome::Failed(NavigationError::Unauthorized { url });
					}
					target = settings.login_path.clone();
					kind = NavigationKind::Push;
				}
				Err(err) => {
					error_log!("navigation to {} failed: {}", target, err);
					if let NavigationError::Server { url, status } = &err {
						self.context.notifier.notify(
							Notice::danger(format!("Could not load {} ({})", url, status)).lasting(
								Duration::from_millis(u64::from(settings.notice_duration_ms)),
							),
						);
					}
					return NavigationOutcome::Failed(err);
				}
			}
		}
	}

	/// Clears the credential and shows the logout landing page.
	pub async fn logout(&self) -> NavigationOutcome {
		if let Err(err) = self.context.credentials.clear() {
			error_log!("failed to clear credential on logout: {}", err);
		}
		let target = self.context.settings.logout_path.clone();
		self.navigate(&target, NavigationKind::Push).await
	}

	fn begin(&self) -> u64 {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);
		generation
	}

	async fn attempt(
		&self,
		url: &str,
		kind: NavigationKind,
	) -> Result<NavigationOutcome, NavigationError> {
		let generation = self.begin();
		let credential = self.context.credentials.get();
		let headers = RequestHeaders::fragment(credential.as_deref())?;

		info_log!("navigating to {} ({:?}, generation {})", url, kind, generation);
		let response = self
			.context
			.transport
			.send(HttpRequest::get(url, headers))
			.await?;

		if self.generation.get() != generation {
			debug_log!(
				"discarding response for {}: generation {} superseded by {}",
				url,
				generation,
				self.generation.get()
			);
			return Ok(NavigationOutcome::Superseded {
				url: url.to_string(),
			});
		}

		let status = response.status;
		if status == StatusCode::UNAUTHORIZED {
			return Err(NavigationError::Unauthorized {
				url: url.to_string(),
			});
		}
		if !status.is_success() {
			match self.context.settings.status_policy {
				StatusPolicy::Strict => {
					return Err(NavigationError::Server {
						url: url.to_string(),
						status,
					});
				}
				StatusPolicy::Lenient => {
					warn_log!("merging {} body for {} under the lenient status policy", status, url);
				}
			}
		}

		let report = merge_html(&response.body, &*self.context.document).await?;

		let history_pushed = match kind {
			NavigationKind::Push => {
				self.context
					.history
					.push_state(&HistoryState::new(url), url)?;
				true
			}
			NavigationKind::Replay => false,
		};

		Ok(NavigationOutcome::Completed {
			url: url.to_string(),
			history_pushed,
			report,
		})
	}
}
