//! Router startup.
//!
//! The shell page may define a global variable (named by
//! [`RouterSettings::initial_path_global`]) holding the path that was
//! requested on the full page load. The first navigation goes there, or to
//! the default path when the hint is missing or empty.
//!
//! In the browser, [`Launcher::mount`] wires the browser backends, installs
//! the `popstate` and link listeners, and [`Launcher::run`] starts the first
//! navigation.

use crate::history::HistorySync;
use crate::navigation::{NavigationKind, NavigationOutcome, Navigator};
use fragnav_conf::{RouterSettings, SettingsError};
use std::rc::Rc;
use thiserror::Error;

use crate::dom::DomError;
use crate::history::HistoryError;
use crate::transport::TransportError;

/// Id of the optional `<script type="application/json">` block carrying
/// router settings in the shell page.
pub const SETTINGS_ELEMENT_ID: &str = "fragnav-settings";

/// Errors raised while mounting the router.
#[derive(Debug, Error)]
pub enum LaunchError {
	/// The embedded settings are invalid.
	#[error(transparent)]
	Settings(#[from] SettingsError),
	/// The transport could not be configured.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The page shell is unusable.
	#[error(transparent)]
	Dom(#[from] DomError),
	/// The history listener could not be installed.
	#[error(transparent)]
	History(#[from] HistoryError),
}

/// Owns the navigator for the lifetime of the page.
#[derive(Debug, Clone)]
pub struct Launcher {
	navigator: Rc<Navigator>,
}

impl Launcher {
	/// Creates a launcher around an assembled navigator.
	pub fn new(navigator: Rc<Navigator>) -> Self {
		Self { navigator }
	}

	/// The navigator.
	pub fn navigator(&self) -> &Rc<Navigator> {
		&self.navigator
	}

	/// A history synchronizer driving the same navigator.
	pub fn history_sync(&self) -> HistorySync {
		HistorySync::new(Rc::clone(&self.navigator))
	}

	/// The settings in effect.
	pub fn settings(&self) -> &RouterSettings {
		self.navigator.context().settings()
	}

	/// Performs the first navigation.
	pub async fn start(&self, hint: Option<&str>) -> NavigationOutcome {
		let target = self.settings().initial_target(hint);
		crate::info_log!("starting at {} (hint: {:?})", target, hint);
		self.navigator.navigate(&target, NavigationKind::Push).await
	}
}

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{LaunchError, Launcher, SETTINGS_ELEMENT_ID};
	use crate::credentials::LocalStorageCredentials;
	use crate::dom::{DomError, WebDocument};
	use crate::history::{BrowserHistory, HistorySync};
	use crate::link::intercept_links;
	use crate::navigation::{Navigator, RouterContext};
	use crate::notice::DomNotifier;
	use crate::region::RegionName;
	use crate::transport::ReqwestTransport;
	use fragnav_conf::RouterSettings;
	use std::rc::Rc;
	use web_sys::Element;

	fn embedded_settings(document: &web_sys::Document) -> Result<RouterSettings, LaunchError> {
		let source = document
			.get_element_by_id(SETTINGS_ELEMENT_ID)
			.and_then(|element| element.text_content())
			.filter(|source| !source.trim().is_empty());
		match source {
			Some(source) => Ok(RouterSettings::from_json_str(&source)?),
			None => Ok(RouterSettings::default()),
		}
	}

	fn path_hint(name: &str) -> Option<String> {
		js_sys::Reflect::get(&js_sys::global(), &name.into())
			.ok()?
			.as_string()
	}

	impl Launcher {
		/// Mounts with settings read from the shell page, or the defaults.
		pub fn mount() -> Result<Self, LaunchError> {
			let document = WebDocument::from_window()?;
			let settings = embedded_settings(document.document())?;
			Self::mount_document(document, settings)
		}

		/// Mounts with explicit settings.
		pub fn mount_with(settings: RouterSettings) -> Result<Self, LaunchError> {
			settings.validate()?;
			Self::mount_document(WebDocument::from_window()?, settings)
		}

		fn mount_document(document: WebDocument, settings: RouterSettings) -> Result<Self, LaunchError> {
			let container: Element = match document.regions().get(RegionName::Main) {
				Some(main) => main.clone(),
				None => document
					.document()
					.body()
					.ok_or(DomError::Unavailable("body"))?
					.into(),
			};
			let notifier = DomNotifier::new(document.document().clone(), container);
			let transport = ReqwestTransport::from_settings(&settings)?;
			let credentials = LocalStorageCredentials::new(settings.credential_key.clone());

			let navigator = Rc::new(Navigator::new(RouterContext::new(
				Rc::new(document),
				Rc::new(transport),
				Rc::new(BrowserHistory::new()),
				Rc::new(credentials),
				Rc::new(notifier),
				settings,
			)));

			HistorySync::new(Rc::clone(&navigator)).listen()?;
			intercept_links(Rc::clone(&navigator))?;
			crate::debug_log!("router mounted");
			Ok(Self::new(navigator))
		}

		/// Starts the first navigation from the global path hint.
		pub fn run(self) {
			let hint = path_hint(&self.settings().initial_path_global);
			wasm_bindgen_futures::spawn_local(async move {
				self.start(hint.as_deref()).await;
			});
		}
	}
}
