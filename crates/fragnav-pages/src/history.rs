//! History synchronization.
//!
//! Programmatic navigations push a [`HistoryState`] carrying the page URL.
//! When the user goes back or forward, [`HistorySync`] replays the navigation
//! for the restored location without pushing a new entry.

use crate::navigation::{NavigationKind, NavigationOutcome, Navigator};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;

/// Errors raised by a history backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// The History API is unavailable.
	#[error("history API is unavailable")]
	Unavailable,
	/// `pushState` threw.
	#[error("pushState failed: {0}")]
	PushFailed(String),
}

/// State object stored with each pushed entry: `{ page: url }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
	/// The URL the entry was pushed for.
	pub page: String,
}

impl HistoryState {
	/// Creates the state for `page`.
	pub fn new(page: impl Into<String>) -> Self {
		Self { page: page.into() }
	}
}

/// The browser history stack.
pub trait HistoryBackend {
	/// Pushes a new entry.
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError>;

	/// Path and query of the current entry.
	fn current_location(&self) -> String;
}

/// In-memory history stack.
///
/// Entry 0 is the initial page load and carries no state, like the entry the
/// browser creates before any script runs.
#[derive(Debug)]
pub struct MemoryHistory {
	entries: RefCell<Vec<(String, Option<HistoryState>)>>,
	cursor: Cell<usize>,
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl MemoryHistory {
	/// Creates a stack whose initial entry is at `location`.
	pub fn new(location: impl Into<String>) -> Self {
		Self {
			entries: RefCell::new(vec![(location.into(), None)]),
			cursor: Cell::new(0),
		}
	}

	/// States pushed so far (the initial entry excluded), oldest first.
	pub fn pushed(&self) -> Vec<HistoryState> {
		self.entries
			.borrow()
			.iter()
			.filter_map(|(_, state)| state.clone())
			.collect()
	}

	/// Total number of entries, the initial one included.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Always `false`: the initial entry cannot be removed.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Moves one entry back and returns the restored state, like the
	/// browser does before firing `popstate`.
	///
	/// Returns `None` when already at the first entry.
	pub fn back(&self) -> Option<Option<HistoryState>> {
		let cursor = self.cursor.get().checked_sub(1)?;
		self.cursor.set(cursor);
		Some(self.entries.borrow()[cursor].1.clone())
	}

	/// Moves one entry forward and returns the restored state.
	pub fn forward(&self) -> Option<Option<HistoryState>> {
		let cursor = self.cursor.get() + 1;
		let state = self.entries.borrow().get(cursor)?.1.clone();
		self.cursor.set(cursor);
		Some(state)
	}
}

impl HistoryBackend for MemoryHistory {
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		let mut entries = self.entries.borrow_mut();
		let cursor = self.cursor.get();
		entries.truncate(cursor + 1);
		entries.push((url.to_string(), Some(state.clone())));
		self.cursor.set(cursor + 1);
		Ok(())
	}

	fn current_location(&self) -> String {
		self.entries.borrow()[self.cursor.get()].0.clone()
	}
}

/// Replays navigations on back/forward.
#[derive(Debug, Clone)]
pub struct HistorySync {
	navigator: Rc<Navigator>,
}

impl HistorySync {
	/// Creates a synchronizer driving `navigator`.
	pub fn new(navigator: Rc<Navigator>) -> Self {
		Self { navigator }
	}

	/// Handles a `popstate` signal.
	///
	/// Entries without state were not created by the router; they are
	/// ignored and `None` is returned.
	pub async fn on_popstate(&self, state: Option<HistoryState>) -> Option<NavigationOutcome> {
		let state = state?;
		let location = self.navigator.context().history().current_location();
		crate::debug_log!("popstate for '{}', replaying '{}'", state.page, location);
		Some(
			self.navigator
				.navigate(&location, NavigationKind::Replay)
				.await,
		)
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{HistoryBackend, HistoryError, HistoryState, HistorySync};
	use wasm_bindgen::JsCast;
	use wasm_bindgen::JsValue;
	use wasm_bindgen::closure::Closure;

	const PAGE_KEY: &str = "page";

	impl HistoryState {
		/// Converts to a plain JS object `{ page }`.
		pub fn to_js(&self) -> Result<JsValue, HistoryError> {
			let object = js_sys::Object::new();
			js_sys::Reflect::set(&object, &PAGE_KEY.into(), &self.page.as_str().into())
				.map_err(|err| HistoryError::PushFailed(format!("{:?}", err)))?;
			Ok(object.into())
		}

		/// Reads a state object; anything without a string `page` is `None`.
		pub fn from_js(value: &JsValue) -> Option<Self> {
			if value.is_null() || value.is_undefined() {
				return None;
			}
			js_sys::Reflect::get(value, &PAGE_KEY.into())
				.ok()?
				.as_string()
				.map(Self::new)
		}
	}

	/// `window.history` backend.
	#[derive(Debug, Clone, Copy, Default)]
	pub struct BrowserHistory;

	impl BrowserHistory {
		/// Creates the backend.
		pub fn new() -> Self {
			Self
		}
	}

	impl HistoryBackend for BrowserHistory {
		fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
			let history = web_sys::window()
				.ok_or(HistoryError::Unavailable)?
				.history()
				.map_err(|_| HistoryError::Unavailable)?;
			history
				.push_state_with_url(&state.to_js()?, "", Some(url))
				.map_err(|err| HistoryError::PushFailed(format!("{:?}", err)))
		}

		fn current_location(&self) -> String {
			let Some(location) = web_sys::window().map(|window| window.location()) else {
				return "/".to_string();
			};
			let path = location.pathname().unwrap_or_else(|_| "/".to_string());
			let search = location.search().unwrap_or_default();
			format!("{}{}", path, search)
		}
	}

	impl HistorySync {
		/// Registers the `popstate` listener on the window.
		///
		/// The listener lives for the rest of the page's lifetime.
		pub fn listen(self) -> Result<(), HistoryError> {
			let window = web_sys::window().ok_or(HistoryError::Unavailable)?;
			let handler = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(
				move |event: web_sys::PopStateEvent| {
					let state = HistoryState::from_js(&event.state());
					let sync = self.clone();
					wasm_bindgen_futures::spawn_local(async move {
						sync.on_popstate(state).await;
					});
				},
			);
			window
				.add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
				.map_err(|_| HistoryError::Unavailable)?;
			handler.forget();
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_history_state_serialises_as_page_object() {
		let json = serde_json::to_string(&HistoryState::new("/home")).unwrap();
		assert_eq!(json, r#"{"page":"/home"}"#);
	}

	#[rstest]
	fn test_memory_history_push_and_back() {
		let history = MemoryHistory::new("/");
		history.push_state(&HistoryState::new("/home"), "/home").unwrap();
		history.push_state(&HistoryState::new("/profile/"), "/profile/").unwrap();

		assert_eq!(history.len(), 3);
		assert_eq!(history.current_location(), "/profile/");

		assert_eq!(history.back(), Some(Some(HistoryState::new("/home"))));
		assert_eq!(history.current_location(), "/home");

		assert_eq!(history.back(), Some(None));
		assert_eq!(history.current_location(), "/");
		assert_eq!(history.back(), None);
	}

	#[rstest]
	fn test_memory_history_forward() {
		let history = MemoryHistory::new("/");
		history.push_state(&HistoryState::new("/a"), "/a").unwrap();
		history.back();

		assert_eq!(history.forward(), Some(Some(HistoryState::new("/a"))));
		assert_eq!(history.forward(), None);
	}

	#[rstest]
	fn test_push_after_back_drops_forward_entries() {
		let history = MemoryHistory::new("/");
		history.push_state(&HistoryState::new("/a"), "/a").unwrap();
		history.push_state(&HistoryState::new("/b"), "/b").unwrap();
		history.back();
		history.push_state(&HistoryState::new("/c"), "/c").unwrap();

		assert_eq!(
			history.pushed(),
			vec![HistoryState::new("/a"), HistoryState::new("/c")]
		);
	}
}
