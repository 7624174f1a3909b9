//! # fragnav
//!
//! A fragment-swapping navigation layer for server-rendered sites.
//!
//! The server keeps rendering HTML. fragnav fetches the parts of a page that
//! change between navigations, splices them into the persistent page shell,
//! re-runs the scripts they carry and keeps the browser history in step, so
//! the site behaves like a single-page application without a client-side
//! rendering layer.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - The router core ([`pages`])
//! - `conf` (default) - Router settings ([`conf`])
//! - `testing` - Scripted transports for native integration tests
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use fragnav::prelude::*;
//! use wasm_bindgen::prelude::*;
//!
//! #[wasm_bindgen(start)]
//! pub fn main() -> Result<(), JsValue> {
//!     let settings = RouterSettings::default();
//!     Launcher::mount_with(settings)
//!         .map_err(|e| JsValue::from_str(&e.to_string()))?
//!         .run();
//!     Ok(())
//! }
//! ```

#[cfg(feature = "conf")]
pub mod conf;
#[cfg(feature = "pages")]
pub mod pages;

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "conf")]
	pub use crate::conf::{RouterSettings, SettingsError, StatusPolicy};

	#[cfg(feature = "pages")]
	pub use crate::pages::{
		ApiClient, ApiError, CredentialStore, Executable, HistorySync, Launcher, LiveDocument,
		NavigationError, NavigationKind, NavigationOutcome, Navigator, Notice, NoticeLevel,
		Notifier, RegionName, RouterContext, Transport,
	};
}
