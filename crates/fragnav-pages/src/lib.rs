//! fragnav pages - fragment router core
//!
//! Turns a server-rendered site into a single-page application by fetching
//! HTML fragments in the background and splicing them into the page shell.
//!
//! ## Features
//!
//! - **Region merging**: top-level elements of a fragment replace the content
//!   of the shell region with the same tag (`header`, `nav`, `main`,
//!   `footer`, `body`)
//! - **Script re-execution**: scripts inside a fragment run once, in order,
//!   after the markup is in place
//! - **History sync**: navigations push `{ page }` entries; back and forward
//!   replay the fetch without pushing again
//! - **Credential recovery**: a 401 clears the bearer token and shows the
//!   login page
//! - **Native testing**: every browser object sits behind a trait with an
//!   in-memory implementation
//!
//! ## Architecture
//!
//! - [`region`]: the fixed set of replaceable regions
//! - [`dom`]: the live document seam ([`dom::LiveDocument`])
//! - [`fragment`]: fragment parsing and merging
//! - [`script`]: script classification and re-execution
//! - [`navigation`]: the navigation controller
//! - [`history`]: history stack and `popstate` replay
//! - [`link`]: in-page link interception
//! - [`notice`]: transient alert banners
//! - [`api`]: authenticated JSON client
//! - [`launcher`]: startup wiring
//!
//! ## Example
//!
//! ```ignore
//! use fragnav_pages::Launcher;
//!
//! #[wasm_bindgen(start)]
//! pub fn main() -> Result<(), JsValue> {
//!     let launcher = Launcher::mount().map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     launcher.run();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

// Core modules
pub mod dom;
pub mod logging;
pub mod region;

// Fragment handling
pub mod fragment;
pub mod script;

// Requests
pub mod credentials;
pub mod headers;
pub mod transport;

// Navigation
pub mod history;
pub mod link;
pub mod navigation;

// Collaborator services
pub mod api;
pub mod notice;

// Startup
pub mod launcher;

// Scripted transports for native tests
#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[doc(hidden)]
pub mod __private {
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use credentials::{CredentialError, CredentialStore, MemoryCredentials};
pub use dom::{DomError, LiveDocument, MemoryDocument};
pub use fragment::{FragmentPlan, MergeReport, merge_fragment, merge_html};
pub use history::{HistoryBackend, HistoryError, HistoryState, HistorySync, MemoryHistory};
pub use launcher::{LaunchError, Launcher};
pub use link::LinkActivation;
pub use navigation::{NavigationError, NavigationKind, NavigationOutcome, Navigator, RouterContext};
pub use notice::{MemoryNotifier, Notice, NoticeLevel, Notifier};
pub use region::{RegionName, RegionRegistry};
pub use script::Executable;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

#[cfg(target_arch = "wasm32")]
pub use credentials::LocalStorageCredentials;
#[cfg(target_arch = "wasm32")]
pub use dom::WebDocument;
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
#[cfg(target_arch = "wasm32")]
pub use notice::DomNotifier;

// Logging macros are exported via #[macro_export]:
// fragnav_pages::debug_log!, fragnav_pages::info_log!, etc.
