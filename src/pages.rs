//! Fragment router core
//!
//! This module provides access to fragnav-pages: region merging, script
//! re-execution, the navigation controller and history synchronization.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fragnav::pages::{NavigationKind, Navigator};
//!
//! async fn open_profile(navigator: &Navigator) {
//!     navigator.navigate("/profile/", NavigationKind::Push).await;
//! }
//! ```

pub use fragnav_pages::*;
