//! Live document abstraction.
//!
//! The fragment merger never touches `web_sys` directly. It talks to a
//! [`LiveDocument`], which is backed by the browser DOM on WASM
//! ([`WebDocument`]) and by [`MemoryDocument`] everywhere else.

use crate::region::{RegionName, RegionRegistry};
use crate::script::Executable;
use async_trait::async_trait;
use std::cell::RefCell;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebDocument;

/// Errors raised while mutating the live document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// The region has no element in the page shell.
	#[error("region '{0}' is not bound to an element")]
	UnboundRegion(RegionName),
	/// A required browser object is unavailable.
	#[error("{0} is not available")]
	Unavailable(&'static str),
	/// A DOM call threw.
	#[error("DOM operation failed: {0}")]
	Js(String),
	/// A remote script fired `error` instead of `load`.
	#[error("script '{0}' failed to load")]
	ScriptLoad(String),
}

/// The page shell that fragments are merged into.
#[async_trait(?Send)]
pub trait LiveDocument {
	/// Resolves a fragment tag name to a bound region.
	fn resolve(&self, tag: &str) -> Option<RegionName>;

	/// Overwrites the content of a region with `html`.
	fn replace_region(&self, region: RegionName, html: &str) -> Result<(), DomError>;

	/// Creates a fresh script element for `script`, appends it to the body
	/// and resolves once the script has run.
	///
	/// Inline scripts run during the append. Remote scripts resolve on
	/// `load`, or fail with [`DomError::ScriptLoad`] on `error`.
	async fn append_script(&self, script: &Executable) -> Result<(), DomError>;
}

/// A region element held in memory.
#[derive(Debug, Default)]
pub struct MemoryRegion {
	content: RefCell<String>,
}

impl MemoryRegion {
	/// Current inner markup.
	pub fn inner_html(&self) -> String {
		self.content.borrow().clone()
	}

	/// Replaces the inner markup.
	pub fn set_inner_html(&self, html: &str) {
		*self.content.borrow_mut() = html.to_string();
	}
}

/// In-memory page shell.
///
/// Records region content and every appended script, in order.
#[derive(Debug)]
pub struct MemoryDocument {
	regions: RegionRegistry<MemoryRegion>,
	scripts: RefCell<Vec<Executable>>,
}

impl Default for MemoryDocument {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDocument {
	/// Creates a shell with every region bound and empty.
	pub fn new() -> Self {
		Self::with_regions(RegionName::ALL)
	}

	/// Creates a shell in which only `names` are bound.
	pub fn with_regions(names: impl IntoIterator<Item = RegionName>) -> Self {
		let names: Vec<RegionName> = names.into_iter().collect();
		Self {
			regions: RegionRegistry::bind(|name| {
				names.contains(&name).then(MemoryRegion::default)
			}),
			scripts: RefCell::new(Vec::new()),
		}
	}

	/// Seeds a region's content, returning `self` for chaining.
	pub fn seeded(self, region: RegionName, html: &str) -> Self {
		if let Some(element) = self.regions.get(region) {
			element.set_inner_html(html);
		}
		self
	}

	/// Content of a region, if bound.
	pub fn region_html(&self, region: RegionName) -> Option<String> {
		self.regions.get(region).map(MemoryRegion::inner_html)
	}

	/// Every script appended so far, in append order.
	pub fn executed_scripts(&self) -> Vec<Executable> {
		self.scripts.borrow().clone()
	}

	/// The region bindings.
	pub fn regions(&self) -> &RegionRegistry<MemoryRegion> {
		&self.regions
	}
}

#[async_trait(?Send)]
impl LiveDocument for MemoryDocument {
	fn resolve(&self, tag: &str) -> Option<RegionName> {
		self.regions.resolve(tag).map(|region| region.name())
	}

	fn replace_region(&self, region: RegionName, html: &str) -> Result<(), DomError> {
		let element = self
			.regions
			.get(region)
			.ok_or(DomError::UnboundRegion(region))?;
		element.set_inner_html(html);
		Ok(())
	}

	async fn append_script(&self, script: &Executable) -> Result<(), DomError> {
		self.scripts.borrow_mut().push(script.clone());
		Ok(())
	}
}
