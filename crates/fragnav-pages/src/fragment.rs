//! Fragment merging.
//!
//! A fragment is a server-rendered HTML document whose top-level body
//! children are either region elements (`<header>`, `<nav>`, `<main>`,
//! `<footer>`) or `<script>` elements. Merging happens in two steps:
//!
//! 1. [`FragmentPlan::parse`] splits the fragment into region patches and
//!    hoisted scripts. This step is pure and works on a detached document.
//! 2. [`merge_fragment`] applies the patches to a [`LiveDocument`] and then
//!    executes the hoisted scripts.
//!
//! ## Ordering
//!
//! Patches are applied in source order, so when two top-level elements
//! target the same region the later one wins. Scripts run after every patch
//! has been applied: first the scripts that were nested inside regions, then
//! the page-level ones, each group in discovery order. Each script is
//! appended only after the previous one has run (or failed to load).
//!
//! ## Markup
//!
//! Region content is re-serialised from the parsed tree, so it comes out
//! normalised: attributes are written in sorted order, and entities are
//! re-escaped.
//!
//! ## Example
//!
//! ```
//! use fragnav_pages::dom::MemoryDocument;
//! use fragnav_pages::fragment::merge_html;
//! use fragnav_pages::region::RegionName;
//!
//! let document = MemoryDocument::new();
//! futures::executor::block_on(merge_html("<main>Welcome</main>", &document)).unwrap();
//!
//! assert_eq!(document.region_html(RegionName::Main).as_deref(), Some("Welcome"));
//! ```

use crate::dom::{DomError, LiveDocument};
use crate::region::RegionName;
use crate::script::{self, Executable, classify};
use scraper::{ElementRef, Html};

const SCRIPT_TAG: &str = "script";

/// New content for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPatch {
	/// Target region.
	pub region: RegionName,
	/// Script-free inner markup.
	pub html: String,
}

/// A fragment split into region patches and hoisted scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentPlan {
	patches: Vec<RegionPatch>,
	region_scripts: Vec<Executable>,
	page_scripts: Vec<Executable>,
}

impl FragmentPlan {
	/// Parses fragment markup.
	///
	/// `resolve` maps a top-level tag name to a bound region; elements it
	/// rejects are dropped.
	pub fn parse<F>(html: &str, mut resolve: F) -> Self
	where
		F: FnMut(&str) -> Option<RegionName>,
	{
		let mut document = Html::parse_document(html);
		let mut plan = Self::default();

		let children: Vec<_> = match body_of(&document) {
			Some(body) => body
				.children()
				.filter_map(ElementRef::wrap)
				.map(|child| child.id())
				.collect(),
			None => return plan,
		};

		for child_id in children {
			let Some(child) = document.tree.get(child_id).and_then(ElementRef::wrap) else {
				continue;
			};

			let tag = child.value().name();
			if tag == SCRIPT_TAG {
				plan.page_scripts.push(classify(child));
				continue;
			}

			let Some(region) = resolve(tag) else {
				crate::debug_log!("dropping top-level <{}>: not a region", tag);
				continue;
			};

			let nested: Vec<_> = child
				.descendants()
				.filter_map(ElementRef::wrap)
				.filter(|element| element.value().name() == SCRIPT_TAG)
				.map(|element| (element.id(), classify(element)))
				.collect();

			// Scripts must leave the subtree before it is serialised.
			for (script_id, executable) in nested {
				if let Some(mut node) = document.tree.get_mut(script_id) {
					node.detach();
				}
				plan.region_scripts.push(executable);
			}

			let html = document
				.tree
				.get(child_id)
				.and_then(ElementRef::wrap)
				.map(|child| child.inner_html())
				.unwrap_or_default();
			plan.patches.push(RegionPatch { region, html });
		}

		plan
	}

	/// Region patches in source order.
	pub fn patches(&self) -> &[RegionPatch] {
		&self.patches
	}

	/// Scripts in execution order.
	pub fn scripts(&self) -> impl Iterator<Item = &Executable> {
		self.region_scripts.iter().chain(self.page_scripts.iter())
	}

	/// Returns `true` if merging this plan would not change the page.
	pub fn is_empty(&self) -> bool {
		self.patches.is_empty() && self.region_scripts.is_empty() && self.page_scripts.is_empty()
	}
}

fn body_of(document: &Html) -> Option<ElementRef<'_>> {
	document
		.root_element()
		.children()
		.filter_map(ElementRef::wrap)
		.find(|element| element.value().name() == "body")
}

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
	/// Regions written, in write order (repeats included).
	pub regions_updated: Vec<RegionName>,
	/// Number of scripts that ran.
	pub scripts_executed: usize,
	/// Number of remote scripts that failed to load.
	pub scripts_failed: usize,
}

/// Applies a plan to the live document.
///
/// A remote script that fails to load is logged and counted; the scripts
/// after it still run.
pub async fn merge_fragment<D>(plan: &FragmentPlan, document: &D) -> Result<MergeReport, DomError>
where
	D: LiveDocument + ?Sized,
{
	let mut report = MergeReport::default();

	for patch in plan.patches() {
		if report.regions_updated.contains(&patch.region) {
			crate::warn_log!(
				"region '{}' targeted more than once by one fragment; keeping the last",
				patch.region
			);
		}
		document.replace_region(patch.region, &patch.html)?;
		report.regions_updated.push(patch.region);
	}

	for executable in plan.scripts() {
		match script::execute(document, executable).await {
			Ok(()) => report.scripts_executed += 1,
			Err(DomError::ScriptLoad(src)) => {
				crate::error_log!("script '{}' failed to load", src);
				report.scripts_failed += 1;
			}
			Err(err) => return Err(err),
		}
	}

	if plan.is_empty() {
		crate::debug_log!("fragment matched no region and carried no script");
	}

	Ok(report)
}

/// Parses `html` against the document's regions and merges it.
pub async fn merge_html<D>(html: &str, document: &D) -> Result<MergeReport, DomError>
where
	D: LiveDocument + ?Sized,
{
	let plan = FragmentPlan::parse(html, |tag| document.resolve(tag));
	merge_fragment(&plan, document).await
}
