//! Property tests for fragment merging
//!
//! Checks, over generated fragments:
//! 1. A main-only fragment rewrites main and nothing else
//! 2. Inline scripts run exactly once and never stay in region markup
//! 3. Remote scripts are appended exactly once

#![cfg(not(target_arch = "wasm32"))]

use fragnav_pages::dom::MemoryDocument;
use fragnav_pages::fragment::{MergeReport, merge_html};
use fragnav_pages::region::RegionName;
use fragnav_pages::script::Executable;
use futures::executor::block_on;
use proptest::prelude::*;
use rstest::*;

fn shell() -> MemoryDocument {
	MemoryDocument::new()
		.seeded(RegionName::Header, "header")
		.seeded(RegionName::Nav, "nav")
		.seeded(RegionName::Main, "old main")
		.seeded(RegionName::Footer, "footer")
}

fn merge(fragment: &str, document: &MemoryDocument) -> MergeReport {
	block_on(merge_html(fragment, document)).unwrap()
}

fn no_script_markup(document: &MemoryDocument) -> bool {
	RegionName::ALL.iter().all(|region| {
		document
			.region_html(*region)
			.is_none_or(|html| !html.contains("<script"))
	})
}

// ============================================================================
// Region content
// ============================================================================

/// Main takes the fragment's inner markup; the rest of the shell is intact
#[rstest]
fn test_property_main_only_fragment() {
	proptest!(|(text in "[a-zA-Z0-9 .,!?]{0,60}")| {
		let document = shell();

		let report = merge(&format!("<main>{}</main>", text), &document);

		prop_assert_eq!(report.regions_updated, vec![RegionName::Main]);
		prop_assert_eq!(document.region_html(RegionName::Main), Some(text.clone()));
		let header = document.region_html(RegionName::Header);
		let nav = document.region_html(RegionName::Nav);
		let footer = document.region_html(RegionName::Footer);
		prop_assert_eq!(header.as_deref(), Some("header"));
		prop_assert_eq!(nav.as_deref(), Some("nav"));
		prop_assert_eq!(footer.as_deref(), Some("footer"));
		prop_assert!(document.executed_scripts().is_empty());
	});
}

// ============================================================================
// Scripts
// ============================================================================

/// An inline script nested in a region runs once and leaves the region
#[rstest]
fn test_property_nested_inline_script_runs_once() {
	proptest!(|(
		call in "[a-z]{1,12}\\(\\);",
		before in "[a-zA-Z ]{0,20}",
	)| {
		let document = shell();
		let fragment = format!("<main><p>{}</p><script>{}</script></main>", before, call);

		merge(&fragment, &document);

		prop_assert_eq!(document.executed_scripts(), vec![Executable::Inline(call.clone())]);
		prop_assert_eq!(
			document.region_html(RegionName::Main),
			Some(format!("<p>{}</p>", before))
		);
		prop_assert!(no_script_markup(&document));
	});
}

/// A page-level inline script after a region runs once
#[rstest]
fn test_property_page_inline_script_runs_once() {
	proptest!(|(call in "[a-z]{1,12}\\(\\);")| {
		let document = shell();

		merge(&format!("<main>x</main><script>{}</script>", call), &document);

		prop_assert_eq!(document.executed_scripts(), vec![Executable::Inline(call)]);
		prop_assert!(no_script_markup(&document));
	});
}

/// A remote script is appended once with its source
#[rstest]
fn test_property_remote_script_appended_once() {
	proptest!(|(
		name in "[a-z]{1,10}",
		nested in any::<bool>(),
	)| {
		let document = shell();
		let src = format!("/static/js/{}.js", name);
		let fragment = if nested {
			format!(r#"<main>content<script src="{}"></script></main>"#, src)
		} else {
			format!(r#"<main>content</main><script src="{}"></script>"#, src)
		};

		let report = merge(&fragment, &document);

		prop_assert_eq!(report.scripts_executed, 1);
		prop_assert_eq!(document.executed_scripts(), vec![Executable::Remote(src)]);
		let main = document.region_html(RegionName::Main);
		prop_assert_eq!(main.as_deref(), Some("content"));
	});
}

/// Several scripts keep their discovery order, region scripts first
#[rstest]
fn test_property_script_order() {
	proptest!(|(calls in prop::collection::vec("[a-z]{1,8}\\(\\);", 1..5))| {
		let document = shell();
		let nested: String = calls
			.iter()
			.map(|call| format!("<script>{}</script>", call))
			.collect();
		let fragment = format!("<main>{}</main><script>last();</script>", nested);

		merge(&fragment, &document);

		let mut expected: Vec<_> = calls.into_iter().map(Executable::Inline).collect();
		expected.push(Executable::Inline("last();".to_string()));
		prop_assert_eq!(document.executed_scripts(), expected);
	});
}
