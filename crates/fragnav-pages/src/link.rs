//! In-page link interception.
//!
//! Anchors marked with `data-link` are followed through the navigator
//! instead of a full page load. Clicks that the browser should keep handling
//! (modifier keys, non-primary buttons, other targets, other origins) are
//! left alone.

/// Attribute marking an anchor as an in-page link.
pub const LINK_ATTRIBUTE: &str = "data-link";

/// A click on an anchor, as seen by the interceptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkActivation {
	/// The anchor's `href` attribute.
	pub href: Option<String>,
	/// The anchor's `target` attribute.
	pub target: Option<String>,
	/// Whether the anchor carries [`LINK_ATTRIBUTE`].
	pub data_link: bool,
	/// `MouseEvent.button` (0 is the primary button).
	pub button: i16,
	/// Whether ctrl, meta, shift or alt was held.
	pub modifiers: bool,
}

impl LinkActivation {
	/// Returns the path to navigate to if the click should stay in-page.
	pub fn intercept(&self) -> Option<&str> {
		if !self.data_link || self.button != 0 || self.modifiers {
			return None;
		}
		if self
			.target
			.as_deref()
			.is_some_and(|target| !target.is_empty() && target != "_self")
		{
			return None;
		}

		let href = self.href.as_deref()?.trim();
		// Absolute paths only; "//host" is protocol-relative.
		(href.starts_with('/') && !href.starts_with("//")).then_some(href)
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::intercept_links;

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{LINK_ATTRIBUTE, LinkActivation};
	use crate::dom::DomError;
	use crate::navigation::{NavigationKind, Navigator};
	use std::rc::Rc;
	use wasm_bindgen::JsCast;
	use wasm_bindgen::closure::Closure;
	use web_sys::{Element, MouseEvent};

	fn activation(event: &MouseEvent) -> Option<LinkActivation> {
		let target = event.target()?.dyn_into::<Element>().ok()?;
		let anchor = target.closest(&format!("a[{}]", LINK_ATTRIBUTE)).ok()??;
		Some(LinkActivation {
			href: anchor.get_attribute("href"),
			target: anchor.get_attribute("target"),
			data_link: true,
			button: event.button(),
			modifiers: event.ctrl_key() || event.meta_key() || event.shift_key() || event.alt_key(),
		})
	}

	/// Installs one delegated `click` listener on the document.
	pub fn intercept_links(navigator: Rc<Navigator>) -> Result<(), DomError> {
		let document = web_sys::window()
			.ok_or(DomError::Unavailable("window"))?
			.document()
			.ok_or(DomError::Unavailable("document"))?;

		let handler = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
			let Some(activation) = activation(&event) else {
				return;
			};
			let Some(path) = activation.intercept().map(str::to_string) else {
				return;
			};
			event.prevent_default();
			let navigator = Rc::clone(&navigator);
			wasm_bindgen_futures::spawn_local(async move {
				navigator.navigate(&path, NavigationKind::Push).await;
			});
		});

		document
			.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
			.map_err(|err| DomError::Js(format!("{:?}", err)))?;
		handler.forget();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn link(href: &str) -> LinkActivation {
		LinkActivation {
			href: Some(href.to_string()),
			data_link: true,
			..LinkActivation::default()
		}
	}

	#[rstest]
	#[case("/profile/", Some("/profile/"))]
	#[case("/pong/?opponent=bob", Some("/pong/?opponent=bob"))]
	#[case("  /friends/ ", Some("/friends/"))]
	#[case("//cdn.example/x", None)]
	#[case("https://intra.example/", None)]
	#[case("#top", None)]
	#[case("relative/path", None)]
	#[case("", None)]
	fn test_intercept_href(#[case] href: &str, #[case] expected: Option<&str>) {
		assert_eq!(link(href).intercept(), expected);
	}

	#[rstest]
	fn test_unmarked_anchor_not_intercepted() {
		let activation = LinkActivation {
			data_link: false,
			..link("/home")
		};
		assert_eq!(activation.intercept(), None);
	}

	#[rstest]
	#[case(1)]
	#[case(2)]
	fn test_non_primary_button_not_intercepted(#[case] button: i16) {
		let activation = LinkActivation {
			button,
			..link("/home")
		};
		assert_eq!(activation.intercept(), None);
	}

	#[rstest]
	fn test_modifier_click_not_intercepted() {
		let activation = LinkActivation {
			modifiers: true,
			..link("/home")
		};
		assert_eq!(activation.intercept(), None);
	}

	#[rstest]
	#[case(Some("_blank"), None)]
	#[case(Some("_self"), Some("/home"))]
	#[case(Some(""), Some("/home"))]
	#[case(None, Some("/home"))]
	fn test_target_attribute(#[case] target: Option<&str>, #[case] expected: Option<&str>) {
		let activation = LinkActivation {
			target: target.map(str::to_string),
			..link("/home")
		};
		assert_eq!(activation.intercept(), expected);
	}

	#[rstest]
	fn test_missing_href_not_intercepted() {
		let activation = LinkActivation {
			href: None,
			..link("/home")
		};
		assert_eq!(activation.intercept(), None);
	}
}
