//! Browser-backed live document.

use super::{DomError, LiveDocument};
use crate::region::{RegionName, RegionRegistry};
use crate::script::Executable;
use async_trait::async_trait;
use js_sys::{Function, Promise};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlScriptElement};

fn js_error(err: JsValue) -> DomError {
	DomError::Js(format!("{:?}", err))
}

/// The page shell of the current browser document.
#[derive(Debug, Clone)]
pub struct WebDocument {
	document: Document,
	regions: RegionRegistry<Element>,
}

impl WebDocument {
	/// Binds the regions of the current window's document.
	pub fn from_window() -> Result<Self, DomError> {
		let window = web_sys::window().ok_or(DomError::Unavailable("window"))?;
		let document = window
			.document()
			.ok_or(DomError::Unavailable("document"))?;
		Ok(Self::new(document))
	}

	/// Binds each region to the first element matching its tag name.
	pub fn new(document: Document) -> Self {
		let regions = RegionRegistry::bind(|name| {
			document.query_selector(name.tag()).ok().flatten()
		});
		for region in regions.iter() {
			crate::debug_log!("bound region '{}'", region.name());
		}
		Self { document, regions }
	}

	/// The underlying document.
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// The region bindings.
	pub fn regions(&self) -> &RegionRegistry<Element> {
		&self.regions
	}
}

impl WebDocument {
	fn create_script(&self) -> Result<HtmlScriptElement, DomError> {
		self.document
			.create_element("script")
			.map_err(js_error)?
			.dyn_into::<HtmlScriptElement>()
			.map_err(|_| DomError::Js("created element is not a script".to_string()))
	}
}

#[async_trait(?Send)]
impl LiveDocument for WebDocument {
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
		let body = self.document.body().ok_or(DomError::Unavailable("body"))?;
		let element = self.create_script()?;

		let src = match script {
			Executable::Inline(source) => {
				element.set_text(source).map_err(js_error)?;
				body.append_child(&element).map_err(js_error)?;
				return Ok(());
			}
			Executable::Remote(src) => src,
		};

		// Script elements created from code are async unless told otherwise.
		element.set_async(false);
		let loaded = Promise::new(&mut |resolve: Function, reject: Function| {
			element.set_onload(Some(&resolve));
			element.set_onerror(Some(&reject));
		});
		element.set_src(src);
		body.append_child(&element).map_err(js_error)?;

		let result = JsFuture::from(loaded).await;
		element.set_onload(None);
		element.set_onerror(None);
		result
			.map(|_| ())
			.map_err(|_| DomError::ScriptLoad(src.clone()))
	}
}
