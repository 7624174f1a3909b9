//! Script re-execution.
//!
//! Markup assigned through `innerHTML` never runs its `<script>` elements.
//! Scripts found in a fragment are therefore classified into an
//! [`Executable`] and re-created as fresh elements in the live document.
//!
//! Execution is sequential: [`execute`] resolves only after the script has
//! run, so a remote library finishes loading before the next script that
//! uses it is appended.

use crate::dom::{DomError, LiveDocument};
use scraper::ElementRef;

/// A script hoisted out of fragment markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
	/// A script loaded from a URL.
	Remote(String),
	/// A script with inline source text.
	Inline(String),
}

impl Executable {
	/// Returns `true` for remote scripts.
	pub fn is_remote(&self) -> bool {
		matches!(self, Self::Remote(_))
	}

	/// The script URL or the inline source.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Remote(src) | Self::Inline(src) => src,
		}
	}
}

/// Classifies a parsed `<script>` element.
///
/// A non-empty `src` attribute makes the script remote; otherwise its text
/// content is kept verbatim.
pub fn classify(element: ElementRef<'_>) -> Executable {
	match element.value().attr("src").map(str::trim) {
		Some(src) if !src.is_empty() => Executable::Remote(src.to_string()),
		_ => Executable::Inline(element.text().collect()),
	}
}

/// Executes a hoisted script by appending a new script element to the
/// document body, and waits for it to run.
pub async fn execute<D>(document: &D, script: &Executable) -> Result<(), DomError>
where
	D: LiveDocument + ?Sized,
{
	crate::debug_log!(
		"executing {} script: {}",
		if script.is_remote() { "remote" } else { "inline" },
		script.as_str()
	);
	document.append_script(script).await
}
