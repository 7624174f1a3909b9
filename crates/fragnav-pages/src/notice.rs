//! Transient notices.
//!
//! Alert banners shown at the top of the main region, removed again after a
//! delay. The navigator raises one when a fragment request fails with a
//! server error; page scripts can raise their own through the same
//! [`Notifier`].

use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

/// Severity of a notice; doubles as the alert CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
	/// Positive confirmation.
	Success,
	/// Neutral information.
	Info,
	/// Something needs attention.
	Warning,
	/// Something failed.
	Danger,
}

impl NoticeLevel {
	/// The alert modifier class, e.g. `danger` for `alert-danger`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Info => "info",
			Self::Warning => "warning",
			Self::Danger => "danger",
		}
	}
}

impl fmt::Display for NoticeLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	/// Text shown in the banner.
	pub message: String,
	/// Severity.
	pub level: NoticeLevel,
	/// How long the banner stays; `None` keeps it until the region is replaced.
	pub duration: Option<Duration>,
}

impl Notice {
	/// Creates a sticky notice.
	pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			level,
			duration: None,
		}
	}

	/// Creates a sticky success notice.
	pub fn success(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Success, message)
	}

	/// Creates a sticky danger notice.
	pub fn danger(message: impl Into<String>) -> Self {
		Self::new(NoticeLevel::Danger, message)
	}

	/// Removes the notice after `duration`.
	pub fn lasting(mut self, duration: Duration) -> Self {
		self.duration = Some(duration);
		self
	}
}

/// Displays notices.
pub trait Notifier {
	/// Shows `notice`.
	fn notify(&self, notice: Notice);
}

/// Records notices instead of displaying them.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
	notices: RefCell<Vec<Notice>>,
}

impl MemoryNotifier {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Notices received so far.
	pub fn notices(&self) -> Vec<Notice> {
		self.notices.borrow().clone()
	}
}

impl Notifier for MemoryNotifier {
	fn notify(&self, notice: Notice) {
		self.notices.borrow_mut().push(notice);
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::DomNotifier;

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{Notice, Notifier};
	use gloo_timers::future::TimeoutFuture;
	use web_sys::{Document, Element};

	/// Inserts alert banners into a container element.
	#[derive(Debug, Clone)]
	pub struct DomNotifier {
		document: Document,
		container: Element,
	}

	impl DomNotifier {
		/// Creates a notifier prepending banners to `container`.
		pub fn new(document: Document, container: Element) -> Self {
			Self {
				document,
				container,
			}
		}

		fn banner(&self, notice: &Notice) -> Option<Element> {
			let banner = self.document.create_element("div").ok()?;
			banner
				.set_attribute("class", &format!("alert alert-{}", notice.level))
				.ok()?;
			banner.set_attribute("role", "alert").ok()?;
			banner.set_text_content(Some(&notice.message));
			Some(banner)
		}
	}

	impl Notifier for DomNotifier {
		fn notify(&self, notice: Notice) {
			let Some(banner) = self.banner(&notice) else {
				crate::error_log!("could not create notice banner: {}", notice.message);
				return;
			};
			if let Err(err) = self.container.prepend_with_node_1(&banner) {
				crate::error_log!("could not insert notice banner: {:?}", err);
				return;
			}

			if let Some(duration) = notice.duration {
				let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
				wasm_bindgen_futures::spawn_local(async move {
					TimeoutFuture::new(millis).await;
					banner.remove();
				});
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_notice_builders() {
		let notice = Notice::danger("Error joining queue").lasting(Duration::from_millis(2000));

		assert_eq!(notice.level, NoticeLevel::Danger);
		assert_eq!(notice.message, "Error joining queue");
		assert_eq!(notice.duration, Some(Duration::from_secs(2)));
		assert_eq!(Notice::success("ok").duration, None);
	}

	#[rstest]
	#[case(NoticeLevel::Success, "success")]
	#[case(NoticeLevel::Info, "info")]
	#[case(NoticeLevel::Warning, "warning")]
	#[case(NoticeLevel::Danger, "danger")]
	fn test_level_class(#[case] level: NoticeLevel, #[case] expected: &str) {
		assert_eq!(level.to_string(), expected);
	}

	#[rstest]
	fn test_memory_notifier_records_in_order() {
		let notifier = MemoryNotifier::new();
		notifier.notify(Notice::success("one"));
		notifier.notify(Notice::danger("two"));

		let messages: Vec<_> = notifier.notices().into_iter().map(|n| n.message).collect();
		assert_eq!(messages, vec!["one", "two"]);
	}
}
