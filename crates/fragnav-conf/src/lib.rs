//! # fragnav settings
//!
//! Configuration for the fragment router.
//!
//! Settings are plain serde structs so they can be shipped inside the page
//! shell (as JSON in a `<script type="application/json">` block) or kept in a
//! TOML file for native tooling. Every field has a default, so an empty
//! document yields a usable configuration.
//!
//! ## Example
//!
//! ```
//! use fragnav_conf::{RouterSettings, StatusPolicy};
//!
//! let settings = RouterSettings::from_toml_str(
//! 	r#"
//! login_path = "/accounts/login"
//! status_policy = "strict"
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.login_path, "/accounts/login");
//! assert_eq!(settings.default_path, "/home");
//! assert_eq!(settings.status_policy, StatusPolicy::Strict);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
	/// The TOML document could not be parsed.
	#[error("invalid TOML settings: {0}")]
	Toml(#[from] toml::de::Error),

	/// The JSON document could not be parsed.
	#[error("invalid JSON settings: {0}")]
	Json(#[from] serde_json::Error),

	/// A path setting is not an absolute path.
	#[error("setting '{field}' must start with '/', got '{value}'")]
	RelativePath {
		/// Name of the offending field.
		field: &'static str,
		/// The rejected value.
		value: String,
	},

	/// A setting that must not be empty was empty.
	#[error("setting '{0}' must not be empty")]
	Empty(&'static str),

	/// The base URL is not a valid absolute URL.
	#[error("setting 'base_url' is not a valid URL: {0}")]
	BaseUrl(#[from] url::ParseError),
}

/// How non-2xx, non-401 fragment responses are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
	/// Abort the merge and surface a notice.
	Strict,
	/// Merge the body regardless of status, with a warning in the log.
	#[default]
	Lenient,
}

/// Router settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Where the router goes after clearing a rejected credential.
	pub login_path: String,

	/// Startup target when the shell carries no initial path hint.
	pub default_path: String,

	/// Landing page after an explicit logout.
	pub logout_path: String,

	/// Storage key holding the bearer token.
	pub credential_key: String,

	/// Name of the global JS variable carrying the initial path hint.
	pub initial_path_global: String,

	/// Absolute URL relative fragment paths are joined against.
	///
	/// `None` means "use the page origin" in the browser and
	/// `http://localhost/` natively.
	pub base_url: Option<String>,

	/// Handling of non-2xx responses other than 401.
	pub status_policy: StatusPolicy,

	/// How long transient notices stay on screen, in milliseconds.
	pub notice_duration_ms: u32,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			login_path: "/login".to_string(),
			default_path: "/home".to_string(),
			logout_path: "/home/".to_string(),
			credential_key: "token".to_string(),
			initial_path_global: "path".to_string(),
			base_url: None,
			status_policy: StatusPolicy::Lenient,
			notice_duration_ms: 2000,
		}
	}
}

impl RouterSettings {
	/// Parses and validates settings from a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Parses and validates settings from a JSON document.
	pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = serde_json::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks invariants serde cannot express.
	pub fn validate(&self) -> Result<(), SettingsError> {
		for (field, value) in [
			("login_path", &self.login_path),
			("default_path", &self.default_path),
			("logout_path", &self.logout_path),
		] {
			if !value.starts_with('/') {
				return Err(SettingsError::RelativePath {
					field,
					value: value.clone(),
				});
			}
		}

		if self.credential_key.is_empty() {
			return Err(SettingsError::Empty("credential_key"));
		}
		if self.initial_path_global.is_empty() {
			return Err(SettingsError::Empty("initial_path_global"));
		}

		if let Some(base) = &self.base_url {
			url::Url::parse(base)?;
		}

		Ok(())
	}

	/// Builds the startup target from the shell's initial path hint.
	///
	/// A non-empty hint `h` yields `/h`; anything else yields
	/// [`default_path`](Self::default_path).
	pub fn initial_target(&self, hint: Option<&str>) -> String {
		match hint.map(str::trim).filter(|h| !h.is_empty()) {
			Some(hint) => format!("/{}", hint.trim_start_matches('/')),
			None => self.default_path.clone(),
		}
	}

	/// Returns `true` if `url` addresses the login page.
	pub fn is_login_path(&self, url: &str) -> bool {
		let path = url.split(['?', '#']).next().unwrap_or(url);
		path.trim_end_matches('/') == self.login_path.trim_end_matches('/')
	}
}
