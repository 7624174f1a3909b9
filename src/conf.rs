//! Router settings.
//!
//! # Examples
//!
//! ```rust
//! use fragnav::conf::RouterSettings;
//!
//! let settings = RouterSettings::from_json_str(r#"{ "default_path": "/dashboard" }"#).unwrap();
//! assert_eq!(settings.initial_target(None), "/dashboard");
//! ```

pub use fragnav_conf::*;
