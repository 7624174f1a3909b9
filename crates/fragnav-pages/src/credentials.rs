//! Session credential storage.
//!
//! The router only reads and clears the bearer token. Setting it belongs to
//! the login flow, which uses the same store.

use std::cell::RefCell;
use thiserror::Error;

/// Errors raised by a credential store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
	/// The backing storage is unavailable (e.g. disabled `localStorage`).
	#[error("credential storage is unavailable: {0}")]
	Unavailable(String),
	/// The storage rejected the write.
	#[error("credential storage rejected the write: {0}")]
	Write(String),
}

/// Process-wide slot holding the bearer token.
pub trait CredentialStore {
	/// Returns the stored token, if any.
	fn get(&self) -> Option<String>;

	/// Stores a token.
	fn set(&self, token: &str) -> Result<(), CredentialError>;

	/// Removes the stored token.
	fn clear(&self) -> Result<(), CredentialError>;
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
	token: RefCell<Option<String>>,
}

impl MemoryCredentials {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store holding `token`.
	pub fn with_token(token: impl Into<String>) -> Self {
		Self {
			token: RefCell::new(Some(token.into())),
		}
	}
}

impl CredentialStore for MemoryCredentials {
	fn get(&self) -> Option<String> {
		self.token.borrow().clone()
	}

	fn set(&self, token: &str) -> Result<(), CredentialError> {
		*self.token.borrow_mut() = Some(token.to_string());
		Ok(())
	}

	fn clear(&self) -> Result<(), CredentialError> {
		self.token.borrow_mut().take();
		Ok(())
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageCredentials;

#[cfg(target_arch = "wasm32")]
mod web {
	use super::{CredentialError, CredentialStore};
	use web_sys::Storage;

	/// Credential store backed by `window.localStorage`.
	#[derive(Debug, Clone)]
	pub struct LocalStorageCredentials {
		key: String,
	}

	impl LocalStorageCredentials {
		/// Creates a store reading and writing `key`.
		pub fn new(key: impl Into<String>) -> Self {
			Self { key: key.into() }
		}

		fn storage(&self) -> Result<Storage, CredentialError> {
			web_sys::window()
				.ok_or_else(|| CredentialError::Unavailable("no window".to_string()))?
				.local_storage()
				.map_err(|err| CredentialError::Unavailable(format!("{:?}", err)))?
				.ok_or_else(|| CredentialError::Unavailable("localStorage is disabled".to_string()))
		}
	}

	impl CredentialStore for LocalStorageCredentials {
		fn get(&self) -> Option<String> {
			self.storage()
				.ok()?
				.get_item(&self.key)
				.ok()
				.flatten()
				.filter(|token| !token.is_empty())
		}

		fn set(&self, token: &str) -> Result<(), CredentialError> {
			self.storage()?
				.set_item(&self.key, token)
				.map_err(|err| CredentialError::Write(format!("{:?}", err)))
		}

		fn clear(&self) -> Result<(), CredentialError> {
			self.storage()?
				.remove_item(&self.key)
				.map_err(|err| CredentialError::Write(format!("{:?}", err)))
		}
	}
}
