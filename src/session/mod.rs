//! Session token storage.
//!
//! The admin API hands out two opaque bearer tokens: a short-lived access
//! token and a longer-lived refresh token. They live behind the [`TokenStore`]
//! trait so the API client can run against an in-memory map in tests, a JSON
//! file for the command-line console, or the OS keychain.
//!
//! Validity is never tracked here. Only the backend decides whether a token is
//! still good, by answering 401.

pub mod file;
#[cfg(all(feature = "keychain", any(target_os = "macos", target_os = "windows")))]
pub mod keychain;
pub mod memory;

pub use file::FileTokenStore;
#[cfg(all(feature = "keychain", any(target_os = "macos", target_os = "windows")))]
pub use keychain::KeychainTokenStore;
pub use memory::MemoryTokenStore;

use thiserror::Error;

/// The two entries a session consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    RefreshToken,
}

impl TokenKey {
    /// Storage key, shared with the browser dashboard's local storage layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "accessToken",
            TokenKey::RefreshToken => "refreshToken",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Token store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Keychain operation failed: {0}")]
    Keychain(String),
}

/// Key-value storage for session tokens.
///
/// Implementations must be cheap to call; the API client reads the access
/// token on every request.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError>;

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StoreError>;

    /// Remove an entry. Removing a missing entry is not an error.
    fn remove(&self, key: TokenKey) -> Result<(), StoreError>;

    /// Drop both tokens (logout, unrecoverable auth failure).
    fn clear(&self) -> Result<(), StoreError> {
        self.remove(TokenKey::AccessToken)?;
        self.remove(TokenKey::RefreshToken)
    }

    /// Read a token, treating an empty string the same as a missing entry.
    ///
    /// The login flow stores `""` when the server omits a refresh token.
    fn get_non_empty(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        Ok(self.get(key)?.filter(|v| !v.is_empty()))
    }
}
