//! OS keychain token store.
//!
//! Uses the `keyring` crate; each token is one credential entry under a
//! shared service name, keyed by the token's storage key. Tokens never touch
//! disk in plaintext. Built on macOS (Keychain) and Windows (Credential
//! Manager) only.

use keyring::Entry;

use super::{StoreError, TokenKey, TokenStore};

/// Default keychain service name.
const SERVICE_NAME: &str = "shop-admin";

impl From<keyring::Error> for StoreError {
    fn from(err: keyring::Error) -> Self {
        StoreError::Keychain(err.to_string())
    }
}

pub struct KeychainTokenStore {
    service: String,
}

impl KeychainTokenStore {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: TokenKey) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, key.as_str())?)
    }
}

impl Default for KeychainTokenStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl TokenStore for KeychainTokenStore {
    /// Returns `None` if no entry exists (never logged in, or logged out).
    fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::from(e)),
        }
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StoreError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    /// Idempotent: ignores `NoEntry` (already deleted or never stored).
    fn remove(&self, key: TokenKey) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::from(e)),
        }
    }
}
