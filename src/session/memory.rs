//! In-memory token store.
//!
//! Used by tests and by callers that manage persistence themselves.
//! Removed tokens are zeroed before their memory is released.

use std::collections::HashMap;
use std::sync::Mutex;

use zeroize::Zeroize;

use super::{StoreError, TokenKey, TokenStore};

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    /// Create a store pre-seeded with an access and refresh token.
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::default();
        {
            let mut entries = store.lock();
            entries.insert(TokenKey::AccessToken, access_token.to_string());
            entries.insert(TokenKey::RefreshToken, refresh_token.to_string());
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TokenKey, String>> {
        // A poisoned map still holds valid strings.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), StoreError> {
        if let Some(mut old) = self.lock().insert(key, value.to_string()) {
            old.zeroize();
        }
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<(), StoreError> {
        if let Some(mut old) = self.lock().remove(&key) {
            old.zeroize();
        }
        Ok(())
    }
}
