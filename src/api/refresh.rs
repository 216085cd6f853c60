//! Single-flight access token refresh.
//!
//! The client's refresh gate is an async reader/writer lock. Requests take the
//! read side just long enough to read the access token, so any request issued
//! while an exchange is running waits for it and then uses the fresh token.
//! The exchange itself holds the write side for its whole duration, which
//! keeps at most one exchange in flight. The reported [`RefreshState`] is a
//! flag raised only once the write side is held.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::StatusCode;
use tokio::sync::RwLockWriteGuard;

use super::client::ApiClient;
use super::types::RefreshResponse;
use crate::session::{StoreError, TokenKey};

/// Token exchange endpoint; the refresh token is appended as a path segment.
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New access token stored.
    Refreshed,
    /// No refresh token in the store; no request was made.
    MissingRefreshToken,
    /// Backend refused the refresh token. Stored tokens were left alone.
    Rejected(StatusCode),
    /// Network error or unreadable answer. Both stored tokens were cleared.
    Failed,
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed)
    }
}

/// Holds the gate and keeps the client `Refreshing` for as long as it lives.
struct RefreshGuard<'a> {
    _gate: RwLockWriteGuard<'a, ()>,
    refreshing: &'a AtomicBool,
}

impl<'a> RefreshGuard<'a> {
    fn begin(gate: RwLockWriteGuard<'a, ()>, refreshing: &'a AtomicBool) -> Self {
        refreshing.store(true, Ordering::SeqCst);
        Self {
            _gate: gate,
            refreshing,
        }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.refreshing.store(false, Ordering::SeqCst);
    }
}

impl ApiClient {
    /// Current gate state. `Refreshing` only while an exchange holds the gate;
    /// a refresh still queued behind in-flight token reads reports `Idle`.
    pub fn refresh_state(&self) -> RefreshState {
        if self.refreshing.load(Ordering::SeqCst) {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    async fn begin_refresh(&self) -> RefreshGuard<'_> {
        RefreshGuard::begin(self.refresh_gate.write().await, &self.refreshing)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Waits for any exchange already in progress, then performs its own.
    pub async fn refresh_token(&self) -> Result<RefreshOutcome, StoreError> {
        let _guard = self.begin_refresh().await;
        self.exchange().await
    }

    /// Recover from a 401 received while sending `stale_token`.
    ///
    /// If a concurrent request already replaced that token, no new exchange
    /// is made and the caller simply retries with the stored one.
    pub(super) async fn refresh_after_unauthorized(
        &self,
        stale_token: &str,
    ) -> Result<bool, StoreError> {
        let _guard = self.begin_refresh().await;

        if let Some(current) = self.store().get_non_empty(TokenKey::AccessToken)? {
            if current != stale_token {
                log::debug!("Access token already refreshed by a concurrent request");
                return Ok(true);
            }
        }

        Ok(self.exchange().await?.is_success())
    }

    async fn exchange(&self) -> Result<RefreshOutcome, StoreError> {
        let Some(refresh_token) = self.store().get_non_empty(TokenKey::RefreshToken)? else {
            log::info!("No refresh token stored, refresh skipped");
            return Ok(RefreshOutcome::MissingRefreshToken);
        };

        let url = self.url(&format!(
            "{}/{}",
            REFRESH_PATH,
            urlencoding::encode(&refresh_token)
        ));

        let resp = match self.http().post(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::error!("Token refresh error: {}", e);
                self.store().clear()?;
                return Ok(RefreshOutcome::Failed);
            }
        };

        let status = resp.status();
        if !status.is_success() {
            log::warn!("Token refresh rejected with status {}", status);
            return Ok(RefreshOutcome::Rejected(status));
        }

        let body: RefreshResponse = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Failed to parse refresh response: {}", e);
                self.store().clear()?;
                return Ok(RefreshOutcome::Failed);
            }
        };

        self.store().set(TokenKey::AccessToken, &body.access_token)?;
        if let Some(rotated) = body.refresh_token.filter(|t| !t.is_empty()) {
            self.store().set(TokenKey::RefreshToken, &rotated)?;
        }

        log::info!("Access token refreshed");
        Ok(RefreshOutcome::Refreshed)
    }
}
