//! Redirect-to-login side channel.
//!
//! When the API client cannot recover a session (no access token, or the
//! refresh exchange failed) it does not return an error. It asks the hosting
//! application to send the user back to the login entry point instead.

/// Hosting application hook for unrecoverable authentication failures.
pub trait Navigator: Send + Sync {
    /// Send the user to the unauthenticated entry point.
    fn redirect_to_login(&self);
}

/// Default navigator: logs where the user should go next.
#[derive(Debug, Clone)]
pub struct LogNavigator {
    login_entry: String,
}

impl LogNavigator {
    pub fn new(login_entry: &str) -> Self {
        Self {
            login_entry: login_entry.to_string(),
        }
    }

    pub fn login_entry(&self) -> &str {
        &self.login_entry
    }
}

impl Navigator for LogNavigator {
    fn redirect_to_login(&self) {
        log::warn!("Session is not authenticated, redirecting to {}", self.login_entry);
    }
}
