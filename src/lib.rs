//! Authenticated client for the storefront admin API.
//!
//! The heart of the crate is [`api::ApiClient`]: every admin call carries the
//! stored bearer token, and an expired token is swapped for a fresh one
//! (single-flight) before the call is retried once. Tokens live behind the
//! [`session::TokenStore`] trait; unrecoverable sessions are reported through
//! the [`navigation::Navigator`] hook.

pub mod api;
pub mod config;
pub mod navigation;
pub mod session;

pub use api::{ApiClient, ApiError, ApiResponse, RefreshOutcome, RefreshState, RequestOptions};
pub use config::ClientConfig;
pub use navigation::{LogNavigator, Navigator};
pub use session::{MemoryTokenStore, StoreError, TokenKey, TokenStore};
