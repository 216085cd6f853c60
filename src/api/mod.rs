//! API client module for the storefront admin backend.
//!
//! Provides the authenticated HTTP client with transparent token refresh,
//! the login flow that seeds the token store, the admin endpoint catalog,
//! and request/response types matching the backend API.

pub mod admin;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod refresh;
pub mod types;


pub use client::{ApiClient, ApiError, ApiResponse, FilePart, RequestBody, RequestOptions};
pub use refresh::{RefreshOutcome, RefreshState};
