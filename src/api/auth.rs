//! Credential exchange and session lifecycle.
//!
//! Login runs before any access token exists, so it talks to the backend
//! directly instead of going through [`ApiClient::request`], then seeds the
//! token store for every later call.

use reqwest::StatusCode;
use thiserror::Error;

use super::client::ApiClient;
use super::types::{LoginRequest, LoginResponse};
use crate::session::{StoreError, TokenKey, TokenStore};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Email address is not valid: {0}")]
    InvalidEmail(String),
    #[error("Login rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Login response did not contain an access token")]
    MissingToken,
    #[error("Failed to parse login response: {0}")]
    Decode(String),
    #[error("Login request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }
    // A dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Exchange email and password for a token pair and store both tokens.
///
/// A missing refresh token is stored as an empty string, which the client
/// treats as absent.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail(email.to_string()));
    }

    log::info!("Logging in as {}", email);

    let req = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };

    let resp = client.http().post(client.url(LOGIN_PATH)).json(&req).send().await?;
    let status = resp.status();
    let raw = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<LoginResponse>(&raw);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "Login failed".to_string());
        log::warn!("Login rejected ({}): {}", status, message);
        return Err(AuthError::Rejected { status, message });
    }

    let body = parsed.map_err(|e| AuthError::Decode(e.to_string()))?;
    let access_token = body
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let store = client.store();
    store.set(TokenKey::AccessToken, &access_token)?;
    store.set(
        TokenKey::RefreshToken,
        body.refresh_token.as_deref().unwrap_or_default(),
    )?;

    log::info!("Login successful for {}", email);
    Ok(())
}

/// Drop the local session. The backend keeps no server-side logout.
pub fn logout(store: &dyn TokenStore) -> Result<(), StoreError> {
    log::info!("Logging out");
    store.clear()
}

/// Whether an access token is stored. Says nothing about its validity.
pub fn is_logged_in(store: &dyn TokenStore) -> Result<bool, StoreError> {
    Ok(store.get_non_empty(TokenKey::AccessToken)?.is_some())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{any, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::MemoryTokenStore;

    fn client_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> ApiClient {
        ApiClient::new(&server.uri(), store)
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("admin@shop.uz"));
        assert!(is_valid_email("a.b@c.d.e"));
        assert!(!is_valid_email("admin"));
        assert!(!is_valid_email("admin@shop"));
        assert!(!is_valid_email("admin@.uz"));
        assert!(!is_valid_email("admin@shop."));
        assert!(!is_valid_email("ad min@shop.uz"));
        assert!(!is_valid_email("a@b@shop.uz"));
        assert!(!is_valid_email("@shop.uz"));
    }

    #[tokio::test]
    async fn test_login_stores_both_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_json(json!({"email": "admin@shop.uz", "password": "secret"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"accessToken": "A1", "refreshToken": "R1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::default());
        let client = client_for(&server, store.clone());

        login(&client, " admin@shop.uz ", "secret").await.unwrap();

        assert_eq!(store.get(TokenKey::AccessToken).unwrap().as_deref(), Some("A1"));
        assert_eq!(store.get(TokenKey::RefreshToken).unwrap().as_deref(), Some("R1"));
        assert!(is_logged_in(&*store).unwrap());
    }

    #[tokio::test]
    async fn test_login_without_refresh_token_stores_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A1"})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::default());
        let client = client_for(&server, store.clone());

        login(&client, "admin@shop.uz", "secret").await.unwrap();

        assert_eq!(store.get(TokenKey::RefreshToken).unwrap().as_deref(), Some(""));
        assert!(store.get_non_empty(TokenKey::RefreshToken).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected_uses_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"message": "Invalid email or password"})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::default());
        let client = client_for(&server, store.clone());

        let err = login(&client, "admin@shop.uz", "wrong").await.unwrap_err();
        match err {
            AuthError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!is_logged_in(&*store).unwrap());
    }

    #[tokio::test]
    async fn test_login_success_without_token_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Account not active"})))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryTokenStore::default()));
        let err = login(&client, "admin@shop.uz", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_invalid_email_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(MemoryTokenStore::default()));
        assert!(matches!(
            login(&client, "not-an-email", "secret").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            login(&client, "admin@shop.uz", "").await,
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_logout_clears_session() {
        let store = MemoryTokenStore::with_tokens("A1", "R1");
        logout(&store).unwrap();
        assert!(!is_logged_in(&store).unwrap());
        assert!(store.get(TokenKey::RefreshToken).unwrap().is_none());
    }
}
