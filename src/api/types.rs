//! Request and response types for the storefront admin API.
//!
//! All structs use camelCase serialization to match the API's JSON format.
//! Catalog entities (categories, products, attachments) are not modelled here;
//! they pass through the client as opaque JSON.

use serde::{Deserialize, Serialize};

/// Login request body sent to POST /api/v1/auth/login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response. On failure the backend answers with only `message`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from POST /api/v1/auth/refresh/{refreshToken}.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    /// Present only when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Headline counters for the dashboard landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub categories: u64,
    pub products: u64,
    pub attachments: u64,
}

/// Counters for the files page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub unlinked: u64,
    pub linked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_uses_camel_case() {
        let req = LoginRequest {
            email: "admin@shop.uz".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"email": "admin@shop.uz", "password": "secret"}));
    }

    #[test]
    fn test_refresh_response_without_rotation() {
        let resp: RefreshResponse = serde_json::from_str(r#"{"accessToken":"A2"}"#).unwrap();
        assert_eq!(resp.access_token, "A2");
        assert!(resp.refresh_token.is_none());
    }

    #[test]
    fn test_login_error_body_parses() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"message":"Invalid email or password"}"#).unwrap();
        assert!(resp.access_token.is_none());
        assert_eq!(resp.message.as_deref(), Some("Invalid email or password"));
    }
}
