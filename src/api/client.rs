//! HTTP client with bearer auth injection and transparent token refresh.
//!
//! Every admin call goes through [`ApiClient::request`]. A request is tried
//! with the stored access token; if the backend answers 401 the refresh token
//! is exchanged for a new access token and the request is retried exactly
//! once. When the session cannot be recovered the stored tokens are dropped,
//! the [`Navigator`] is asked to show the login entry point, and the call
//! yields `Ok(None)`.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::ClientConfig;
use crate::navigation::{LogNavigator, Navigator};
use crate::session::{StoreError, TokenKey, TokenStore};

/// Public attachment downloads; answered with an unparsed response handle.
pub const ATTACHMENT_FETCH_PREFIX: &str = "/api/v1/attachment/";

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {status} - {body}")]
    Status { status: StatusCode, body: String },
    #[error("API transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to decode API response: {0}")]
    Decode(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for backend rejections, `None` for everything else.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One file in a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl FilePart {
    /// A part under the `file` field, which is what the attachment endpoints expect.
    pub fn file(file_name: &str, mime: &str, data: Vec<u8>) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            data,
        }
    }
}

/// Request payload. Kept as plain data so a retry can rebuild the body.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Text(String),
    Bytes { data: Vec<u8>, content_type: String },
    Multipart(Vec<FilePart>),
}

/// Per-call options. An unset method means GET.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn bytes(mut self, data: Vec<u8>, content_type: &str) -> Self {
        self.body = Some(RequestBody::Bytes {
            data,
            content_type: content_type.to_string(),
        });
        self
    }

    pub fn multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }
}

/// Successful response, classified by declared content type.
#[derive(Debug)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
    /// Attachment download left unread so the caller can stream it.
    Binary(Response),
}

impl ApiResponse {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ApiResponse::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Read the whole payload as bytes, whatever the classification.
    pub async fn into_bytes(self) -> Result<Vec<u8>, ApiError> {
        match self {
            ApiResponse::Binary(resp) => Ok(resp.bytes().await?.to_vec()),
            ApiResponse::Text(text) => Ok(text.into_bytes()),
            ApiResponse::Json(value) => {
                serde_json::to_vec(&value).map_err(|e| ApiError::Decode(e.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

/// Authenticated client for the storefront admin API.
///
/// Each instance owns its own refresh gate, so two clients never share
/// hidden refresh state.
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    pub(super) refresh_gate: RwLock<()>,
    pub(super) refreshing: AtomicBool,
}

impl ApiClient {
    /// Create a client for `base_url` with default timeouts and a logging navigator.
    pub fn new(base_url: &str, store: Arc<dyn TokenStore>) -> Self {
        let config = ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..ClientConfig::default()
        };
        Self::from_config(&config, store)
    }

    pub fn from_config(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
            navigator: Arc::new(LogNavigator::new(&config.login_url)),
            refresh_gate: RwLock::new(()),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Replace the redirect-to-login hook.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue an authenticated request against a backend path.
    ///
    /// Returns `Ok(None)` when the session is gone and the user was redirected
    /// to login. Non-2xx answers other than a recoverable 401 become
    /// [`ApiError::Status`].
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<ApiResponse>, ApiError> {
        let mut attempt = Attempt::First;

        loop {
            let Some(token) = self.current_access_token().await? else {
                log::info!("No access token for {}, redirecting to login", path);
                self.navigator.redirect_to_login();
                return Ok(None);
            };

            let response = match self.send(path, &options, &token).await {
                Ok(resp) => resp,
                Err(e) => {
                    log::error!("API request error for {}: {}", path, e);
                    return Err(ApiError::Transport(e));
                }
            };

            if response.status() == StatusCode::UNAUTHORIZED && attempt == Attempt::First {
                log::info!("Access token rejected for {}, refreshing", path);
                if self.refresh_after_unauthorized(&token).await? {
                    attempt = Attempt::Retry;
                    continue;
                }

                log::warn!("Token refresh failed, clearing session");
                self.store.clear()?;
                self.navigator.redirect_to_login();
                return Ok(None);
            }

            return self.classify(path, &options, response).await.map(Some);
        }
    }

    /// Access token to send, waiting out any refresh in progress first.
    async fn current_access_token(&self) -> Result<Option<String>, StoreError> {
        let _gate = self.refresh_gate.read().await;
        self.store.get_non_empty(TokenKey::AccessToken)
    }

    async fn send(
        &self,
        path: &str,
        options: &RequestOptions,
        token: &str,
    ) -> Result<Response, reqwest::Error> {
        let method = options.method.clone().unwrap_or(Method::GET);

        // Caller headers never carry the credential.
        let mut headers = options.headers.clone();
        headers.remove(AUTHORIZATION);

        let mut builder = self
            .client
            .request(method, self.url(path))
            .headers(headers)
            .bearer_auth(token);

        builder = match &options.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Text(text)) => builder.body(text.clone()),
            Some(RequestBody::Bytes { data, content_type }) => builder
                .header(CONTENT_TYPE, content_type.as_str())
                .body(data.clone()),
            Some(RequestBody::Multipart(parts)) => builder.multipart(build_form(parts)?),
        };

        builder.send().await
    }

    async fn classify(
        &self,
        path: &str,
        options: &RequestOptions,
        response: Response,
    ) -> Result<ApiResponse, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("API request {} failed ({}): {}", path, status, body);
            return Err(ApiError::Status { status, body });
        }

        if path.starts_with(ATTACHMENT_FETCH_PREFIX) && options.method.is_none() {
            return Ok(ApiResponse::Binary(response));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains(JSON_CONTENT_TYPE))
            .unwrap_or(false);

        if is_json {
            let bytes = response.bytes().await?;
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Decode(format!("{} returned invalid JSON: {}", path, e)))?;
            Ok(ApiResponse::Json(value))
        } else {
            Ok(ApiResponse::Text(response.text().await?))
        }
    }
}

fn build_form(parts: &[FilePart]) -> Result<reqwest::multipart::Form, reqwest::Error> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let body = reqwest::multipart::Part::bytes(part.data.clone())
            .file_name(part.file_name.clone())
            .mime_str(&part.mime)?;
        form = form.part(part.field.clone(), body);
    }
    Ok(form)
}
