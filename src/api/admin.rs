//! Admin endpoint catalog: categories, products and attachments.
//!
//! Each call goes through [`ApiClient::request`] and hands the backend's JSON
//! back untouched. `Ok(None)` means the session was lost and the user was sent
//! to login.

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde_json::Value;

use super::client::{ApiClient, ApiError, ApiResponse, FilePart, RequestOptions};

const CATEGORIES: &str = "/api/v1/admin/categories";
const CATEGORY: &str = "/api/v1/admin/category";
const PRODUCTS_ALL: &str = "/api/v1/admin/products/all";
const PRODUCT: &str = "/api/v1/admin/product";
const ATTACHMENTS: &str = "/api/v1/admin/attachments";
const ATTACHMENT: &str = "/api/v1/admin/attachment";
const PUBLIC_ATTACHMENT: &str = "/api/v1/attachment";

/// Attachment listing views offered by the files page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentFilter {
    #[default]
    All,
    Active,
    Inactive,
    Linked,
    ActiveLinked,
    InactiveLinked,
    Unlinked,
    ActiveUnlinked,
    InactiveUnlinked,
}

impl AttachmentFilter {
    pub const ALL: [AttachmentFilter; 9] = [
        AttachmentFilter::All,
        AttachmentFilter::Active,
        AttachmentFilter::Inactive,
        AttachmentFilter::Linked,
        AttachmentFilter::ActiveLinked,
        AttachmentFilter::InactiveLinked,
        AttachmentFilter::Unlinked,
        AttachmentFilter::ActiveUnlinked,
        AttachmentFilter::InactiveUnlinked,
    ];

    /// Path segment after `/api/v1/admin/attachments`.
    fn suffix(&self) -> &'static str {
        match self {
            AttachmentFilter::All => "",
            AttachmentFilter::Active => "/active",
            AttachmentFilter::Inactive => "/inactive",
            AttachmentFilter::Linked => "/linked-with-product",
            AttachmentFilter::ActiveLinked => "/active-and-linked-with-product",
            AttachmentFilter::InactiveLinked => "/inactive-and-linked-with-product",
            AttachmentFilter::Unlinked => "/no-linked-with-product",
            AttachmentFilter::ActiveUnlinked => "/active-and-no-linked-with-product",
            AttachmentFilter::InactiveUnlinked => "/inactive-and-no-linked-with-product",
        }
    }

    pub fn path(&self) -> String {
        format!("{}{}", ATTACHMENTS, self.suffix())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttachmentFilter::All => "all",
            AttachmentFilter::Active => "active",
            AttachmentFilter::Inactive => "inactive",
            AttachmentFilter::Linked => "linked",
            AttachmentFilter::ActiveLinked => "active-linked",
            AttachmentFilter::InactiveLinked => "inactive-linked",
            AttachmentFilter::Unlinked => "unlinked",
            AttachmentFilter::ActiveUnlinked => "active-unlinked",
            AttachmentFilter::InactiveUnlinked => "inactive-unlinked",
        }
    }
}

impl fmt::Display for AttachmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttachmentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttachmentFilter::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = AttachmentFilter::ALL.iter().map(|f| f.name()).collect();
                format!("unknown attachment filter '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Run a request and reduce the response to JSON.
///
/// Plain-text answers (count endpoints on some deployments) come back as a
/// JSON string; an empty body becomes `null`.
async fn fetch_json(
    client: &ApiClient,
    path: &str,
    options: RequestOptions,
) -> Result<Option<Value>, ApiError> {
    let Some(resp) = client.request(path, options).await? else {
        return Ok(None);
    };
    match resp {
        ApiResponse::Json(value) => Ok(Some(value)),
        ApiResponse::Text(text) if text.is_empty() => Ok(Some(Value::Null)),
        ApiResponse::Text(text) => Ok(Some(Value::String(text))),
        ApiResponse::Binary(_) => Err(ApiError::Decode(format!(
            "{} returned a binary payload where JSON was expected",
            path
        ))),
    }
}

// ── Categories ───────────────────────────────────────────────────────

pub async fn list_categories(client: &ApiClient) -> Result<Option<Value>, ApiError> {
    fetch_json(client, CATEGORIES, RequestOptions::new()).await
}

pub async fn get_category(client: &ApiClient, id: u64) -> Result<Option<Value>, ApiError> {
    fetch_json(client, &format!("{}/{}", CATEGORY, id), RequestOptions::new()).await
}

pub async fn create_category(client: &ApiClient, payload: Value) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::POST).json(payload);
    fetch_json(client, CATEGORY, options).await
}

pub async fn update_category(
    client: &ApiClient,
    id: u64,
    payload: Value,
) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::PUT).json(payload);
    fetch_json(client, &format!("{}/{}", CATEGORY, id), options).await
}

// ── Products ─────────────────────────────────────────────────────────

pub async fn list_products(client: &ApiClient) -> Result<Option<Value>, ApiError> {
    fetch_json(client, PRODUCTS_ALL, RequestOptions::new()).await
}

pub async fn get_product(client: &ApiClient, id: u64) -> Result<Option<Value>, ApiError> {
    fetch_json(client, &format!("{}/{}", PRODUCT, id), RequestOptions::new()).await
}

pub async fn create_product(client: &ApiClient, payload: Value) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::POST).json(payload);
    fetch_json(client, PRODUCT, options).await
}

pub async fn update_product(
    client: &ApiClient,
    id: u64,
    payload: Value,
) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::PUT).json(payload);
    fetch_json(client, &format!("{}/{}", PRODUCT, id), options).await
}

// ── Attachments ──────────────────────────────────────────────────────

pub async fn list_attachments(
    client: &ApiClient,
    filter: AttachmentFilter,
) -> Result<Option<Value>, ApiError> {
    fetch_json(client, &filter.path(), RequestOptions::new()).await
}

/// GET /api/v1/admin/attachments/linked-with-product/count
pub async fn count_linked(client: &ApiClient) -> Result<Option<Value>, ApiError> {
    let path = format!("{}/count", AttachmentFilter::Linked.path());
    fetch_json(client, &path, RequestOptions::new()).await
}

/// GET /api/v1/admin/attachments/no-linked-with-product/count
pub async fn count_unlinked(client: &ApiClient) -> Result<Option<Value>, ApiError> {
    let path = format!("{}/count", AttachmentFilter::Unlinked.path());
    fetch_json(client, &path, RequestOptions::new()).await
}

/// Attachment metadata (file name, content type, size, linked product).
pub async fn get_attachment(client: &ApiClient, id: u64) -> Result<Option<Value>, ApiError> {
    fetch_json(client, &format!("{}/{}", ATTACHMENT, id), RequestOptions::new()).await
}

pub async fn activate_attachment(client: &ApiClient, id: u64) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::POST);
    fetch_json(client, &format!("{}/activate/{}", ATTACHMENT, id), options).await
}

pub async fn deactivate_attachment(client: &ApiClient, id: u64) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::POST);
    fetch_json(client, &format!("{}/deactivate/{}", ATTACHMENT, id), options).await
}

/// POST /api/v1/admin/attachment with multipart form data.
pub async fn upload_attachment(client: &ApiClient, file: FilePart) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::POST).multipart(vec![file]);
    fetch_json(client, ATTACHMENT, options).await
}

/// PUT /api/v1/admin/attachment/{id}: replace the stored file, keeping the id.
pub async fn replace_attachment(
    client: &ApiClient,
    id: u64,
    file: FilePart,
) -> Result<Option<Value>, ApiError> {
    let options = RequestOptions::new().method(Method::PUT).multipart(vec![file]);
    fetch_json(client, &format!("{}/{}", ATTACHMENT, id), options).await
}

/// Download the attachment content from the public endpoint.
pub async fn fetch_attachment(client: &ApiClient, id: u64) -> Result<Option<Vec<u8>>, ApiError> {
    let path = format!("{}/{}", PUBLIC_ATTACHMENT, id);
    match client.request(&path, RequestOptions::new()).await? {
        Some(resp) => Ok(Some(resp.into_bytes().await?)),
        None => Ok(None),
    }
}
