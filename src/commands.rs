//! Command handlers for the admin console.
//!
//! Each subcommand maps onto one page action of the admin dashboard. Results
//! are printed as pretty JSON on stdout. A lost session is reported as an
//! error telling the user to log in again.

use std::path::Path;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use shop_admin::api::admin::{self, AttachmentFilter};
use shop_admin::api::dashboard as stats;
use shop_admin::api::{auth, ApiClient, ApiResponse, FilePart, RequestOptions};
use shop_admin::RefreshOutcome;

/// Fallback source for the login password.
const ENV_PASSWORD: &str = "SHOP_ADMIN_PASSWORD";

const NOT_LOGGED_IN: &str = "Not logged in. Run `shop-admin login` first.";

pub async fn login(client: &ApiClient, email: &str, password: Option<String>) -> Result<(), String> {
    let password = password
        .or_else(|| std::env::var(ENV_PASSWORD).ok())
        .ok_or_else(|| format!("--password or {} is required", ENV_PASSWORD))?;

    auth::login(client, email, &password)
        .await
        .map_err(|e| e.to_string())?;

    println!("Logged in as {}", email.trim());
    Ok(())
}

pub fn logout(client: &ApiClient) -> Result<(), String> {
    auth::logout(&**client.store()).map_err(|e| format!("Logout failed: {}", e))?;
    println!("Logged out");
    Ok(())
}

pub fn status(client: &ApiClient) -> Result<(), String> {
    let logged_in = auth::is_logged_in(&**client.store()).map_err(|e| e.to_string())?;
    if logged_in {
        println!("Session stored for {}", client.base_url());
    } else {
        println!("{}", NOT_LOGGED_IN);
    }
    Ok(())
}

pub async fn refresh(client: &ApiClient) -> Result<(), String> {
    let outcome = client
        .refresh_token()
        .await
        .map_err(|e| format!("Token refresh failed: {}", e))?;

    match outcome {
        RefreshOutcome::Refreshed => {
            println!("Access token refreshed");
            Ok(())
        }
        RefreshOutcome::MissingRefreshToken => Err(NOT_LOGGED_IN.to_string()),
        RefreshOutcome::Rejected(status) => Err(format!("Refresh token rejected ({})", status)),
        RefreshOutcome::Failed => Err("Token refresh failed, session cleared".to_string()),
    }
}

pub async fn dashboard(client: &ApiClient) -> Result<(), String> {
    require_session(client)?;
    print_json(&logged_in(stats::load_dashboard(client).await)?)
}

pub async fn categories(client: &ApiClient, id: Option<u64>) -> Result<(), String> {
    let result = match id {
        Some(id) => admin::get_category(client, id).await,
        None => admin::list_categories(client).await,
    };
    let value = result.map_err(|e| format!("Failed to load categories: {}", e))?;
    print_json(&logged_in(value)?)
}

pub async fn save_category(client: &ApiClient, id: Option<u64>, raw: &str) -> Result<(), String> {
    let payload = parse_payload(raw)?;
    let result = match id {
        Some(id) => admin::update_category(client, id, payload).await,
        None => admin::create_category(client, payload).await,
    };
    let value = result.map_err(|e| format!("Failed to save category: {}", e))?;
    print_json(&logged_in(value)?)
}

pub async fn products(client: &ApiClient, id: Option<u64>) -> Result<(), String> {
    let result = match id {
        Some(id) => admin::get_product(client, id).await,
        None => admin::list_products(client).await,
    };
    let value = result.map_err(|e| format!("Failed to load products: {}", e))?;
    print_json(&logged_in(value)?)
}

pub async fn save_product(client: &ApiClient, id: Option<u64>, raw: &str) -> Result<(), String> {
    let payload = parse_payload(raw)?;
    let result = match id {
        Some(id) => admin::update_product(client, id, payload).await,
        None => admin::create_product(client, payload).await,
    };
    let value = result.map_err(|e| format!("Failed to save product: {}", e))?;
    print_json(&logged_in(value)?)
}

pub async fn attachments(client: &ApiClient, filter: AttachmentFilter) -> Result<(), String> {
    let value = admin::list_attachments(client, filter)
        .await
        .map_err(|e| format!("Failed to load {} attachments: {}", filter, e))?;
    print_json(&logged_in(value)?)
}

pub async fn attachment_stats(client: &ApiClient) -> Result<(), String> {
    require_session(client)?;
    print_json(&logged_in(stats::load_attachment_stats(client).await)?)
}

pub async fn attachment(client: &ApiClient, id: u64) -> Result<(), String> {
    let value = admin::get_attachment(client, id)
        .await
        .map_err(|e| format!("Failed to load attachment {}: {}", id, e))?;
    print_json(&logged_in(value)?)
}

pub async fn upload(
    client: &ApiClient,
    file: &Path,
    replace: Option<u64>,
    mime: &str,
) -> Result<(), String> {
    let data = std::fs::read(file).map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    let name = upload_file_name(file);
    log::info!("Uploading {} ({} bytes)", name, data.len());

    let part = FilePart::file(&name, mime, data);
    let result = match replace {
        Some(id) => admin::replace_attachment(client, id, part).await,
        None => admin::upload_attachment(client, part).await,
    };
    let value = result.map_err(|e| format!("Upload failed: {}", e))?;
    print_json(&logged_in(value)?)
}

pub async fn download(client: &ApiClient, id: u64, out: &Path) -> Result<(), String> {
    let bytes = admin::fetch_attachment(client, id)
        .await
        .map_err(|e| format!("Download failed: {}", e))?;
    let bytes = logged_in(bytes)?;

    std::fs::write(out, &bytes).map_err(|e| format!("Failed to write {}: {}", out.display(), e))?;
    println!("Saved {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

pub async fn set_active(client: &ApiClient, id: u64, active: bool) -> Result<(), String> {
    let result = if active {
        admin::activate_attachment(client, id).await
    } else {
        admin::deactivate_attachment(client, id).await
    };
    let value = result.map_err(|e| format!("Failed to update attachment {}: {}", id, e))?;
    print_json(&logged_in(value)?)
}

pub async fn raw_request(
    client: &ApiClient,
    path: &str,
    method: Option<&str>,
    data: Option<&str>,
) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("Path must start with '/': {}", path));
    }

    let mut options = RequestOptions::new();
    if let Some(raw) = method {
        options = options.method(parse_method(raw)?);
    }
    if let Some(raw) = data {
        options = options.json(parse_payload(raw)?);
    }

    let resp = client.request(path, options).await.map_err(|e| e.to_string())?;
    match logged_in(resp)? {
        ApiResponse::Json(value) => print_json(&value),
        ApiResponse::Text(text) => {
            println!("{}", text);
            Ok(())
        }
        ApiResponse::Binary(raw) => {
            let bytes = raw.bytes().await.map_err(|e| e.to_string())?;
            println!("<binary response, {} bytes>", bytes.len());
            Ok(())
        }
    }
}

/// Aggregate views never redirect on their own; check the session up front.
fn require_session(client: &ApiClient) -> Result<(), String> {
    match auth::is_logged_in(&**client.store()) {
        Ok(true) => Ok(()),
        Ok(false) => Err(NOT_LOGGED_IN.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn logged_in<T>(result: Option<T>) -> Result<T, String> {
    result.ok_or_else(|| NOT_LOGGED_IN.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn parse_method(raw: &str) -> Result<Method, String> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("Invalid HTTP method: {}", raw))
}

/// Payloads must be JSON objects.
fn parse_payload(raw: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("Invalid JSON payload: {}", e))?;
    if !value.is_object() {
        return Err("JSON payload must be an object".to_string());
    }
    Ok(value)
}

fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
