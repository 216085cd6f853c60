//! Aggregate loads for the dashboard and files landing pages.
//!
//! Loads run concurrently. A failing card is logged and shown as zero so one
//! broken endpoint does not blank the whole page. A session lost during the
//! load yields `None` instead of a page of zeros.

use serde_json::Value;

use super::admin::{self, AttachmentFilter};
use super::client::{ApiClient, ApiError};
use super::types::{AttachmentStats, DashboardStats};

/// Interpret a listing or count payload as a number.
///
/// Arrays count their elements; numbers and numeric strings are taken as-is.
pub fn value_as_count(value: &Value) -> u64 {
    match value {
        Value::Array(items) => items.len() as u64,
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn card(label: &str, result: Result<Option<Value>, ApiError>) -> Option<u64> {
    match result {
        Ok(Some(value)) => Some(value_as_count(&value)),
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to load {}: {}", label, e);
            Some(0)
        }
    }
}

pub async fn load_dashboard(client: &ApiClient) -> Option<DashboardStats> {
    let (categories, products, attachments) = tokio::join!(
        admin::list_categories(client),
        admin::list_products(client),
        admin::list_attachments(client, AttachmentFilter::All),
    );

    Some(DashboardStats {
        categories: card("categories", categories)?,
        products: card("products", products)?,
        attachments: card("attachments", attachments)?,
    })
}

pub async fn load_attachment_stats(client: &ApiClient) -> Option<AttachmentStats> {
    let (total, active, inactive, unlinked, linked) = tokio::join!(
        admin::list_attachments(client, AttachmentFilter::All),
        admin::list_attachments(client, AttachmentFilter::Active),
        admin::list_attachments(client, AttachmentFilter::Inactive),
        admin::count_unlinked(client),
        admin::count_linked(client),
    );

    Some(AttachmentStats {
        total: card("attachments", total)?,
        active: card("active attachments", active)?,
        inactive: card("inactive attachments", inactive)?,
        unlinked: card("unlinked attachment count", unlinked)?,
        linked: card("linked attachment count", linked)?,
    })
}
