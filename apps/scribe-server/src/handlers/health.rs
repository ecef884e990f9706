//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use scribe_core::ports::PostScope;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Whether the post store answered a count query.
    pub store: bool,
}

/// Health check endpoint - returns server status.
///
/// GET /health/
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store = match state.posts.count(PostScope::Published { tag_id: None }).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Health check: post store unavailable: {}", e);
            false
        }
    };

    let response = HealthResponse {
        status: if store { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        store,
    };

    if store {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
