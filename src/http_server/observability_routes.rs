//! Observability HTTP Routes
//!
//! Health check, counters and the live subscription count. Tokens are never
//! listed: knowing a token is enough to trigger its publish.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::observability::MetricsSnapshot;
use crate::realtime::SubscriptionRegistry;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionCountResponse {
    pub total: usize,
}

/// Create observability routes
pub fn observability_routes(registry: SubscriptionRegistry) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/subscriptions", get(subscriptions_handler))
        .with_state(registry)
}

/// Health check route (also available at root /health)
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Metrics handler - returns counters as JSON
async fn metrics_handler(
    State(registry): State<SubscriptionRegistry>,
) -> Json<MetricsSnapshot> {
    Json(registry.metrics().snapshot())
}

/// Count live subscriptions
async fn subscriptions_handler(
    State(registry): State<SubscriptionRegistry>,
) -> Json<SubscriptionCountResponse> {
    Json(SubscriptionCountResponse {
        total: registry.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
    }
}
