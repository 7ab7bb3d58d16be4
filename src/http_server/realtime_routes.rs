//! Realtime HTTP Routes and SSE Handler
//!
//! Endpoints for the token flow: subscribe over Server-Sent Events, trigger
//! a publish, and query verification status.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::realtime::{RealtimeError, SubscriptionRegistry, VerificationStatus};

/// Acknowledgment returned by the publish trigger, hit or miss
pub const VERIFY_ACK: &str = "Verification done. You may close this window.";

// ==================
// Shared State
// ==================

/// Realtime state shared across handlers
pub struct RealtimeState {
    pub registry: SubscriptionRegistry,
    pub keep_alive: Duration,
    /// Cancelled when the server begins shutting down; ends every open stream
    pub shutdown: CancellationToken,
}

impl RealtimeState {
    pub fn new(
        registry: SubscriptionRegistry,
        keep_alive: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            registry,
            keep_alive,
            shutdown,
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: VerificationStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for RealtimeError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_client_error() {
            debug!(code = self.code(), error = %self, "request rejected");
        } else {
            error!(code = self.code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

// ==================
// Realtime Routes
// ==================

/// Create token routes (nested under the configured prefix)
pub fn realtime_routes(state: Arc<RealtimeState>) -> Router {
    Router::new()
        .route("/stream/", get(missing_token_handler))
        .route("/stream/:token", get(stream_handler))
        .route("/verify/:token", get(verify_handler))
        .route("/status/:token", get(status_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

/// Open an SSE stream for a token
///
/// The stream stays open until the peer disconnects or the server shuts
/// down; either way the response body is dropped, which drops the channel
/// handle and frees the registry entry.
async fn stream_handler(
    State(state): State<Arc<RealtimeState>>,
    Path(token): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, RealtimeError> {
    let handle = state.registry.open(&token)?;

    // An evicted channel ends its notification stream; keep the response
    // open and idle so the peer sees no synthesized close.
    let events = handle
        .map(|notification| Ok::<_, Infallible>(SseEvent::default().data(notification.sse_data())))
        .chain(stream::pending())
        .take_until(state.shutdown.clone().cancelled_owned());

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive)))
}

async fn missing_token_handler() -> RealtimeError {
    RealtimeError::InvalidInput("Missing token".into())
}

/// Publish trigger
///
/// The response never reveals whether a subscriber was present.
async fn verify_handler(
    State(state): State<Arc<RealtimeState>>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    state.registry.publish(&token);
    (StatusCode::OK, VERIFY_ACK)
}

/// Verification status for a token
async fn status_handler(
    State(state): State<Arc<RealtimeState>>,
    Path(token): Path<String>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: state.registry.status(&token),
    })
}
