//! # tokenrelay HTTP Server Module
//!
//! Axum server exposing the notification core.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `{prefix}/stream/{token}` - Subscribe (Server-Sent Events)
//! - `{prefix}/verify/{token}` - Publish trigger
//! - `{prefix}/status/{token}` - Verification status
//! - `/observability/*` - Metrics and live subscription count

pub mod config;
pub mod observability_routes;
pub mod realtime_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use realtime_routes::VERIFY_ACK;
pub use server::HttpServer;
