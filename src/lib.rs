//! tokenrelay - correlate an out-of-band action with a waiting browser session
//!
//! A browser subscribes to a Server-Sent Events stream for an opaque token;
//! a later request carrying the same token pushes one `verified` signal to it.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod realtime;
