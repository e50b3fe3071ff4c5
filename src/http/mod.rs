//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace)
//!     → page route   → shell::Shell::render → HTML document
//!     → proxy route  → proxy.rs (Forwarder) → backend origin
//!     → /_shell/*    → admin handlers (JSON)
//! ```

pub mod proxy;
pub mod request;
pub mod server;

pub use proxy::Forwarder;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
