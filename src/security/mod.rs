//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarded request:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//!     → body size limit (security.max_body_size)
//!     → upstream
//! ```
//!
//! # Design Decisions
//! - Fail closed: oversized bodies are rejected with 413 before forwarding
//! - No trust in client-supplied hop-by-hop headers

pub mod headers;
