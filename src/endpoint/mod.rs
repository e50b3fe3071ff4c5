//! Endpoint resolution subsystem.
//!
//! # Data Flow
//! ```text
//! DeploymentConfig (mode, backend_origin, same_origin)
//!     → resolver.rs (EndpointResolver::new, validated once)
//!     → resolve("login") → "/login" | "https://host/login"
//!     → socket_url()     → "/"      | "https://host"
//!     → client_config.rs (resolved table served to page bundles)
//! ```

pub mod client_config;
pub mod resolver;

pub use client_config::ClientConfig;
pub use resolver::{normalize, Endpoint, EndpointResolver, Origin};
