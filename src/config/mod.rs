//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! mediscope.toml
//!     → loader.rs (parse & deserialize)
//!     → MEDISCOPE_* environment overrides
//!     → validation.rs (semantic checks)
//!     → ShellConfig (validated, immutable)
//!     → injected into EndpointResolver, RouteTable, HttpServer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is static for the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any validation failure blocks startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DeploymentConfig, ListenerConfig, LogFormat, Mode, ObservabilityConfig, PageRouteConfig,
    PagesConfig, ProxyConfig, SecurityConfig, ShellConfig, TimeoutConfig,
};
pub use validation::ValidationError;
