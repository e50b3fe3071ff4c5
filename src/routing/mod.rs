//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation (path)
//!     → table.rs (exact-path lookup)
//!     → RouteEntry (cached bundle, or start loader.rs)
//!     → Return: bundle, RouteLoadError, or NoMatch
//!
//! Route Compilation (at startup):
//!     PageRouteConfig[]
//!     → Validate (unique paths, "/" declared)
//!     → One FileLoader per entry
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact matching only, no nested or catch-all routes
//! - A bundle is fetched at most once per process

pub mod loader;
pub mod table;

pub use loader::{FileLoader, FnLoader, PageBundle, PageLoader, RouteLoadError};
pub use table::{RouteEntry, RouteTable};
