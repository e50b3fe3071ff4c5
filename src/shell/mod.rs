//! Application shell subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP request (path)
//!     → render.rs (Shell::render: cached page, bounded wait, or fallback)
//!     → view.rs (View → HTML document)
//!
//! Client navigation (path)
//!     → session.rs (Session::navigate: Fallback → Page | LoadFailed | NotFound)
//!     → watch channel of visible views
//! ```
//!
//! # Design Decisions
//! - Loader errors never escape the shell; they become `LoadFailed`
//! - Undeclared paths get an explicit `NotFound` view
//! - A navigation that is overtaken by a newer one publishes nothing

pub mod render;
pub mod session;
pub mod view;

pub use render::Shell;
pub use session::{Outcome, Session};
pub use view::{View, LOADING_LABEL};
