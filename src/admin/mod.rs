//! Shell status surface.
//!
//! Read-only JSON endpoints used by `shell-cli` and by page bundles:
//! - `GET /_shell/status`  version, mode, uptime
//! - `GET /_shell/routes`  route table with bundle cache state
//! - `GET /_shell/config`  resolved endpoints for this deployment

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router() -> Router<AppState> {
    Router::new()
        .route("/_shell/status", get(get_status))
        .route("/_shell/routes", get(get_routes))
        .route("/_shell/config", get(get_client_config))
}
