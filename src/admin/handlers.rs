use axum::{extract::State, Json};
use serde::Serialize;

use crate::endpoint::ClientConfig;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub mode: &'static str,
    pub same_origin: bool,
    pub proxy_enabled: bool,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct RouteStatus {
    pub path: String,
    pub bundle: String,
    pub loaded: bool,
    pub load_attempts: u64,
    pub bytes: Option<usize>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        mode: state.resolver.mode().as_str(),
        same_origin: state.resolver.is_same_origin(),
        proxy_enabled: state.forwarder.is_some(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteStatus>> {
    let routes = state
        .shell
        .table()
        .entries()
        .iter()
        .map(|entry| {
            let cached = entry.cached();
            RouteStatus {
                path: entry.path().to_string(),
                bundle: entry.bundle().to_string(),
                loaded: cached.is_some(),
                load_attempts: entry.load_attempts(),
                bytes: cached.map(|b| b.size()),
            }
        })
        .collect();

    Json(routes)
}

pub async fn get_client_config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.client_config.as_ref().clone())
}
