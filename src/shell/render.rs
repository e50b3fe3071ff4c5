//! Request-time rendering of routed views.
//!
//! # Responsibilities
//! - Resolve a request path to a view
//! - Wait a bounded time for a pending bundle, then fall back
//! - Keep the load running after the fallback is served so the cache fills
//! - Convert loader failures to `LoadFailed` instead of propagating them

use std::sync::Arc;
use std::time::Duration;

use crate::observability::metrics;
use crate::routing::{RouteLoadError, RouteTable};
use crate::shell::session::Session;
use crate::shell::view::View;

/// The application shell: route table plus fallback policy.
#[derive(Debug, Clone)]
pub struct Shell {
    table: Arc<RouteTable>,
    render_timeout: Duration,
}

impl Shell {
    pub fn new(table: Arc<RouteTable>, render_timeout: Duration) -> Self {
        Self { table, render_timeout }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// A fresh navigator sharing this shell's bundle cache.
    pub fn session(&self) -> Session {
        Session::new(self.table.clone())
    }

    /// Render the view for `path`.
    pub async fn render(&self, path: &str) -> View {
        let view = self.resolve(path).await;
        metrics::record_page_render(view.kind());
        view
    }

    async fn resolve(&self, path: &str) -> View {
        let Some(entry) = self.table.match_path(path) else {
            tracing::debug!(path, "No route declared");
            return View::NotFound { path: path.to_string() };
        };

        if let Some(bundle) = entry.cached() {
            return View::Page { path: path.to_string(), bundle };
        }

        let loading = entry.clone();
        let mut handle = tokio::spawn(async move { loading.load().await });

        match tokio::time::timeout(self.render_timeout, &mut handle).await {
            Ok(Ok(Ok(bundle))) => View::Page { path: path.to_string(), bundle },
            Ok(Ok(Err(e))) => View::LoadFailed {
                path: path.to_string(),
                message: e.to_string(),
            },
            Ok(Err(join_error)) => {
                tracing::error!(path, error = %join_error, "Bundle load task failed");
                View::LoadFailed {
                    path: path.to_string(),
                    message: RouteLoadError::Interrupted(entry.bundle().to_string()).to_string(),
                }
            }
            Err(_) => {
                tracing::debug!(
                    path,
                    timeout_ms = self.render_timeout.as_millis() as u64,
                    "Bundle still loading, serving fallback"
                );
                View::Fallback { path: path.to_string() }
            }
        }
    }
}
