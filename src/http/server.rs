//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with page routes, proxy routes and the status surface
//! - Wire up middleware (tracing, timeout, request ID)
//! - Render routed views as HTML documents
//! - Serve until the shutdown signal fires

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderValue, Uri},
    response::{IntoResponse, Response},
    routing::{any, get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::{validation::deployment_origin, ConfigError, ShellConfig, ValidationError};
use crate::endpoint::{ClientConfig, EndpointResolver};
use crate::http::proxy::{proxy_handler, Forwarder};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::routing::RouteTable;
use crate::shell::{Shell, View};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub shell: Shell,
    pub resolver: Arc<EndpointResolver>,
    pub forwarder: Option<Arc<Forwarder>>,
    pub client_config: Arc<ClientConfig>,
    client_config_json: Arc<str>,
    pub title: Arc<str>,
    pub started_at: Instant,
}

impl AppState {
    /// Build state from a validated config and a route table.
    pub fn new(config: &ShellConfig, table: Arc<RouteTable>) -> Result<Self, ConfigError> {
        let resolver = EndpointResolver::new(&config.deployment)?;

        // Relative URLs only reach the backend if this host forwards them.
        let forwarder = if resolver.is_same_origin() && config.proxy.enabled {
            match deployment_origin(&config.deployment)? {
                Some(origin) => {
                    let forwarder = Forwarder::new(&origin, &config.proxy, &config.timeouts, &config.security)
                        .map_err(|e| ValidationError::BackendOrigin {
                            origin: origin.to_string(),
                            reason: e.to_string(),
                        })?;
                    Some(Arc::new(forwarder))
                }
                None => None,
            }
        } else {
            None
        };

        let client_config = ClientConfig::from_resolver(&resolver);
        let client_config_json: Arc<str> = serde_json::to_string(&client_config)
            .unwrap_or_else(|_| "{}".to_string())
            .into();

        Ok(Self {
            shell: Shell::new(table, Duration::from_millis(config.pages.render_timeout_ms)),
            resolver: Arc::new(resolver),
            forwarder,
            client_config: Arc::new(client_config),
            client_config_json,
            title: config.pages.title.as_str().into(),
            started_at: Instant::now(),
        })
    }

    fn document(&self, view: &View) -> Response {
        let mut response = (
            view.status(),
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            view.render_document(&self.title, &self.client_config_json),
        )
            .into_response();

        let headers = response.headers_mut();
        if view.is_fallback() {
            // Re-request once the bundle has had time to load.
            headers.insert(header::REFRESH, HeaderValue::from_static("1"));
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        } else if !matches!(view, View::Page { .. }) {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
        response
    }
}

/// HTTP server for the MediScope shell.
pub struct HttpServer {
    router: Router,
    config: ShellConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server whose bundles are read from `pages.bundle_dir`.
    pub fn new(config: ShellConfig) -> Result<Self, ConfigError> {
        let table = RouteTable::from_config(&config.pages).map_err(ConfigError::Validation)?;
        Self::with_table(config, Arc::new(table))
    }

    /// Create a server around an existing route table.
    pub fn with_table(config: ShellConfig, table: Arc<RouteTable>) -> Result<Self, ConfigError> {
        let state = AppState::new(&config, table)?;
        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, config, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ShellConfig, state: AppState) -> Router {
        let proxied = state.forwarder.is_some();
        let mut router = Router::new();

        for entry in state.shell.table().entries() {
            let mut methods: MethodRouter<AppState> = get(page_handler);
            if proxied && config.proxy.endpoints.iter().any(|p| p == entry.path()) {
                methods = methods.fallback(proxy_handler);
            }
            router = router.route(entry.path(), methods);
        }

        if proxied {
            let prefixes: BTreeSet<&str> = config
                .proxy
                .prefixes
                .iter()
                .map(|p| p.trim_end_matches('/'))
                .collect();
            let endpoints: BTreeSet<&str> = config.proxy.endpoints.iter().map(String::as_str).collect();

            for endpoint in endpoints {
                let covered = prefixes
                    .iter()
                    .any(|p| endpoint == *p || endpoint.starts_with(&format!("{}/", p)));
                if !covered && state.shell.table().match_path(endpoint).is_none() {
                    router = router.route(endpoint, any(proxy_handler));
                }
            }
            for prefix in prefixes {
                router = router
                    .route(prefix, any(proxy_handler))
                    .route(&format!("{}/{{*rest}}", prefix), any(proxy_handler));
            }
        }

        router
            .route("/health", get(|| async { "ok" }))
            .merge(setup_admin_router())
            .fallback(not_found_handler)
            .with_state(state)
            .layer(propagate_request_id_layer())
            // Outlives the upstream timeout so the proxy can answer 504 first.
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs + config.timeouts.connect_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = self.state.resolver.mode().as_str(),
            same_origin = self.state.resolver.is_same_origin(),
            proxy = self.state.forwarder.is_some(),
            routes = self.state.shell.table().len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The router without a listener, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Render the routed page, the fallback, or the load-failure view.
async fn page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let view = state.shell.render(uri.path()).await;
    tracing::debug!(path = uri.path(), view = view.kind(), "Rendered view");
    state.document(&view)
}

async fn not_found_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let view = state.shell.render(uri.path()).await;
    state.document(&view)
}
