//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shell.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the MediScope shell.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Deployment mode and backend location.
    pub deployment: DeploymentConfig,

    /// Route table and page bundle settings.
    pub pages: PagesConfig,

    /// Forwarding of backend traffic in same-origin deployments.
    pub proxy: ProxyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5173").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5173".to_string(),
        }
    }
}

/// Build mode of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local development: the browser only ever talks to the shell.
    #[default]
    Development,
    /// Hosted build.
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// Where the backend lives relative to the shell.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Development or production.
    pub mode: Mode,

    /// Fully qualified backend origin, e.g. "https://mediscope-2-server.onrender.com".
    pub backend_origin: Option<String>,

    /// In production, whether the backend is served from the same host as the shell.
    pub same_origin: bool,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            backend_origin: Some("http://localhost:4000".to_string()),
            same_origin: true,
        }
    }
}

/// Page route table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Directory holding `<bundle>.html` fragments.
    pub bundle_dir: String,

    /// How long a request waits for a pending bundle before the fallback is served.
    pub render_timeout_ms: u64,

    /// Document title.
    pub title: String,

    /// Ordered route entries.
    pub routes: Vec<PageRouteConfig>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            bundle_dir: "dist/pages".to_string(),
            render_timeout_ms: 150,
            title: "MediScope".to_string(),
            routes: default_routes(),
        }
    }
}

/// A single `(path, bundle)` route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRouteConfig {
    /// Exact URL path (e.g. "/login").
    pub path: String,

    /// Bundle name, resolved to `<bundle_dir>/<bundle>.html`.
    pub bundle: String,
}

impl PageRouteConfig {
    pub fn new(path: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bundle: bundle.into(),
        }
    }
}

/// The four MediScope views.
pub fn default_routes() -> Vec<PageRouteConfig> {
    vec![
        PageRouteConfig::new("/", "LandingPage"),
        PageRouteConfig::new("/signup", "SignupPage"),
        PageRouteConfig::new("/login", "LoginPage"),
        PageRouteConfig::new("/ChatInterface", "AIChatInterface"),
    ]
}

/// Backend forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Forward backend traffic when the resolver hands out relative URLs.
    pub enabled: bool,

    /// Path prefixes forwarded for every method.
    pub prefixes: Vec<String>,

    /// Exact paths forwarded for non-GET methods only (they share a path with a page).
    pub endpoints: Vec<String>,

    /// Rewrite the Host header to the backend's authority.
    pub change_origin: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefixes: vec!["/process".to_string(), "/api".to_string()],
            endpoints: vec!["/signup".to_string(), "/login".to_string()],
            change_origin: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout to the backend in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Pretty for development, JSON for log shipping.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "mediscope_shell=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum forwarded body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            // Lab and x-ray uploads go through /process.
            max_body_size: 16 * 1024 * 1024,
        }
    }
}
