//! Endpoint resolution.
//!
//! # Responsibilities
//! - Normalize a logical endpoint (no leading slash)
//! - Compose a relative URL in same-origin deployments
//! - Compose `<base>/<endpoint>` in cross-origin deployments
//! - Expose the base origin for real-time channel setup
//!
//! # Design Decisions
//! - Resolution is a total function over strings: no errors, no I/O
//! - All validation happens in the constructor, from injected config
//! - The mode branch is explicit: development and same-origin production are
//!   relative, cross-origin production is absolute

use url::Url;

use crate::config::validation::{deployment_origin, ValidationError};
use crate::config::{DeploymentConfig, Mode};

/// Logical backend operations consumed by the page bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Signup,
    Login,
    Process,
    /// A path inside the `api` namespace, e.g. `Api("chat".into())` → `api/chat`.
    Api(String),
}

impl Endpoint {
    /// Logical path of the endpoint, without a leading slash.
    pub fn as_path(&self) -> String {
        match self {
            Endpoint::Signup => "signup".to_string(),
            Endpoint::Login => "login".to_string(),
            Endpoint::Process => "process".to_string(),
            Endpoint::Api(rest) => {
                let rest = normalize(rest);
                if rest.is_empty() {
                    "api".to_string()
                } else {
                    format!("api/{}", rest)
                }
            }
        }
    }
}

/// Where the backend is reached from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Client and backend share a host; URLs are relative.
    SameOrigin,
    /// Backend lives on another host; URLs are absolute.
    CrossOrigin(Url),
}

/// Strip leading slashes so a descriptor never starts with `/`.
pub fn normalize(endpoint: &str) -> &str {
    endpoint.trim_start_matches('/')
}

/// Maps logical endpoints to callable URLs for one deployment.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    mode: Mode,
    origin: Origin,
    /// Base without a trailing slash; `None` when same-origin.
    base: Option<String>,
}

impl EndpointResolver {
    /// Build a resolver from the deployment section of the configuration.
    pub fn new(deployment: &DeploymentConfig) -> Result<Self, ValidationError> {
        let origin = match (deployment.mode, deployment.same_origin) {
            (Mode::Development, _) | (Mode::Production, true) => Origin::SameOrigin,
            (Mode::Production, false) => match deployment_origin(deployment)? {
                Some(url) => Origin::CrossOrigin(url),
                None => {
                    return Err(ValidationError::MissingBackendOrigin(
                        "for a cross-origin production deployment",
                    ))
                }
            },
        };
        Ok(Self::with_origin(deployment.mode, origin))
    }

    /// Build a resolver for an explicit origin.
    pub fn with_origin(mode: Mode, origin: Origin) -> Self {
        let base = match &origin {
            Origin::SameOrigin => None,
            Origin::CrossOrigin(url) => Some(url.as_str().trim_end_matches('/').to_string()),
        };
        Self { mode, origin, base }
    }

    /// Same-origin resolver, as used behind the development proxy.
    pub fn same_origin() -> Self {
        Self::with_origin(Mode::Development, Origin::SameOrigin)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_same_origin(&self) -> bool {
        self.base.is_none()
    }

    /// Resolve a logical endpoint (with or without a leading slash) to a URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        let clean = normalize(endpoint);
        match &self.base {
            None => format!("/{}", clean),
            Some(base) => format!("{}/{}", base, clean),
        }
    }

    /// Resolve one of the known backend operations.
    pub fn resolve_endpoint(&self, endpoint: &Endpoint) -> String {
        self.resolve(&endpoint.as_path())
    }

    /// Base for the real-time channel: the raw origin, or "/" when same-origin.
    pub fn socket_url(&self) -> &str {
        self.base.as_deref().unwrap_or("/")
    }
}
