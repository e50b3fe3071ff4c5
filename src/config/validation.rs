//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend origin must be an absolute http(s) origin when it is needed
//! - Route table paths are well formed, unique, and include "/"
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShellConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{DeploymentConfig, Mode, PageRouteConfig, ShellConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("deployment.backend_origin is required {0}")]
    MissingBackendOrigin(&'static str),

    #[error("deployment.backend_origin '{origin}' is invalid: {reason}")]
    BackendOrigin { origin: String, reason: String },

    #[error("pages.routes is empty")]
    NoRoutes,

    #[error("route path '{0}' must start with '/'")]
    RelativeRoutePath(String),

    #[error("route path '{0}' contains reserved characters")]
    ReservedRouteChars(String),

    #[error("route path '{0}' is reserved by the shell")]
    ReservedPath(String),

    #[error("route path '{0}' is declared more than once")]
    DuplicateRoute(String),

    #[error("no route is declared for '/'")]
    MissingLandingRoute,

    #[error("route '{path}' has an invalid bundle name '{bundle}'")]
    BundleName { path: String, bundle: String },

    #[error("proxy path '{0}' must start with '/'")]
    ProxyPath(String),

    #[error("proxy prefix '{0}' overlaps a page route")]
    ProxyConflict(String),

    #[error("pages.render_timeout_ms must be greater than zero")]
    RenderTimeout,

    #[error("timeouts.{0} must be greater than zero")]
    Timeout(&'static str),
}

/// Validate a whole configuration.
pub fn validate_config(config: &ShellConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let needs_origin = if config.deployment.mode == Mode::Production && !config.deployment.same_origin {
        Some("for a cross-origin production deployment")
    } else if config.proxy.enabled {
        Some("when the proxy is enabled")
    } else {
        None
    };
    match (&config.deployment.backend_origin, needs_origin) {
        (Some(origin), _) => {
            if let Err(e) = parse_backend_origin(origin) {
                errors.push(e);
            }
        }
        (None, Some(why)) => errors.push(ValidationError::MissingBackendOrigin(why)),
        (None, None) => {}
    }

    if let Err(mut route_errors) = validate_routes(&config.pages.routes) {
        errors.append(&mut route_errors);
    }

    for path in config.proxy.prefixes.iter().chain(&config.proxy.endpoints) {
        if !path.starts_with('/') {
            errors.push(ValidationError::ProxyPath(path.clone()));
        }
    }
    for prefix in &config.proxy.prefixes {
        let trimmed = prefix.trim_end_matches('/');
        let overlaps = trimmed.is_empty()
            || config
                .pages
                .routes
                .iter()
                .any(|r| r.path == trimmed || r.path.starts_with(&format!("{}/", trimmed)));
        if overlaps {
            errors.push(ValidationError::ProxyConflict(prefix.clone()));
        }
    }

    if config.pages.render_timeout_ms == 0 {
        errors.push(ValidationError::RenderTimeout);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Timeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Timeout("request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the route table invariants: absolute, unique paths and exactly one "/".
pub fn validate_routes(routes: &[PageRouteConfig]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
        return Err(errors);
    }

    let mut seen = HashSet::new();
    for route in routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativeRoutePath(route.path.clone()));
        }
        if route.path.contains(['{', '}', '*', ':']) {
            errors.push(ValidationError::ReservedRouteChars(route.path.clone()));
        }
        if route.path == "/health" || route.path == "/_shell" || route.path.starts_with("/_shell/") {
            errors.push(ValidationError::ReservedPath(route.path.clone()));
        }
        if !seen.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.path.clone()));
        }
        let bundle_ok = !route.bundle.is_empty()
            && route
                .bundle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !bundle_ok {
            errors.push(ValidationError::BundleName {
                path: route.path.clone(),
                bundle: route.bundle.clone(),
            });
        }
    }

    if !seen.contains("/") {
        errors.push(ValidationError::MissingLandingRoute);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a backend origin: absolute http(s) URL with a host and nothing past the root.
pub fn parse_backend_origin(origin: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: &str| ValidationError::BackendOrigin {
        origin: origin.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(origin.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a path, query or fragment"));
    }
    Ok(url)
}

/// Resolve the backend origin of a deployment, if one is configured.
pub fn deployment_origin(deployment: &DeploymentConfig) -> Result<Option<Url>, ValidationError> {
    deployment
        .backend_origin
        .as_deref()
        .map(parse_backend_origin)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_routes;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&ShellConfig::default()), Ok(()));
    }

    #[test]
    fn rejects_malformed_origin() {
        let mut config = ShellConfig::default();
        config.deployment.backend_origin = Some("mediscope-2-server.onrender.com".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::BackendOrigin { .. }));
    }

    #[test]
    fn origin_must_not_have_path() {
        assert!(parse_backend_origin("https://host/api").is_err());
        assert!(parse_backend_origin("ftp://host").is_err());
        assert!(parse_backend_origin("https://host/").is_ok());
        assert!(parse_backend_origin("http://localhost:4000").is_ok());
    }

    #[test]
    fn cross_origin_production_requires_origin() {
        let mut config = ShellConfig::default();
        config.deployment.mode = Mode::Production;
        config.deployment.same_origin = false;
        config.deployment.backend_origin = None;
        config.proxy.enabled = false;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingBackendOrigin(
                "for a cross-origin production deployment"
            )]
        );
    }

    #[test]
    fn same_origin_without_proxy_needs_no_origin() {
        let mut config = ShellConfig::default();
        config.deployment.mode = Mode::Production;
        config.deployment.backend_origin = None;
        config.proxy.enabled = false;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn rejects_duplicate_and_missing_landing() {
        let routes = vec![
            PageRouteConfig::new("/login", "LoginPage"),
            PageRouteConfig::new("/login", "Other"),
            PageRouteConfig::new("signup", "SignupPage"),
        ];
        let errors = validate_routes(&routes).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateRoute("/login".into())));
        assert!(errors.contains(&ValidationError::RelativeRoutePath("signup".into())));
        assert!(errors.contains(&ValidationError::MissingLandingRoute));
    }

    #[test]
    fn proxy_prefix_cannot_shadow_pages() {
        let mut config = ShellConfig::default();
        config.proxy.prefixes.push("/login".into());
        config.proxy.prefixes.push("/".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ProxyConflict("/login".into()),
                ValidationError::ProxyConflict("/".into()),
            ]
        );
    }

    #[test]
    fn status_paths_are_reserved() {
        let mut routes = default_routes();
        routes.push(PageRouteConfig::new("/_shell/config", "Shadow"));
        let errors = validate_routes(&routes).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ReservedPath("/_shell/config".into())]);
    }

    #[test]
    fn rejects_bundle_path_traversal() {
        let mut routes = default_routes();
        routes.push(PageRouteConfig::new("/x", "../secret"));
        let errors = validate_routes(&routes).unwrap_err();
        assert!(matches!(errors[0], ValidationError::BundleName { .. }));
    }
}
