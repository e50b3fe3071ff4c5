//! Runtime configuration handed to page bundles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::endpoint::resolver::{Endpoint, EndpointResolver};

/// What a bundle needs to reach the backend, resolved for this deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub mode: String,
    pub same_origin: bool,
    /// `resolve("")`: "/" or "<base>/".
    pub api_base: String,
    /// Base for the real-time channel.
    pub socket_url: String,
    /// Logical endpoint name → URL.
    pub endpoints: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn from_resolver(resolver: &EndpointResolver) -> Self {
        let endpoints = [
            ("signup", Endpoint::Signup),
            ("login", Endpoint::Login),
            ("process", Endpoint::Process),
            ("api", Endpoint::Api(String::new())),
        ]
        .into_iter()
        .map(|(name, endpoint)| (name.to_string(), resolver.resolve_endpoint(&endpoint)))
        .collect();

        Self {
            mode: resolver.mode().as_str().to_string(),
            same_origin: resolver.is_same_origin(),
            api_base: resolver.resolve(""),
            socket_url: resolver.socket_url().to_string(),
            endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::endpoint::Origin;
    use url::Url;

    #[test]
    fn cross_origin_config() {
        let resolver = EndpointResolver::with_origin(
            Mode::Production,
            Origin::CrossOrigin(Url::parse("https://mediscope-2-server.onrender.com").unwrap()),
        );
        let config = ClientConfig::from_resolver(&resolver);

        assert_eq!(config.mode, "production");
        assert!(!config.same_origin);
        assert_eq!(config.api_base, "https://mediscope-2-server.onrender.com/");
        assert_eq!(config.socket_url, "https://mediscope-2-server.onrender.com");
        assert_eq!(config.endpoints["login"], "https://mediscope-2-server.onrender.com/login");
        assert_eq!(config.endpoints["api"], "https://mediscope-2-server.onrender.com/api");
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ClientConfig::from_resolver(&EndpointResolver::same_origin())).unwrap();
        assert_eq!(json["apiBase"], "/");
        assert_eq!(json["socketUrl"], "/");
        assert_eq!(json["endpoints"]["process"], "/process");
    }
}
