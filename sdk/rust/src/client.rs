//! Client for a running MediScope shell.

use std::collections::BTreeMap;

use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("shell returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Endpoint table as served at `/_shell/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub mode: String,
    pub same_origin: bool,
    pub api_base: String,
    pub socket_url: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShellStatus {
    pub version: String,
    pub status: String,
    pub mode: String,
    pub same_origin: bool,
    pub proxy_enabled: bool,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteStatus {
    pub path: String,
    pub bundle: String,
    pub loaded: bool,
    pub load_attempts: u64,
    pub bytes: Option<usize>,
}

/// A rendered shell document.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    /// Set when the shell served the loading fallback and asked for a reload.
    pub refresh: bool,
    pub html: String,
}

impl Page {
    /// The `data-view` attribute of the root element.
    pub fn view(&self) -> Option<&str> {
        let start = self.html.find("data-view=\"")? + "data-view=\"".len();
        let end = self.html[start..].find('"')?;
        Some(&self.html[start..start + end])
    }
}

pub struct ShellClient {
    client: Client,
    base_url: String,
}

impl ShellClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the resolved endpoint table.
    pub async fn client_config(&self) -> Result<ClientConfig, ClientError> {
        self.get_json("/_shell/config").await
    }

    pub async fn status(&self) -> Result<ShellStatus, ClientError> {
        self.get_json("/_shell/status").await
    }

    pub async fn routes(&self) -> Result<Vec<RouteStatus>, ClientError> {
        self.get_json("/_shell/routes").await
    }

    /// Fetch a page document. Non-2xx documents (404, 503) are returned, not errors.
    pub async fn page(&self, path: &str) -> Result<Page, ClientError> {
        let resp = self.client.get(format!("{}{}", self.base_url, path)).send().await?;
        let status = resp.status();
        let refresh = resp.headers().contains_key(header::REFRESH);
        let html = resp.text().await?;
        Ok(Page { status, refresh, html })
    }

    /// Fetch a page, following the fallback refresh until the page settles.
    pub async fn page_settled(&self, path: &str, attempts: usize) -> Result<Page, ClientError> {
        let mut page = self.page(path).await?;
        for _ in 1..attempts {
            if !page.refresh {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            page = self.page(path).await?;
        }
        Ok(page)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.client.get(format!("{}{}", self.base_url, path)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(resp.json().await?)
    }
}
