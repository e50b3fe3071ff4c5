//! Backend forwarding for same-origin deployments.
//!
//! # Responsibilities
//! - Forward `/process`, `/api/...` and endpoint POSTs to the backend origin
//! - Rewrite `Host` to the backend authority when `change_origin` is set
//! - Map upstream failures to 502 and upstream timeouts to 504
//!
//! # Design Decisions
//! - Request bodies are buffered up to `security.max_body_size` (413 above it)
//! - Response bodies are streamed back without buffering
//! - No retries: backend operations (login, signup, process) are not idempotent

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::config::{ProxyConfig, SecurityConfig, TimeoutConfig};
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::headers::{add_forwarded, strip_hop_by_hop};

/// Forwards requests to a single backend origin.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    base: String,
    change_origin: bool,
    max_body_size: usize,
}

impl Forwarder {
    pub fn new(
        origin: &Url,
        proxy: &ProxyConfig,
        timeouts: &TimeoutConfig,
        security: &SecurityConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base: origin.as_str().trim_end_matches('/').to_string(),
            change_origin: proxy.change_origin,
            max_body_size: security.max_body_size,
        })
    }

    /// Upstream URL for a request path and query.
    pub fn target(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    /// Forward one request and stream the response back.
    pub async fn forward(&self, client_addr: SocketAddr, request: Request<Body>) -> Response {
        let start = Instant::now();
        let request_id = request.request_id().to_string();
        let method = request.method().clone();
        let path_and_query = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let target = self.target(&path_and_query);

        let (parts, body) = request.into_parts();
        let body = match axum::body::to_bytes(body, self.max_body_size).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, limit = self.max_body_size, "Request body rejected");
                metrics::record_proxy_request(method.as_str(), 413, start);
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        };

        let mut headers = parts.headers;
        let original_host = headers.get(header::HOST).cloned();
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);
        if self.change_origin {
            headers.remove(header::HOST);
        }
        add_forwarded(&mut headers, client_addr.ip(), original_host.as_ref());

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            target = %target,
            "Forwarding to backend"
        );

        let upstream = self
            .client
            .request(method.clone(), &target)
            .headers(headers)
            .body(body)
            .send()
            .await;

        match upstream {
            Ok(response) => {
                let status = response.status();
                metrics::record_proxy_request(method.as_str(), status.as_u16(), start);
                tracing::debug!(
                    request_id = %request_id,
                    status = %status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Backend responded"
                );

                let mut builder = Response::builder().status(status);
                if let Some(out) = builder.headers_mut() {
                    out.extend(response.headers().clone());
                    strip_hop_by_hop(out);
                }
                match builder.body(Body::from_stream(response.bytes_stream())) {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::error!(request_id = %request_id, error = %e, "Failed to build proxied response");
                        (StatusCode::BAD_GATEWAY, "Invalid upstream response").into_response()
                    }
                }
            }
            Err(e) if e.is_timeout() => {
                tracing::error!(request_id = %request_id, target = %target, error = %e, "Backend timed out");
                metrics::record_proxy_request(method.as_str(), 504, start);
                (StatusCode::GATEWAY_TIMEOUT, "Backend timed out").into_response()
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, target = %target, error = %e, "Upstream error");
                metrics::record_proxy_request(method.as_str(), 502, start);
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

/// Axum handler for every forwarded route.
pub async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    match &state.forwarder {
        Some(forwarder) => forwarder.forward(addr, request).await,
        None => {
            let mut response = (StatusCode::NOT_FOUND, "Backend is not proxied in this deployment").into_response();
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_joins_origin_and_path() {
        let origin = Url::parse("https://mediscope-2-server.onrender.com").unwrap();
        let forwarder = Forwarder::new(
            &origin,
            &ProxyConfig::default(),
            &TimeoutConfig::default(),
            &SecurityConfig::default(),
        )
        .unwrap();

        assert_eq!(
            forwarder.target("/api/chat?stream=1"),
            "https://mediscope-2-server.onrender.com/api/chat?stream=1"
        );
        assert_eq!(forwarder.target("/process"), "https://mediscope-2-server.onrender.com/process");
    }
}
