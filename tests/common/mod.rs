//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mediscope_shell::config::ShellConfig;
use mediscope_shell::http::HttpServer;
use mediscope_shell::lifecycle::Shutdown;
use mediscope_shell::routing::{FnLoader, PageBundle, RouteEntry, RouteLoadError, RouteTable};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Received {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<Received> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

    Some(Received { method, target, headers, body })
}

async fn write_response(socket: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let status_text = match status {
        200 => "200 OK",
        201 => "201 Created",
        401 => "401 Unauthorized",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        _ => "200 OK",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        content_type,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a backend that answers every request with a JSON echo of it.
pub async fn start_echo_backend() -> SocketAddr {
    start_programmable_backend(|received| async move {
        let echo = serde_json::json!({
            "method": received.method,
            "target": received.target,
            "host": received.header("host"),
            "forwardedFor": received.header("x-forwarded-for"),
            "forwardedHost": received.header("x-forwarded-host"),
            "requestId": received.header("x-request-id"),
            "body": received.body,
        });
        (200, echo.to_string())
    })
    .await
}

/// Start a backend whose responses are computed from each request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(Received) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        if let Some(received) = read_request(&mut socket).await {
                            let (status, body) = f(received).await;
                            write_response(&mut socket, status, "application/json", &body).await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address with nothing listening on it.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Route entry whose bundle is `html`, ready after `delay`.
pub fn page(path: &str, bundle: &str, html: &str, delay: Duration) -> RouteEntry {
    let name = bundle.to_string();
    let html = html.to_string();
    let loader = FnLoader::shared(bundle, move || {
        let name = name.clone();
        let html = html.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok::<_, RouteLoadError>(PageBundle::new(name, html))
        }
    });
    RouteEntry::new(path, bundle, loader)
}

/// The four MediScope pages; `/login` takes `login_delay` to load.
pub fn mediscope_table(login_delay: Duration) -> RouteTable {
    RouteTable::new(vec![
        page("/", "LandingPage", "<main>Landing</main>", Duration::ZERO),
        page("/signup", "SignupPage", "<form id=\"signup\"></form>", Duration::ZERO),
        page("/login", "LoginPage", "<form id=\"login\"></form>", login_delay),
        page("/ChatInterface", "AIChatInterface", "<section>Chat</section>", Duration::ZERO),
    ])
    .unwrap()
}

/// Test configuration: ephemeral port, short render wait.
pub fn test_config(backend: Option<SocketAddr>) -> ShellConfig {
    let mut config = ShellConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.pages.render_timeout_ms = 50;
    match backend {
        Some(addr) => config.deployment.backend_origin = Some(format!("http://{}", addr)),
        None => config.proxy.enabled = false,
    }
    config
}

/// Serve `table` under `config`; returns the bound address and the shutdown handle.
pub async fn start_shell(config: ShellConfig, table: RouteTable) -> (SocketAddr, Shutdown) {
    let server = HttpServer::with_table(config, Arc::new(table)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
