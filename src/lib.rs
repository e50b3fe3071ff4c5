//! MediScope web shell library.

pub mod admin;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod shell;

pub use config::schema::ShellConfig;
pub use endpoint::{Endpoint, EndpointResolver};
pub use error::ShellError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
pub use shell::{Shell, View};
