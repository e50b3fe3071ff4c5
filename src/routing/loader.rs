//! Page bundle loaders.
//!
//! # Responsibilities
//! - Define the deferred factory that produces a page bundle
//! - Load bundles from the bundle directory on disk
//! - Report fetch/initialization failures as `RouteLoadError`

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;

/// A loaded page unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBundle {
    /// Bundle name (e.g. "LoginPage").
    pub name: String,
    /// HTML fragment mounted into the shell document.
    pub html: String,
}

impl PageBundle {
    pub fn new(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.html.len()
    }
}

/// A page bundle failed to fetch or initialize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteLoadError {
    #[error("bundle '{bundle}' could not be fetched: {reason}")]
    Fetch { bundle: String, reason: String },

    #[error("bundle '{bundle}' failed to initialize: {reason}")]
    Init { bundle: String, reason: String },

    #[error("bundle load for '{0}' was interrupted")]
    Interrupted(String),
}

/// Deferred factory producing a page bundle.
pub trait PageLoader: Send + Sync + fmt::Debug {
    /// Start loading. Called at most once per successful load.
    fn load(&self) -> BoxFuture<'static, Result<PageBundle, RouteLoadError>>;
}

/// Loads `<dir>/<bundle>.html` from disk.
#[derive(Debug, Clone)]
pub struct FileLoader {
    bundle: String,
    path: PathBuf,
}

impl FileLoader {
    pub fn new(dir: impl Into<PathBuf>, bundle: impl Into<String>) -> Self {
        let bundle = bundle.into();
        let path = dir.into().join(format!("{}.html", bundle));
        Self { bundle, path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PageLoader for FileLoader {
    fn load(&self) -> BoxFuture<'static, Result<PageBundle, RouteLoadError>> {
        let bundle = self.bundle.clone();
        let path = self.path.clone();
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|e| RouteLoadError::Fetch {
                bundle: bundle.clone(),
                reason: format!("{}: {}", path.display(), e),
            })?;
            let html = String::from_utf8(bytes).map_err(|e| RouteLoadError::Init {
                bundle: bundle.clone(),
                reason: e.to_string(),
            })?;
            Ok(PageBundle::new(bundle, html))
        }
        .boxed()
    }
}

/// Wraps a closure returning a future. Used for in-memory bundles.
pub struct FnLoader<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PageBundle, RouteLoadError>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    pub fn shared(name: impl Into<String>, f: F) -> Arc<dyn PageLoader> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLoader").field("name", &self.name).finish()
    }
}

impl<F, Fut> PageLoader for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PageBundle, RouteLoadError>> + Send + 'static,
{
    fn load(&self) -> BoxFuture<'static, Result<PageBundle, RouteLoadError>> {
        (self.f)().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_loader_reads_bundle() {
        let dir = std::env::temp_dir().join(format!("mediscope-loader-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("LoginPage.html"), "<form>login</form>").await.unwrap();

        let bundle = FileLoader::new(&dir, "LoginPage").load().await.unwrap();
        assert_eq!(bundle, PageBundle::new("LoginPage", "<form>login</form>"));

        let missing = FileLoader::new(&dir, "SignupPage").load().await.unwrap_err();
        assert!(matches!(missing, RouteLoadError::Fetch { ref bundle, .. } if bundle == "SignupPage"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn fn_loader_runs_closure() {
        let loader = FnLoader::new("Landing", || async {
            Ok::<_, RouteLoadError>(PageBundle::new("Landing", "<h1>hi</h1>"))
        });
        assert_eq!(loader.load().await.unwrap().size(), 11);
    }
}
