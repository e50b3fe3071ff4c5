//! Route table and bundle cache.
//!
//! # Responsibilities
//! - Store the ordered `(path, loader)` entries
//! - Exact-path lookup for a navigation
//! - Run each loader on first use and cache the bundle for the process
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) path lookup via HashMap, declaration order kept for listing
//! - Explicit no-match rather than silent default
//! - Failed loads are not cached; the next navigation retries

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::validation::{validate_routes, ValidationError};
use crate::config::{PageRouteConfig, PagesConfig};
use crate::observability::metrics;
use crate::routing::loader::{FileLoader, PageBundle, PageLoader, RouteLoadError};

/// A declared route and its lazily filled bundle slot.
#[derive(Debug)]
pub struct RouteEntry {
    path: String,
    bundle: String,
    loader: Arc<dyn PageLoader>,
    cell: OnceCell<Arc<PageBundle>>,
    attempts: AtomicU64,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, bundle: impl Into<String>, loader: Arc<dyn PageLoader>) -> Self {
        Self {
            path: path.into(),
            bundle: bundle.into(),
            loader,
            cell: OnceCell::new(),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// The bundle, if it already finished loading.
    pub fn cached(&self) -> Option<Arc<PageBundle>> {
        self.cell.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Number of times the loader has been invoked.
    pub fn load_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Load the bundle, invoking the loader only if no earlier load succeeded.
    ///
    /// Concurrent callers share a single in-flight load.
    pub async fn load(&self) -> Result<Arc<PageBundle>, RouteLoadError> {
        self.cell
            .get_or_try_init(|| async {
                let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::debug!(path = %self.path, bundle = %self.bundle, attempt, "Loading page bundle");

                match self.loader.load().await {
                    Ok(bundle) => {
                        tracing::info!(
                            path = %self.path,
                            bundle = %self.bundle,
                            bytes = bundle.size(),
                            "Page bundle loaded"
                        );
                        metrics::record_bundle_load(&self.bundle, true);
                        Ok(Arc::new(bundle))
                    }
                    Err(e) => {
                        tracing::warn!(path = %self.path, bundle = %self.bundle, error = %e, "Page bundle failed to load");
                        metrics::record_bundle_load(&self.bundle, false);
                        Err(e)
                    }
                }
            })
            .await
            .cloned()
    }
}

/// The application's navigable surface.
#[derive(Debug)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Build a table, checking that paths are unique and "/" is declared.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, Vec<ValidationError>> {
        let declared: Vec<PageRouteConfig> = entries
            .iter()
            .map(|e| PageRouteConfig::new(e.path.clone(), e.bundle.clone()))
            .collect();
        validate_routes(&declared)?;

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.path.clone(), i))
            .collect();
        let entries = entries.into_iter().map(Arc::new).collect();

        Ok(Self { entries, index })
    }

    /// Build the table from config, loading bundles from `pages.bundle_dir`.
    pub fn from_config(pages: &PagesConfig) -> Result<Self, Vec<ValidationError>> {
        Self::from_routes(&pages.routes, Path::new(&pages.bundle_dir))
    }

    pub fn from_routes(routes: &[PageRouteConfig], bundle_dir: &Path) -> Result<Self, Vec<ValidationError>> {
        let entries = routes
            .iter()
            .map(|r| {
                let loader: Arc<dyn PageLoader> = Arc::new(FileLoader::new(bundle_dir, r.bundle.clone()));
                RouteEntry::new(r.path.clone(), r.bundle.clone(), loader)
            })
            .collect();
        Self::new(entries)
    }

    /// Exact-path match.
    pub fn match_path(&self, path: &str) -> Option<&Arc<RouteEntry>> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[Arc<RouteEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
