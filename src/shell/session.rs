//! Client-side navigation over the route table.
//!
//! A `Session` models one navigator: it publishes the visible `View` through a
//! watch channel, shows the fallback while a bundle is pending, and drops the
//! result of any load that finishes after a newer navigation started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::routing::RouteTable;
use crate::shell::view::View;

/// Result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The view was published.
    Shown(View),
    /// A newer navigation started before this one finished; nothing was published.
    Superseded,
}

impl Outcome {
    pub fn view(&self) -> Option<&View> {
        match self {
            Outcome::Shown(view) => Some(view),
            Outcome::Superseded => None,
        }
    }
}

/// A single navigator over a shared, static route table.
#[derive(Debug)]
pub struct Session {
    table: Arc<RouteTable>,
    generation: AtomicU64,
    view: watch::Sender<View>,
}

impl Session {
    pub fn new(table: Arc<RouteTable>) -> Self {
        let (view, _) = watch::channel(View::Blank);
        Self {
            table,
            generation: AtomicU64::new(0),
            view,
        }
    }

    /// Observe every published view.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view.subscribe()
    }

    pub fn current(&self) -> View {
        self.view.borrow().clone()
    }

    /// Navigate to `path` and wait until its view is shown or superseded.
    pub async fn navigate(&self, path: &str) -> Outcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(path, generation, "Navigating");

        let Some(entry) = self.table.match_path(path) else {
            return self.publish(generation, View::NotFound { path: path.to_string() });
        };

        if let Some(bundle) = entry.cached() {
            return self.publish(generation, View::Page { path: path.to_string(), bundle });
        }

        if let Outcome::Superseded = self.publish(generation, View::Fallback { path: path.to_string() }) {
            return Outcome::Superseded;
        }

        let view = match entry.load().await {
            Ok(bundle) => View::Page { path: path.to_string(), bundle },
            Err(e) => View::LoadFailed {
                path: path.to_string(),
                message: e.to_string(),
            },
        };
        self.publish(generation, view)
    }

    /// Navigate again to the current path if its load failed.
    pub async fn retry(&self) -> Option<Outcome> {
        let path = match self.current() {
            View::LoadFailed { path, .. } => path,
            _ => return None,
        };
        Some(self.navigate(&path).await)
    }

    fn publish(&self, generation: u64, view: View) -> Outcome {
        let mut shown = false;
        self.view.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = view.clone();
            shown = true;
            true
        });

        if shown {
            Outcome::Shown(view)
        } else {
            tracing::debug!(path = ?view.path(), generation, "Dropping stale navigation result");
            Outcome::Superseded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{FnLoader, PageBundle, PageLoader, RouteEntry, RouteLoadError};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn page(name: &'static str) -> Arc<dyn PageLoader> {
        FnLoader::shared(name, move || async move {
            Ok::<_, RouteLoadError>(PageBundle::new(name, name))
        })
    }

    fn gated(name: &'static str, gate: Arc<Notify>) -> Arc<dyn PageLoader> {
        FnLoader::shared(name, move || {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Ok::<_, RouteLoadError>(PageBundle::new(name, name))
            }
        })
    }

    #[tokio::test]
    async fn undeclared_path_shows_not_found() {
        let table = Arc::new(RouteTable::new(vec![RouteEntry::new("/", "LandingPage", page("LandingPage"))]).unwrap());
        let session = Session::new(table);

        let shown = session.navigate("/").await;
        assert_eq!(shown.view().and_then(View::bundle_name), Some("LandingPage"));

        let outcome = session.navigate("/nope").await;
        assert_eq!(outcome, Outcome::Shown(View::NotFound { path: "/nope".into() }));
        assert_eq!(session.current().bundle_name(), None);
    }

    #[tokio::test]
    async fn stale_load_is_ignored() {
        let gate = Arc::new(Notify::new());
        let table = Arc::new(
            RouteTable::new(vec![
                RouteEntry::new("/", "LandingPage", page("LandingPage")),
                RouteEntry::new("/ChatInterface", "AIChatInterface", gated("AIChatInterface", gate.clone())),
            ])
            .unwrap(),
        );
        let session = Arc::new(Session::new(table.clone()));

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.navigate("/ChatInterface").await })
        };
        let mut rx = session.subscribe();
        rx.wait_for(View::is_fallback).await.unwrap();

        let landing = session.navigate("/").await;
        assert_eq!(landing.view().and_then(View::bundle_name), Some("LandingPage"));

        gate.notify_one();
        assert_eq!(slow.await.unwrap(), Outcome::Superseded);
        assert_eq!(session.current().bundle_name(), Some("LandingPage"));
        // The abandoned load still filled the cache.
        assert!(table.match_path("/ChatInterface").unwrap().is_loaded());
    }

    #[tokio::test]
    async fn retry_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let flaky = FnLoader::shared("SignupPage", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(RouteLoadError::Fetch {
                        bundle: "SignupPage".into(),
                        reason: "timed out".into(),
                    })
                } else {
                    Ok(PageBundle::new("SignupPage", "<form/>"))
                }
            }
        });
        let table = Arc::new(
            RouteTable::new(vec![
                RouteEntry::new("/", "LandingPage", page("LandingPage")),
                RouteEntry::new("/signup", "SignupPage", flaky),
            ])
            .unwrap(),
        );
        let session = Session::new(table);

        assert_eq!(session.retry().await, None);

        let failed = session.navigate("/signup").await;
        assert!(matches!(failed.view(), Some(View::LoadFailed { .. })));

        let retried = session.retry().await.unwrap();
        assert_eq!(retried.view().and_then(View::bundle_name), Some("SignupPage"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
