//! Visible shell states and their HTML documents.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::routing::PageBundle;

/// Label shown under the spinner while a bundle is pending.
pub const LOADING_LABEL: &str = "Loading MediScope...";

/// What the shell currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Nothing navigated yet.
    Blank,
    /// The route's bundle is still loading.
    Fallback { path: String },
    /// The route's page.
    Page { path: String, bundle: Arc<PageBundle> },
    /// The bundle failed to load; the user can retry.
    LoadFailed { path: String, message: String },
    /// No route is declared for the path.
    NotFound { path: String },
}

impl View {
    /// Short name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            View::Blank => "blank",
            View::Fallback { .. } => "fallback",
            View::Page { .. } => "page",
            View::LoadFailed { .. } => "load_failed",
            View::NotFound { .. } => "not_found",
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            View::Blank => None,
            View::Fallback { path }
            | View::Page { path, .. }
            | View::LoadFailed { path, .. }
            | View::NotFound { path } => Some(path),
        }
    }

    /// Name of the rendered bundle, if a page is showing.
    pub fn bundle_name(&self) -> Option<&str> {
        match self {
            View::Page { bundle, .. } => Some(&bundle.name),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, View::Fallback { .. })
    }

    /// HTTP status for the document carrying this view.
    pub fn status(&self) -> StatusCode {
        match self {
            View::Blank | View::Fallback { .. } | View::Page { .. } => StatusCode::OK,
            View::LoadFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            View::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Render the full HTML document for this view.
    ///
    /// `client_config` is a JSON object exposed to bundles as `window.__MEDISCOPE__`.
    pub fn render_document(&self, title: &str, client_config: &str) -> String {
        let body = match self {
            View::Blank => String::new(),
            View::Fallback { .. } => loading_fallback(),
            View::Page { bundle, .. } => bundle.html.clone(),
            View::LoadFailed { path, message } => format!(
                concat!(
                    r#"<div class="flex items-center justify-center min-h-screen bg-slate-50">"#,
                    r#"<div class="flex flex-col items-center space-y-4" role="alert">"#,
                    r#"<p class="text-slate-700 font-medium">This page could not be loaded.</p>"#,
                    r#"<p class="text-slate-500 text-sm">{message}</p>"#,
                    r#"<a class="text-blue-500 font-medium" href="{path}">Retry</a>"#,
                    "</div></div>"
                ),
                message = escape_html(message),
                path = escape_html(path),
            ),
            View::NotFound { path } => format!(
                concat!(
                    r#"<div class="flex items-center justify-center min-h-screen bg-slate-50">"#,
                    r#"<div class="flex flex-col items-center space-y-4">"#,
                    r#"<p class="text-slate-700 font-medium">No page at {path}</p>"#,
                    r#"<a class="text-blue-500 font-medium" href="/">Back to MediScope</a>"#,
                    "</div></div>"
                ),
                path = escape_html(path),
            ),
        };

        format!(
            concat!(
                "<!doctype html>\n",
                "<html lang=\"en\">\n<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
                "<title>{title}</title>\n",
                "<script>window.__MEDISCOPE__ = {config};</script>\n",
                "</head>\n<body>\n<div id=\"root\" data-view=\"{kind}\">{body}</div>\n</body>\n</html>\n"
            ),
            title = escape_html(title),
            config = client_config.replace("</", "<\\/"),
            kind = self.kind(),
            body = body,
        )
    }
}

/// Centered spinner plus status label.
pub fn loading_fallback() -> String {
    format!(
        concat!(
            r#"<div class="flex items-center justify-center min-h-screen bg-slate-50">"#,
            r#"<div class="flex flex-col items-center space-y-4">"#,
            r#"<div class="w-12 h-12 border-4 border-blue-500 border-t-transparent rounded-full animate-spin"></div>"#,
            r#"<p class="text-slate-500 font-medium">{}</p>"#,
            "</div></div>"
        ),
        LOADING_LABEL
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
