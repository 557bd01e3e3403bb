//! Dashboard page and static assets
//!
//! With a static directory configured, `/` serves its `index.html` and
//! `/static/*` the files under it. Without one, `/` answers with a short
//! page pointing at the API.

use std::path::Path;

use axum::{response::Html, routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

const NO_DASHBOARD_HTML: &str = "<!DOCTYPE html>\n<html lang=\"pt-BR\"><head><meta charset=\"utf-8\"><title>safra-dash</title></head>\n<body><p>Diretório estático não configurado. API disponível em <a href=\"/api/datasets\">/api/datasets</a>.</p></body></html>\n";

/// GET / without a static directory
pub async fn serve_placeholder() -> Html<&'static str> {
    Html(NO_DASHBOARD_HTML)
}

/// Build UI routes for an optional static directory
pub fn ui_routes(static_dir: Option<&Path>) -> Router<AppState> {
    match static_dir {
        Some(dir) => Router::new()
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir)),
        None => Router::new().route("/", get(serve_placeholder)),
    }
}
