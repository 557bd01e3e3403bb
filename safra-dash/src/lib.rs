//! safra-dash library - IBGE vs CONAB planted-area dashboard backend
//!
//! Serves pre-computed agricultural datasets as chart-ready JSON for the
//! dashboard front end.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use store::DatasetStore;

pub mod api;
pub mod charts;
pub mod domain;
pub mod pagination;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Datasets loaded at startup (read-only)
    pub store: Arc<DatasetStore>,
    /// Directory holding the dashboard page and its assets
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: DatasetStore, static_dir: Option<PathBuf>) -> Self {
        Self {
            store: Arc::new(store),
            static_dir,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let charts = Router::new()
        .route("/api/comparacao_nacional", get(api::comparacao_nacional))
        .route("/api/comparacao_estadual", get(api::comparacao_estadual))
        .route("/api/waterfall", get(api::waterfall))
        .route("/api/kpis", get(api::kpis))
        .route("/api/evolucao_temporal", get(api::evolucao_temporal))
        .route("/api/municipio_destaque", get(api::municipio_destaque))
        .route("/api/mapa_estados", get(api::mapa_estados))
        .route("/api/geojson_brasil", get(api::geojson_brasil))
        .route("/api/municipios_por_estado", get(api::municipios_por_estado))
        .route("/api/municipio_info", get(api::municipio_info));

    let review = Router::new()
        .route("/api/datasets", get(api::list_datasets))
        .route("/api/datasets/:name", get(api::get_dataset))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    let app = Router::new()
        .merge(charts)
        .merge(review)
        .merge(api::ui_routes(state.static_dir.as_deref()))
        .with_state(state);

    app.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}
