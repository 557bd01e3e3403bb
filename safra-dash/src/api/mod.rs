//! HTTP API handlers for safra-dash

pub mod buildinfo;
pub mod charts;
pub mod datasets;
pub mod error;
pub mod health;
pub mod params;
pub mod ui;

pub use buildinfo::get_build_info;
pub use charts::{
    comparacao_estadual, comparacao_nacional, evolucao_temporal, geojson_brasil, kpis, mapa_estados,
    municipio_destaque, municipio_info, municipios_por_estado, waterfall,
};
pub use datasets::{get_dataset, list_datasets};
pub use error::ApiError;
pub use health::health_routes;
pub use params::ParamError;
pub use ui::ui_routes;
