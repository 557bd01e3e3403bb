//! Chart formatters
//!
//! One pure function per dashboard view. Each reads rows from the
//! [`DatasetStore`](crate::store::DatasetStore), reshapes them and returns a
//! serializable payload matching the Plotly-based front end, or a
//! [`ChartError`] that the API layer maps to a status code.

use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;

mod geo;
mod kpis;
mod lookup;
mod municipality;
mod national;
mod state_map;
mod states;
mod waterfall;

pub use geo::boundaries;
pub use kpis::{kpis, KpiBlock, KpiEntry, KpiReport, Kpis, Tone};
pub use lookup::{municipalities_by_state, municipality_info, MunicipalityInfo, MunicipalitySummary};
pub use municipality::{
    municipality_spotlight, municipality_timeseries, MunicipalitySpotlight, MunicipalityTimeSeries,
};
pub use national::{national_comparison, NationalComparison};
pub use state_map::{classify_variation, state_map, StateMap, VariationKind};
pub use states::{state_comparison, StateComparison};
pub use waterfall::{axis_bounds, waterfall, WaterfallChart};

/// Fixed palette shared with the front end
pub mod colors {
    pub const IBGE: &str = "#2B4C7E";
    pub const CONAB: &str = "#17A589";
    pub const INCREASING: &str = "#17A589";
    pub const DECREASING: &str = "#CD8B8B";
    pub const TOTALS: &str = "#2B4C7E";
    pub const POSITIVE: &str = "#17A589";
    pub const NEGATIVE: &str = "#CD8B8B";
    pub const NEUTRAL: &str = "#DADAD9";
    pub const MUNICIPALITY: &str = "#4A90E2";
    pub const REST_OF_STATE: &str = "#48C9B0";
}

/// Text shown when a KPI has no underlying value
pub const NO_DATA_TEXT: &str = "Sem dados para comparação";

/// Formatter failures
#[derive(Error, Debug)]
pub enum ChartError {
    /// Dataset or filtered row set is empty
    #[error("{0}")]
    NotFound(String),

    /// Waterfall dataset missing for the requested source and period
    #[error("Dados não disponíveis para {fonte} {period}")]
    WaterfallUnavailable { fonte: String, period: String },

    /// Unexpected failure while reshaping
    #[error("{0}")]
    Internal(String),
}

impl ChartError {
    /// `true` for data-absence errors
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ChartError::Internal(_))
    }

    /// Error structure returned in place of a chart
    pub fn payload(&self) -> Value {
        match self {
            ChartError::WaterfallUnavailable { .. } => json!({
                "error": self.to_string(),
                "series": [],
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl From<StoreError> for ChartError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(name) => ChartError::NotFound(format!("Dataset '{}' não está carregado", name)),
            other => ChartError::Internal(other.to_string()),
        }
    }
}

/// Comparison annotation for a row's IBGE/CONAB gap
///
/// A gap of "-" means no comparable figure; the label is used alone.
pub(crate) fn gap_annotation(gap: &str, gap_text: &str) -> String {
    if gap == "-" {
        gap_text.to_string()
    } else {
        format!("{} com {}", gap_text, gap)
    }
}

/// Round to one decimal place, ties to even
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
