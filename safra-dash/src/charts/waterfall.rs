//! Waterfall (bridge) chart of the change in planted area between harvests

use serde::Serialize;

use super::{colors, ChartError};
use crate::domain::{harvest_label, waterfall_dataset_name, HarvestPeriod, Source};
use crate::store::DatasetStore;

/// Padding added around the anchor totals, hectares
const AXIS_PADDING: f64 = 1_000_000.0;
/// Axis bounds snap to multiples of this, hectares
const AXIS_STEP: f64 = 500_000.0;

#[derive(Debug, Clone, Serialize)]
pub struct WaterfallChart {
    pub series: Vec<WaterfallSeries>,
    pub metadata: WaterfallMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterfallSeries {
    pub name: String,
    pub data: WaterfallData,
    pub colors: WaterfallColors,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterfallData {
    pub x: Vec<String>,
    /// Thousands of hectares
    pub y: Vec<f64>,
    pub measure: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterfallColors {
    pub increasing: String,
    pub decreasing: String,
    pub totals: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterfallMetadata {
    pub title: String,
    pub y_label: String,
    pub periodo: String,
    pub fonte: String,
    pub min: f64,
    pub max: f64,
}

/// Y-axis bounds in thousands of hectares from the first and last totals
///
/// The lower bound is `first - 1_000_000` floored to a multiple of 500 000,
/// the upper bound `last + 1_000_000` raised to one.
pub fn axis_bounds(first: f64, last: f64) -> (f64, f64) {
    let min = ((first - AXIS_PADDING) / AXIS_STEP).floor() * AXIS_STEP / 1000.0;
    let max = ((last + AXIS_PADDING) / AXIS_STEP).ceil() * AXIS_STEP / 1000.0;
    (min, max)
}

/// Bridge chart for one source and a "YYYY-YYYY" period
pub fn waterfall(store: &DatasetStore, source: Source, period: &str) -> Result<WaterfallChart, ChartError> {
    let unavailable = || ChartError::WaterfallUnavailable {
        fonte: source.label().to_string(),
        period: period.to_string(),
    };

    let parsed: HarvestPeriod = period.parse().map_err(|_| unavailable())?;
    let dataset = waterfall_dataset_name(source, &parsed);
    let rows = store.waterfall(&dataset).map_err(|_| unavailable())?.get();

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(unavailable());
    };

    if rows.iter().any(|r| !r.valor.is_finite()) {
        return Err(ChartError::Internal(format!(
            "Valor não finito em {}",
            dataset
        )));
    }

    let (min, max) = axis_bounds(first.valor, last.valor);

    // Anchor bars are relabelled with their harvest
    let mut x: Vec<String> = rows.iter().map(|r| r.step.clone()).collect();
    let last_index = x.len() - 1;
    x[0] = harvest_label(parsed.start);
    x[last_index] = harvest_label(parsed.end);

    let label = source.label();
    Ok(WaterfallChart {
        series: vec![WaterfallSeries {
            name: format!("Variação {} {}", label, period),
            data: WaterfallData {
                x,
                y: rows.iter().map(|r| r.valor / 1000.0).collect(),
                measure: rows.iter().map(|r| r.measure.clone()).collect(),
            },
            colors: WaterfallColors {
                increasing: colors::INCREASING.to_string(),
                decreasing: colors::DECREASING.to_string(),
                totals: colors::TOTALS.to_string(),
            },
        }],
        metadata: WaterfallMetadata {
            title: format!("Variação da Área Plantada por Estado ({}) - {}", period, label),
            y_label: "Variação (hectares)\n".to_string(),
            periodo: period.to_string(),
            fonte: label.to_string(),
            min,
            max,
        },
    })
}
