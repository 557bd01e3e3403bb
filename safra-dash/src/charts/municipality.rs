//! Municipality views: stacked time series against the rest of the state,
//! and the single-year spotlight card

use serde::Serialize;

use super::{colors, ChartError};
use crate::domain::harvest_label;
use crate::store::{Criterion, DatasetStore, MunicipalityRow};

#[derive(Debug, Clone, Serialize)]
pub struct MunicipalityTimeSeries {
    /// Municipality first, rest of state second; both in stack group "one"
    pub series: (AreaSeries<(String,)>, AreaSeries<(String, Option<f64>)>),
    pub metadata: TimeSeriesMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaSeries<C> {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variacao: Option<Vec<String>>,
    pub data: AreaData<C>,
    pub stackgroup: String,
    pub info: SeriesInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaData<C> {
    pub x: Vec<String>,
    /// Thousands of hectares
    pub y: Vec<Option<f64>>,
    pub customdata: Vec<C>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesInfo {
    pub tipo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesMetadata {
    pub y_label: String,
    pub municipio: MunicipalityIdentity,
    pub anos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalityIdentity {
    pub codigo: String,
    pub nome: String,
    pub uf: String,
    pub estado: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MunicipalitySpotlight {
    pub identificacao: SpotlightIdentity,
    pub metricas: SpotlightMetrics,
    pub ano: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotlightIdentity {
    pub codigo: String,
    pub nome: String,
    pub estado: String,
    pub uf: String,
    pub ranking: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotlightMetrics {
    pub area_plantada: AreaMetric,
    pub representatividade: ShareMetric,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaMetric {
    pub titulo: String,
    pub valor: String,
    pub variacao: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareMetric {
    pub titulo: String,
    pub valor: String,
    pub label: String,
}

fn not_found(code: &str) -> ChartError {
    ChartError::NotFound(format!("Município {} não encontrado", code))
}

/// Planted area of a municipality over every year, stacked on the rest of its state
pub fn municipality_timeseries(store: &DatasetStore, code: &str) -> Result<MunicipalityTimeSeries, ChartError> {
    let wanted = Criterion::Eq(code);
    let mut rows = store
        .municipalities()
        .get_filtered(|r| wanted.matches(&r.cod_municipio));
    rows.sort_by_key(|r| r.ano);

    let first = rows.first().ok_or_else(|| not_found(code))?;
    let identity = MunicipalityIdentity {
        codigo: code.to_string(),
        nome: first.municipio.clone(),
        uf: first.uf.clone(),
        estado: first.estado.clone(),
    };

    let anos: Vec<String> = rows.iter().map(|r| r.ano_safra.clone()).collect();
    let state_variations: Vec<String> = rows.iter().map(|r| r.variacao_estado_ano.clone()).collect();

    let municipality = AreaSeries {
        name: identity.nome.clone(),
        kind: "area".to_string(),
        color: colors::MUNICIPALITY.to_string(),
        variacao: None,
        data: AreaData {
            x: anos.clone(),
            y: rows.iter().map(|r| r.area_plantada).collect(),
            customdata: rows.iter().map(|r| (r.variacao.clone(),)).collect(),
        },
        stackgroup: "one".to_string(),
        info: SeriesInfo {
            tipo: "municipio".to_string(),
            codigo: Some(identity.codigo.clone()),
            uf: None,
        },
    };

    let rest_of_state = AreaSeries {
        name: identity.estado.clone(),
        kind: "area".to_string(),
        color: colors::REST_OF_STATE.to_string(),
        variacao: Some(state_variations.clone()),
        data: AreaData {
            x: anos.clone(),
            y: rows.iter().map(|r| r.area_plantada_estado_dif).collect(),
            customdata: state_variations
                .into_iter()
                .zip(rows.iter().map(|r| r.area_plantada_estado))
                .collect(),
        },
        stackgroup: "one".to_string(),
        info: SeriesInfo {
            tipo: "estado_resto".to_string(),
            codigo: None,
            uf: Some(identity.uf.clone()),
        },
    };

    Ok(MunicipalityTimeSeries {
        series: (municipality, rest_of_state),
        metadata: TimeSeriesMetadata {
            y_label: "Área Plantada (mil de hectares)".to_string(),
            municipio: identity,
            anos,
        },
    })
}

/// Spotlight card of a municipality for one year
pub fn municipality_spotlight(store: &DatasetStore, code: &str, ano: i64) -> Result<MunicipalitySpotlight, ChartError> {
    let wanted = Criterion::Eq(code);
    let year = Criterion::Eq(ano);
    let row: MunicipalityRow = store
        .municipalities()
        .get_filtered(|r| wanted.matches(&r.cod_municipio) && year.matches(&r.ano))
        .into_iter()
        .next()
        .ok_or_else(|| not_found(code))?;

    let valor = match row.area_plantada {
        Some(area) => format!("{:.1} mil ha", area),
        None => "-".to_string(),
    };

    Ok(MunicipalitySpotlight {
        metricas: SpotlightMetrics {
            area_plantada: AreaMetric {
                titulo: format!("ÁREA PLANTADA {}", harvest_label(ano)),
                valor,
                variacao: arrow_prefixed(&row.variacao),
            },
            representatividade: ShareMetric {
                titulo: format!("% DO ESTADO ({})", row.uf),
                valor: row.representatividade_mun.clone(),
                label: "Representatividade".to_string(),
            },
        },
        identificacao: SpotlightIdentity {
            codigo: row.cod_municipio,
            nome: row.municipio,
            estado: row.estado,
            uf: row.uf,
            ranking: row.ranking,
        },
        ano,
    })
}

/// "+12%" → "↑ +12%", "-3%" → "↓ -3%"
fn arrow_prefixed(variation: &str) -> String {
    if variation.starts_with('+') {
        format!("↑ {}", variation)
    } else if variation.starts_with('-') {
        format!("↓ {}", variation)
    } else {
        variation.to_string()
    }
}
