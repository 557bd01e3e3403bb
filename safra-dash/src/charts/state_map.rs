//! Choropleth colouring of states by year-over-year variation

use serde::Serialize;
use std::collections::BTreeMap;

use super::{colors, ChartError};
use crate::domain::SourceSelection;
use crate::store::{Criterion, DatasetStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationKind {
    Positiva,
    Negativa,
    Neutra,
}

impl VariationKind {
    pub fn color(self) -> &'static str {
        match self {
            VariationKind::Positiva => colors::POSITIVE,
            VariationKind::Negativa => colors::NEGATIVE,
            VariationKind::Neutra => colors::NEUTRAL,
        }
    }

    fn legend(self) -> LegendEntry {
        let label = match self {
            VariationKind::Positiva => "Crescimento",
            VariationKind::Negativa => "Retração",
            VariationKind::Neutra => "Estável",
        };
        LegendEntry {
            cor: self.color().to_string(),
            label: label.to_string(),
        }
    }
}

/// Classify a variation text: "+…" positive, "-…" negative, anything else
/// (a lone "-" included) neutral
pub fn classify_variation(text: &str) -> VariationKind {
    if text.starts_with('+') {
        VariationKind::Positiva
    } else if text.starts_with('-') && text.chars().count() > 1 {
        VariationKind::Negativa
    } else {
        VariationKind::Neutra
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateMap {
    pub cores_estados: BTreeMap<String, String>,
    pub dados_estados: Vec<StateMapEntry>,
    pub metadata: StateMapMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMapEntry {
    pub uf: String,
    pub area_plantada: Option<f64>,
    pub variacao: String,
    pub tipo_variacao: VariationKind,
    pub cor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateMapMetadata {
    pub ano: i64,
    /// Source actually shown, lower-case
    pub fonte: String,
    pub legenda: Legend,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub positiva: LegendEntry,
    pub negativa: LegendEntry,
    pub neutra: LegendEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub cor: String,
    pub label: String,
}

/// State colours for `ano`; "todas" shows CONAB
pub fn state_map(store: &DatasetStore, ano: i64, selection: SourceSelection) -> Result<StateMap, ChartError> {
    let source = selection.primary();
    let year = Criterion::Eq(ano);
    let rows = store.state_area().get_filtered(|r| year.matches(&r.ano));
    if rows.is_empty() {
        return Err(ChartError::NotFound(format!("Sem dados estaduais para o ano {}", ano)));
    }

    let mut cores_estados = BTreeMap::new();
    let dados_estados: Vec<StateMapEntry> = rows
        .iter()
        .map(|row| {
            let variacao = row.variation(source).to_string();
            let kind = classify_variation(&variacao);
            cores_estados.insert(row.uf.clone(), kind.color().to_string());
            StateMapEntry {
                uf: row.uf.clone(),
                area_plantada: row.area(source),
                variacao,
                tipo_variacao: kind,
                cor: kind.color().to_string(),
            }
        })
        .collect();

    Ok(StateMap {
        cores_estados,
        dados_estados,
        metadata: StateMapMetadata {
            ano,
            fonte: source.key().to_string(),
            legenda: Legend {
                positiva: VariationKind::Positiva.legend(),
                negativa: VariationKind::Negativa.legend(),
                neutra: VariationKind::Neutra.legend(),
            },
        },
    })
}
