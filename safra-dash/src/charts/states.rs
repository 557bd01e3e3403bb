//! State comparison: per-state IBGE/CONAB series ordered by planted volume

use serde::Serialize;
use std::collections::BTreeMap;

use super::{gap_annotation, round1, ChartError};
use crate::store::{DatasetStore, StateAreaRow};

#[derive(Debug, Clone, Serialize)]
pub struct StateComparison {
    pub series: Vec<StateSeries>,
    /// National totals per year, thousands → millions of hectares
    pub totais: BTreeMap<i64, YearTotals>,
    pub metadata: StateMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateSeries {
    pub uf: String,
    pub anos: Vec<String>,
    pub valores_ibge: Vec<f64>,
    pub valores_conab: Vec<f64>,
    pub variacao: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearTotals {
    pub ibge: f64,
    pub conab: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateMetadata {
    pub anos: Vec<i64>,
    pub total_estados: usize,
    pub estados_ordenados: Vec<String>,
    pub descricao: String,
}

/// States in descending order of their mean (IBGE, CONAB) total area
pub fn state_comparison(store: &DatasetStore) -> Result<StateComparison, ChartError> {
    let rows = store.state_area().get();
    if rows.is_empty() {
        return Err(ChartError::NotFound("Dados estaduais não disponíveis".to_string()));
    }

    let mut by_state: BTreeMap<String, Vec<StateAreaRow>> = BTreeMap::new();
    for row in &rows {
        by_state.entry(row.uf.clone()).or_default().push(row.clone());
    }

    // BTreeMap iteration is uf-ascending, and the sort is stable, so ties
    // keep alphabetical order
    let mut ranked: Vec<(String, f64)> = by_state
        .iter()
        .map(|(uf, state_rows)| (uf.clone(), ranking_key(state_rows)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let series = ranked
        .iter()
        .filter_map(|(uf, _)| by_state.remove(uf).map(|state_rows| state_series(uf, state_rows)))
        .collect();

    let mut totais: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
    for row in &rows {
        let entry = totais.entry(row.ano).or_insert((0.0, 0.0));
        entry.0 += row.area_plantada_ibge.unwrap_or(0.0);
        entry.1 += row.area_plantada_conab.unwrap_or(0.0);
    }
    let anos: Vec<i64> = totais.keys().copied().collect();
    let totais = totais
        .into_iter()
        .map(|(ano, (ibge, conab))| {
            (
                ano,
                YearTotals {
                    ibge: round1(ibge / 1000.0),
                    conab: round1(conab / 1000.0),
                },
            )
        })
        .collect();

    let estados_ordenados: Vec<String> = ranked.into_iter().map(|(uf, _)| uf).collect();

    Ok(StateComparison {
        series,
        totais,
        metadata: StateMetadata {
            anos,
            total_estados: estados_ordenados.len(),
            estados_ordenados,
            descricao: "Dados estaduais ordenados por volume de produção".to_string(),
        },
    })
}

fn ranking_key(rows: &[StateAreaRow]) -> f64 {
    let ibge: f64 = rows.iter().map(|r| r.area_plantada_ibge.unwrap_or(0.0)).sum();
    let conab: f64 = rows.iter().map(|r| r.area_plantada_conab.unwrap_or(0.0)).sum();
    (ibge + conab) / 2.0
}

fn state_series(uf: &str, mut rows: Vec<StateAreaRow>) -> StateSeries {
    rows.sort_by_key(|r| r.ano);
    StateSeries {
        uf: uf.to_string(),
        anos: rows.iter().map(|r| r.ano_safra.clone()).collect(),
        valores_ibge: rows.iter().map(|r| r.area_plantada_ibge.unwrap_or(0.0)).collect(),
        valores_conab: rows.iter().map(|r| r.area_plantada_conab.unwrap_or(0.0)).collect(),
        variacao: rows
            .iter()
            .map(|r| gap_annotation(&r.gap_ibge_conab, &r.gap_ibge_conab_text))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::harvest_label;

    fn row(uf: &str, ano: i64, ibge: Option<f64>, conab: Option<f64>) -> StateAreaRow {
        StateAreaRow {
            uf: uf.to_string(),
            ano,
            ano_safra: harvest_label(ano),
            area_plantada_ibge: ibge,
            area_plantada_conab: conab,
            gap_ibge_conab: "-".to_string(),
            gap_ibge_conab_text: "Sem divergência".to_string(),
            ..Default::default()
        }
    }

    fn store() -> DatasetStore {
        DatasetStore::builder()
            .state_area(vec![
                row("GO", 2021, Some(3_900.0), Some(3_950.0)),
                row("MT", 2021, Some(10_800.0), Some(10_900.0)),
                row("MT", 2020, Some(10_200.0), Some(10_300.0)),
                row("PR", 2020, Some(5_600.0), None),
                row("PR", 2021, Some(5_700.0), Some(5_650.0)),
                row("GO", 2020, Some(3_700.0), Some(3_760.0)),
            ])
            .build()
    }

    #[test]
    fn test_states_descending_by_mean_total() {
        let chart = state_comparison(&store()).unwrap();

        assert_eq!(chart.metadata.estados_ordenados, vec!["MT", "PR", "GO"]);
        assert_eq!(chart.metadata.total_estados, 3);

        let keys: Vec<f64> = chart
            .metadata
            .estados_ordenados
            .iter()
            .map(|uf| ranking_key(&store().state_area().get_filtered(|r| &r.uf == uf)))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_state_rows_sorted_by_year() {
        let chart = state_comparison(&store()).unwrap();

        let mt = &chart.series[0];
        assert_eq!(mt.uf, "MT");
        assert_eq!(mt.anos, vec!["19/20", "20/21"]);
        assert_eq!(mt.valores_ibge, vec![10_200.0, 10_800.0]);
        assert_eq!(mt.valores_conab, vec![10_300.0, 10_900.0]);
        assert_eq!(mt.variacao, vec!["Sem divergência", "Sem divergência"]);

        let pr = &chart.series[1];
        assert_eq!(pr.valores_conab, vec![0.0, 5_650.0]);
    }

    #[test]
    fn test_national_totals_per_year() {
        let chart = state_comparison(&store()).unwrap();

        assert_eq!(chart.metadata.anos, vec![2020, 2021]);
        // 10200 + 5600 + 3700 = 19500 → 19.5
        assert_eq!(chart.totais[&2020], YearTotals { ibge: 19.5, conab: 14.1 });
        assert_eq!(chart.totais[&2021], YearTotals { ibge: 20.4, conab: 20.5 });

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["totais"]["2021"]["ibge"], 20.4);
    }

    #[test]
    fn test_half_totals_round_to_even() {
        let store = DatasetStore::builder()
            .state_area(vec![
                row("MT", 2021, Some(20_000.0), Some(100.0)),
                row("PR", 2021, Some(16_250.0), Some(150.0)),
            ])
            .build();
        let chart = state_comparison(&store).unwrap();
        assert_eq!(chart.totais[&2021], YearTotals { ibge: 36.2, conab: 0.2 });
    }

    #[test]
    fn test_ties_keep_alphabetical_order() {
        let store = DatasetStore::builder()
            .state_area(vec![row("SP", 2021, Some(100.0), Some(100.0)), row("BA", 2021, Some(100.0), Some(100.0))])
            .build();
        let chart = state_comparison(&store).unwrap();
        assert_eq!(chart.metadata.estados_ordenados, vec!["BA", "SP"]);
    }

    #[test]
    fn test_empty_table_is_not_found() {
        let err = state_comparison(&DatasetStore::builder().build()).unwrap_err();
        assert!(err.is_not_found());
    }
}
