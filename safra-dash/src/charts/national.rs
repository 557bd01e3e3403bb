//! National comparison: IBGE vs CONAB bars per harvest year

use serde::Serialize;

use super::{colors, gap_annotation, ChartError};
use crate::store::DatasetStore;

#[derive(Debug, Clone, Serialize)]
pub struct NationalComparison {
    pub series: Vec<BarSeries>,
    pub metadata: NationalMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    pub data: BarData,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarData {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub customdata: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NationalMetadata {
    pub title: String,
    pub y_label: String,
}

/// Bar series per source over `ano_safra`; missing areas plot as zero
pub fn national_comparison(store: &DatasetStore) -> Result<NationalComparison, ChartError> {
    let rows = store.national_area().get();
    if rows.is_empty() {
        return Err(ChartError::NotFound("Dados nacionais não disponíveis".to_string()));
    }

    let x: Vec<String> = rows.iter().map(|r| r.ano_safra.clone()).collect();
    let customdata: Vec<String> = rows
        .iter()
        .map(|r| gap_annotation(&r.gap_ibge_conab, &r.gap_ibge_conab_text))
        .collect();

    let series = vec![
        BarSeries {
            name: "IBGE".to_string(),
            color: colors::IBGE.to_string(),
            data: BarData {
                x: x.clone(),
                y: rows.iter().map(|r| r.area_plantada_ibge.unwrap_or(0.0)).collect(),
                customdata: customdata.clone(),
            },
        },
        BarSeries {
            name: "CONAB".to_string(),
            color: colors::CONAB.to_string(),
            data: BarData {
                x,
                y: rows.iter().map(|r| r.area_plantada_conab.unwrap_or(0.0)).collect(),
                customdata,
            },
        },
    ];

    Ok(NationalComparison {
        series,
        metadata: NationalMetadata {
            title: "Comparação de Área Plantada: IBGE vs CONAB".to_string(),
            y_label: "Área (milhões de hectares)".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NationalAreaRow;

    fn row(ano: i64, ibge: Option<f64>, conab: Option<f64>, gap: &str) -> NationalAreaRow {
        NationalAreaRow {
            ano,
            ano_safra: crate::domain::harvest_label(ano),
            area_plantada_ibge: ibge,
            area_plantada_conab: conab,
            gap_ibge_conab: gap.to_string(),
            gap_ibge_conab_text: "IBGE acima da CONAB".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_two_series_with_annotations() {
        let store = DatasetStore::builder()
            .national_area(vec![
                row(2020, Some(36.9), Some(38.5), "1,6M ha"),
                row(2021, None, Some(39.5), "-"),
            ])
            .build();

        let chart = national_comparison(&store).unwrap();

        assert_eq!(chart.series.len(), 2);
        let ibge = &chart.series[0];
        assert_eq!(ibge.name, "IBGE");
        assert_eq!(ibge.color, "#2B4C7E");
        assert_eq!(ibge.data.x, vec!["19/20", "20/21"]);
        assert_eq!(ibge.data.y, vec![36.9, 0.0]);
        assert_eq!(
            ibge.data.customdata,
            vec!["IBGE acima da CONAB com 1,6M ha", "IBGE acima da CONAB"]
        );

        let conab = &chart.series[1];
        assert_eq!(conab.name, "CONAB");
        assert_eq!(conab.data.y, vec![38.5, 39.5]);
        assert_eq!(conab.data.customdata, ibge.data.customdata);
    }

    #[test]
    fn test_empty_table_is_not_found() {
        let store = DatasetStore::builder().build();
        let err = national_comparison(&store).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.payload()["error"].is_string());
    }
}
