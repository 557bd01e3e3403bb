//! Municipality lookups backing the dashboard's selectors

use serde::Serialize;

use crate::domain::REFERENCE_YEAR;
use crate::store::{Criterion, DatasetStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalityInfo {
    pub codigo: String,
    pub nome: String,
    pub uf: String,
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MunicipalitySummary {
    pub codigo: String,
    pub nome: String,
}

/// Identity of a municipality, from its reference-year row
pub fn municipality_info(store: &DatasetStore, code: &str) -> Option<MunicipalityInfo> {
    let wanted = Criterion::Eq(code);
    let year = Criterion::Eq(REFERENCE_YEAR);
    store
        .municipalities()
        .get_filtered(|r| wanted.matches(&r.cod_municipio) && year.matches(&r.ano))
        .into_iter()
        .next()
        .map(|r| MunicipalityInfo {
            codigo: r.cod_municipio,
            nome: r.municipio,
            uf: r.uf,
            estado: r.estado,
        })
}

/// Producing municipalities of a state in `ano`, in table order
pub fn municipalities_by_state(store: &DatasetStore, uf: &str, ano: i64) -> Vec<MunicipalitySummary> {
    let uf = uf.trim().to_uppercase();
    let state = Criterion::Eq(uf.as_str());
    let year = Criterion::Eq(ano);
    store
        .municipalities()
        .get_filtered(|r| {
            state.matches(&r.uf) && year.matches(&r.ano) && r.area_plantada.is_some_and(|a| a > 0.0)
        })
        .into_iter()
        .map(|r| MunicipalitySummary {
            codigo: r.cod_municipio,
            nome: r.municipio,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MunicipalityRow;

    fn row(code: &str, name: &str, uf: &str, ano: i64, area: Option<f64>) -> MunicipalityRow {
        MunicipalityRow {
            cod_municipio: code.to_string(),
            municipio: name.to_string(),
            uf: uf.to_string(),
            estado: if uf == "MT" { "Mato Grosso" } else { "Goiás" }.to_string(),
            ano,
            area_plantada: area,
            ..Default::default()
        }
    }

    fn store() -> DatasetStore {
        DatasetStore::builder()
            .municipalities(vec![
                row("5100201", "Água Boa", "MT", 2020, Some(170.0)),
                row("5100201", "Água Boa", "MT", 2021, Some(190.0)),
                row("5107925", "Sorriso", "MT", 2021, Some(620.0)),
                row("5103403", "Cuiabá", "MT", 2021, Some(0.0)),
                row("5105200", "Jauru", "MT", 2021, None),
                row("5208707", "Goiânia", "GO", 2021, Some(3.0)),
                row("5200050", "Abadia de Goiás", "GO", 2019, Some(1.0)),
            ])
            .build()
    }

    #[test]
    fn test_info_from_reference_year() {
        let info = municipality_info(&store(), "5100201").unwrap();
        assert_eq!(
            info,
            MunicipalityInfo {
                codigo: "5100201".to_string(),
                nome: "Água Boa".to_string(),
                uf: "MT".to_string(),
                estado: "Mato Grosso".to_string(),
            }
        );
    }

    #[test]
    fn test_info_absent_without_reference_year_row() {
        assert_eq!(municipality_info(&store(), "5200050"), None);
        assert_eq!(municipality_info(&store(), "9999999"), None);
    }

    #[test]
    fn test_by_state_filters_producers_and_uppercases() {
        let list = municipalities_by_state(&store(), "mt", 2021);
        let codes: Vec<&str> = list.iter().map(|m| m.codigo.as_str()).collect();
        assert_eq!(codes, vec!["5100201", "5107925"]);
        assert_eq!(list[1].nome, "Sorriso");
    }

    #[test]
    fn test_by_state_empty_when_none() {
        assert!(municipalities_by_state(&store(), "SP", 2021).is_empty());
        assert!(municipalities_by_state(&store(), "GO", 2022).is_empty());
    }
}
