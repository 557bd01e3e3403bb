//! Typed rows of the pre-computed dashboard tables
//!
//! One struct per table, one field per column the formatters read. Text
//! columns hold labels prepared upstream (variation texts, comparison
//! labels); this service only picks and concatenates them.

use serde::Serialize;

use crate::domain::Source;

use super::feather::{BatchColumns, FeatherRow};
use super::StoreError;

/// `area_nacional`: one row per harvest year
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NationalAreaRow {
    pub ano: i64,
    pub ano_safra: String,
    /// Planted area, millions of hectares
    pub area_plantada_ibge: Option<f64>,
    pub area_plantada_conab: Option<f64>,
    pub gap_ibge_conab: String,
    pub gap_ibge_conab_text: String,
    pub variacao_ibge: String,
    pub variacao_conab: String,
    pub variacao_ibge_text: String,
    pub variacao_conab_text: String,
    pub comp_ibge: String,
    pub comp_conab: String,
    /// Producing municipality count
    pub qtde_mun: Option<f64>,
    pub var_mun_text: String,
}

impl NationalAreaRow {
    pub fn area(&self, source: Source) -> Option<f64> {
        match source {
            Source::Ibge => self.area_plantada_ibge,
            Source::Conab => self.area_plantada_conab,
        }
    }

    pub fn variation(&self, source: Source) -> &str {
        match source {
            Source::Ibge => &self.variacao_ibge,
            Source::Conab => &self.variacao_conab,
        }
    }

    pub fn variation_text(&self, source: Source) -> &str {
        match source {
            Source::Ibge => &self.variacao_ibge_text,
            Source::Conab => &self.variacao_conab_text,
        }
    }

    pub fn comparison(&self, source: Source) -> &str {
        match source {
            Source::Ibge => &self.comp_ibge,
            Source::Conab => &self.comp_conab,
        }
    }
}

impl FeatherRow for NationalAreaRow {
    fn from_columns(columns: &BatchColumns<'_>) -> Result<Vec<Self>, StoreError> {
        let ano = columns.required_ints("ano")?;
        let ano_safra = columns.strings("ano_safra")?;
        let area_ibge = columns.floats("area_plantada_ibge")?;
        let area_conab = columns.floats("area_plantada_conab")?;
        let gap = columns.strings("gap_ibge_conab")?;
        let gap_text = columns.strings("gap_ibge_conab_text")?;
        let var_ibge = columns.strings("variacao_ibge")?;
        let var_conab = columns.strings("variacao_conab")?;
        let var_ibge_text = columns.strings("variacao_ibge_text")?;
        let var_conab_text = columns.strings("variacao_conab_text")?;
        let comp_ibge = columns.strings("comp_ibge")?;
        let comp_conab = columns.strings("comp_conab")?;
        let qtde_mun = columns.floats("qtde_mun")?;
        let var_mun_text = columns.strings("var_mun_text")?;

        Ok((0..columns.num_rows())
            .map(|i| NationalAreaRow {
                ano: ano[i],
                ano_safra: ano_safra[i].clone(),
                area_plantada_ibge: area_ibge[i],
                area_plantada_conab: area_conab[i],
                gap_ibge_conab: gap[i].clone(),
                gap_ibge_conab_text: gap_text[i].clone(),
                variacao_ibge: var_ibge[i].clone(),
                variacao_conab: var_conab[i].clone(),
                variacao_ibge_text: var_ibge_text[i].clone(),
                variacao_conab_text: var_conab_text[i].clone(),
                comp_ibge: comp_ibge[i].clone(),
                comp_conab: comp_conab[i].clone(),
                qtde_mun: qtde_mun[i],
                var_mun_text: var_mun_text[i].clone(),
            })
            .collect())
    }
}

/// `area_estadual`: one row per (state, harvest year)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateAreaRow {
    pub uf: String,
    pub ano: i64,
    pub ano_safra: String,
    /// Planted area, thousands of hectares
    pub area_plantada_ibge: Option<f64>,
    pub area_plantada_conab: Option<f64>,
    pub gap_ibge_conab: String,
    pub gap_ibge_conab_text: String,
    pub variacao_ibge: String,
    pub variacao_conab: String,
}

impl StateAreaRow {
    pub fn area(&self, source: Source) -> Option<f64> {
        match source {
            Source::Ibge => self.area_plantada_ibge,
            Source::Conab => self.area_plantada_conab,
        }
    }

    pub fn variation(&self, source: Source) -> &str {
        match source {
            Source::Ibge => &self.variacao_ibge,
            Source::Conab => &self.variacao_conab,
        }
    }
}

impl FeatherRow for StateAreaRow {
    fn from_columns(columns: &BatchColumns<'_>) -> Result<Vec<Self>, StoreError> {
        let uf = columns.strings("uf")?;
        let ano = columns.required_ints("ano")?;
        let ano_safra = columns.strings("ano_safra")?;
        let area_ibge = columns.floats("area_plantada_ibge")?;
        let area_conab = columns.floats("area_plantada_conab")?;
        let gap = columns.strings("gap_ibge_conab")?;
        let gap_text = columns.strings("gap_ibge_conab_text")?;
        let var_ibge = columns.strings("variacao_ibge")?;
        let var_conab = columns.strings("variacao_conab")?;

        Ok((0..columns.num_rows())
            .map(|i| StateAreaRow {
                uf: uf[i].clone(),
                ano: ano[i],
                ano_safra: ano_safra[i].clone(),
                area_plantada_ibge: area_ibge[i],
                area_plantada_conab: area_conab[i],
                gap_ibge_conab: gap[i].clone(),
                gap_ibge_conab_text: gap_text[i].clone(),
                variacao_ibge: var_ibge[i].clone(),
                variacao_conab: var_conab[i].clone(),
            })
            .collect())
    }
}

/// `df_waterfall_<source>_<start>_<end>`: one bar of a bridge chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaterfallRow {
    /// Year (anchor rows) or state (delta rows)
    pub step: String,
    /// Hectares; anchors are totals, interior rows signed deltas
    pub valor: f64,
    /// Plotly measure: "absolute", "relative" or "total"
    pub measure: String,
}

impl FeatherRow for WaterfallRow {
    fn from_columns(columns: &BatchColumns<'_>) -> Result<Vec<Self>, StoreError> {
        let step = columns.strings("step")?;
        let valor = columns.required_floats("valor")?;
        let measure = columns.strings("measure")?;

        Ok((0..columns.num_rows())
            .map(|i| WaterfallRow {
                step: step[i].clone(),
                valor: valor[i],
                measure: measure[i].clone(),
            })
            .collect())
    }
}

/// `base_municipios`: one row per (municipality, harvest year)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MunicipalityRow {
    pub cod_municipio: String,
    pub municipio: String,
    pub uf: String,
    pub estado: String,
    pub ano: i64,
    pub ano_safra: String,
    /// Thousands of hectares
    pub area_plantada: Option<f64>,
    pub area_plantada_estado: Option<f64>,
    /// State total minus this municipality
    pub area_plantada_estado_dif: Option<f64>,
    pub variacao: String,
    pub variacao_estado_ano: String,
    pub ranking: Option<i64>,
    pub representatividade_mun: String,
}

impl FeatherRow for MunicipalityRow {
    fn from_columns(columns: &BatchColumns<'_>) -> Result<Vec<Self>, StoreError> {
        let cod = columns.strings("cod_municipio")?;
        let municipio = columns.strings("municipio")?;
        let uf = columns.strings("uf")?;
        let estado = columns.strings("estado")?;
        let ano = columns.required_ints("ano")?;
        let ano_safra = columns.strings("ano_safra")?;
        let area = columns.floats("area_plantada")?;
        let area_estado = columns.floats("area_plantada_estado")?;
        let area_estado_dif = columns.floats("area_plantada_estado_dif")?;
        let variacao = columns.strings("variacao")?;
        let variacao_estado = columns.strings("variacao_estado_ano")?;
        let ranking = columns.ints("ranking")?;
        let representatividade = columns.strings("representatividade_mun")?;

        Ok((0..columns.num_rows())
            .map(|i| MunicipalityRow {
                cod_municipio: cod[i].clone(),
                municipio: municipio[i].clone(),
                uf: uf[i].clone(),
                estado: estado[i].clone(),
                ano: ano[i],
                ano_safra: ano_safra[i].clone(),
                area_plantada: area[i],
                area_plantada_estado: area_estado[i],
                area_plantada_estado_dif: area_estado_dif[i],
                variacao: variacao[i].clone(),
                variacao_estado_ano: variacao_estado[i].clone(),
                ranking: ranking[i],
                representatividade_mun: representatividade[i].clone(),
            })
            .collect())
    }
}
