//! Query-string validation
//!
//! Every parameter is checked against a closed set before any formatter
//! runs. Failures become 400 responses with the messages below.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{HarvestPeriod, Source, SourceSelection, REFERENCE_YEAR, VALID_PERIODS, VALID_YEARS};

/// Default municipality shown when none is requested (Água Boa, MT)
pub const DEFAULT_MUNICIPALITY: &str = "5100201";

/// Invalid request parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Ano inválido: \"{0}\". Deve ser um número inteiro.")]
    YearNotInteger(String),

    #[error("Ano não disponível. Anos válidos: {}", join(&VALID_YEARS))]
    YearUnavailable(i64),

    #[error("Fonte inválida. Use: IBGE, CONAB")]
    WaterfallSource(String),

    #[error("Fonte inválida. Fontes válidas: todas, ibge, conab")]
    Selection(String),

    #[error("Período inválido. Use: {}", VALID_PERIODS.join(", "))]
    Period(String),
}

fn join(years: &[i64]) -> String {
    years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", ")
}

/// `?ano=` (default 2021), integer within the published years
pub fn year(raw: Option<&str>) -> Result<i64, ParamError> {
    let Some(raw) = raw else {
        return Ok(REFERENCE_YEAR);
    };
    let ano: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ParamError::YearNotInteger(raw.to_string()))?;
    if !VALID_YEARS.contains(&ano) {
        return Err(ParamError::YearUnavailable(ano));
    }
    Ok(ano)
}

/// `?fonte=` for KPIs and the map: todas / ibge / conab (default todas)
pub fn selection(raw: Option<&str>) -> Result<SourceSelection, ParamError> {
    match raw {
        None => Ok(SourceSelection::All),
        Some(raw) => raw.parse().map_err(|_| ParamError::Selection(raw.to_string())),
    }
}

/// `?fonte=` for the waterfall: IBGE / CONAB (default CONAB)
pub fn waterfall_source(raw: Option<&str>) -> Result<Source, ParamError> {
    match raw {
        None => Ok(Source::Conab),
        Some(raw) => raw
            .parse()
            .map_err(|_| ParamError::WaterfallSource(raw.to_string())),
    }
}

/// `?periodo=` (default 2019-2020), one of the published periods
pub fn period(raw: Option<&str>) -> Result<String, ParamError> {
    let raw = raw.unwrap_or(VALID_PERIODS[0]).trim();
    if !VALID_PERIODS.contains(&raw) {
        return Err(ParamError::Period(raw.to_string()));
    }
    raw.parse::<HarvestPeriod>()
        .map(|p| p.to_string())
        .map_err(|_| ParamError::Period(raw.to_string()))
}

/// Raw query string shared by every chart endpoint; all fields optional
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub ano: Option<String>,
    pub fonte: Option<String>,
    pub periodo: Option<String>,
    pub cod_municipio: Option<String>,
    pub uf: Option<String>,
}

impl ChartQuery {
    pub fn year(&self) -> Result<i64, ParamError> {
        year(self.ano.as_deref())
    }

    pub fn selection(&self) -> Result<SourceSelection, ParamError> {
        selection(self.fonte.as_deref())
    }

    pub fn waterfall_source(&self) -> Result<Source, ParamError> {
        waterfall_source(self.fonte.as_deref())
    }

    pub fn period(&self) -> Result<String, ParamError> {
        period(self.periodo.as_deref())
    }

    /// `?cod_municipio=`, falling back to `default`
    pub fn municipality<'a>(&'a self, default: &'a str) -> &'a str {
        self.cod_municipio.as_deref().map(str::trim).unwrap_or(default)
    }

    /// `?uf=`, upper-cased, empty when absent
    pub fn uf(&self) -> String {
        self.uf.as_deref().unwrap_or_default().trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year() {
        assert_eq!(year(None), Ok(2021));
        assert_eq!(year(Some("2019")), Ok(2019));
        assert_eq!(year(Some("2018")), Err(ParamError::YearUnavailable(2018)));
        assert_eq!(year(Some("abc")), Err(ParamError::YearNotInteger("abc".to_string())));
    }

    #[test]
    fn test_year_messages() {
        assert_eq!(
            ParamError::YearNotInteger("abc".to_string()).to_string(),
            "Ano inválido: \"abc\". Deve ser um número inteiro."
        );
        assert_eq!(
            ParamError::YearUnavailable(2030).to_string(),
            "Ano não disponível. Anos válidos: 2019, 2020, 2021, 2022"
        );
    }

    #[test]
    fn test_sources() {
        assert_eq!(selection(None), Ok(SourceSelection::All));
        assert_eq!(selection(Some("IBGE")), Ok(SourceSelection::One(Source::Ibge)));
        assert!(selection(Some("fao")).is_err());

        assert_eq!(waterfall_source(None), Ok(Source::Conab));
        assert_eq!(waterfall_source(Some("ibge")), Ok(Source::Ibge));
        assert!(waterfall_source(Some("todas")).is_err());
    }

    #[test]
    fn test_period() {
        assert_eq!(period(None).as_deref(), Ok("2019-2020"));
        assert_eq!(period(Some("2021-2022")).as_deref(), Ok("2021-2022"));
        let err = period(Some("2099-2100")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Período inválido. Use: 2019-2020, 2020-2021, 2021-2022"
        );
    }

    #[test]
    fn test_query_accessors() {
        let query = ChartQuery {
            uf: Some(" mt ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.uf(), "MT");
        assert_eq!(query.municipality(DEFAULT_MUNICIPALITY), "5100201");
    }
}
