//! Domain vocabulary shared by the store, the formatters and the API
//!
//! Sources, source selections ("todas"), harvest periods and the closed
//! parameter sets the dashboard accepts.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Harvest years with published data
pub const VALID_YEARS: [i64; 4] = [2019, 2020, 2021, 2022];

/// Harvest periods with a waterfall chart
pub const VALID_PERIODS: [&str; 3] = ["2019-2020", "2020-2021", "2021-2022"];

/// Year used to resolve a municipality's identity
pub const REFERENCE_YEAR: i64 = 2021;

/// Statistical agency providing planted-area figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Source {
    #[serde(rename = "IBGE")]
    Ibge,
    #[serde(rename = "CONAB")]
    Conab,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Ibge, Source::Conab];

    /// Upper-case label ("IBGE")
    pub fn label(self) -> &'static str {
        match self {
            Source::Ibge => "IBGE",
            Source::Conab => "CONAB",
        }
    }

    /// Lower-case key used in column and dataset names ("ibge")
    pub fn key(self) -> &'static str {
        match self {
            Source::Ibge => "ibge",
            Source::Conab => "conab",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Source {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ibge" => Ok(Source::Ibge),
            "conab" => Ok(Source::Conab),
            other => Err(format!("unknown source '{}'", other)),
        }
    }
}

/// A single source, or both ("todas")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    One(Source),
}

impl SourceSelection {
    /// Lower-case key as accepted on the query string
    pub fn key(self) -> &'static str {
        match self {
            SourceSelection::All => "todas",
            SourceSelection::One(source) => source.key(),
        }
    }

    /// Source to use where only one can be shown; "todas" falls back to CONAB
    pub fn primary(self) -> Source {
        match self {
            SourceSelection::All => Source::Conab,
            SourceSelection::One(source) => source,
        }
    }
}

impl FromStr for SourceSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("todas") {
            return Ok(SourceSelection::All);
        }
        s.parse().map(SourceSelection::One)
    }
}

/// Pair of consecutive harvest years written "YYYY-YYYY"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestPeriod {
    pub start: i64,
    pub end: i64,
}

impl HarvestPeriod {
    /// Suffix used in waterfall dataset names ("2019_2020")
    pub fn dataset_suffix(&self) -> String {
        format!("{}_{}", self.start, self.end)
    }
}

impl fmt::Display for HarvestPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for HarvestPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("period '{}' is not YYYY-YYYY", s))?;

        let parse_year = |part: &str| -> Result<i64, String> {
            if part.len() != 4 || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("period '{}' is not YYYY-YYYY", s));
            }
            part.parse::<i64>().map_err(|e| e.to_string())
        };

        Ok(HarvestPeriod {
            start: parse_year(start)?,
            end: parse_year(end)?,
        })
    }
}

/// "YY/YY" label of the harvest ending in `year` (2021 → "20/21")
pub fn harvest_label(year: i64) -> String {
    format!("{:02}/{:02}", (year - 1).rem_euclid(100), year.rem_euclid(100))
}

/// Name of the waterfall dataset for a source and period
pub fn waterfall_dataset_name(source: Source, period: &HarvestPeriod) -> String {
    format!("df_waterfall_{}_{}", source.key(), period.dataset_suffix())
}
