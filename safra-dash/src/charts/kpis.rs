//! KPI cards for one harvest year

use serde::Serialize;

use super::{ChartError, NO_DATA_TEXT};
use crate::domain::{harvest_label, Source, SourceSelection};
use crate::store::{Criterion, DatasetStore, NationalAreaRow};

#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    pub ano: i64,
    /// Requested selection key: "todas", "ibge" or "conab"
    pub fonte: String,
    pub kpis: Kpis,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    pub area_nacional: KpiBlock,
    pub crescimento: KpiBlock,
    pub gap: KpiBlock,
    pub municipios: KpiBlock,
}

/// One card, either a single figure or an IBGE/CONAB pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "modo", rename_all = "lowercase")]
pub enum KpiBlock {
    Single {
        titulo: String,
        valor: String,
        variacao: String,
        tipo: Tone,
        label: String,
    },
    Dual {
        titulo: String,
        ibge: KpiEntry,
        conab: KpiEntry,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub valor: String,
    pub variacao: String,
    pub tipo: Tone,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
}

impl Tone {
    /// Positive when the comparison text mentions "Acima"
    fn from_comparison(text: &str) -> Self {
        if text.contains("Acima") {
            Tone::Positive
        } else {
            Tone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Single,
    Dual,
}

impl Mode {
    fn placeholder(self) -> &'static str {
        match self {
            Mode::Single => "-",
            Mode::Dual => "",
        }
    }
}

/// KPI report for `ano`
pub fn kpis(store: &DatasetStore, ano: i64, selection: SourceSelection) -> Result<KpiReport, ChartError> {
    let year = Criterion::Eq(ano);
    let row = store
        .national_area()
        .get_filtered(|r| year.matches(&r.ano))
        .into_iter()
        .next()
        .ok_or_else(|| ChartError::NotFound(format!("Sem dados nacionais para o ano {}", ano)))?;

    let area_title = format!("ÁREA NACIONAL (SAFRA {})", harvest_label(ano));
    let growth_title = "CRESCIMENTO ANUAL".to_string();

    let (area_nacional, crescimento) = match selection {
        SourceSelection::All => (
            KpiBlock::Dual {
                titulo: area_title,
                ibge: area_entry(&row, Source::Ibge, Mode::Dual),
                conab: area_entry(&row, Source::Conab, Mode::Dual),
            },
            KpiBlock::Dual {
                titulo: growth_title,
                ibge: growth_entry(&row, Source::Ibge),
                conab: growth_entry(&row, Source::Conab),
            },
        ),
        SourceSelection::One(source) => (
            single(area_title, area_entry(&row, source, Mode::Single)),
            single(growth_title, growth_entry(&row, source)),
        ),
    };

    Ok(KpiReport {
        ano,
        fonte: selection.key().to_string(),
        kpis: Kpis {
            area_nacional,
            crescimento,
            gap: gap_block(&row, ano),
            municipios: municipalities_block(&row),
        },
    })
}

fn single(titulo: String, entry: KpiEntry) -> KpiBlock {
    KpiBlock::Single {
        titulo,
        valor: entry.valor,
        variacao: entry.variacao,
        tipo: entry.tipo,
        label: entry.label,
    }
}

fn area_entry(row: &NationalAreaRow, source: Source, mode: Mode) -> KpiEntry {
    let (valor, variacao) = match row.area(source) {
        Some(area) if area > 0.0 => (format!("{:.1}M ha", area), row.variation_text(source).to_string()),
        _ => (mode.placeholder().to_string(), NO_DATA_TEXT.to_string()),
    };
    KpiEntry {
        valor,
        variacao,
        tipo: Tone::from_comparison(row.comparison(source)),
        label: source.label().to_string(),
    }
}

/// Growth always falls back to "-", whatever the card mode
fn growth_entry(row: &NationalAreaRow, source: Source) -> KpiEntry {
    let variation = row.variation(source);
    let (valor, variacao) = if variation == "-" || variation.is_empty() {
        ("-".to_string(), NO_DATA_TEXT.to_string())
    } else {
        (variation.to_string(), row.comparison(source).to_string())
    };
    KpiEntry {
        valor,
        variacao,
        tipo: Tone::from_comparison(row.comparison(source)),
        label: source.label().to_string(),
    }
}

fn gap_block(row: &NationalAreaRow, ano: i64) -> KpiBlock {
    let valor = if row.gap_ibge_conab.is_empty() {
        "-".to_string()
    } else {
        row.gap_ibge_conab.clone()
    };
    KpiBlock::Single {
        titulo: "GAP IBGE vs CONAB".to_string(),
        valor,
        variacao: row.gap_ibge_conab_text.clone(),
        tipo: Tone::Neutral,
        label: format!("Ano {}", ano),
    }
}

fn municipalities_block(row: &NationalAreaRow) -> KpiBlock {
    let (valor, variacao) = match row.qtde_mun {
        Some(count) if count > 0.0 => (group_thousands(count.trunc() as u64), row.var_mun_text.clone()),
        _ => ("-".to_string(), NO_DATA_TEXT.to_string()),
    };
    KpiBlock::Single {
        titulo: "MUNICÍPIOS PRODUTORES".to_string(),
        valor,
        variacao,
        tipo: Tone::Neutral,
        label: "Total".to_string(),
    }
}

/// 5570 → "5.570"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
