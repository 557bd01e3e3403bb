//! Dataset Store
//!
//! Holds every pre-computed table and the state boundary document. Built
//! once at startup, immutable afterwards, shared between handlers through
//! `AppState`. Accessors return owned copies.
//!
//! Loading never fails: a missing file becomes an empty table (or an empty
//! JSON object for the boundary document), and any other read failure is
//! logged and also replaced by an empty value.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

use safra_common::config::DataPaths;

use crate::domain::{waterfall_dataset_name, HarvestPeriod, Source, VALID_PERIODS};

pub mod feather;
pub mod records;
mod table;

pub use records::{MunicipalityRow, NationalAreaRow, StateAreaRow, WaterfallRow};
pub use table::{Criterion, Table};

use feather::FeatherRow;

pub const NATIONAL_AREA: &str = "area_nacional";
pub const STATE_AREA: &str = "area_estadual";
pub const MUNICIPALITIES: &str = "base_municipios";
pub const BOUNDARIES: &str = "geo_estados";

/// Dataset store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Dataset '{0}' is not loaded")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset '{dataset}' has no column '{column}'")]
    MissingColumn { dataset: String, column: String },

    #[error("Column '{column}' of dataset '{dataset}' is not {expected}")]
    ColumnType {
        dataset: String,
        column: String,
        expected: String,
    },
}

/// Owned copy of one dataset, as returned by [`DatasetStore::get`]
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    NationalArea(Vec<NationalAreaRow>),
    StateArea(Vec<StateAreaRow>),
    Municipalities(Vec<MunicipalityRow>),
    Waterfall(Vec<WaterfallRow>),
    Boundaries(Value),
}

impl Dataset {
    /// Number of rows; the boundary document counts as one row unless empty
    pub fn row_count(&self) -> usize {
        match self {
            Dataset::NationalArea(rows) => rows.len(),
            Dataset::StateArea(rows) => rows.len(),
            Dataset::Municipalities(rows) => rows.len(),
            Dataset::Waterfall(rows) => rows.len(),
            Dataset::Boundaries(doc) => usize::from(!is_empty_document(doc)),
        }
    }

    /// Rows `offset..offset + limit` as JSON objects
    pub fn rows_json(&self, offset: usize, limit: usize) -> Result<Vec<Value>, StoreError> {
        fn page<R: Serialize>(rows: &[R], offset: usize, limit: usize) -> Result<Vec<Value>, StoreError> {
            rows.iter()
                .skip(offset)
                .take(limit)
                .map(|row| serde_json::to_value(row).map_err(StoreError::from))
                .collect()
        }

        match self {
            Dataset::NationalArea(rows) => page(rows, offset, limit),
            Dataset::StateArea(rows) => page(rows, offset, limit),
            Dataset::Municipalities(rows) => page(rows, offset, limit),
            Dataset::Waterfall(rows) => page(rows, offset, limit),
            Dataset::Boundaries(doc) => {
                if offset == 0 && limit > 0 && !is_empty_document(doc) {
                    Ok(vec![doc.clone()])
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }
}

/// Dataset name and size, for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub row_count: usize,
}

/// In-memory store of every dashboard dataset
#[derive(Debug, Clone)]
pub struct DatasetStore {
    national_area: Table<NationalAreaRow>,
    state_area: Table<StateAreaRow>,
    municipalities: Table<MunicipalityRow>,
    waterfalls: BTreeMap<String, Table<WaterfallRow>>,
    boundaries: Value,
}

impl DatasetStore {
    pub fn builder() -> DatasetStoreBuilder {
        DatasetStoreBuilder::default()
    }

    /// Load every dataset from the data folder
    pub fn load(paths: &DataPaths) -> Self {
        info!("Loading datasets from {}", paths.processed_dir.display());

        let mut builder = Self::builder()
            .national_area(load_table(paths, NATIONAL_AREA))
            .state_area(load_table(paths, STATE_AREA))
            .municipalities(load_table(paths, MUNICIPALITIES));

        for name in waterfall_dataset_names() {
            let rows = load_table(paths, &name);
            builder = builder.waterfall(name, rows);
        }

        let store = builder.boundaries(load_boundaries(&paths.geojson_file)).build();
        info!("✓ {} datasets loaded", store.datasets().len());
        store
    }

    /// Independent copy of a dataset by name
    pub fn get(&self, name: &str) -> Result<Dataset, StoreError> {
        match name {
            NATIONAL_AREA => Ok(Dataset::NationalArea(self.national_area.get())),
            STATE_AREA => Ok(Dataset::StateArea(self.state_area.get())),
            MUNICIPALITIES => Ok(Dataset::Municipalities(self.municipalities.get())),
            BOUNDARIES => Ok(Dataset::Boundaries(self.boundaries.clone())),
            other => self
                .waterfalls
                .get(other)
                .map(|table| Dataset::Waterfall(table.get()))
                .ok_or_else(|| StoreError::NotFound(other.to_string())),
        }
    }

    pub fn national_area(&self) -> &Table<NationalAreaRow> {
        &self.national_area
    }

    pub fn state_area(&self) -> &Table<StateAreaRow> {
        &self.state_area
    }

    pub fn municipalities(&self) -> &Table<MunicipalityRow> {
        &self.municipalities
    }

    /// Waterfall table by dataset name
    pub fn waterfall(&self, name: &str) -> Result<&Table<WaterfallRow>, StoreError> {
        self.waterfalls
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Copy of the boundary document (empty object when unavailable)
    pub fn boundaries(&self) -> Value {
        self.boundaries.clone()
    }

    /// Every dataset with its row count, sorted by name
    pub fn datasets(&self) -> Vec<DatasetInfo> {
        let mut infos = vec![
            DatasetInfo {
                name: NATIONAL_AREA.to_string(),
                row_count: self.national_area.len(),
            },
            DatasetInfo {
                name: STATE_AREA.to_string(),
                row_count: self.state_area.len(),
            },
            DatasetInfo {
                name: MUNICIPALITIES.to_string(),
                row_count: self.municipalities.len(),
            },
            DatasetInfo {
                name: BOUNDARIES.to_string(),
                row_count: usize::from(!is_empty_document(&self.boundaries)),
            },
        ];
        infos.extend(self.waterfalls.iter().map(|(name, table)| DatasetInfo {
            name: name.clone(),
            row_count: table.len(),
        }));
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}

/// Builder for [`DatasetStore`]; unspecified tables are empty
#[derive(Debug, Default)]
pub struct DatasetStoreBuilder {
    national_area: Vec<NationalAreaRow>,
    state_area: Vec<StateAreaRow>,
    municipalities: Vec<MunicipalityRow>,
    waterfalls: BTreeMap<String, Table<WaterfallRow>>,
    boundaries: Option<Value>,
}

impl DatasetStoreBuilder {
    pub fn national_area(mut self, rows: Vec<NationalAreaRow>) -> Self {
        self.national_area = rows;
        self
    }

    pub fn state_area(mut self, rows: Vec<StateAreaRow>) -> Self {
        self.state_area = rows;
        self
    }

    pub fn municipalities(mut self, rows: Vec<MunicipalityRow>) -> Self {
        self.municipalities = rows;
        self
    }

    /// Register a waterfall table under its dataset name
    pub fn waterfall(mut self, name: impl Into<String>, rows: Vec<WaterfallRow>) -> Self {
        self.waterfalls.insert(name.into(), Table::new(rows));
        self
    }

    pub fn boundaries(mut self, document: Value) -> Self {
        self.boundaries = Some(document);
        self
    }

    pub fn build(self) -> DatasetStore {
        DatasetStore {
            national_area: Table::new(self.national_area),
            state_area: Table::new(self.state_area),
            municipalities: Table::new(self.municipalities),
            waterfalls: self.waterfalls,
            boundaries: self
                .boundaries
                .unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

/// Dataset names of every (source, period) waterfall the dashboard offers
pub fn waterfall_dataset_names() -> Vec<String> {
    let mut names = Vec::new();
    for source in Source::ALL {
        for period in VALID_PERIODS {
            if let Ok(period) = period.parse::<HarvestPeriod>() {
                names.push(waterfall_dataset_name(source, &period));
            }
        }
    }
    names
}

fn load_table<R: FeatherRow>(paths: &DataPaths, dataset: &str) -> Vec<R> {
    let path = paths.feather(dataset);
    match feather::read_rows::<R>(&path, dataset) {
        Ok(rows) => {
            info!("Loaded {} ({} rows)", dataset, rows.len());
            rows
        }
        Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} not found, using empty table", path.display());
            Vec::new()
        }
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn load_boundaries(path: &Path) -> Value {
    let empty = || Value::Object(Default::default());

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("GeoJSON not found at {}", path.display());
            return empty();
        }
        Err(e) => {
            error!("Failed to open {}: {}", path.display(), e);
            return empty();
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(document) => {
            info!("Loaded state boundaries from {}", path.display());
            document
        }
        Err(e) => {
            error!("Failed to parse {}: {}", path.display(), e);
            empty()
        }
    }
}

/// An empty object, empty array or null document carries no boundaries
pub(crate) fn is_empty_document(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::feather::test_support::{write_feather, Col};
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn data_paths(root: &Path) -> DataPaths {
        let paths = DataPaths::from_root(root);
        fs::create_dir_all(&paths.processed_dir).unwrap();
        fs::create_dir_all(paths.geojson_file.parent().unwrap()).unwrap();
        paths
    }

    #[test]
    fn test_load_from_empty_folder_degrades_to_empty_tables() {
        let dir = tempdir().unwrap();
        let paths = data_paths(dir.path());

        let store = DatasetStore::load(&paths);

        assert!(store.national_area().is_empty());
        assert!(store.state_area().is_empty());
        assert!(store.municipalities().is_empty());
        assert_eq!(store.boundaries(), json!({}));
        // Missing waterfall files still register as (empty) datasets
        assert!(store.waterfall("df_waterfall_conab_2019_2020").unwrap().is_empty());
    }

    #[test]
    fn test_load_reads_feather_and_geojson() {
        let dir = tempdir().unwrap();
        let paths = data_paths(dir.path());

        write_feather(
            &paths.feather("df_waterfall_ibge_2020_2021"),
            vec![
                ("step", Col::Str(vec![Some("2020"), Some("MT"), Some("2021")])),
                ("valor", Col::F64(vec![Some(36_000_000.0), Some(500_000.0), Some(36_500_000.0)])),
                ("measure", Col::Str(vec![Some("absolute"), Some("relative"), Some("total")])),
            ],
        );
        fs::write(
            &paths.geojson_file,
            r#"{"type": "FeatureCollection", "features": []}"#,
        )
        .unwrap();

        let store = DatasetStore::load(&paths);

        let table = store.waterfall("df_waterfall_ibge_2020_2021").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get()[1].step, "MT");
        assert_eq!(store.boundaries()["type"], "FeatureCollection");
    }

    #[test]
    fn test_corrupt_files_degrade_to_empty() {
        let dir = tempdir().unwrap();
        let paths = data_paths(dir.path());
        fs::write(paths.feather(NATIONAL_AREA), b"garbage").unwrap();
        fs::write(&paths.geojson_file, b"{ not json").unwrap();

        let store = DatasetStore::load(&paths);

        assert!(store.national_area().is_empty());
        assert_eq!(store.boundaries(), json!({}));
    }

    #[test]
    fn test_get_unknown_name_is_not_found() {
        let store = DatasetStore::builder().build();
        assert!(matches!(
            store.get("df_waterfall_conab_2099_2100"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.get("area_nacional"), Ok(Dataset::NationalArea(_))));
    }

    #[test]
    fn test_get_returns_copy() {
        let store = DatasetStore::builder()
            .state_area(vec![StateAreaRow {
                uf: "MT".to_string(),
                ano: 2021,
                ..Default::default()
            }])
            .build();

        if let Ok(Dataset::StateArea(mut rows)) = store.get(STATE_AREA) {
            rows[0].uf = "XX".to_string();
        } else {
            panic!("expected state area dataset");
        }

        assert_eq!(store.state_area().get()[0].uf, "MT");
    }

    #[test]
    fn test_datasets_listing_sorted() {
        let store = DatasetStore::builder()
            .waterfall("df_waterfall_conab_2019_2020", vec![WaterfallRow::default()])
            .boundaries(json!({"type": "FeatureCollection"}))
            .build();

        let names: Vec<String> = store.datasets().into_iter().map(|d| d.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let geo = store
            .datasets()
            .into_iter()
            .find(|d| d.name == BOUNDARIES)
            .unwrap();
        assert_eq!(geo.row_count, 1);
    }

    #[test]
    fn test_rows_json_paging() {
        let rows = (0..5)
            .map(|i| WaterfallRow {
                step: format!("s{}", i),
                valor: i as f64,
                measure: "relative".to_string(),
            })
            .collect();
        let dataset = Dataset::Waterfall(rows);

        let page = dataset.rows_json(2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["step"], "s2");
        assert_eq!(page[1]["valor"], 3.0);
    }

    #[test]
    fn test_waterfall_names_cover_sources_and_periods() {
        let names = waterfall_dataset_names();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"df_waterfall_ibge_2021_2022".to_string()));
        assert!(names.contains(&"df_waterfall_conab_2019_2020".to_string()));
    }
}
