//! Dataset review endpoints: listing and paginated rows
//!
//! Lets operators check what the store actually loaded from the data folder.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;
use crate::pagination::{paginate, PAGE_SIZE};
use crate::store::{DatasetInfo, StoreError};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetInfo>,
    pub total: usize,
}

/// GET /api/datasets
pub async fn list_datasets(State(state): State<AppState>) -> Json<DatasetListResponse> {
    let datasets = state.store.datasets();
    Json(DatasetListResponse {
        total: datasets.len(),
        datasets,
    })
}

#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    /// 1-indexed
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct DatasetPageResponse {
    pub name: String,
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub rows: Vec<Value>,
}

/// GET /api/datasets/:name?page=N
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<DatasetPageResponse>, ApiError> {
    let dataset = state.store.get(&name).map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::not_found(format!("Dataset não encontrado: {}", name)),
        other => ApiError::Internal {
            error: other.to_string(),
            message: None,
        },
    })?;

    let total_rows = dataset.row_count();
    let pagination = paginate(total_rows, query.page);
    let rows = dataset
        .rows_json(pagination.offset, PAGE_SIZE)
        .map_err(|e| ApiError::Internal {
            error: e.to_string(),
            message: Some("Erro ao serializar dataset".to_string()),
        })?;

    Ok(Json(DatasetPageResponse {
        name,
        total_rows,
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        rows,
    }))
}
