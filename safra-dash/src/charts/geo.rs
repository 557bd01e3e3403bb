//! State boundary GeoJSON, served as loaded

use serde_json::Value;

use super::ChartError;
use crate::store::{is_empty_document, DatasetStore};

/// The loaded state boundary document, unchanged
pub fn boundaries(store: &DatasetStore) -> Result<Value, ChartError> {
    let document = store.boundaries();
    if is_empty_document(&document) {
        return Err(ChartError::NotFound("GeoJSON não disponível".to_string()));
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_passthrough() {
        let doc = json!({"type": "FeatureCollection", "features": [{"id": "MT"}]});
        let store = DatasetStore::builder().boundaries(doc.clone()).build();
        assert_eq!(boundaries(&store).unwrap(), doc);
    }

    #[test]
    fn test_empty_document_is_not_found() {
        let store = DatasetStore::builder().build();
        assert!(boundaries(&store).unwrap_err().is_not_found());
    }
}
