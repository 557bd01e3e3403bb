//! Shared API response envelope
//!
//! Every dashboard endpoint (except the raw GeoJSON passthrough) answers with
//! the same envelope:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "...", "parameters": { ... } }
//! { "success": false, "error": "...", "message": "..." }
//! ```

use serde::Serialize;
use serde_json::Value;

/// Uniform success/error envelope
///
/// # Examples
///
/// ```
/// use safra_common::api::types::ApiResponse;
///
/// let ok = ApiResponse::ok(serde_json::json!({"total": 3}))
///     .with_message("3 municípios encontrados");
/// assert!(ok.success);
///
/// let err = ApiResponse::<()>::failure("Ano não disponível");
/// assert!(!err.success);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Echo of the validated request parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            parameters: None,
        }
    }

    /// Failed response with an error description
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            parameters: None,
        }
    }

    /// Failed response that still carries a structured payload
    pub fn failure_with_data(error: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::failure(error)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_skips_empty_fields() {
        let response = ApiResponse::ok(json!({"ano": 2021}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["ano"], 2021);
        assert!(value.get("error").is_none());
        assert!(value.get("message").is_none());
        assert!(value.get("parameters").is_none());
    }

    #[test]
    fn test_failure_envelope() {
        let response = ApiResponse::<Value>::failure("Fonte inválida")
            .with_message("Parâmetros inválidos");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Fonte inválida");
        assert_eq!(value["message"], "Parâmetros inválidos");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_failure_with_data() {
        let response =
            ApiResponse::failure_with_data("indisponível", json!({"error": "indisponível", "series": []}));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["data"]["series"], json!([]));
    }

    #[test]
    fn test_parameters_echo() {
        let response = ApiResponse::ok(1).with_parameters(json!({"fonte": "CONAB"}));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["parameters"]["fonte"], "CONAB");
    }
}
