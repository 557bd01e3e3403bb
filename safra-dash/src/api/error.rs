//! Handler error type and its envelope rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::error;

use safra_common::api::ApiResponse;

use super::params::ParamError;
use crate::charts::ChartError;

/// Handler failure, rendered as a `success: false` envelope
#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(ParamError),
    /// 404, optionally with a structured payload under `data`
    NotFound {
        error: String,
        message: Option<String>,
        data: Option<Value>,
    },
    /// 500
    Internal { error: String, message: Option<String> },
}

impl ApiError {
    pub fn not_found(error: impl Into<String>) -> Self {
        ApiError::NotFound {
            error: error.into(),
            message: None,
            data: None,
        }
    }

    /// Map a formatter failure, attaching the endpoint's user-facing message
    pub fn from_chart(err: ChartError, message: &str) -> Self {
        match err {
            ChartError::Internal(_) => {
                error!("{}: {}", message, err);
                ApiError::Internal {
                    error: err.to_string(),
                    message: Some(message.to_string()),
                }
            }
            ChartError::WaterfallUnavailable { .. } => ApiError::NotFound {
                error: err.to_string(),
                message: Some(message.to_string()),
                data: Some(err.payload()),
            },
            ChartError::NotFound(_) => ApiError::NotFound {
                error: err.to_string(),
                message: Some(message.to_string()),
                data: None,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        ApiError::BadRequest(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: ApiResponse<Value> = match self {
            ApiError::BadRequest(err) => ApiResponse::failure(err.to_string()),
            ApiError::NotFound { error, message, data } => {
                let mut body = match data {
                    Some(data) => ApiResponse::failure_with_data(error, data),
                    None => ApiResponse::failure(error),
                };
                body.message = message;
                body
            }
            ApiError::Internal { error, message } => {
                let mut body = ApiResponse::failure(error);
                body.message = message;
                body
            }
        };

        (status, Json(body)).into_response()
    }
}
