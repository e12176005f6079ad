//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

/// Wire shape of an error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Short description of what went wrong.
    pub error: String,
    /// Extra human-readable context, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw upstream detail, kept for manual diagnosis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Failures surfaced by the generation route.
#[derive(Debug)]
pub enum TerraformerError {
    /// Required request fields were absent or empty.
    MissingFields(Vec<&'static str>),
    /// Both reference-image sources failed.
    ReferenceFetch(String),
    /// The model answered with prose instead of an image.
    TextOnly(String),
    /// The generation API rejected the call outright.
    Upstream {
        /// HTTP status returned by the generation API.
        status: u16,
        /// Full upstream response body.
        details: Value,
    },
    /// Anything else.
    InternalServerError(String),
}

impl From<reqwest::Error> for TerraformerError {
    fn from(err: reqwest::Error) -> Self {
        TerraformerError::InternalServerError(err.to_string())
    }
}

impl From<url::ParseError> for TerraformerError {
    fn from(err: url::ParseError) -> Self {
        TerraformerError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for TerraformerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            TerraformerError::MissingFields(fields) => {
                info!("Rejected request, missing fields: {}", fields.join(", "));
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: "Missing required fields".to_string(),
                        message: Some(format!("Required: {}", fields.join(", "))),
                        details: None,
                    },
                )
            }
            TerraformerError::ReferenceFetch(message) => {
                error!("Reference image fetch failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Failed to fetch the reference image".to_string(),
                        message: Some(message),
                        details: None,
                    },
                )
            }
            TerraformerError::TextOnly(text) => {
                info!("Model returned text instead of an image");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: "The model returned text, not an image".to_string(),
                        message: None,
                        details: Some(Value::String(text)),
                    },
                )
            }
            TerraformerError::Upstream { status, details } => {
                error!("Generation API error {}: {}", status, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: format!("Generation API returned HTTP {}", status),
                        message: None,
                        details: Some(details),
                    },
                )
            }
            TerraformerError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: message,
                        message: None,
                        details: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
