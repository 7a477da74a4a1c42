//! JSON error responses.
//!
//! Every failure leaves the service as `{"message": "..."}` with a status
//! code picked here, so handlers only need `?`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use meteo_weather::{DateRejection, WeatherError};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// `"<field> is required"`
    pub fn missing_field(field: &str) -> Self {
        Self::bad_request(format!("{} is required", field))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed with {}: {}", self.status, self.message);
        } else {
            tracing::debug!("Request rejected with {}: {}", self.status, self.message);
        }

        let body = serde_json::json!({ "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Date problems are the caller's fault and never retried.
impl From<DateRejection> for ApiError {
    fn from(e: DateRejection) -> Self {
        Self::forbidden(e.to_string())
    }
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        let status = match &e {
            WeatherError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            _ if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        if status != StatusCode::NOT_FOUND {
            tracing::warn!("Upstream failure: {}", e);
        }
        Self::new(status, e.user_message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request(format!("request body must be a JSON object: {}", e.body_text()))
    }
}
