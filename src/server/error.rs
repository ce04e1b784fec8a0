//! HTTP error responses.

use crate::core::errors::PredictError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// An error returned to HTTP clients.
///
/// Client errors carry their message; server errors only expose a generic
/// message while the cause is logged.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: &'static str,
    public_message: String,
}

impl ApiError {
    fn new(status: StatusCode, public_code: &'static str, public_message: impl Into<String>) -> Self {
        Self {
            status,
            public_code,
            public_message: public_message.into(),
        }
    }

    /// A `400` carrying `msg` to the client.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
    }

    /// A `500` with a generic message; `msg` is only logged.
    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "prediction failed",
        )
    }

    /// The HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        if err.is_client_error() {
            Self::bad_request(format!("could not read the uploaded image: {err}"))
        } else {
            Self::internal(format!("{err}: {err:?}"))
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("Upload too large: {}", err.body_text());
            Self::new(status, "PAYLOAD_TOO_LARGE", err.body_text())
        } else {
            Self::bad_request(err.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("prediction task did not complete: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            message: &'a str,
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.public_code,
                message: &self.public_message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
