//! Error handling for the API gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API errors
///
/// Responses carry a short plain-text message. Store failures never leak
/// their detail to the caller; it is logged inside the request span, which
/// carries the `x-request-id` echoed back on the response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: common::error::Error,
    },

    #[error("Common error: {0}")]
    Common(#[from] common::error::Error),
}

impl ApiError {
    /// Classify a service error, reporting server-side failures with `message`
    pub fn from_service(err: common::error::Error, message: &'static str) -> Self {
        if err.is_client_error() {
            ApiError::Common(err)
        } else {
            ApiError::Store { message, source: err }
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store { message, .. } => (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()),
            ApiError::Common(e) => match e {
                // Client errors (4xx)
                common::error::Error::UnknownSymbol(_) => (
                    StatusCode::BAD_REQUEST,
                    "Invalid cryptocurrency symbol".to_string(),
                ),

                // Server errors (5xx)
                common::error::Error::ConfigurationError(_)
                | common::error::Error::Internal(_)
                | common::error::Error::Database(_)
                | common::error::Error::Migration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("API Error: {:?}", &self);
        } else {
            tracing::debug!("API Error: {}", &self);
        }

        (status, message).into_response()
    }
}
