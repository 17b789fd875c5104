use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use service::address_book::AddressBookError;

/// Error returned by address book handlers, rendered as `{"code", "error"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    AddressBook(#[from] AddressBookError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::AddressBook(e) => match e {
                AddressBookError::Validation(_) | AddressBookError::InvalidLocation(_) => StatusCode::BAD_REQUEST,
                AddressBookError::NotFound => StatusCode::NOT_FOUND,
                AddressBookError::Geocode(_) => StatusCode::BAD_GATEWAY,
                AddressBookError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 4001,
            ApiError::AddressBook(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status == StatusCode::BAD_GATEWAY {
            warn!(code = self.code(), error = %msg, "upstream geocoder failed");
        } else if status.is_server_error() {
            error!(code = self.code(), error = %msg, "address book request failed");
        }
        (status, Json(serde_json::json!({"code": self.code(), "error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
