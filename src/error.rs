use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Which of the two required sheet columns could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Address,
    Institute,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Address => write!(f, "address"),
            ColumnKind::Institute => write!(f, "institute"),
        }
    }
}

/// Why a geocoding lookup produced no coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The service answered but had no candidate for the query.
    NoMatch,
    /// The service failed: transport error, timeout, bad status or bad payload.
    ServiceError(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NoMatch => write!(f, "no match"),
            UnresolvedReason::ServiceError(e) => write!(f, "geocoding service error: {}", e),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No {kind} column found in sheet")]
    MissingColumn { kind: ColumnKind },

    #[error("Could not resolve address '{address}' ({reason})")]
    UnresolvedAddress {
        address: String,
        reason: UnresolvedReason,
    },

    #[error("No rows match institute '{institute}'")]
    EmptyInstituteMatch { institute: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unresolved(address: impl Into<String>, reason: UnresolvedReason) -> Self {
        AppError::UnresolvedAddress {
            address: address.into(),
            reason,
        }
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, address) = match self {
            AppError::MissingColumn { kind } => {
                tracing::info!(column = %kind, "Sheet is missing a {} column", kind);
                (StatusCode::BAD_REQUEST, None)
            }
            AppError::UnresolvedAddress {
                ref address,
                ref reason,
            } => {
                tracing::warn!(address = %address, "Route build aborted: {}", reason);
                (StatusCode::UNPROCESSABLE_ENTITY, Some(address.clone()))
            }
            AppError::EmptyInstituteMatch { ref institute } => {
                tracing::info!("No rows for institute '{}'", institute);
                (StatusCode::NOT_FOUND, None)
            }
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, None),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let mut body = json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": message,
        });
        if let Some(address) = address {
            body["address"] = json!(address);
        }

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
