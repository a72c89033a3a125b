//! Error handling for the Khata server
//!
//! Every failure surfaces to clients as `{ "message", "code", "field"? }`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::DocumentError;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Conflict {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

/// Error body returned to clients
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.clone(),
                Some(field.clone()),
            ),
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
                format!("A record with this {} already exists", field),
                Some(field.clone()),
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                "CONFLICT",
                message.clone(),
                Some(resource.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", resource),
                None,
            ),
            AppError::StorageError(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_ERROR",
                format!("Storage error: {}", msg),
                None,
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
                None,
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
                None,
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                None,
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            message,
            code: code.to_string(),
            field,
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return AppError::DuplicateEntry(
                        field_for_constraint(db_err.constraint().unwrap_or_default()).to_string(),
                    )
                }
                Some("23503") => {
                    return AppError::conflict(
                        db_err.table().unwrap_or("record"),
                        "The record is still referenced by other records",
                    )
                }
                Some("23514") => {
                    return AppError::ValidationError(db_err.message().to_string());
                }
                // numeric_value_out_of_range
                Some("22003") => {
                    return AppError::ValidationError(
                        "Value exceeds the supported range".to_string(),
                    );
                }
                _ => {}
            }
        }
        AppError::DatabaseError(err)
    }
}

/// JSON field name guarded by a unique constraint
fn field_for_constraint(constraint: &str) -> &'static str {
    match constraint {
        "products_sku_key" => "sku",
        "sales_invoice_number_key" => "invoiceNumber",
        "purchases_bill_number_key" => "billNumber",
        "staff_username_key" => "username",
        _ => "value",
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        match first_violation(&errors, String::new()) {
            Some((field, message)) => AppError::Validation { field, message },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Walk nested validation errors down to the first failing field
fn first_violation(errors: &ValidationErrors, prefix: String) -> Option<(String, String)> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| **name);

    for (name, kind) in fields {
        let path = if prefix.is_empty() {
            camel_case(name)
        } else {
            format!("{}.{}", prefix, camel_case(name))
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    return Some((path, message));
                }
            }
            // Flattened structs report under their own name; keep the outer path
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(inner, prefix.clone()) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                if let Some((index, inner)) = items.iter().next() {
                    if let Some(found) = first_violation(inner, format!("{}[{}]", path, index)) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::Validation {
            field: err.field(),
            message: err.message().to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "Name is required"))]
        display_name: String,
    }

    #[test]
    fn validation_errors_name_the_camel_case_field() {
        let err: AppError = Form {
            display_name: String::new(),
        }
        .validate()
        .unwrap_err()
        .into();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "displayName");
                assert_eq!(message, "Name is required");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::NotFound("Sale".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DuplicateEntry("sku".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::validation("quantity", "bad").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
