//! Error types for ScholarFlow
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling
//!
//! Every workflow error here is recoverable: the worst outcome is
//! "operation rejected, state unchanged". There is no fatal class.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidPageRange,

    // Authorization errors (3xxx)
    AuthorizationDenied,

    // Resource errors (4xxx)
    NotFound,
    UserNotFound,
    ManuscriptNotFound,
    ReviewNotFound,
    IssueNotFound,
    ArticleNotFound,
    NotificationNotFound,

    // Conflict errors (5xxx)
    DuplicateAssignment,
    AlreadyPublished,
    DuplicateDoi,
    DuplicateVolume,

    // Workflow errors (6xxx)
    InvalidTransition,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // External service errors (8xxx)
    MailSendError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidPageRange => 1002,

            // Authz (3xxx)
            ErrorCode::AuthorizationDenied => 3001,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::UserNotFound => 4002,
            ErrorCode::ManuscriptNotFound => 4003,
            ErrorCode::ReviewNotFound => 4004,
            ErrorCode::IssueNotFound => 4005,
            ErrorCode::ArticleNotFound => 4006,
            ErrorCode::NotificationNotFound => 4007,

            // Conflicts (5xxx)
            ErrorCode::DuplicateAssignment => 5001,
            ErrorCode::AlreadyPublished => 5002,
            ErrorCode::DuplicateDoi => 5003,
            ErrorCode::DuplicateVolume => 5004,

            // Workflow (6xxx)
            ErrorCode::InvalidTransition => 6001,

            // Database (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            // External (8xxx)
            ErrorCode::MailSendError => 8001,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid page range: start {start} is after end {end}")]
    InvalidPageRange { start: i32, end: i32 },

    // Authorization errors
    #[error("Not permitted: {message}")]
    AuthorizationDenied { message: String },

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Manuscript not found: {id}")]
    ManuscriptNotFound { id: Uuid },

    #[error("Review not found for manuscript {manuscript_id} and reviewer {reviewer_id}")]
    ReviewNotFound {
        manuscript_id: Uuid,
        reviewer_id: Uuid,
    },

    #[error("Issue not found: {id}")]
    IssueNotFound { id: Uuid },

    #[error("Article not found: {id}")]
    ArticleNotFound { id: Uuid },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: Uuid },

    // Conflict errors
    #[error("Reviewer {reviewer_id} is already assigned to manuscript {manuscript_id}")]
    DuplicateAssignment {
        manuscript_id: Uuid,
        reviewer_id: Uuid,
    },

    #[error("Manuscript {manuscript_id} already has a published article")]
    AlreadyPublished { manuscript_id: Uuid },

    #[error("DOI already registered: {doi}")]
    DuplicateDoi { doi: String },

    #[error("Volume {number} ({year}) already exists")]
    DuplicateVolume { number: i32, year: i32 },

    // Workflow errors
    #[error("Invalid transition: cannot {action} a manuscript in status '{from}'")]
    InvalidTransition { from: String, action: String },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // External service errors; callers of Notifier never see this one
    #[error("Mail send failed: {message}")]
    MailSend { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidPageRange { .. } => ErrorCode::InvalidPageRange,
            AppError::AuthorizationDenied { .. } => ErrorCode::AuthorizationDenied,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::UserNotFound { .. } => ErrorCode::UserNotFound,
            AppError::ManuscriptNotFound { .. } => ErrorCode::ManuscriptNotFound,
            AppError::ReviewNotFound { .. } => ErrorCode::ReviewNotFound,
            AppError::IssueNotFound { .. } => ErrorCode::IssueNotFound,
            AppError::ArticleNotFound { .. } => ErrorCode::ArticleNotFound,
            AppError::NotificationNotFound { .. } => ErrorCode::NotificationNotFound,
            AppError::DuplicateAssignment { .. } => ErrorCode::DuplicateAssignment,
            AppError::AlreadyPublished { .. } => ErrorCode::AlreadyPublished,
            AppError::DuplicateDoi { .. } => ErrorCode::DuplicateDoi,
            AppError::DuplicateVolume { .. } => ErrorCode::DuplicateVolume,
            AppError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::MailSend { .. } => ErrorCode::MailSendError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } | AppError::InvalidPageRange { .. } => {
                StatusCode::BAD_REQUEST
            }

            // 403 Forbidden
            AppError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,

            // 404 Not Found
            AppError::NotFound { .. }
            | AppError::UserNotFound { .. }
            | AppError::ManuscriptNotFound { .. }
            | AppError::ReviewNotFound { .. }
            | AppError::IssueNotFound { .. }
            | AppError::ArticleNotFound { .. }
            | AppError::NotificationNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::DuplicateAssignment { .. }
            | AppError::AlreadyPublished { .. }
            | AppError::DuplicateDoi { .. }
            | AppError::DuplicateVolume { .. } => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            AppError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::MailSend { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        // DOI collisions surface as a field-level validation error
        let field = match &self {
            AppError::DuplicateDoi { .. } => Some("doi".to_string()),
            AppError::InvalidPageRange { .. } => Some("page_start".to_string()),
            AppError::Validation { field, .. } => field.clone(),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                field,
                request_id: None, // Filled by middleware
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::MailSend {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::ManuscriptNotFound { id: Uuid::nil() };
        assert_eq!(err.code(), ErrorCode::ManuscriptNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_authorization_denied_is_client_error() {
        let err = AppError::AuthorizationDenied {
            message: "editor role required".into(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_duplicate_assignment_conflict() {
        let err = AppError::DuplicateAssignment {
            manuscript_id: Uuid::nil(),
            reviewer_id: Uuid::nil(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code().as_code(), 5001);
    }

    #[test]
    fn test_invalid_transition_unprocessable() {
        let err = AppError::InvalidTransition {
            from: "submitted".into(),
            action: "publish".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_server_error() {
        let err = AppError::Internal {
            message: "Something went wrong".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }
}
