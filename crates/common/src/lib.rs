//! ScholarFlow Common Library
//!
//! Shared code for the ScholarFlow editorial workflow service including:
//! - Database entities and repository patterns
//! - Manuscript lifecycle state machine and workflow operations
//! - Notification dispatch (in-app rows + best-effort mail)
//! - Error types and handling
//! - Configuration management
//! - Actor/role authorization utilities
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod notify;
pub mod workflow;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use notify::Notifier;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of days a reviewer has to complete an assigned review
pub const DEFAULT_REVIEW_DUE_DAYS: i64 = 14;
