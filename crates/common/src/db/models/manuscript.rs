//! Manuscript entity
//!
//! The `status` column is owned by the lifecycle state machine in
//! `crate::workflow`; nothing else writes it. Which reviewers are
//! attached is tracked solely by the review ledger, there is no
//! single-reviewer column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manuscript lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManuscriptStatus {
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    Published,
}

impl ManuscriptStatus {
    /// Terminal statuses accept no further lifecycle transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ManuscriptStatus::Rejected | ManuscriptStatus::Published)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManuscriptStatus::Submitted => "submitted",
            ManuscriptStatus::UnderReview => "under_review",
            ManuscriptStatus::Accepted => "accepted",
            ManuscriptStatus::Rejected => "rejected",
            ManuscriptStatus::Published => "published",
        }
    }
}

impl fmt::Display for ManuscriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ManuscriptStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "submitted" => ManuscriptStatus::Submitted,
            "under_review" => ManuscriptStatus::UnderReview,
            "accepted" => ManuscriptStatus::Accepted,
            "rejected" => ManuscriptStatus::Rejected,
            "published" => ManuscriptStatus::Published,
            _ => ManuscriptStatus::Submitted,
        }
    }
}

impl From<ManuscriptStatus> for String {
    fn from(status: ManuscriptStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "manuscripts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub abstract_text: String,

    /// Reference into the external blob store for the uploaded file
    #[sea_orm(column_type = "Text")]
    pub file_key: String,

    /// Comma-separated keywords
    #[sea_orm(column_type = "Text")]
    pub keywords: String,

    /// Free-text co-author names; empty when the author submits alone
    #[sea_orm(column_type = "Text")]
    pub co_authors: String,

    #[sea_orm(column_type = "Text")]
    pub affiliations: String,

    pub author_id: Uuid,

    /// Set once at submission, never updated
    pub submitted_date: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    /// Publication fee received; set manually by an editor
    pub is_paid: bool,
}

impl Model {
    /// Get the lifecycle status as an enum
    pub fn manuscript_status(&self) -> ManuscriptStatus {
        ManuscriptStatus::from(self.status.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,

    #[sea_orm(has_one = "super::article::Entity")]
    Article,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ManuscriptStatus::Submitted,
            ManuscriptStatus::UnderReview,
            ManuscriptStatus::Accepted,
            ManuscriptStatus::Rejected,
            ManuscriptStatus::Published,
        ] {
            let s: String = status.into();
            assert_eq!(ManuscriptStatus::from(s), status);
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ManuscriptStatus::Rejected.is_terminal());
        assert!(ManuscriptStatus::Published.is_terminal());
        assert!(!ManuscriptStatus::Submitted.is_terminal());
        assert!(!ManuscriptStatus::UnderReview.is_terminal());
        assert!(!ManuscriptStatus::Accepted.is_terminal());
    }
}
