//! Article entity
//!
//! The published form of an accepted manuscript. Exactly one per
//! manuscript; creating it is the terminal step of the lifecycle.

use crate::errors::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub manuscript_id: Uuid,

    pub issue_id: Uuid,

    pub page_start: Option<i32>,

    pub page_end: Option<i32>,

    /// Globally unique when present
    #[sea_orm(column_type = "Text", nullable, unique)]
    pub doi: Option<String>,
}

/// Validate an optional page range: start must not exceed end when both
/// are present.
pub fn validate_page_range(
    page_start: Option<i32>,
    page_end: Option<i32>,
) -> crate::errors::Result<()> {
    if let (Some(start), Some(end)) = (page_start, page_end) {
        if start > end {
            return Err(AppError::InvalidPageRange { start, end });
        }
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::manuscript::Entity",
        from = "Column::ManuscriptId",
        to = "super::manuscript::Column::Id"
    )]
    Manuscript,

    #[sea_orm(
        belongs_to = "super::issue::Entity",
        from = "Column::IssueId",
        to = "super::issue::Column::Id"
    )]
    Issue,
}

impl Related<super::manuscript::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manuscript.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_page_ranges() {
        assert!(validate_page_range(None, None).is_ok());
        assert!(validate_page_range(Some(10), None).is_ok());
        assert!(validate_page_range(None, Some(20)).is_ok());
        assert!(validate_page_range(Some(10), Some(20)).is_ok());
        assert!(validate_page_range(Some(10), Some(10)).is_ok());
    }

    #[test]
    fn test_inverted_page_range_rejected() {
        let err = validate_page_range(Some(21), Some(20)).unwrap_err();
        assert!(matches!(err, AppError::InvalidPageRange { start: 21, end: 20 }));
    }
}
