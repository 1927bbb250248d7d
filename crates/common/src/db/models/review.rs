//! Review entity
//!
//! One row per (manuscript, reviewer) pair. Created at assignment with an
//! empty recommendation; filled in once when the reviewer submits. Never
//! deleted in normal flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reviewer recommendation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Accept,
    Revise,
    Reject,
}

impl Recommendation {
    /// Parse a wire value; `None` for anything outside the three choices
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(Recommendation::Accept),
            "revise" => Some(Recommendation::Revise),
            "reject" => Some(Recommendation::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Accept => "accept",
            Recommendation::Revise => "revise",
            Recommendation::Reject => "reject",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub manuscript_id: Uuid,

    pub reviewer_id: Uuid,

    pub date_assigned: DateTimeWithTimeZone,

    /// Informational deadline; nothing fires when it passes
    pub due_date: Option<DateTimeWithTimeZone>,

    /// Null until the reviewer submits
    pub date_completed: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "Text")]
    pub comments: String,

    /// Empty string until submitted, then one of accept/revise/reject
    #[sea_orm(column_type = "Text")]
    pub recommendation: String,
}

impl Model {
    /// Whether the reviewer has submitted this review
    pub fn is_completed(&self) -> bool {
        self.date_completed.is_some()
    }

    /// The submitted recommendation, if any
    pub fn parsed_recommendation(&self) -> Option<Recommendation> {
        Recommendation::parse(&self.recommendation)
    }
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
        belongs_to = "super::user::Entity",
        from = "Column::ReviewerId",
        to = "super::user::Column::Id"
    )]
    Reviewer,
}

impl Related<super::manuscript::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manuscript.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviewer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_parse() {
        assert_eq!(Recommendation::parse("accept"), Some(Recommendation::Accept));
        assert_eq!(Recommendation::parse("revise"), Some(Recommendation::Revise));
        assert_eq!(Recommendation::parse("reject"), Some(Recommendation::Reject));
        assert_eq!(Recommendation::parse("maybe"), None);
        assert_eq!(Recommendation::parse(""), None);
    }

    #[test]
    fn test_pending_review_has_no_recommendation() {
        let review = Model {
            id: Uuid::new_v4(),
            manuscript_id: Uuid::new_v4(),
            reviewer_id: Uuid::new_v4(),
            date_assigned: chrono::Utc::now().into(),
            due_date: None,
            date_completed: None,
            comments: String::new(),
            recommendation: String::new(),
        };
        assert!(!review.is_completed());
        assert_eq!(review.parsed_recommendation(), None);
    }
}
