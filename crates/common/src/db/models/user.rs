//! User entity
//!
//! Credentials and sessions live with the external identity provider;
//! this table only carries the profile and role flags the workflow needs.

use crate::auth::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text", unique)]
    pub username: String,

    #[sea_orm(column_type = "Text")]
    pub email: String,

    #[sea_orm(column_type = "Text")]
    pub affiliation: String,

    // Role flags are not mutually exclusive; a user may hold all three
    pub is_researcher: bool,

    pub is_reviewer: bool,

    pub is_editor: bool,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Capability set derived from the role flags. Authorization checks
    /// test membership in this set, never the flags directly.
    pub fn roles(&self) -> HashSet<Role> {
        let mut roles = HashSet::new();
        if self.is_researcher {
            roles.insert(Role::Researcher);
        }
        if self.is_reviewer {
            roles.insert(Role::Reviewer);
        }
        if self.is_editor {
            roles.insert(Role::Editor);
        }
        roles
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::manuscript::Entity")]
    Manuscripts,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::manuscript::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manuscripts.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
