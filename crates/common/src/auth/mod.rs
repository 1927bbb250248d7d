//! Actor and role authorization utilities
//!
//! Identity is an external collaborator: a fronting identity provider
//! authenticates the request and passes the stable user id in
//! `X-User-Id`. This module extracts that context and gates workflow
//! operations on the actor's capability set. A failed gate is a normal
//! control-flow outcome, never a fatal error, and nothing past it
//! mutates state.

use crate::db::models::{Manuscript, User};
use crate::errors::{AppError, Result};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::collections::HashSet;
use uuid::Uuid;

/// Non-exclusive capability tags a user may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Researcher,
    Reviewer,
    Editor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Researcher => "researcher",
            Role::Reviewer => "reviewer",
            Role::Editor => "editor",
        }
    }
}

/// An authenticated actor with a resolved capability set
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: HashSet<Role>,
}

impl Actor {
    /// Build an actor from a user row
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles(),
        }
    }

    /// Check membership in the capability set
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Require a capability, returning AuthorizationDenied if absent
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AppError::AuthorizationDenied {
                message: format!("{} role required", role.as_str()),
            })
        }
    }

    pub fn require_editor(&self) -> Result<()> {
        self.require_role(Role::Editor)
    }

    pub fn require_researcher(&self) -> Result<()> {
        self.require_role(Role::Researcher)
    }

    /// Ownership check for author-only views
    pub fn is_author_of(&self, manuscript: &Manuscript) -> bool {
        manuscript.author_id == self.id
    }
}

/// Request context extracted from the identity provider's headers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: Uuid,

    /// Request ID for tracing
    pub request_id: String,
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AppError::AuthorizationDenied {
                message: "Missing or invalid X-User-Id header".to_string(),
            })?;

        Ok(AuthContext {
            user_id,
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_with(roles: &[Role]) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            username: "jdoe".into(),
            email: "jdoe@example.org".into(),
            roles: roles.iter().copied().collect(),
        }
    }

    #[test]
    fn test_require_editor() {
        let editor = actor_with(&[Role::Editor]);
        assert!(editor.require_editor().is_ok());

        let researcher = actor_with(&[Role::Researcher]);
        let err = researcher.require_editor().unwrap_err();
        assert!(matches!(err, AppError::AuthorizationDenied { .. }));
    }

    #[test]
    fn test_multiple_roles() {
        let actor = actor_with(&[Role::Researcher, Role::Editor]);
        assert!(actor.has_role(Role::Researcher));
        assert!(actor.has_role(Role::Editor));
        assert!(!actor.has_role(Role::Reviewer));
        assert!(actor.require_researcher().is_ok());
    }

    #[test]
    fn test_is_author_of() {
        use crate::db::models::Manuscript;

        let actor = actor_with(&[Role::Researcher]);
        let manuscript = Manuscript {
            id: Uuid::new_v4(),
            title: "T".into(),
            abstract_text: "A".into(),
            file_key: "manuscripts/t.pdf".into(),
            keywords: String::new(),
            co_authors: String::new(),
            affiliations: String::new(),
            author_id: actor.id,
            submitted_date: chrono::Utc::now().into(),
            status: "submitted".into(),
            is_paid: false,
        };
        assert!(actor.is_author_of(&manuscript));

        let other = actor_with(&[Role::Researcher]);
        assert!(!other.is_author_of(&manuscript));
    }
}
