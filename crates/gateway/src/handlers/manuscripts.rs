//! Manuscript handlers: submission, listing, decisions, payment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use scholarflow_common::{
    auth::{AuthContext, Role},
    db::Repository,
    errors::{AppError, Result},
    workflow::ops,
};

/// Request to submit a new manuscript
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitManuscriptRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1, max = 50000))]
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Reference into the external blob store for the uploaded file
    #[validate(length(min = 1, max = 1024))]
    pub file_key: String,

    /// Comma-separated keywords
    #[serde(default)]
    pub keywords: String,

    /// Free-text co-author names
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub co_authors: String,

    #[serde(default)]
    #[validate(length(max = 2048))]
    pub affiliations: String,
}

#[derive(Serialize)]
pub struct ManuscriptResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub file_key: String,
    pub keywords: String,
    pub co_authors: String,
    pub affiliations: String,
    pub author_id: Uuid,
    pub submitted_date: String,
    pub status: String,
    pub is_paid: bool,
}

impl From<scholarflow_common::db::models::Manuscript> for ManuscriptResponse {
    fn from(m: scholarflow_common::db::models::Manuscript) -> Self {
        Self {
            id: m.id,
            title: m.title,
            abstract_text: m.abstract_text,
            file_key: m.file_key,
            keywords: m.keywords,
            co_authors: m.co_authors,
            affiliations: m.affiliations,
            author_id: m.author_id,
            submitted_date: m.submitted_date.to_rfc3339(),
            status: m.status,
            is_paid: m.is_paid,
        }
    }
}

/// Submit a new manuscript
pub async fn submit_manuscript(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<SubmitManuscriptRequest>,
) -> Result<(StatusCode, Json<ManuscriptResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let manuscript = ops::submit_manuscript(
        state.db.write(),
        &state.notifier,
        &actor,
        ops::NewManuscript {
            title: request.title,
            abstract_text: request.abstract_text,
            file_key: request.file_key,
            keywords: request.keywords,
            co_authors: request.co_authors,
            affiliations: request.affiliations,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(manuscript.into())))
}

/// List manuscripts, shaped by the actor's roles: editors see every
/// submission, authors their own, reviewers the ones assigned to them
pub async fn list_manuscripts(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ManuscriptResponse>>> {
    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let manuscripts = if actor.has_role(Role::Editor) {
        repo.list_manuscripts().await?
    } else if actor.has_role(Role::Reviewer) {
        let mut out = Vec::new();
        for review in repo.list_reviews_for_reviewer(actor.id).await? {
            if let Some(m) = repo.find_manuscript_by_id(review.manuscript_id).await? {
                out.push(m);
            }
        }
        out
    } else {
        repo.list_manuscripts_by_author(actor.id).await?
    };

    Ok(Json(manuscripts.into_iter().map(Into::into).collect()))
}

/// Get a manuscript by ID; visible to editors, the author, and assigned
/// reviewers
pub async fn get_manuscript(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
) -> Result<Json<ManuscriptResponse>> {
    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let manuscript = repo
        .find_manuscript_by_id(manuscript_id)
        .await?
        .ok_or(AppError::ManuscriptNotFound { id: manuscript_id })?;

    let is_assigned_reviewer = repo.find_review(manuscript_id, actor.id).await?.is_some();
    if !actor.has_role(Role::Editor) && !actor.is_author_of(&manuscript) && !is_assigned_reviewer {
        return Err(AppError::AuthorizationDenied {
            message: "not a participant on this manuscript".into(),
        });
    }

    Ok(Json(manuscript.into()))
}

/// Request body for an editorial decision
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// "accepted" or "rejected"; anything else is ignored as a no-op
    pub decision: String,
}

#[derive(Serialize)]
pub struct DecisionResponse {
    pub manuscript: ManuscriptResponse,
    pub applied: bool,
    pub message: String,
}

/// Record an editorial decision
pub async fn make_decision(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>> {
    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let outcome = ops::decide(
        state.db.write(),
        &state.notifier,
        &actor,
        manuscript_id,
        &request.decision,
    )
    .await?;

    Ok(Json(DecisionResponse {
        manuscript: outcome.manuscript.into(),
        applied: outcome.applied,
        message: outcome.message,
    }))
}

/// Mark the publication fee as received
pub async fn mark_as_paid(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
) -> Result<Json<ManuscriptResponse>> {
    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let manuscript =
        ops::mark_paid(state.db.write(), &state.notifier, &actor, manuscript_id).await?;

    Ok(Json(manuscript.into()))
}
