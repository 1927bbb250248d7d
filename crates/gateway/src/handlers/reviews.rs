//! Review handlers: reviewer assignment and review submission

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use scholarflow_common::{
    auth::AuthContext,
    db::Repository,
    errors::{AppError, Result},
    workflow::ops,
};

/// Request to assign a reviewer
#[derive(Debug, Deserialize)]
pub struct AssignReviewerRequest {
    pub reviewer_id: Uuid,

    /// Defaults to 14 days from assignment when omitted
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub manuscript_id: Uuid,
    pub reviewer_id: Uuid,
    pub date_assigned: String,
    pub due_date: Option<String>,
    pub date_completed: Option<String>,
    pub comments: String,
    pub recommendation: String,
}

impl From<scholarflow_common::db::models::Review> for ReviewResponse {
    fn from(r: scholarflow_common::db::models::Review) -> Self {
        Self {
            id: r.id,
            manuscript_id: r.manuscript_id,
            reviewer_id: r.reviewer_id,
            date_assigned: r.date_assigned.to_rfc3339(),
            due_date: r.due_date.map(|d| d.to_rfc3339()),
            date_completed: r.date_completed.map(|d| d.to_rfc3339()),
            comments: r.comments,
            recommendation: r.recommendation,
        }
    }
}

/// Assign a reviewer to a manuscript
pub async fn assign_reviewer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
    Json(request): Json<AssignReviewerRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>)> {
    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let review = ops::assign_reviewer(
        state.db.write(),
        &state.notifier,
        &actor,
        manuscript_id,
        request.reviewer_id,
        request.due_date,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Request to submit a review
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    #[validate(length(max = 50000))]
    #[serde(default)]
    pub comments: String,

    /// One of accept / revise / reject
    pub recommendation: String,
}

/// Submit (or resubmit) a review for an assigned manuscript
pub async fn submit_review(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let review = ops::submit_review(
        state.db.write(),
        &state.notifier,
        &actor,
        manuscript_id,
        request.comments,
        &request.recommendation,
    )
    .await?;

    Ok(Json(review.into()))
}

/// All reviews for a manuscript (editor decision screen)
pub async fn list_reviews(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>> {
    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;
    actor.require_editor()?;

    repo.find_manuscript_by_id(manuscript_id)
        .await?
        .ok_or(AppError::ManuscriptNotFound { id: manuscript_id })?;

    let reviews = repo.list_reviews_for_manuscript(manuscript_id).await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}
