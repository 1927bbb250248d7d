//! Publication handlers: volumes, issues, and minted articles

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use scholarflow_common::{
    auth::AuthContext,
    db::models::{Article, Issue, Volume},
    db::Repository,
    errors::{AppError, Result},
    workflow::ops,
};

// ============================================================================
// Volumes
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVolumeRequest {
    #[validate(range(min = 1))]
    pub number: i32,

    #[validate(range(min = 1900, max = 2200))]
    pub year: i32,
}

#[derive(Serialize)]
pub struct VolumeResponse {
    pub id: Uuid,
    pub number: i32,
    pub year: i32,
    pub label: String,
}

impl From<Volume> for VolumeResponse {
    fn from(v: Volume) -> Self {
        let label = v.label();
        Self {
            id: v.id,
            number: v.number,
            year: v.year,
            label,
        }
    }
}

/// Create a volume (editor only)
pub async fn create_volume(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateVolumeRequest>,
) -> Result<(StatusCode, Json<VolumeResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;
    actor.require_editor()?;

    let volume = repo.create_volume(request.number, request.year).await?;
    Ok((StatusCode::CREATED, Json(volume.into())))
}

// ============================================================================
// Issues
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIssueRequest {
    pub volume_id: Uuid,

    #[validate(range(min = 1))]
    pub number: i32,

    pub publication_date: NaiveDate,
}

#[derive(Serialize)]
pub struct IssueResponse {
    pub id: Uuid,
    pub volume_id: Uuid,
    pub number: i32,
    pub publication_date: NaiveDate,
}

impl From<Issue> for IssueResponse {
    fn from(i: Issue) -> Self {
        Self {
            id: i.id,
            volume_id: i.volume_id,
            number: i.number,
            publication_date: i.publication_date,
        }
    }
}

/// Create an issue within a volume (editor only)
pub async fn create_issue(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateIssueRequest>,
) -> Result<(StatusCode, Json<IssueResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;
    actor.require_editor()?;

    let issue = repo
        .create_issue(request.volume_id, request.number, request.publication_date)
        .await?;
    Ok((StatusCode::CREATED, Json(issue.into())))
}

/// All issues, most recently published first
pub async fn list_issues(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<Vec<IssueResponse>>> {
    let repo = Repository::new(state.db.clone());
    let issues = repo.list_issues().await?;
    Ok(Json(issues.into_iter().map(Into::into).collect()))
}

#[derive(Serialize)]
pub struct IssueDetailResponse {
    #[serde(flatten)]
    pub issue: IssueResponse,
    pub articles: Vec<ArticleResponse>,
}

/// Issue plus its table of contents
pub async fn get_issue(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(issue_id): Path<Uuid>,
) -> Result<Json<IssueDetailResponse>> {
    let repo = Repository::new(state.db.clone());

    let issue = repo
        .find_issue_by_id(issue_id)
        .await?
        .ok_or(AppError::IssueNotFound { id: issue_id })?;

    let articles = repo.list_articles_for_issue(issue_id).await?;

    Ok(Json(IssueDetailResponse {
        issue: issue.into(),
        articles: articles.into_iter().map(Into::into).collect(),
    }))
}

// ============================================================================
// Articles
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct PublishRequest {
    pub issue_id: Uuid,

    pub page_start: Option<i32>,
    pub page_end: Option<i32>,

    #[validate(length(min = 1, max = 255))]
    pub doi: Option<String>,
}

#[derive(Serialize)]
pub struct ArticleResponse {
    pub id: Uuid,
    pub manuscript_id: Uuid,
    pub issue_id: Uuid,
    pub page_start: Option<i32>,
    pub page_end: Option<i32>,
    pub doi: Option<String>,
}

impl From<Article> for ArticleResponse {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            manuscript_id: a.manuscript_id,
            issue_id: a.issue_id,
            page_start: a.page_start,
            page_end: a.page_end,
            doi: a.doi,
        }
    }
}

/// Publish an accepted manuscript into an issue (editor only)
pub async fn publish_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(manuscript_id): Path<Uuid>,
    Json(request): Json<PublishRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let actor = repo.load_actor(auth.user_id).await?;

    let article = ops::publish(
        state.db.write(),
        &state.notifier,
        &actor,
        manuscript_id,
        request.issue_id,
        request.page_start,
        request.page_end,
        request.doi,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// Fetch a published article
pub async fn get_article(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(article_id): Path<Uuid>,
) -> Result<Json<ArticleResponse>> {
    let repo = Repository::new(state.db.clone());

    let article = repo
        .find_article_by_id(article_id)
        .await?
        .ok_or(AppError::ArticleNotFound { id: article_id })?;

    Ok(Json(article.into()))
}
