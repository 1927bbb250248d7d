//! In-app notification inbox handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use scholarflow_common::{
    auth::AuthContext, db::models::Notification, db::Repository, errors::Result,
};

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// The caller's inbox, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<NotificationResponse>>> {
    let repo = Repository::new(state.db.clone());
    repo.load_actor(auth.user_id).await?;

    let notifications = repo.list_notifications(auth.user_id).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Mark one of the caller's notifications as read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<NotificationResponse>> {
    let repo = Repository::new(state.db.clone());
    repo.load_actor(auth.user_id).await?;

    let notification = repo
        .mark_notification_read(auth.user_id, notification_id)
        .await?;
    Ok(Json(notification.into()))
}
