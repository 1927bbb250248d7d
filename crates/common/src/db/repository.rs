//! Repository pattern for database operations
//!
//! Provides a clean interface for the read and admin surface consumed by
//! the gateway. Lifecycle transitions live in `crate::workflow::ops` and
//! run inside their own transactions; nothing here mutates manuscript
//! status.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Load a user into an actor, failing with UserNotFound
    pub async fn load_actor(&self, id: Uuid) -> Result<crate::auth::Actor> {
        let user = self
            .find_user_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound { id })?;
        Ok(crate::auth::Actor::from_user(&user))
    }

    // ========================================================================
    // Manuscript Operations
    // ========================================================================

    /// Find manuscript by ID
    pub async fn find_manuscript_by_id(&self, id: Uuid) -> Result<Option<Manuscript>> {
        ManuscriptEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All manuscripts, newest first (editor dashboard)
    pub async fn list_manuscripts(&self) -> Result<Vec<Manuscript>> {
        ManuscriptEntity::find()
            .order_by_desc(ManuscriptColumn::SubmittedDate)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Manuscripts submitted by one author, newest first
    pub async fn list_manuscripts_by_author(&self, author_id: Uuid) -> Result<Vec<Manuscript>> {
        ManuscriptEntity::find()
            .filter(ManuscriptColumn::AuthorId.eq(author_id))
            .order_by_desc(ManuscriptColumn::SubmittedDate)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Review Operations
    // ========================================================================

    /// Find the review for a (manuscript, reviewer) pair
    pub async fn find_review(
        &self,
        manuscript_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Review>> {
        ReviewEntity::find()
            .filter(ReviewColumn::ManuscriptId.eq(manuscript_id))
            .filter(ReviewColumn::ReviewerId.eq(reviewer_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All reviews for a manuscript (editor decision screen)
    pub async fn list_reviews_for_manuscript(&self, manuscript_id: Uuid) -> Result<Vec<Review>> {
        ReviewEntity::find()
            .filter(ReviewColumn::ManuscriptId.eq(manuscript_id))
            .order_by_asc(ReviewColumn::DateAssigned)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Open and completed assignments for a reviewer (reviewer dashboard)
    pub async fn list_reviews_for_reviewer(&self, reviewer_id: Uuid) -> Result<Vec<Review>> {
        ReviewEntity::find()
            .filter(ReviewColumn::ReviewerId.eq(reviewer_id))
            .order_by_desc(ReviewColumn::DateAssigned)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Volume / Issue Operations
    // ========================================================================

    /// Create a volume; (number, year) must be unique
    pub async fn create_volume(&self, number: i32, year: i32) -> Result<Volume> {
        let existing = VolumeEntity::find()
            .filter(VolumeColumn::Number.eq(number))
            .filter(VolumeColumn::Year.eq(year))
            .one(self.write_conn())
            .await?;

        if existing.is_some() {
            return Err(AppError::DuplicateVolume { number, year });
        }

        let volume = VolumeActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number),
            year: Set(year),
        };

        volume.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Create an issue in an existing volume
    pub async fn create_issue(
        &self,
        volume_id: Uuid,
        number: i32,
        publication_date: chrono::NaiveDate,
    ) -> Result<Issue> {
        VolumeEntity::find_by_id(volume_id)
            .one(self.write_conn())
            .await?
            .ok_or(AppError::NotFound {
                resource_type: "volume".into(),
                id: volume_id.to_string(),
            })?;

        let issue = IssueActiveModel {
            id: Set(Uuid::new_v4()),
            volume_id: Set(volume_id),
            number: Set(number),
            publication_date: Set(publication_date),
        };

        issue.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find issue by ID
    pub async fn find_issue_by_id(&self, id: Uuid) -> Result<Option<Issue>> {
        IssueEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All issues, most recently published first
    pub async fn list_issues(&self) -> Result<Vec<Issue>> {
        IssueEntity::find()
            .order_by_desc(IssueColumn::PublicationDate)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Find article by ID
    pub async fn find_article_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        ArticleEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Articles bound to an issue, in page order
    pub async fn list_articles_for_issue(&self, issue_id: Uuid) -> Result<Vec<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::IssueId.eq(issue_id))
            .order_by_asc(ArticleColumn::PageStart)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Notification Operations
    // ========================================================================

    /// A recipient's notifications, newest first
    pub async fn list_notifications(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        NotificationEntity::find()
            .filter(NotificationColumn::RecipientId.eq(recipient_id))
            .order_by_desc(NotificationColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Mark a notification read; only its recipient may do so
    pub async fn mark_notification_read(
        &self,
        recipient_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification> {
        let notification = NotificationEntity::find_by_id(notification_id)
            .one(self.write_conn())
            .await?
            .ok_or(AppError::NotificationNotFound {
                id: notification_id,
            })?;

        // Ownership is reported as not-found: recipients cannot probe for
        // other users' notification ids
        if notification.recipient_id != recipient_id {
            return Err(AppError::NotificationNotFound {
                id: notification_id,
            });
        }

        let mut active: NotificationActiveModel = notification.into();
        active.is_read = Set(true);
        active.update(self.write_conn()).await.map_err(Into::into)
    }
}
