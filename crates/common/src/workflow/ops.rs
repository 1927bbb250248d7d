//! Workflow operations
//!
//! Each operation follows the same discipline:
//! 1. role gate first - a failed gate performs zero mutations;
//! 2. one transaction wrapping the status mutation, its dependent row
//!    (Review/Article), and the in-app notification rows;
//! 3. external mail rides along best-effort inside the dispatcher and
//!    never affects the transaction.

use crate::auth::Actor;
use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::notify::Notifier;
use crate::workflow::lifecycle::{self, Decision};
use crate::workflow::messages;
use crate::DEFAULT_REVIEW_DUE_DAYS;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

/// Payload for a new manuscript submission
#[derive(Debug, Clone)]
pub struct NewManuscript {
    pub title: String,
    pub abstract_text: String,
    pub file_key: String,
    pub keywords: String,
    pub co_authors: String,
    pub affiliations: String,
}

/// Result of posting an editorial decision
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub manuscript: Manuscript,
    /// False when the posted value was unrecognized and ignored
    pub applied: bool,
    pub message: String,
}

async fn find_manuscript(txn: &DatabaseTransaction, id: Uuid) -> Result<Manuscript> {
    ManuscriptEntity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or(AppError::ManuscriptNotFound { id })
}

async fn find_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<User> {
    UserEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::UserNotFound { id })
}

async fn notify_author(
    txn: &DatabaseTransaction,
    notifier: &Notifier,
    manuscript: &Manuscript,
    notice: messages::Notice,
) -> Result<()> {
    let author = find_user(txn, manuscript.author_id).await?;
    notifier
        .notify(
            txn,
            &author,
            &notice.subject,
            &notice.body,
            notice.link.as_deref(),
        )
        .await?;
    Ok(())
}

async fn notify_editors(
    txn: &DatabaseTransaction,
    notifier: &Notifier,
    notice: &messages::Notice,
) -> Result<()> {
    let editors = UserEntity::find()
        .filter(UserColumn::IsEditor.eq(true))
        .all(txn)
        .await?;

    // Independent dispatch per editor; the in-app rows share the
    // transaction, mail failures among them are tolerated
    for editor in &editors {
        notifier
            .notify(
                txn,
                editor,
                &notice.subject,
                &notice.body,
                notice.link.as_deref(),
            )
            .await?;
    }
    Ok(())
}

/// Submit a new manuscript.
///
/// Actor must hold the researcher role. The manuscript starts in
/// `submitted`; the author and every editor are notified.
pub async fn submit_manuscript(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    new: NewManuscript,
) -> Result<Manuscript> {
    actor.require_researcher()?;

    let txn = db.begin().await?;

    // The identity provider vouches for the actor, but the author row
    // must exist for notification fan-out
    let author = find_user(&txn, actor.id).await?;

    let manuscript = ManuscriptActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(new.title),
        abstract_text: Set(new.abstract_text),
        file_key: Set(new.file_key),
        keywords: Set(new.keywords),
        co_authors: Set(new.co_authors),
        affiliations: Set(new.affiliations),
        author_id: Set(author.id),
        submitted_date: Set(Utc::now().into()),
        status: Set(ManuscriptStatus::Submitted.into()),
        is_paid: Set(false),
    }
    .insert(&txn)
    .await?;

    let notice = messages::manuscript_submitted_author(&manuscript);
    notifier
        .notify(
            &txn,
            &author,
            &notice.subject,
            &notice.body,
            notice.link.as_deref(),
        )
        .await?;

    notify_editors(
        &txn,
        notifier,
        &messages::manuscript_submitted_editor(&manuscript),
    )
    .await?;

    txn.commit().await?;

    crate::metrics::record_transition("new", "submitted");
    info!(
        manuscript_id = %manuscript.id,
        author_id = %actor.id,
        "Manuscript submitted"
    );

    Ok(manuscript)
}

/// Assign a reviewer to a manuscript.
///
/// Editor only. Creates the pending Review row; the first assignment
/// advances the manuscript from `submitted` to `under_review`. A second
/// assignment of the same reviewer is refused as a duplicate without
/// touching state.
pub async fn assign_reviewer(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    manuscript_id: Uuid,
    reviewer_id: Uuid,
    due_date: Option<DateTime<Utc>>,
) -> Result<Review> {
    actor.require_editor()?;

    let txn = db.begin().await?;

    let manuscript = find_manuscript(&txn, manuscript_id).await?;
    let status = manuscript.manuscript_status();

    if !lifecycle::assignment_allowed(status) {
        return Err(AppError::InvalidTransition {
            from: status.to_string(),
            action: "assign a reviewer to".into(),
        });
    }

    let reviewer = find_user(&txn, reviewer_id).await?;
    if !reviewer.is_reviewer {
        return Err(AppError::Validation {
            message: format!("user {} does not hold the reviewer role", reviewer.username),
            field: Some("reviewer_id".into()),
        });
    }

    let existing = ReviewEntity::find()
        .filter(ReviewColumn::ManuscriptId.eq(manuscript_id))
        .filter(ReviewColumn::ReviewerId.eq(reviewer_id))
        .one(&txn)
        .await?;

    if existing.is_some() {
        // The ledger keeps one row per (manuscript, reviewer); the
        // duplicate attempt changes nothing
        return Err(AppError::DuplicateAssignment {
            manuscript_id,
            reviewer_id,
        });
    }

    let now = Utc::now();
    let due = due_date.unwrap_or(now + Duration::days(DEFAULT_REVIEW_DUE_DAYS));

    let review = ReviewActiveModel {
        id: Set(Uuid::new_v4()),
        manuscript_id: Set(manuscript_id),
        reviewer_id: Set(reviewer_id),
        date_assigned: Set(now.into()),
        due_date: Set(Some(due.into())),
        date_completed: Set(None),
        comments: Set(String::new()),
        recommendation: Set(String::new()),
    }
    .insert(&txn)
    .await?;

    // First assignment flips submitted -> under_review; later
    // assignments leave the status alone
    let manuscript = if status == ManuscriptStatus::Submitted {
        let mut active: ManuscriptActiveModel = manuscript.into();
        active.status = Set(ManuscriptStatus::UnderReview.into());
        let updated = active.update(&txn).await?;
        crate::metrics::record_transition("submitted", "under_review");
        updated
    } else {
        manuscript
    };

    let notice = messages::reviewer_assigned(&manuscript);
    notifier
        .notify(
            &txn,
            &reviewer,
            &notice.subject,
            &notice.body,
            notice.link.as_deref(),
        )
        .await?;

    notify_author(
        &txn,
        notifier,
        &manuscript,
        messages::under_review_author(&manuscript),
    )
    .await?;

    txn.commit().await?;

    info!(
        manuscript_id = %manuscript_id,
        reviewer_id = %reviewer_id,
        actor_id = %actor.id,
        "Reviewer assigned"
    );

    Ok(review)
}

/// Submit (or resubmit) a review.
///
/// The actor must own the Review row for this manuscript; a missing row
/// is a not-found condition, not a crash. Resubmission overwrites the
/// previous content. The manuscript status is untouched - the editorial
/// decision is a separate action.
pub async fn submit_review(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    manuscript_id: Uuid,
    comments: String,
    recommendation: &str,
) -> Result<Review> {
    let recommendation =
        Recommendation::parse(recommendation).ok_or_else(|| AppError::Validation {
            message: format!("unrecognized recommendation '{}'", recommendation),
            field: Some("recommendation".into()),
        })?;

    let txn = db.begin().await?;

    let review = ReviewEntity::find()
        .filter(ReviewColumn::ManuscriptId.eq(manuscript_id))
        .filter(ReviewColumn::ReviewerId.eq(actor.id))
        .one(&txn)
        .await?
        .ok_or(AppError::ReviewNotFound {
            manuscript_id,
            reviewer_id: actor.id,
        })?;

    let manuscript = find_manuscript(&txn, manuscript_id).await?;

    let mut active: ReviewActiveModel = review.into();
    active.comments = Set(comments);
    active.recommendation = Set(recommendation.as_str().to_string());
    active.date_completed = Set(Some(Utc::now().into()));
    let review = active.update(&txn).await?;

    notify_editors(
        &txn,
        notifier,
        &messages::review_submitted_editor(&manuscript, &actor.username),
    )
    .await?;

    txn.commit().await?;

    info!(
        manuscript_id = %manuscript_id,
        reviewer_id = %actor.id,
        recommendation = recommendation.as_str(),
        "Review submitted"
    );

    Ok(review)
}

/// Record an editorial decision.
///
/// Editor only. A value outside {accepted, rejected} is ignored: no
/// state change, no notification, but a successful (no-op) outcome so
/// malformed input never fails the request.
pub async fn decide(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    manuscript_id: Uuid,
    decision: &str,
) -> Result<DecisionOutcome> {
    actor.require_editor()?;

    let manuscript = ManuscriptEntity::find_by_id(manuscript_id)
        .one(db)
        .await?
        .ok_or(AppError::ManuscriptNotFound { id: manuscript_id })?;

    let Some(decision) = Decision::parse(decision) else {
        info!(
            manuscript_id = %manuscript_id,
            posted = decision,
            "Unrecognized decision value ignored"
        );
        return Ok(DecisionOutcome {
            applied: false,
            message: format!("Unrecognized decision '{}'; status unchanged", decision),
            manuscript,
        });
    };

    let from = manuscript.manuscript_status();
    let to = decision.target_status();

    if !lifecycle::permits(from, to) {
        return Err(AppError::InvalidTransition {
            from: from.to_string(),
            action: "record a decision on".into(),
        });
    }

    let txn = db.begin().await?;

    let mut active: ManuscriptActiveModel = manuscript.into();
    active.status = Set(to.into());
    let manuscript = active.update(&txn).await?;

    let notice = match decision {
        Decision::Accepted => messages::decision_accepted(&manuscript),
        Decision::Rejected => messages::decision_rejected(&manuscript),
    };
    notify_author(&txn, notifier, &manuscript, notice).await?;

    txn.commit().await?;

    crate::metrics::record_transition(from.as_str(), to.as_str());
    info!(
        manuscript_id = %manuscript_id,
        actor_id = %actor.id,
        from = from.as_str(),
        to = to.as_str(),
        "Decision recorded"
    );

    Ok(DecisionOutcome {
        message: format!("Manuscript {}", to.as_str()),
        manuscript,
        applied: true,
    })
}

/// Publish an accepted manuscript as an article in an issue.
///
/// Editor only. The manuscript must be in `accepted` status; publishing
/// does not require the payment flag. Creates exactly one Article and
/// flips the status to `published` in the same transaction.
#[allow(clippy::too_many_arguments)]
pub async fn publish(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    manuscript_id: Uuid,
    issue_id: Uuid,
    page_start: Option<i32>,
    page_end: Option<i32>,
    doi: Option<String>,
) -> Result<Article> {
    actor.require_editor()?;
    validate_page_range(page_start, page_end)?;

    let txn = db.begin().await?;

    let manuscript = find_manuscript(&txn, manuscript_id).await?;
    let status = manuscript.manuscript_status();

    if !lifecycle::permits(status, ManuscriptStatus::Published) {
        return Err(AppError::InvalidTransition {
            from: status.to_string(),
            action: "publish".into(),
        });
    }

    // The 1:1 constraint makes a second publish impossible; checked here
    // to surface the dedicated error instead of a bare key violation
    let existing = ArticleEntity::find()
        .filter(ArticleColumn::ManuscriptId.eq(manuscript_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::AlreadyPublished { manuscript_id });
    }

    IssueEntity::find_by_id(issue_id)
        .one(&txn)
        .await?
        .ok_or(AppError::IssueNotFound { id: issue_id })?;

    if let Some(ref doi) = doi {
        let collision = ArticleEntity::find()
            .filter(ArticleColumn::Doi.eq(doi))
            .one(&txn)
            .await?;
        if collision.is_some() {
            return Err(AppError::DuplicateDoi { doi: doi.clone() });
        }
    }

    let article = ArticleActiveModel {
        id: Set(Uuid::new_v4()),
        manuscript_id: Set(manuscript_id),
        issue_id: Set(issue_id),
        page_start: Set(page_start),
        page_end: Set(page_end),
        doi: Set(doi),
    }
    .insert(&txn)
    .await?;

    let mut active: ManuscriptActiveModel = manuscript.into();
    active.status = Set(ManuscriptStatus::Published.into());
    let manuscript = active.update(&txn).await?;

    notify_author(
        &txn,
        notifier,
        &manuscript,
        messages::article_published(&manuscript, &article),
    )
    .await?;

    txn.commit().await?;

    crate::metrics::record_transition("accepted", "published");
    info!(
        manuscript_id = %manuscript_id,
        article_id = %article.id,
        issue_id = %issue_id,
        actor_id = %actor.id,
        "Article published"
    );

    Ok(article)
}

/// Mark the publication fee as received.
///
/// Editor only. Status-preserving; permitted in any state.
pub async fn mark_paid(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor: &Actor,
    manuscript_id: Uuid,
) -> Result<Manuscript> {
    actor.require_editor()?;

    let txn = db.begin().await?;

    let manuscript = find_manuscript(&txn, manuscript_id).await?;

    let mut active: ManuscriptActiveModel = manuscript.into();
    active.is_paid = Set(true);
    let manuscript = active.update(&txn).await?;

    notify_author(
        &txn,
        notifier,
        &manuscript,
        messages::payment_received(&manuscript),
    )
    .await?;

    txn.commit().await?;

    info!(
        manuscript_id = %manuscript_id,
        actor_id = %actor.id,
        "Payment recorded"
    );

    Ok(manuscript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::notify::NoopMailer;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn notifier() -> Notifier {
        Notifier::new(Arc::new(NoopMailer))
    }

    fn actor_with(roles: &[Role]) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            username: "jdoe".into(),
            email: "jdoe@example.org".into(),
            roles: roles.iter().copied().collect(),
        }
    }

    fn manuscript_in(status: ManuscriptStatus) -> Manuscript {
        Manuscript {
            id: Uuid::new_v4(),
            title: "Title X".into(),
            abstract_text: "Abstract".into(),
            file_key: "manuscripts/x.pdf".into(),
            keywords: "k1,k2".into(),
            co_authors: String::new(),
            affiliations: "Example Institute".into(),
            author_id: Uuid::new_v4(),
            submitted_date: Utc::now().into(),
            status: status.into(),
            is_paid: false,
        }
    }

    fn user(id: Uuid, reviewer: bool, editor: bool) -> User {
        User {
            id,
            username: "u".into(),
            email: "u@example.org".into(),
            affiliation: String::new(),
            is_researcher: true,
            is_reviewer: reviewer,
            is_editor: editor,
            created_at: Utc::now().into(),
        }
    }

    fn notification_row(recipient_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            message: "m".into(),
            link: None,
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    fn pending_review(manuscript_id: Uuid, reviewer_id: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            manuscript_id,
            reviewer_id,
            date_assigned: Utc::now().into(),
            due_date: None,
            date_completed: None,
            comments: String::new(),
            recommendation: String::new(),
        }
    }

    #[tokio::test]
    async fn test_non_editor_assign_touches_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let actor = actor_with(&[Role::Researcher]);

        let err = assign_reviewer(&db, &notifier(), &actor, Uuid::new_v4(), Uuid::new_v4(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthorizationDenied { .. }));
        // The gate fired before any statement reached the database
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_non_editor_decide_and_publish_denied() {
        let actor = actor_with(&[Role::Reviewer]);

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = decide(&db, &notifier(), &actor, Uuid::new_v4(), "accepted")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationDenied { .. }));
        assert!(db.into_transaction_log().is_empty());

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = publish(
            &db,
            &notifier(),
            &actor,
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationDenied { .. }));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_submission_persists_author_details() {
        let author = user(Uuid::new_v4(), false, false);
        let author_id = author.id;

        let mut stored = manuscript_in(ManuscriptStatus::Submitted);
        stored.author_id = author_id;
        stored.co_authors = "A. Coauthor; B. Coauthor".into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![author]])
            .append_query_results([vec![stored]])
            .append_query_results([vec![notification_row(author_id)]])
            .append_query_results([vec![user(Uuid::new_v4(), false, true)]])
            .append_query_results([vec![notification_row(Uuid::new_v4())]])
            .into_connection();

        let mut actor = actor_with(&[Role::Researcher]);
        actor.id = author_id;

        let manuscript = submit_manuscript(
            &db,
            &notifier(),
            &actor,
            NewManuscript {
                title: "Title X".into(),
                abstract_text: "Abstract".into(),
                file_key: "manuscripts/x.pdf".into(),
                keywords: "k1,k2".into(),
                co_authors: "A. Coauthor; B. Coauthor".into(),
                affiliations: "Example Institute".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(manuscript.manuscript_status(), ManuscriptStatus::Submitted);
        assert_eq!(manuscript.co_authors, "A. Coauthor; B. Coauthor");

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("A. Coauthor; B. Coauthor"), "{}", log);
        assert!(log.contains("Example Institute"), "{}", log);
    }

    #[tokio::test]
    async fn test_first_assignment_flips_status_and_defaults_due_date() {
        let manuscript = manuscript_in(ManuscriptStatus::Submitted);
        let manuscript_id = manuscript.id;
        let author_id = manuscript.author_id;
        let reviewer_id = Uuid::new_v4();

        let mut under_review = manuscript.clone();
        under_review.status = ManuscriptStatus::UnderReview.into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .append_query_results([vec![user(reviewer_id, true, false)]])
            .append_query_results([Vec::<Review>::new()])
            .append_query_results([vec![pending_review(manuscript_id, reviewer_id)]])
            .append_query_results([vec![under_review]])
            .append_query_results([vec![notification_row(reviewer_id)]])
            .append_query_results([vec![user(author_id, false, false)]])
            .append_query_results([vec![notification_row(author_id)]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let lower = Utc::now() + Duration::days(DEFAULT_REVIEW_DUE_DAYS);
        let review = assign_reviewer(&db, &notifier(), &actor, manuscript_id, reviewer_id, None)
            .await
            .unwrap();
        let upper = Utc::now() + Duration::days(DEFAULT_REVIEW_DUE_DAYS);

        assert_eq!(review.manuscript_id, manuscript_id);
        assert_eq!(review.reviewer_id, reviewer_id);

        let log = format!("{:?}", db.into_transaction_log());
        // the first assignment drives the status flip
        assert!(log.contains("under_review"), "{}", log);
        // omitted due date defaults to assignment time + 14 days
        assert!(
            log.contains(&lower.format("%Y-%m-%d").to_string())
                || log.contains(&upper.format("%Y-%m-%d").to_string()),
            "{}",
            log
        );
    }

    #[tokio::test]
    async fn test_accept_decision_applies_and_notifies_author() {
        let manuscript = manuscript_in(ManuscriptStatus::UnderReview);
        let manuscript_id = manuscript.id;
        let author_id = manuscript.author_id;

        let mut accepted = manuscript.clone();
        accepted.status = ManuscriptStatus::Accepted.into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .append_query_results([vec![accepted]])
            .append_query_results([vec![user(author_id, false, false)]])
            .append_query_results([vec![notification_row(author_id)]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let outcome = decide(&db, &notifier(), &actor, manuscript_id, "accepted")
            .await
            .unwrap();

        assert!(outcome.applied);
        assert_eq!(
            outcome.manuscript.manuscript_status(),
            ManuscriptStatus::Accepted
        );

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("accepted"), "{}", log);
        assert!(log.contains("notifications"), "{}", log);
    }

    #[tokio::test]
    async fn test_publish_mints_article_and_flips_status() {
        let manuscript = manuscript_in(ManuscriptStatus::Accepted);
        let manuscript_id = manuscript.id;
        let author_id = manuscript.author_id;
        let issue_id = Uuid::new_v4();

        let mut published = manuscript.clone();
        published.status = ManuscriptStatus::Published.into();

        let issue = Issue {
            id: issue_id,
            volume_id: Uuid::new_v4(),
            number: 2,
            publication_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };

        let minted = Article {
            id: Uuid::new_v4(),
            manuscript_id,
            issue_id,
            page_start: Some(1),
            page_end: Some(18),
            doi: Some("10.5/sf.42".into()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .append_query_results([Vec::<Article>::new()])
            .append_query_results([vec![issue]])
            .append_query_results([Vec::<Article>::new()])
            .append_query_results([vec![minted]])
            .append_query_results([vec![published]])
            .append_query_results([vec![user(author_id, false, false)]])
            .append_query_results([vec![notification_row(author_id)]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let article = publish(
            &db,
            &notifier(),
            &actor,
            manuscript_id,
            issue_id,
            Some(1),
            Some(18),
            Some("10.5/sf.42".into()),
        )
        .await
        .unwrap();

        assert_eq!(article.manuscript_id, manuscript_id);
        assert_eq!(article.doi.as_deref(), Some("10.5/sf.42"));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("published"), "{}", log);
    }

    #[tokio::test]
    async fn test_duplicate_assignment_refused() {
        let manuscript = manuscript_in(ManuscriptStatus::UnderReview);
        let manuscript_id = manuscript.id;
        let reviewer_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .append_query_results([vec![user(reviewer_id, true, false)]])
            .append_query_results([vec![pending_review(manuscript_id, reviewer_id)]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let err = assign_reviewer(&db, &notifier(), &actor, manuscript_id, reviewer_id, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DuplicateAssignment { manuscript_id: m, reviewer_id: r }
                if m == manuscript_id && r == reviewer_id
        ));
    }

    #[tokio::test]
    async fn test_assignment_refused_after_decision() {
        let manuscript = manuscript_in(ManuscriptStatus::Rejected);
        let manuscript_id = manuscript.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let err = assign_reviewer(&db, &notifier(), &actor, manuscript_id, Uuid::new_v4(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_unrecognized_decision_is_a_noop() {
        let manuscript = manuscript_in(ManuscriptStatus::UnderReview);
        let manuscript_id = manuscript.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let outcome = decide(&db, &notifier(), &actor, manuscript_id, "maybe")
            .await
            .unwrap();

        assert!(!outcome.applied);
        assert_eq!(
            outcome.manuscript.manuscript_status(),
            ManuscriptStatus::UnderReview
        );
        // Only the lookup ran; no transaction, no update, no notification
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_decision_refused_outside_under_review() {
        let manuscript = manuscript_in(ManuscriptStatus::Submitted);
        let manuscript_id = manuscript.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let err = decide(&db, &notifier(), &actor, manuscript_id, "accepted")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_publish_requires_accepted_status() {
        let manuscript = manuscript_in(ManuscriptStatus::UnderReview);
        let manuscript_id = manuscript.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let err = publish(
            &db,
            &notifier(),
            &actor,
            manuscript_id,
            Uuid::new_v4(),
            None,
            None,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_second_publish_fails_already_published() {
        let manuscript = manuscript_in(ManuscriptStatus::Accepted);
        let manuscript_id = manuscript.id;
        let issue_id = Uuid::new_v4();

        let existing = Article {
            id: Uuid::new_v4(),
            manuscript_id,
            issue_id,
            page_start: None,
            page_end: None,
            doi: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .append_query_results([vec![existing]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let err = publish(
            &db,
            &notifier(),
            &actor,
            manuscript_id,
            issue_id,
            None,
            None,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::AlreadyPublished { manuscript_id: m } if m == manuscript_id
        ));
    }

    #[tokio::test]
    async fn test_publish_rejects_duplicate_doi() {
        let manuscript = manuscript_in(ManuscriptStatus::Accepted);
        let manuscript_id = manuscript.id;
        let issue_id = Uuid::new_v4();

        let issue = Issue {
            id: issue_id,
            volume_id: Uuid::new_v4(),
            number: 1,
            publication_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };

        let taken = Article {
            id: Uuid::new_v4(),
            manuscript_id: Uuid::new_v4(),
            issue_id,
            page_start: Some(1),
            page_end: Some(9),
            doi: Some("10.1/x".into()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![manuscript]])
            .append_query_results([Vec::<Article>::new()])
            .append_query_results([vec![issue]])
            .append_query_results([vec![taken]])
            .into_connection();

        let actor = actor_with(&[Role::Editor]);
        let err = publish(
            &db,
            &notifier(),
            &actor,
            manuscript_id,
            issue_id,
            Some(10),
            Some(20),
            Some("10.1/x".into()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::DuplicateDoi { doi } if doi == "10.1/x"));
    }

    #[tokio::test]
    async fn test_publish_rejects_inverted_page_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let actor = actor_with(&[Role::Editor]);

        let err = publish(
            &db,
            &notifier(),
            &actor,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(20),
            Some(10),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidPageRange { .. }));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_submit_review_without_assignment_is_not_found() {
        let manuscript_id = Uuid::new_v4();
        let actor = actor_with(&[Role::Reviewer]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Review>::new()])
            .into_connection();

        let err = submit_review(
            &db,
            &notifier(),
            &actor,
            manuscript_id,
            "ok".into(),
            "accept",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::ReviewNotFound { .. }));
    }

    #[tokio::test]
    async fn test_submit_review_rejects_unknown_recommendation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let actor = actor_with(&[Role::Reviewer]);

        let err = submit_review(
            &db,
            &notifier(),
            &actor,
            Uuid::new_v4(),
            "ok".into(),
            "strong accept",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(db.into_transaction_log().is_empty());
    }
}
