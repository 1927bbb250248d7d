//! Notification dispatch
//!
//! Two surfaces, in order:
//! (a) an in-app `Notification` row persisted on the caller's connection,
//!     which may be a transaction - this must succeed;
//! (b) a best-effort external mail send - any failure here is logged and
//!     swallowed, so a mail outage can never block or roll back a
//!     manuscript transition.
//!
//! Fan-out to multiple recipients is a sequence of independent dispatch
//! calls; partial mail failure among them is acceptable.

use crate::config::MailConfig;
use crate::db::models::{Notification, NotificationActiveModel, User};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// External message-send sink
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Mailer that posts messages to a relay webhook as JSON
pub struct WebhookMailer {
    client: reqwest::Client,
    webhook_url: String,
    from_address: String,
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl WebhookMailer {
    pub fn new(webhook_url: String, from_address: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to build mail client: {}", e),
            })?;

        Ok(Self {
            client,
            webhook_url,
            from_address,
        })
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let payload = MailPayload {
            from: &self.from_address,
            to,
            subject,
            body,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::MailSend {
                message: format!("mail relay returned {}", response.status()),
            });
        }

        Ok(())
    }
}

/// Mailer used when no webhook is configured; drops messages
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
        Ok(())
    }
}

/// Notification dispatcher
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Build a notifier from configuration; mail is disabled when no
    /// webhook URL is set
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let mailer: Arc<dyn Mailer> = match &config.webhook_url {
            Some(url) => Arc::new(WebhookMailer::new(
                url.clone(),
                config.from_address.clone(),
                Duration::from_secs(config.timeout_secs),
            )?),
            None => Arc::new(NoopMailer),
        };
        Ok(Self::new(mailer))
    }

    /// Dispatch one notification to one recipient.
    ///
    /// The in-app row is inserted on `conn` so it joins the caller's
    /// transaction; the mail attempt happens afterwards and its failure
    /// does not surface to the caller.
    pub async fn notify<C: ConnectionTrait>(
        &self,
        conn: &C,
        recipient: &User,
        subject: &str,
        body: &str,
        link: Option<&str>,
    ) -> Result<Notification> {
        let row = NotificationActiveModel {
            id: Set(Uuid::new_v4()),
            recipient_id: Set(recipient.id),
            message: Set(body.to_string()),
            link: Set(link.map(String::from)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let notification = row.insert(conn).await?;
        crate::metrics::record_notification();

        if let Err(e) = self.mailer.send(&recipient.email, subject, body).await {
            crate::metrics::record_mail_failure();
            warn!(
                recipient = %recipient.id,
                error = %e,
                "Mail send failed; in-app notification persisted"
            );
        } else {
            debug!(recipient = %recipient.id, "Notification dispatched");
        }

        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
            Err(AppError::MailSend {
                message: "relay unreachable".into(),
            })
        }
    }

    fn recipient() -> User {
        User {
            id: Uuid::new_v4(),
            username: "rrivera".into(),
            email: "rrivera@example.org".into(),
            affiliation: "Example Institute".into(),
            is_researcher: true,
            is_reviewer: false,
            is_editor: false,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn persisted_row(recipient_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            message: "Your manuscript was accepted".into(),
            link: None,
            is_read: false,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_mail_failure_is_swallowed() {
        let user = recipient();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![persisted_row(user.id)]])
            .into_connection();

        let notifier = Notifier::new(Arc::new(FailingMailer));
        let result = notifier
            .notify(&db, &user, "Decision", "Your manuscript was accepted", None)
            .await;

        // The caller sees success even though the mail relay is down
        let notification = result.expect("mail outage must not fail dispatch");
        assert_eq!(notification.recipient_id, user.id);
        assert!(!notification.is_read);
    }

    #[tokio::test]
    async fn test_notification_row_persisted() {
        let user = recipient();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![persisted_row(user.id)]])
            .into_connection();

        let notifier = Notifier::new(Arc::new(NoopMailer));
        let notification = notifier
            .notify(
                &db,
                &user,
                "Decision",
                "Your manuscript was accepted",
                Some("/manuscripts/abc"),
            )
            .await
            .unwrap();

        assert_eq!(notification.message, "Your manuscript was accepted");
    }
}
