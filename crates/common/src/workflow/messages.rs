//! Notification text builders
//!
//! Each workflow transition produces distinct, human-readable outcome
//! messages. The body becomes the in-app notification row; subject and
//! body together go to the mail sink.

use crate::db::models::{Article, Manuscript};

/// Content of a single notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub subject: String,
    pub body: String,
    pub link: Option<String>,
}

pub fn manuscript_submitted_author(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "Manuscript received".into(),
        body: format!(
            "Your manuscript \"{}\" has been received and is awaiting editorial processing.",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}", manuscript.id)),
    }
}

pub fn manuscript_submitted_editor(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "New submission".into(),
        body: format!(
            "A new manuscript \"{}\" has been submitted and needs reviewer assignment.",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}", manuscript.id)),
    }
}

pub fn reviewer_assigned(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "Review assignment".into(),
        body: format!(
            "You have been assigned to review the manuscript \"{}\".",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}/review", manuscript.id)),
    }
}

pub fn under_review_author(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "Manuscript under review".into(),
        body: format!(
            "Your manuscript \"{}\" is now under review.",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}", manuscript.id)),
    }
}

pub fn review_submitted_editor(manuscript: &Manuscript, reviewer_username: &str) -> Notice {
    Notice {
        subject: "Review submitted".into(),
        body: format!(
            "{} has submitted a review for \"{}\".",
            reviewer_username, manuscript.title
        ),
        link: Some(format!("/manuscripts/{}/reviews", manuscript.id)),
    }
}

pub fn decision_accepted(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "Manuscript accepted".into(),
        body: format!(
            "Congratulations! Your manuscript \"{}\" has been accepted. \
             Please arrange payment of the publication fee to proceed.",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}", manuscript.id)),
    }
}

pub fn decision_rejected(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "Manuscript decision".into(),
        body: format!(
            "We regret to inform you that your manuscript \"{}\" has been rejected.",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}", manuscript.id)),
    }
}

pub fn article_published(manuscript: &Manuscript, article: &Article) -> Notice {
    Notice {
        subject: "Article published".into(),
        body: format!(
            "Your manuscript \"{}\" has been published.",
            manuscript.title
        ),
        link: Some(format!("/articles/{}", article.id)),
    }
}

pub fn payment_received(manuscript: &Manuscript) -> Notice {
    Notice {
        subject: "Payment received".into(),
        body: format!(
            "The publication fee for \"{}\" has been recorded as paid.",
            manuscript.title
        ),
        link: Some(format!("/manuscripts/{}", manuscript.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn manuscript() -> Manuscript {
        Manuscript {
            id: Uuid::new_v4(),
            title: "Title X".into(),
            abstract_text: "A".into(),
            file_key: "manuscripts/x.pdf".into(),
            keywords: String::new(),
            co_authors: String::new(),
            affiliations: String::new(),
            author_id: Uuid::new_v4(),
            submitted_date: chrono::Utc::now().into(),
            status: "under_review".into(),
            is_paid: false,
        }
    }

    #[test]
    fn test_messages_carry_title() {
        let m = manuscript();
        for notice in [
            manuscript_submitted_author(&m),
            manuscript_submitted_editor(&m),
            reviewer_assigned(&m),
            under_review_author(&m),
            decision_accepted(&m),
            decision_rejected(&m),
            payment_received(&m),
        ] {
            assert!(notice.body.contains("Title X"), "{}", notice.body);
        }
    }

    #[test]
    fn test_accept_mentions_payment_instructions() {
        let notice = decision_accepted(&manuscript());
        assert!(notice.body.contains("publication fee"));
    }

    #[test]
    fn test_published_links_to_article() {
        let m = manuscript();
        let article = Article {
            id: Uuid::new_v4(),
            manuscript_id: m.id,
            issue_id: Uuid::new_v4(),
            page_start: Some(10),
            page_end: Some(20),
            doi: Some("10.1/x".into()),
        };
        let notice = article_published(&m, &article);
        assert_eq!(notice.link, Some(format!("/articles/{}", article.id)));
    }

    #[test]
    fn test_outcomes_are_distinct() {
        let m = manuscript();
        let accepted = decision_accepted(&m);
        let rejected = decision_rejected(&m);
        assert_ne!(accepted.body, rejected.body);
    }
}
