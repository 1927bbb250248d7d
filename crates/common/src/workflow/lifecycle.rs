//! Manuscript lifecycle state machine
//!
//! The status graph:
//!
//! ```text
//! submitted -> under_review -> accepted -> published
//!                           -> rejected
//! ```
//!
//! `rejected` and `published` are terminal. Marking payment received is
//! status-preserving and may happen in any state. Everything here is
//! pure; `ops` applies these rules against storage.

use crate::db::models::ManuscriptStatus;

/// An editorial decision on a manuscript under review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    /// Parse a posted decision value. Anything outside
    /// {accepted, rejected} yields `None`, and the caller treats that as
    /// a no-op rather than an error: malformed input must not change
    /// state or fail the request.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(Decision::Accepted),
            "rejected" => Some(Decision::Rejected),
            _ => None,
        }
    }

    /// The status this decision moves the manuscript to
    pub fn target_status(&self) -> ManuscriptStatus {
        match self {
            Decision::Accepted => ManuscriptStatus::Accepted,
            Decision::Rejected => ManuscriptStatus::Rejected,
        }
    }
}

/// Whether `from -> to` is an edge of the lifecycle graph
pub fn permits(from: ManuscriptStatus, to: ManuscriptStatus) -> bool {
    use ManuscriptStatus::*;
    matches!(
        (from, to),
        (Submitted, UnderReview)
            | (UnderReview, Accepted)
            | (UnderReview, Rejected)
            | (Accepted, Published)
    )
}

/// Whether a reviewer may be assigned in this status. Assignment is only
/// meaningful while the manuscript has not left review; the first
/// assignment drives submitted -> under_review, later ones leave the
/// status alone.
pub fn assignment_allowed(status: ManuscriptStatus) -> bool {
    matches!(
        status,
        ManuscriptStatus::Submitted | ManuscriptStatus::UnderReview
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ManuscriptStatus::*;

    const ALL: [ManuscriptStatus; 5] = [Submitted, UnderReview, Accepted, Rejected, Published];

    #[test]
    fn test_transition_table_is_closed() {
        // Exactly these four edges exist; every other pair is refused
        let edges = [
            (Submitted, UnderReview),
            (UnderReview, Accepted),
            (UnderReview, Rejected),
            (Accepted, Published),
        ];

        for from in ALL {
            for to in ALL {
                let expected = edges.contains(&(from, to));
                assert_eq!(
                    permits(from, to),
                    expected,
                    "edge {:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        for from in [Rejected, Published] {
            for to in ALL {
                assert!(!permits(from, to));
            }
        }
    }

    #[test]
    fn test_status_never_regresses() {
        // No edge points back at submitted or under_review
        for from in ALL {
            assert!(!permits(from, Submitted));
        }
        for from in [Accepted, Rejected, Published] {
            assert!(!permits(from, UnderReview));
        }
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!(Decision::parse("accepted"), Some(Decision::Accepted));
        assert_eq!(Decision::parse("rejected"), Some(Decision::Rejected));
        // Malformed input is a no-op signal, not an error
        assert_eq!(Decision::parse("maybe"), None);
        assert_eq!(Decision::parse("ACCEPTED"), None);
        assert_eq!(Decision::parse(""), None);
    }

    #[test]
    fn test_decision_targets_are_legal_from_under_review() {
        for decision in [Decision::Accepted, Decision::Rejected] {
            assert!(permits(UnderReview, decision.target_status()));
        }
    }

    #[test]
    fn test_assignment_allowed() {
        assert!(assignment_allowed(Submitted));
        assert!(assignment_allowed(UnderReview));
        assert!(!assignment_allowed(Accepted));
        assert!(!assignment_allowed(Rejected));
        assert!(!assignment_allowed(Published));
    }
}
