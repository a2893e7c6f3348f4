//! Workflow transitions and the default issue state machine.
//!
//! The transition vocabulary is split by issue kind. Ordinary issues use
//! `accept` / `false-positive` / `reopen`; security hotspots use
//! `acknowledge` / `mark-safe` / `reset-to-review`. `IssueWorkflow` is the
//! default [`WorkflowTransitions`] implementation: it refuses transitions
//! that are not legal from the issue's current state, which is exactly the
//! error the reconciler catches and logs instead of failing the whole pass.

use std::fmt;

use thiserror::Error;

use crate::directive::Outcome;
use crate::issue::{
    Issue, IssueComment, IssueKind, IssueStatus, RESOLUTION_ACKNOWLEDGED,
    RESOLUTION_FALSE_POSITIVE, RESOLUTION_SAFE, RESOLUTION_WONT_FIX, STATUS_REOPENED,
    STATUS_RESOLVED, STATUS_REVIEWED, STATUS_TO_REVIEW,
};

/// A workflow transition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accept,
    FalsePositive,
    Reopen,
    Acknowledge,
    MarkSafe,
    ResetToReview,
}

impl Transition {
    pub fn key(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::FalsePositive => "false-positive",
            Self::Reopen => "reopen",
            Self::Acknowledge => "acknowledge",
            Self::MarkSafe => "mark-safe",
            Self::ResetToReview => "reset-to-review",
        }
    }

    /// Kind of issue the transition belongs to.
    pub fn kind(self) -> IssueKind {
        match self {
            Self::Accept | Self::FalsePositive | Self::Reopen => IssueKind::Ordinary,
            Self::Acknowledge | Self::MarkSafe | Self::ResetToReview => IssueKind::Hotspot,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl IssueKind {
    /// Transition that realizes `outcome` for this kind of issue.
    pub fn target_transition(self, outcome: Outcome) -> Transition {
        match (self, outcome) {
            (IssueKind::Ordinary, Outcome::Accept) => Transition::Accept,
            (IssueKind::Ordinary, Outcome::FalsePositive) => Transition::FalsePositive,
            (IssueKind::Hotspot, Outcome::Accept) => Transition::Acknowledge,
            (IssueKind::Hotspot, Outcome::FalsePositive) => Transition::MarkSafe,
        }
    }

    /// Reopen transition for the issue's current state, if one is needed.
    /// Hotspots only reopen out of the reviewed status; ordinary issues
    /// reopen out of the accepted and false-positive resolutions.
    pub fn reopen_transition(self, issue: &Issue) -> Option<Transition> {
        match self {
            IssueKind::Hotspot => {
                (issue.status == STATUS_REVIEWED).then_some(Transition::ResetToReview)
            }
            IssueKind::Ordinary => matches!(
                issue.issue_status(),
                Some(IssueStatus::Accepted | IssueStatus::FalsePositive)
            )
            .then_some(Transition::Reopen),
        }
    }

    /// Whether the issue already sits in the state `outcome` asks for.
    /// Ordinary issues compare the normalized status; hotspots have no
    /// normalized form and compare the literal resolution string.
    pub fn already_in_target(self, issue: &Issue, outcome: Outcome) -> bool {
        match self {
            IssueKind::Ordinary => {
                let target = match outcome {
                    Outcome::Accept => IssueStatus::Accepted,
                    Outcome::FalsePositive => IssueStatus::FalsePositive,
                };
                issue.issue_status() == Some(target)
            }
            IssueKind::Hotspot => {
                let target = match outcome {
                    Outcome::Accept => RESOLUTION_ACKNOWLEDGED,
                    Outcome::FalsePositive => RESOLUTION_SAFE,
                };
                issue.resolution.as_deref() == Some(target)
            }
        }
    }
}

/// Raised when a transition cannot be applied to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("transition '{transition}' does not apply to {kind} issues")]
    KindMismatch {
        transition: &'static str,
        kind: IssueKind,
    },
    #[error("transition '{transition}' is not legal from state {state}")]
    IllegalState {
        transition: &'static str,
        state: String,
    },
}

/// Workflow interface the reconciler drives issues through. A trait so tests
/// can record calls and other issue stores can plug in their own lifecycle.
pub trait WorkflowTransitions {
    /// Apply `transition` to the issue on behalf of `author_uuid`.
    fn apply(
        &self,
        issue: &mut Issue,
        transition: Transition,
        author_uuid: Option<&str>,
    ) -> Result<(), WorkflowError>;

    /// Attach a comment to the issue. Comments cannot fail.
    fn attach_comment(&self, issue: &mut Issue, text: &str, author_uuid: Option<&str>);
}

/// Default workflow: legality checks plus status/resolution mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct IssueWorkflow;

impl IssueWorkflow {
    fn check_kind(issue: &Issue, transition: Transition) -> Result<(), WorkflowError> {
        if issue.kind != transition.kind() {
            return Err(WorkflowError::KindMismatch {
                transition: transition.key(),
                kind: issue.kind,
            });
        }
        Ok(())
    }

    fn illegal(issue: &Issue, transition: Transition) -> WorkflowError {
        let state = match &issue.resolution {
            Some(resolution) => format!("{}/{}", issue.status, resolution),
            None => issue.status.clone(),
        };
        WorkflowError::IllegalState {
            transition: transition.key(),
            state,
        }
    }
}

impl WorkflowTransitions for IssueWorkflow {
    fn apply(
        &self,
        issue: &mut Issue,
        transition: Transition,
        _author_uuid: Option<&str>,
    ) -> Result<(), WorkflowError> {
        Self::check_kind(issue, transition)?;

        match transition {
            Transition::Accept | Transition::FalsePositive => {
                if !matches!(
                    issue.issue_status(),
                    Some(IssueStatus::Open | IssueStatus::Confirmed)
                ) {
                    return Err(Self::illegal(issue, transition));
                }
                issue.status = STATUS_RESOLVED.to_string();
                issue.resolution = Some(
                    match transition {
                        Transition::Accept => RESOLUTION_WONT_FIX,
                        _ => RESOLUTION_FALSE_POSITIVE,
                    }
                    .to_string(),
                );
            }
            Transition::Reopen => {
                if !matches!(
                    issue.issue_status(),
                    Some(IssueStatus::Accepted | IssueStatus::FalsePositive)
                ) {
                    return Err(Self::illegal(issue, transition));
                }
                issue.status = STATUS_REOPENED.to_string();
                issue.resolution = None;
            }
            Transition::Acknowledge | Transition::MarkSafe => {
                if issue.status != STATUS_TO_REVIEW && issue.status != STATUS_REVIEWED {
                    return Err(Self::illegal(issue, transition));
                }
                issue.status = STATUS_REVIEWED.to_string();
                issue.resolution = Some(
                    match transition {
                        Transition::Acknowledge => RESOLUTION_ACKNOWLEDGED,
                        _ => RESOLUTION_SAFE,
                    }
                    .to_string(),
                );
            }
            Transition::ResetToReview => {
                if issue.status != STATUS_REVIEWED {
                    return Err(Self::illegal(issue, transition));
                }
                issue.status = STATUS_TO_REVIEW.to_string();
                issue.resolution = None;
            }
        }

        issue.changed = true;
        Ok(())
    }

    fn attach_comment(&self, issue: &mut Issue, text: &str, author_uuid: Option<&str>) {
        issue.comments.push(IssueComment {
            message: text.to_string(),
            author_uuid: author_uuid.map(str::to_string),
        });
        issue.changed = true;
    }
}
