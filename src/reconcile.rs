//! Reconciliation of resolution directives with issue workflow state.
//!
//! One [`ComponentContext`] is built per component and carries that
//! component's directives and blame data; nothing leaks across components.
//! [`Reconciler::on_issue`] runs the per-issue state machine:
//!
//! - a matching directive is applied at most once: when the issue already
//!   sits in the directive's target state nothing is transitioned, otherwise
//!   the issue is reopened if needed, moved to the target state and
//!   commented; either way the issue ends up tagged as directive-managed
//! - a tagged issue with no matching directive left is reopened through the
//!   per-kind reopen transition and untagged
//! - untagged issues without a directive are left strictly alone
//!
//! Transition failures are contained per issue: logged at warn level,
//! skipped, never propagated to the rest of the pass.

use tracing::warn;

use crate::accounts::{AccountResolver, UserId};
use crate::blame::BlameSource;
use crate::directive::{ResolutionDirective, RuleKey};
use crate::issue::Issue;
use crate::workflow::{Transition, WorkflowTransitions};

/// Prefix of every comment the reconciler attaches to an issue.
pub const COMMENT_PREFIX: &str = "issue-resolution: ";

/// Per-component working set: the directives scanned for one component plus
/// its blame data.
pub struct ComponentContext<'a> {
    directives: &'a [ResolutionDirective],
    blame: Option<&'a dyn BlameSource>,
}

impl<'a> ComponentContext<'a> {
    pub fn new(directives: &'a [ResolutionDirective], blame: Option<&'a dyn BlameSource>) -> Self {
        Self { directives, blame }
    }

    /// Context with no directives and no blame. Every lookup misses, so
    /// tagged issues of this component get reopened.
    pub fn empty() -> Self {
        Self {
            directives: &[],
            blame: None,
        }
    }

    /// First directive covering the issue's rule key and line, in scan
    /// order. Issues without a line never match.
    fn find_directive(&self, issue: &Issue) -> Option<&'a ResolutionDirective> {
        let line = issue.line?;
        self.directives.iter().find(|directive| {
            directive.rule_keys.contains(&issue.rule_key)
                && directive.range.is_some_and(|range| range.contains(line))
        })
    }
}

/// What a reconciliation pass did to one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// No directive and no tag: left alone.
    Unmanaged,
    /// A directive was applied; transitions in emission order.
    Applied {
        transitions: Vec<Transition>,
        commented: bool,
    },
    /// A directive matched but the issue already sat in its target state.
    Reaffirmed,
    /// The tag was stale; the issue was reopened and untagged.
    Reopened(Transition),
    /// The tag was stale on an issue that needs no reopening; just untagged.
    Untagged,
    /// A transition failed; the issue was skipped.
    Failed(Transition),
}

/// One reconciled issue with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueAction {
    pub component: String,
    pub line: Option<u32>,
    pub rule_key: RuleKey,
    pub outcome: Reconciliation,
}

impl IssueAction {
    pub fn location(&self) -> String {
        format!("{}:{}", self.component, display_line(self.line))
    }
}

/// Tally of a whole reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub issues_seen: usize,
    pub applied: usize,
    pub reaffirmed: usize,
    pub reopened: usize,
    pub untagged: usize,
    pub failed: usize,
}

impl ApplySummary {
    pub fn tally(actions: &[IssueAction]) -> Self {
        let mut summary = Self::default();
        for action in actions {
            summary.record(&action.outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &Reconciliation) {
        self.issues_seen += 1;
        match outcome {
            Reconciliation::Unmanaged => {}
            Reconciliation::Applied { .. } => self.applied += 1,
            Reconciliation::Reaffirmed => self.reaffirmed += 1,
            Reconciliation::Reopened(_) => self.reopened += 1,
            Reconciliation::Untagged => self.untagged += 1,
            Reconciliation::Failed(_) => self.failed += 1,
        }
    }
}

/// Applies resolution directives to issues through the workflow interface.
pub struct Reconciler<'a> {
    workflow: &'a dyn WorkflowTransitions,
    accounts: &'a dyn AccountResolver,
}

impl<'a> Reconciler<'a> {
    pub fn new(workflow: &'a dyn WorkflowTransitions, accounts: &'a dyn AccountResolver) -> Self {
        Self { workflow, accounts }
    }

    /// Reconcile one issue against its component's directives.
    pub fn on_issue(&self, ctx: &ComponentContext<'_>, issue: &mut Issue) -> Reconciliation {
        match ctx.find_directive(issue) {
            Some(directive) => {
                let outcome = self.apply_directive(ctx, issue, directive);
                // Tagged even when the transition failed; a later pass retries.
                issue.add_resolution_tag();
                outcome
            }
            None if issue.has_resolution_tag() => self.reopen_and_untag(issue),
            None => Reconciliation::Unmanaged,
        }
    }

    fn apply_directive(
        &self,
        ctx: &ComponentContext<'_>,
        issue: &mut Issue,
        directive: &ResolutionDirective,
    ) -> Reconciliation {
        let kind = issue.kind;
        if kind.already_in_target(issue, directive.outcome) {
            return Reconciliation::Reaffirmed;
        }

        let target = kind.target_transition(directive.outcome);
        let reopen = kind.reopen_transition(issue);
        let author = self.resolve_author(ctx, directive);
        let author_uuid = author.map(|user| user.uuid.as_str());

        // Reopen first when the issue sits in a different resolved state.
        // Reopens never carry an author.
        if let Some(step) = reopen
            && let Err(err) = self.workflow.apply(issue, step, None)
        {
            warn!(
                error = %err,
                "Cannot apply issue resolution data on issue at line {} of {}",
                display_line(issue.line),
                issue.component_key,
            );
            return Reconciliation::Failed(step);
        }

        if let Err(err) = self.workflow.apply(issue, target, author_uuid) {
            warn!(
                error = %err,
                "Cannot apply issue resolution data on issue at line {} of {}",
                display_line(issue.line),
                issue.component_key,
            );
            return Reconciliation::Failed(target);
        }

        let commented = !directive.comment.trim().is_empty();
        if commented {
            let text = format!("{COMMENT_PREFIX}{}", directive.comment);
            self.workflow.attach_comment(issue, &text, author_uuid);
        }

        let mut transitions = Vec::with_capacity(2);
        transitions.extend(reopen);
        transitions.push(target);
        Reconciliation::Applied {
            transitions,
            commented,
        }
    }

    /// The issue was pardoned by an earlier pass but its directive is gone:
    /// bring it back into the open vocabulary and drop the tag. When the
    /// reopen fails the tag is kept, so the next pass retries.
    fn reopen_and_untag(&self, issue: &mut Issue) -> Reconciliation {
        let Some(reopen) = issue.kind.reopen_transition(issue) else {
            issue.remove_resolution_tag();
            return Reconciliation::Untagged;
        };

        match self.workflow.apply(issue, reopen, None) {
            Ok(()) => {
                issue.remove_resolution_tag();
                Reconciliation::Reopened(reopen)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    "Cannot reopen issue-resolution issue at line {} of {}",
                    display_line(issue.line),
                    issue.component_key,
                );
                Reconciliation::Failed(reopen)
            }
        }
    }

    /// Author for the target transition and the comment: the blame author of
    /// the directive's first line, mapped through the account directory.
    fn resolve_author(
        &self,
        ctx: &ComponentContext<'_>,
        directive: &ResolutionDirective,
    ) -> Option<&'a UserId> {
        let range = directive.range?;
        let changeset = ctx.blame?.change_at_line(range.start)?;
        if changeset.author.is_empty() {
            return None;
        }
        self.accounts.resolve(&changeset.author)
    }
}

fn display_line(line: Option<u32>) -> String {
    match line {
        Some(line) => line.to_string(),
        None => "?".to_string(),
    }
}
