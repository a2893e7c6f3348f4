use std::collections::HashSet;

use anyhow::Result;

use super::super::args::ApplyCommand;
use super::super::exit_status::ExitStatus;
use crate::accounts::AccountDirectory;
use crate::blame::{self, BlameSource};
use crate::config::Config;
use crate::issue::IssueSnapshot;
use crate::reconcile::{ApplySummary, ComponentContext, IssueAction, Reconciler};
use crate::reporter;
use crate::scanner;
use crate::workflow::IssueWorkflow;

pub fn apply(cmd: ApplyCommand) -> Result<ExitStatus> {
    let root = &cmd.common.root;
    let mut config = Config::load(root)?;
    if let Some(source_root) = &cmd.common.source_root {
        config.source_root = source_root.to_string_lossy().into_owned();
    }

    let issues_path = cmd
        .issues
        .clone()
        .unwrap_or_else(|| root.join(&config.issues_file));
    let accounts_path = cmd
        .accounts
        .clone()
        .unwrap_or_else(|| root.join(&config.accounts_file));

    let mut snapshot = IssueSnapshot::load(&issues_path)?;
    let accounts = AccountDirectory::load(&accounts_path)?;

    let scan = scanner::scan(root, &config);
    reporter::print_warnings(&scan.warnings);
    reporter::print_skipped_note(scan.files_skipped, cmd.common.verbose);

    let workflow = IssueWorkflow;
    let reconciler = Reconciler::new(&workflow, &accounts);
    let use_blame = config.blame && !cmd.no_blame;
    let source_root = root.join(&config.source_root);

    let mut actions = Vec::with_capacity(snapshot.issues.len());
    for component in component_order(&snapshot) {
        let directives = scan.directives_for(&component).unwrap_or(&[]);
        // Blame only feeds author attribution, so skip the subprocess for
        // components without directives.
        let blame = if use_blame && !directives.is_empty() {
            blame::git_blame(&source_root, &component)
        } else {
            None
        };
        let ctx = ComponentContext::new(directives, blame.as_ref().map(|b| b as &dyn BlameSource));

        for issue in snapshot
            .issues
            .iter_mut()
            .filter(|issue| issue.component_key == component)
        {
            let outcome = reconciler.on_issue(&ctx, issue);
            actions.push(IssueAction {
                component: issue.component_key.clone(),
                line: issue.line,
                rule_key: issue.rule_key.clone(),
                outcome,
            });
        }
    }

    let summary = ApplySummary::tally(&actions);
    reporter::print_apply_report(&actions, &summary);

    if cmd.write {
        snapshot.save(&issues_path)?;
    } else if snapshot.issues.iter().any(|issue| issue.changed) {
        reporter::print_dry_run_note();
    }

    if summary.failed == 0 {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}

/// Unique component keys in snapshot order.
fn component_order(snapshot: &IssueSnapshot) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for issue in &snapshot.issues {
        if seen.insert(issue.component_key.clone()) {
            order.push(issue.component_key.clone());
        }
    }
    order
}
