//! Terminal output for scan and apply passes.
//!
//! Results go to stdout in cargo-style blocks, diagnostics go to stderr.
//! Every printer has a `_to` variant taking a writer so tests can capture
//! the output.

use std::io::{self, Write};

use colored::Colorize;

use crate::directive::Outcome;
use crate::reconcile::{ApplySummary, IssueAction, Reconciliation};
use crate::scanner::{ScanResult, ScanWarning};
use crate::workflow::Transition;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the directives a scan found, cargo-style, to stdout.
pub fn print_scan_report(scan: &ScanResult) {
    print_scan_report_to(scan, &mut io::stdout().lock());
}

/// Print the scan report to a custom writer.
pub fn print_scan_report_to<W: Write>(scan: &ScanResult, writer: &mut W) {
    for component in &scan.components {
        for directive in &component.directives {
            let rules = directive
                .rule_keys
                .iter()
                .map(|key| key.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                writer,
                "{}: \"{}\"  {}",
                outcome_label(directive.outcome),
                directive.comment,
                rules.dimmed().cyan()
            );
            let location = match directive.range {
                Some(range) if range.start == range.end => {
                    format!("{}:{}", component.component, range.start)
                }
                Some(range) => format!("{}:{}-{}", component.component, range.start, range.end),
                None => component.component.clone(),
            };
            let _ = writeln!(writer, "  {} {}", "-->".blue(), location);
            let _ = writeln!(writer);
        }
    }

    print_scan_summary(scan, writer);
}

/// Print malformed directive warnings to stderr.
pub fn print_warnings(warnings: &[ScanWarning]) {
    print_warnings_to(warnings, &mut io::stderr().lock());
}

/// Print malformed directive warnings to a custom writer.
pub fn print_warnings_to<W: Write>(warnings: &[ScanWarning], writer: &mut W) {
    for warning in warnings {
        let _ = writeln!(
            writer,
            "{} {} {}",
            "warning:".bold().yellow(),
            warning.message,
            format!("({}:{})", warning.component, warning.line).dimmed()
        );
    }
}

/// Print a note about files that could not be read.
pub fn print_skipped_note(count: usize, verbose: bool) {
    print_skipped_note_to(count, verbose, &mut io::stderr().lock());
}

/// Print the skipped-files note to a custom writer.
pub fn print_skipped_note_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print what an apply pass did, one line per touched issue, to stdout.
pub fn print_apply_report(actions: &[IssueAction], summary: &ApplySummary) {
    print_apply_report_to(actions, summary, &mut io::stdout().lock());
}

/// Print the apply report to a custom writer.
pub fn print_apply_report_to<W: Write>(
    actions: &[IssueAction],
    summary: &ApplySummary,
    writer: &mut W,
) {
    let mut printed = 0;
    for action in actions {
        if print_action(action, writer) {
            printed += 1;
        }
    }
    if printed > 0 {
        let _ = writeln!(writer);
    }

    print_apply_summary(summary, writer);
}

/// Print a reminder that nothing was saved.
pub fn print_dry_run_note() {
    print_dry_run_note_to(&mut io::stdout().lock());
}

/// Print the dry-run note to a custom writer.
pub fn print_dry_run_note_to<W: Write>(writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} dry run, pass {} to save the updated snapshot",
        "note:".bold(),
        "--write".cyan()
    );
}

// ============================================================
// Internal Functions
// ============================================================

fn outcome_label(outcome: Outcome) -> colored::ColoredString {
    match outcome {
        Outcome::Accept => outcome.as_str().bold().green(),
        Outcome::FalsePositive => outcome.as_str().bold().cyan(),
    }
}

fn action_label(transition: Transition) -> &'static str {
    match transition {
        Transition::Accept => "accepted",
        Transition::FalsePositive => "marked false positive",
        Transition::Reopen => "reopened",
        Transition::Acknowledge => "acknowledged",
        Transition::MarkSafe => "marked safe",
        Transition::ResetToReview => "reset to review",
    }
}

/// One line per action; untouched and failed issues print nothing. Failures
/// are already on stderr through the warn log.
fn print_action<W: Write>(action: &IssueAction, writer: &mut W) -> bool {
    let rule = action.rule_key.to_string();
    match &action.outcome {
        Reconciliation::Unmanaged | Reconciliation::Failed(_) => return false,
        Reconciliation::Applied { transitions, .. } => {
            let Some(target) = transitions.last() else {
                return false;
            };
            let suffix = if transitions.len() > 1 {
                format!(" {}", "(reopened first)".dimmed())
            } else {
                String::new()
            };
            let _ = writeln!(
                writer,
                "{} {}  {}{}",
                action_label(*target).bold().green(),
                rule.dimmed().cyan(),
                action.location(),
                suffix
            );
        }
        Reconciliation::Reaffirmed => {
            let _ = writeln!(
                writer,
                "{} {}  {}",
                "settled".dimmed(),
                rule.dimmed().cyan(),
                action.location().dimmed()
            );
        }
        Reconciliation::Reopened(transition) => {
            let _ = writeln!(
                writer,
                "{} {}  {} {}",
                action_label(*transition).bold().yellow(),
                rule.dimmed().cyan(),
                action.location(),
                "(directive removed)".dimmed()
            );
        }
        Reconciliation::Untagged => {
            let _ = writeln!(
                writer,
                "{} {}  {} {}",
                "untagged".dimmed(),
                rule.dimmed().cyan(),
                action.location().dimmed(),
                "(directive removed)".dimmed()
            );
        }
    }
    true
}

fn print_scan_summary<W: Write>(scan: &ScanResult, writer: &mut W) {
    let directives = scan.directive_count();
    let components = scan.components.len();
    let files = scan.files_scanned;
    let warnings = scan.warnings.len();

    let mut scanned = format!(
        "{} {} scanned",
        files,
        if files == 1 { "file" } else { "files" }
    );
    if warnings > 0 {
        scanned.push_str(&format!(
            ", {} {}",
            warnings,
            if warnings == 1 { "warning" } else { "warnings" }
        ));
    }

    let text = if directives == 0 {
        format!("No directives found ({})", scanned)
    } else {
        format!(
            "Found {} {} in {} {} ({})",
            directives,
            if directives == 1 {
                "directive"
            } else {
                "directives"
            },
            components,
            if components == 1 {
                "component"
            } else {
                "components"
            },
            scanned
        )
    };

    let msg = if warnings > 0 {
        format!("{} {}", FAILURE_MARK.red(), text.red())
    } else {
        format!("{} {}", SUCCESS_MARK.green(), text.green())
    };
    let _ = writeln!(writer, "{}", msg);
}

fn print_apply_summary<W: Write>(summary: &ApplySummary, writer: &mut W) {
    let mut parts = Vec::new();
    if summary.applied > 0 {
        parts.push(format!("{} applied", summary.applied));
    }
    if summary.reopened > 0 {
        parts.push(format!("{} reopened", summary.reopened));
    }
    if summary.untagged > 0 {
        parts.push(format!("{} untagged", summary.untagged));
    }
    if summary.reaffirmed > 0 {
        parts.push(format!("{} settled", summary.reaffirmed));
    }
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed));
    }
    let tally = if parts.is_empty() {
        "no changes".to_string()
    } else {
        parts.join(", ")
    };

    let seen = summary.issues_seen;
    let checked = format!(
        "({} {} checked)",
        seen,
        if seen == 1 { "issue" } else { "issues" }
    );

    let msg = if summary.failed > 0 {
        format!(
            "{} {}",
            FAILURE_MARK.red(),
            format!("{} {}, see warnings above", tally, checked).red()
        )
    } else {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{} {}", tally, checked).green()
        )
    };
    let _ = writeln!(writer, "{}", msg);
}

// ============================================================
// Tests
// ============================================================
