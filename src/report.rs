//! Directive report assembled from a scan, ready for export.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::scanner::{ComponentDirectives, ScanResult, ScanWarning};

/// Everything a scan found, in a machine-readable shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveReport {
    pub components: Vec<ComponentDirectives>,
    pub warnings: Vec<ScanWarning>,
    pub directive_count: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl DirectiveReport {
    pub fn from_scan(scan: &ScanResult) -> Self {
        DirectiveReport {
            components: scan.components.clone(),
            warnings: scan.warnings.clone(),
            directive_count: scan.directive_count(),
            files_scanned: scan.files_scanned,
            files_skipped: scan.files_skipped,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize directive report.")
    }
}

// ============================================================
// Tests
// ============================================================
