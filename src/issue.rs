//! Issue records and the snapshot file they are exchanged in.
//!
//! An issue snapshot is the JSON export of a static-analysis store:
//! per-issue workflow status, resolution, tags and comments. `apply` loads
//! it, reconciles it against the scanned directives and (with `--write`)
//! saves the mutated snapshot back.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::directive::RuleKey;

/// Raw workflow statuses, as stored in the snapshot.
pub const STATUS_OPEN: &str = "OPEN";
pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_REOPENED: &str = "REOPENED";
pub const STATUS_RESOLVED: &str = "RESOLVED";
pub const STATUS_CLOSED: &str = "CLOSED";
pub const STATUS_TO_REVIEW: &str = "TO_REVIEW";
pub const STATUS_REVIEWED: &str = "REVIEWED";

/// Raw resolutions.
pub const RESOLUTION_FIXED: &str = "FIXED";
pub const RESOLUTION_WONT_FIX: &str = "WONT_FIX";
pub const RESOLUTION_FALSE_POSITIVE: &str = "FALSE-POSITIVE";
pub const RESOLUTION_ACKNOWLEDGED: &str = "ACKNOWLEDGED";
pub const RESOLUTION_SAFE: &str = "SAFE";

/// Tag marking an issue whose state was set by a resolution directive.
pub const RESOLUTION_TAG: &str = "issue-resolution";

/// Which transition vocabulary applies to an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// A code-quality finding (bug, code smell, vulnerability).
    #[default]
    Ordinary,
    /// A security hotspot, reviewed rather than fixed.
    Hotspot,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => write!(f, "ordinary"),
            Self::Hotspot => write!(f, "hotspot"),
        }
    }
}

/// Normalized workflow status of an ordinary issue, combining the raw status
/// with the resolution. Hotspot statuses have no normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStatus {
    Open,
    Confirmed,
    Accepted,
    FalsePositive,
    Fixed,
}

/// A comment attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueComment {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_uuid: Option<String>,
}

/// One issue of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    /// Project-relative path of the file the issue was raised on.
    pub component_key: String,
    pub rule_key: RuleKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default)]
    pub kind: IssueKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<IssueComment>,
    /// Set when the reconciliation pass touched the issue. Not persisted.
    #[serde(skip)]
    pub changed: bool,
}

impl Issue {
    /// Normalized status of an ordinary issue. `None` for hotspot statuses
    /// and anything else outside the ordinary vocabulary.
    pub fn issue_status(&self) -> Option<IssueStatus> {
        match self.status.as_str() {
            STATUS_OPEN | STATUS_REOPENED => Some(IssueStatus::Open),
            STATUS_CONFIRMED => Some(IssueStatus::Confirmed),
            STATUS_RESOLVED | STATUS_CLOSED => match self.resolution.as_deref() {
                Some(RESOLUTION_WONT_FIX) => Some(IssueStatus::Accepted),
                Some(RESOLUTION_FALSE_POSITIVE) => Some(IssueStatus::FalsePositive),
                _ => Some(IssueStatus::Fixed),
            },
            _ => None,
        }
    }

    pub fn has_resolution_tag(&self) -> bool {
        self.internal_tags.iter().any(|t| t == RESOLUTION_TAG)
    }

    /// Tag the issue as directive-managed. No-op when already tagged.
    pub fn add_resolution_tag(&mut self) {
        if !self.has_resolution_tag() {
            self.internal_tags.push(RESOLUTION_TAG.to_string());
            self.changed = true;
        }
    }

    /// Drop the directive-managed tag. Returns whether it was present.
    pub fn remove_resolution_tag(&mut self) -> bool {
        let before = self.internal_tags.len();
        self.internal_tags.retain(|t| t != RESOLUTION_TAG);
        if self.internal_tags.len() == before {
            return false;
        }
        self.changed = true;
        true
    }
}

/// The issue snapshot file: every issue of the analyzed project.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSnapshot {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl IssueSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read issue snapshot: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Issue snapshot is not valid JSON: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write issue snapshot: {}", path.display()))
    }
}
