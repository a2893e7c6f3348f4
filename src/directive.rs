//! Resolution directives parsed from source comments.
//!
//! A directive is an instruction left next to the code it pardons:
//! - `// pardon java:S123 reviewed with the security team` - accept the finding
//! - `// pardon [FP] java:S123 not reachable with user input` - mark it false positive
//! - `// pardon [ACCEPT] java:S123,java:S456 tracked in PAY-881` - several rules at once
//!
//! The status token selects the outcome (absent means accept), the
//! comma-separated rule keys select which findings the directive covers, and
//! the rest of the line becomes the resolution comment.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // marker, optional [STATUS] token, rule-key list, comment
    Regex::new(r"//\s*pardon\s+(?:\[(\w+)\]\s+)?([\w:,.-]+)\s+(.+)").unwrap()
});

/// A qualified rule identifier in `repository:rule` form, e.g. `java:S123`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleKey(String);

impl RuleKey {
    /// Parse a `repository:rule` token. Both halves must be non-empty.
    pub fn parse(s: &str) -> Option<Self> {
        let (repository, rule) = s.split_once(':')?;
        if repository.is_empty() || rule.is_empty() {
            return None;
        }
        Some(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution a directive asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// The finding is real but accepted as-is.
    Accept,
    /// The finding does not apply to this code.
    FalsePositive,
}

impl Outcome {
    /// Parse the optional status token, case insensitive. Absent and unknown
    /// tokens both mean accept.
    fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("fp") => Self::FalsePositive,
            _ => Self::Accept,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::FalsePositive => "false-positive",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Line range `[start, end]`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Range covering a single line.
    pub fn line(line: u32) -> Self {
        Self::new(line, line)
    }

    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && line <= self.end
    }
}

/// A resolution instruction scoped to one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDirective {
    /// Rules the directive covers. An issue matches on any of them.
    pub rule_keys: BTreeSet<RuleKey>,
    /// Lines the directive covers. A directive without a range matches no
    /// issue at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<LineRange>,
    pub outcome: Outcome,
    pub comment: String,
}

/// Result of matching one source line against the directive pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveMatch {
    /// The line carries a well-formed directive.
    Directive(ResolutionDirective),
    /// The line carries the marker but not a single valid rule key.
    Malformed { token: String },
}

impl ResolutionDirective {
    /// Match one source line against the directive pattern. The marker may
    /// sit anywhere in the line, so trailing comments work. Returns `None`
    /// for lines without a marker; rule-key tokens without a `:` are dropped,
    /// and a directive left with no valid key is reported as malformed.
    pub fn match_line(text: &str, line: u32) -> Option<DirectiveMatch> {
        let captures = DIRECTIVE_REGEX.captures(text)?;

        let outcome = Outcome::from_token(captures.get(1).map(|m| m.as_str()));
        let keys_token = &captures[2];
        let rule_keys: BTreeSet<RuleKey> =
            keys_token.split(',').filter_map(RuleKey::parse).collect();
        if rule_keys.is_empty() {
            return Some(DirectiveMatch::Malformed {
                token: keys_token.to_string(),
            });
        }

        Some(DirectiveMatch::Directive(Self {
            rule_keys,
            range: Some(LineRange::line(line)),
            outcome,
            comment: captures[3].trim().to_string(),
        }))
    }
}
