//! Source-tree scanning for resolution directives.
//!
//! Walks the configured include paths under the source root, parses every
//! readable file line by line and collects directives per component. A
//! component key is the file's path relative to the source root, with `/`
//! separators, which is also how the issue snapshot refers to files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::directive::{DirectiveMatch, ResolutionDirective};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// A malformed directive surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWarning {
    pub component: String,
    pub line: u32,
    pub message: String,
}

/// Directives found in one component, in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDirectives {
    pub component: String,
    pub directives: Vec<ResolutionDirective>,
}

/// Result of scanning the source tree.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Components that carry at least one directive, in component order.
    pub components: Vec<ComponentDirectives>,
    pub warnings: Vec<ScanWarning>,
    /// Files parsed.
    pub files_scanned: usize,
    /// Files that could not be read as text.
    pub files_skipped: usize,
}

impl ScanResult {
    /// Directives of `component`, if it carries any.
    pub fn directives_for(&self, component: &str) -> Option<&[ResolutionDirective]> {
        self.components
            .iter()
            .find(|c| c.component == component)
            .map(|c| c.directives.as_slice())
    }

    pub fn directive_count(&self) -> usize {
        self.components.iter().map(|c| c.directives.len()).sum()
    }
}

/// Scan the configured source tree for `pardon` directives.
pub fn scan(root: &Path, config: &Config) -> ScanResult {
    let source_root = root.join(&config.source_root);
    let files = collect_files(&source_root, &config.includes, &config.ignores);

    let scans: Vec<FileScan> = files
        .par_iter()
        .map(|(component, path)| scan_file(component, path))
        .collect();

    let mut result = ScanResult::default();
    for scan in scans {
        if scan.skipped {
            result.files_skipped += 1;
            continue;
        }
        result.files_scanned += 1;
        result.warnings.extend(scan.warnings);
        if !scan.directives.is_empty() {
            result.components.push(ComponentDirectives {
                component: scan.component,
                directives: scan.directives,
            });
        }
    }
    result
}

#[derive(Debug, Default)]
struct FileScan {
    component: String,
    directives: Vec<ResolutionDirective>,
    warnings: Vec<ScanWarning>,
    skipped: bool,
}

fn scan_file(component: &str, path: &Path) -> FileScan {
    let mut scan = FileScan {
        component: component.to_string(),
        ..FileScan::default()
    };

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            debug!("skipping {component}: {err}");
            scan.skipped = true;
            return scan;
        }
    };

    for (idx, text) in source.lines().enumerate() {
        let line = idx as u32 + 1;
        match ResolutionDirective::match_line(text, line) {
            Some(DirectiveMatch::Directive(directive)) => scan.directives.push(directive),
            Some(DirectiveMatch::Malformed { token }) => scan.warnings.push(ScanWarning {
                component: component.to_string(),
                line,
                message: format!("directive has no valid rule key in '{token}'"),
            }),
            None => {}
        }
    }
    scan
}

/// Candidate files as (component, path), in component order. Overlapping
/// includes are deduplicated.
fn collect_files(
    source_root: &Path,
    includes: &[String],
    ignores: &[String],
) -> Vec<(String, PathBuf)> {
    let mut literal_ignores: Vec<&str> = Vec::new();
    let mut glob_ignores: Vec<Pattern> = Vec::new();
    for p in ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_ignores.push(pattern),
                Err(err) => debug!("invalid ignore pattern '{p}': {err}"),
            }
        } else {
            literal_ignores.push(p);
        }
    }

    let roots_to_walk: Vec<PathBuf> = if includes.is_empty() {
        vec![source_root.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for include in includes {
            if is_glob_pattern(include) {
                let full_pattern = source_root.join(include);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten()),
                    Err(err) => debug!("invalid include pattern '{include}': {err}"),
                }
            } else {
                let path = source_root.join(include);
                if path.exists() {
                    paths.push(path);
                } else {
                    debug!("include path does not exist: {}", path.display());
                }
            }
        }
        paths
    };

    let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();
    for dir in roots_to_walk {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("cannot access path: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let component = match entry.path().strip_prefix(source_root) {
                Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                Err(_) => entry.path().to_string_lossy().replace('\\', "/"),
            };

            if literal_ignores
                .iter()
                .any(|&prefix| Path::new(&component).starts_with(prefix))
            {
                continue;
            }
            if glob_ignores.iter().any(|p| p.matches(&component)) {
                continue;
            }

            files.insert(component, entry.into_path());
        }
    }
    files.into_iter().collect()
}
