//! Per-line authorship from version control.
//!
//! `FileBlame` adapts `git blame --line-porcelain` output into the
//! line-to-changeset lookup used for author attribution. Blame is
//! best-effort everywhere: a missing repo, an untracked file or a failed
//! subprocess all degrade to "no blame data", never to an error.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use tracing::debug;

/// The last recorded change of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    /// Author identifier, normally an email address.
    pub author: String,
    /// Commit time, unix seconds.
    pub timestamp: i64,
}

/// Line-indexed blame lookup.
pub trait BlameSource {
    fn change_at_line(&self, line: u32) -> Option<&Changeset>;

    fn has_change_at_line(&self, line: u32) -> bool {
        self.change_at_line(line).is_some()
    }
}

/// Blame data for a single file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileBlame {
    changesets: HashMap<u32, Changeset>,
}

impl FileBlame {
    /// Parse `git blame --line-porcelain` output.
    ///
    /// Each line of the file is announced by a `<sha> <orig> <final> [count]`
    /// header, followed by `author-mail` / `author-time` headers and closed
    /// by the tab-prefixed content line. Lines whose block lacks an author
    /// are left without a changeset.
    pub fn from_porcelain(output: &str) -> Self {
        let mut changesets = HashMap::new();
        let mut current_line: Option<u32> = None;
        let mut author: Option<String> = None;
        let mut timestamp: i64 = 0;

        for raw in output.lines() {
            if raw.starts_with('\t') {
                if let (Some(line), Some(author)) = (current_line.take(), author.take()) {
                    changesets.insert(line, Changeset { author, timestamp });
                }
                timestamp = 0;
                continue;
            }

            if current_line.is_none() {
                let mut parts = raw.split_whitespace();
                let is_commit_hash = parts.next().is_some_and(|sha| {
                    (sha.len() == 40 || sha.len() == 64)
                        && sha.bytes().all(|b| b.is_ascii_hexdigit())
                });
                if is_commit_hash
                    && let Some(line) = parts.nth(1).and_then(|n| n.parse().ok())
                {
                    current_line = Some(line);
                }
                continue;
            }

            if let Some(mail) = raw.strip_prefix("author-mail ") {
                let mail = mail.trim().trim_start_matches('<').trim_end_matches('>');
                author = Some(mail.to_string());
            } else if let Some(time) = raw.strip_prefix("author-time ") {
                timestamp = time.trim().parse().unwrap_or(0);
            }
        }

        Self { changesets }
    }

    pub fn insert(&mut self, line: u32, changeset: Changeset) {
        self.changesets.insert(line, changeset);
    }

    pub fn is_empty(&self) -> bool {
        self.changesets.is_empty()
    }
}

impl BlameSource for FileBlame {
    fn change_at_line(&self, line: u32) -> Option<&Changeset> {
        self.changesets.get(&line)
    }
}

/// Run `git blame --line-porcelain` for `path`, relative to `repo_root`.
/// Returns `None` when git is missing, the file is not tracked or blame
/// fails for any other reason.
pub fn git_blame(repo_root: &Path, path: &str) -> Option<FileBlame> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["blame", "--line-porcelain", "--"])
        .arg(path)
        .output();

    match output {
        Ok(out) if out.status.success() => Some(FileBlame::from_porcelain(
            &String::from_utf8_lossy(&out.stdout),
        )),
        Ok(out) => {
            debug!(
                "git blame failed for {path}: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            );
            None
        }
        Err(err) => {
            debug!("git blame could not run: {err}");
            None
        }
    }
}
