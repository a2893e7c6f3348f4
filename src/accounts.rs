//! Mapping from blame authors to issue-store user identities.
//!
//! Transitions and comments are attributed to the user whose account matches
//! the blame author of the directive line. The mapping lives in a JSON file:
//!
//! ```json
//! { "jane@example.com": { "uuid": "user-uuid-1", "login": "jane" } }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A user identity of the issue store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
    pub uuid: String,
    pub login: String,
}

/// Resolves author identifiers (typically emails) to user identities.
pub trait AccountResolver {
    fn resolve(&self, author: &str) -> Option<&UserId>;
}

/// JSON-backed account directory.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountDirectory {
    accounts: HashMap<String, UserId>,
}

impl AccountDirectory {
    /// Load the directory from `path`. A missing file is an empty directory,
    /// not an error; attribution is optional.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read accounts file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Accounts file is not valid JSON: {}", path.display()))
    }

    pub fn insert(&mut self, author: impl Into<String>, user: UserId) {
        self.accounts.insert(author.into(), user);
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountResolver for AccountDirectory {
    fn resolve(&self, author: &str) -> Option<&UserId> {
        self.accounts.get(author)
    }
}
