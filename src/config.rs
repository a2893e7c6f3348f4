//! Configuration file loading and validation.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".pardonrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directories or glob patterns under `source_root` to scan.
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    /// Component paths to skip, literal prefixes or glob patterns.
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Root the component keys are relative to.
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Issue snapshot reconciled by `apply`.
    #[serde(default = "default_issues_file")]
    pub issues_file: String,
    /// Author-to-user mapping used for attribution.
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    /// Attribute transitions to the blame author of the directive line.
    #[serde(default = "default_blame")]
    pub blame: bool,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_source_root() -> String {
    ".".to_string()
}

fn default_issues_file() -> String {
    ".pardon/issues.json".to_string()
}

fn default_accounts_file() -> String {
    ".pardon/accounts.json".to_string()
}

fn default_blame() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            source_root: default_source_root(),
            issues_file: default_issues_file(),
            accounts_file: default_accounts_file(),
            blame: default_blame(),
        }
    }
}

impl Config {
    /// Load `.pardonrc.json` from `root`. A missing file means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` or `includes` are
    /// invalid. Patterns without wildcards are literal paths and need no
    /// validation.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'ignores': \"{}\"", pattern)
                })?;
            }
        }

        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}
