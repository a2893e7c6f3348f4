//! Pardon - resolution directives for static analysis issues
//!
//! Pardon scans source comments for resolution directives and reconciles
//! them with the issue snapshot exported from the analysis platform. A
//! directive accepts an issue or marks it a false positive, right next to
//! the code it concerns; removing the directive reopens what it resolved.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands)
//! - `config`: Configuration file loading and parsing
//! - `directive`: Directive syntax and line matching
//! - `scanner`: Directive collection across the source tree
//! - `issue`: Issue snapshot types and persistence
//! - `workflow`: Issue state machine and transitions
//! - `reconcile`: Applies directives to issue state
//! - `blame`: Git blame author lookup
//! - `accounts`: Author to account mapping
//! - `report`: Machine-readable scan report
//! - `reporter`: Terminal output

pub mod accounts;
pub mod blame;
pub mod cli;
pub mod config;
pub mod directive;
pub mod issue;
pub mod reconcile;
pub mod report;
pub mod reporter;
pub mod scanner;
pub mod workflow;
