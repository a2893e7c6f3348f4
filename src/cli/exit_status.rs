use std::process::ExitCode;

/// Exit status for CLI commands, following common conventions for linter tools.
///
/// - `Success` (0): Command completed, nothing went wrong
/// - `Failure` (1): Command completed but found problems (malformed
///   directives, failed transitions)
/// - `Error` (2): Command failed outright (missing snapshot, broken config)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, nothing went wrong.
    Success,
    /// Command completed but found problems.
    Failure,
    /// Command failed outright.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
