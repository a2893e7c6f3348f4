use anyhow::Result;

use super::super::args::{OutputFormat, ScanCommand};
use super::super::exit_status::ExitStatus;
use crate::config::Config;
use crate::report::DirectiveReport;
use crate::reporter;
use crate::scanner;

pub fn scan(cmd: ScanCommand) -> Result<ExitStatus> {
    let mut config = Config::load(&cmd.common.root)?;
    if let Some(source_root) = &cmd.common.source_root {
        config.source_root = source_root.to_string_lossy().into_owned();
    }

    let result = scanner::scan(&cmd.common.root, &config);

    match cmd.format {
        // The JSON payload already carries the warnings, keep stderr quiet.
        OutputFormat::Json => println!("{}", DirectiveReport::from_scan(&result).to_json()?),
        OutputFormat::Text => {
            reporter::print_scan_report(&result);
            reporter::print_warnings(&result.warnings);
            reporter::print_skipped_note(result.files_skipped, cmd.common.verbose);
        }
    }

    if result.warnings.is_empty() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}
