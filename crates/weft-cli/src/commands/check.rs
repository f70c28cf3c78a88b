//! Implementation of the `weft check` command.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use weft::{Engine, LoadError};

use crate::output::load_diagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let mut failures = 0usize;

    for path in &args.files {
        let mut engine = Engine::new();
        match engine.load_from_file(path) {
            Ok(_) => {
                println!("{} {}", "ok".green().bold(), path.display());
            }
            Err(err) => {
                failures += 1;
                println!("{} {}", "error".red().bold(), path.display());
                match &err {
                    LoadError::Parse(parse_err) => {
                        let report = load_diagnostic(path, parse_err);
                        eprintln!("{:?}", miette::Report::new(report));
                    }
                    LoadError::Io { .. } | LoadError::IncludeDepthExceeded { .. } => {
                        eprintln!("  {err}");
                    }
                }
            }
        }
    }

    if failures > 0 {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
