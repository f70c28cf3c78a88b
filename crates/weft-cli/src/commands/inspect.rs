//! Implementation of the `weft inspect` command.

use std::path::PathBuf;

use serde::Serialize;
use weft::Engine;

use crate::output::format_names_table;

/// Arguments for the inspect command.
#[derive(Debug, clap::Args)]
pub struct InspectArgs {
    /// Template file to inspect
    pub template: PathBuf,

    /// Only report names of the root document, not nested blocks
    #[arg(long)]
    pub root_only: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for inspect results.
#[derive(Serialize)]
struct InspectResult {
    variables: Vec<String>,
    fast_variables: Vec<String>,
    blocks: Vec<String>,
    parameters: Vec<(String, String)>,
}

/// Run the inspect command.
pub fn run_inspect(args: InspectArgs) -> miette::Result<i32> {
    let mut engine = Engine::new();
    let template = engine
        .load_from_file(&args.template)
        .map_err(|e| miette::miette!("{}", e))?;

    let include_nested = !args.root_only;
    let result = InspectResult {
        variables: template.variable_names(include_nested).into_iter().collect(),
        fast_variables: template
            .fast_variable_names(include_nested)
            .into_iter()
            .collect(),
        blocks: template.block_names(include_nested).into_iter().collect(),
        parameters: {
            let mut parameters: Vec<(String, String)> = engine
                .parameters()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            parameters.sort();
            parameters
        },
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result)
                .map_err(|e| miette::miette!("JSON serialization failed: {}", e))?
        );
        return Ok(exitcode::OK);
    }

    let table = format_names_table(
        &result.variables,
        &result.fast_variables,
        &result.blocks,
        &result.parameters,
    );
    println!("{table}");

    Ok(exitcode::OK)
}
