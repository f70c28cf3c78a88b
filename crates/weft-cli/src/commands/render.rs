//! Implementation of the `weft render` command.

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::PathBuf;

use serde::Deserialize;
use weft::Engine;

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    /// Variable assignment in NAME=VALUE form (repeatable; repeats append)
    #[arg(short = 's', long = "set", value_parser = parse_key_val)]
    pub sets: Vec<(String, String)>,

    /// Fast assignment in NAME=VALUE form (repeatable)
    #[arg(long = "fast", value_parser = parse_key_val)]
    pub fasts: Vec<(String, String)>,

    /// Global assignment in NAME=VALUE form (repeatable)
    #[arg(long = "global", value_parser = parse_key_val)]
    pub globals: Vec<(String, String)>,

    /// JSON file with assignments: {"NAME": "value", "ROW": ["a", "b"]}
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Default formatter applied to untagged placeholders
    #[arg(long)]
    pub default_formatter: Option<String>,
}

/// A JSON assignment value: one string, or a sequence for repetition.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonAssign {
    One(String),
    Many(Vec<String>),
}

/// Parse a NAME=VALUE argument.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid assignment '{}': expected NAME=VALUE", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> miette::Result<i32> {
    let mut engine = Engine::new();

    let mut template = engine
        .load_from_file(&args.template)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(name) = &args.default_formatter {
        engine.set_default_formatter(Some(name.clone()));
    }

    if let Some(values_path) = &args.values {
        let content = read_to_string(values_path).map_err(|e| {
            miette::miette!("Cannot read values file {}: {}", values_path.display(), e)
        })?;
        let values: BTreeMap<String, JsonAssign> = serde_json::from_str(&content)
            .map_err(|e| miette::miette!("Invalid values file: {}", e))?;

        for (name, value) in values {
            match value {
                JsonAssign::One(text) => template.assign(name, text),
                JsonAssign::Many(texts) => {
                    for text in texts {
                        template.assign(name.clone(), text);
                    }
                }
            }
        }
    }

    for (name, value) in args.sets {
        template.assign(name, value);
    }
    for (name, value) in args.fasts {
        template.assign_fast(name, value);
    }
    for (name, value) in args.globals {
        engine.assign_global(name, value);
    }

    let rendered = engine
        .render(&template)
        .map_err(|e| miette::miette!("{}", e))?;

    print!("{rendered}");
    Ok(exitcode::OK)
}
