//! Table formatting utilities for CLI output.

use comfy_table::{ContentArrangement, Table, presets};

/// Format name listings from `weft inspect` as an ASCII table.
pub fn format_names_table(
    variables: &[String],
    fast_variables: &[String],
    blocks: &[String],
    parameters: &[(String, String)],
) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Name", "Value"]);

    for name in variables {
        table.add_row(vec!["variable", name.as_str(), ""]);
    }
    for name in fast_variables {
        table.add_row(vec!["fast", name.as_str(), ""]);
    }
    for name in blocks {
        table.add_row(vec!["block", name.as_str(), ""]);
    }
    for (name, value) in parameters {
        table.add_row(vec!["parameter", name.as_str(), value.as_str()]);
    }

    table
}
