//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;

/// Check result for a single document.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    /// Path as given on the command line.
    pub file: String,
    /// Number of elements, stylesheet included.
    pub elements: usize,
    /// Number of text runs.
    pub text_nodes: usize,
    /// Number of stylesheet rules, when the document has a stylesheet.
    pub stylesheet_rules: Option<usize>,
    /// Error message, when the document failed to check.
    pub error: Option<String>,
}

impl FileSummary {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn status(&self) -> &'static str {
        if self.is_ok() {
            "ok"
        } else {
            "error"
        }
    }
}

/// Format check results as an ASCII table.
pub fn format_check_table(summaries: &[FileSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Elements", "Text nodes", "Rules", "Status"]);

    for summary in summaries {
        table.add_row(vec![
            summary.file.clone(),
            summary.elements.to_string(),
            summary.text_nodes.to_string(),
            summary
                .stylesheet_rules
                .map_or_else(|| "-".to_string(), |rules| format!("{rules}")),
            summary.status().to_string(),
        ]);
    }

    table
}
