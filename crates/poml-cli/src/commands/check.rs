//! Implementation of the `poml check` command.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Report};
use owo_colors::{OwoColorize, Stream};
use poml::parser::parse;
use poml::stylesheet::{extract_stylesheet, Stylesheet};
use poml::{Element, Node};
use tracing::debug;

use crate::output::table::{format_check_table, FileSummary};
use crate::output::PomlDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Files to check (.poml)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let summaries: Vec<FileSummary> = args
        .files
        .iter()
        .map(|path| check_file(path, !args.json))
        .collect();
    let failed = summaries.iter().filter(|summary| !summary.is_ok()).count();

    if args.json {
        let json_output = serde_json::to_string_pretty(&summaries).into_diagnostic()?;
        println!("{}", json_output);
    } else {
        println!("{}", format_check_table(&summaries));
        let line = format!("{} checked, {} failed", summaries.len(), failed);
        if failed == 0 {
            println!("{}", line.if_supports_color(Stream::Stdout, |text| text.green()));
        } else {
            println!("{}", line.if_supports_color(Stream::Stdout, |text| text.red()));
        }
    }

    if failed == 0 {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}

/// Parse one document and validate its stylesheet.
///
/// Diagnostics are printed to stderr when `report` is set.
fn check_file(path: &Path, report: bool) -> FileSummary {
    let mut summary = FileSummary {
        file: path.display().to_string(),
        elements: 0,
        text_nodes: 0,
        stylesheet_rules: None,
        error: None,
    };

    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let message = format!("cannot read {}: {}", path.display(), e);
            if report {
                eprintln!("{}", message);
            }
            summary.error = Some(message);
            return summary;
        }
    };

    let mut root = match parse(&content) {
        Ok(root) => root,
        Err(e) => {
            summary.error = Some(e.to_string());
            if report {
                let diagnostic = PomlDiagnostic::from_parse_error(path, &content, &e);
                eprintln!("{:?}", Report::new(diagnostic));
            }
            return summary;
        }
    };

    let (elements, text_nodes) = count_nodes(&root);
    summary.elements = elements;
    summary.text_nodes = text_nodes;

    match extract_stylesheet(&mut root) {
        Ok(stylesheet) => {
            summary.stylesheet_rules = stylesheet.as_ref().map(Stylesheet::len);
        }
        Err(e) => {
            summary.error = Some(e.to_string());
            if report {
                let diagnostic = PomlDiagnostic::from_parse_error(path, &content, &e);
                eprintln!("{:?}", Report::new(diagnostic));
            }
        }
    }

    debug!(file = %path.display(), elements, text_nodes, "checked document");
    summary
}

/// Count elements (root included) and text runs in a tree.
fn count_nodes(element: &Element) -> (usize, usize) {
    element
        .children
        .iter()
        .fold((1, 0), |(elements, texts), child| match child {
            Node::Element(child) => {
                let (child_elements, child_texts) = count_nodes(child);
                (elements + child_elements, texts + child_texts)
            }
            Node::Text(_) => (elements, texts + 1),
        })
}
