//! Implementation of the `poml render` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{miette, IntoDiagnostic};
use owo_colors::{OwoColorize, Stream};
use poml::{Context, FsLoader, Renderer, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Document to render (.poml)
    pub file: PathBuf,

    /// JSON file with the variable context (an object)
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Variables in name=value format (repeatable). Values are parsed as
    /// JSON when possible and taken as strings otherwise.
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Directory that relative document, include and let paths resolve against
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for render results.
#[derive(Serialize)]
pub struct RenderResult {
    pub output: String,
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid parameter format '{}': expected name=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Interpret a `--param` value: JSON if it parses, a plain string otherwise.
fn param_value(raw: String) -> Value {
    match serde_json::from_str::<JsonValue>(&raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    }
}

/// Load the `--context` file, which must hold a JSON object.
fn load_context(path: Option<&PathBuf>) -> miette::Result<Context> {
    let Some(path) = path else {
        return Ok(Context::new());
    };

    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Cannot read context file {}: {}", path.display(), e))?;
    match serde_json::from_str::<JsonValue>(&content) {
        Ok(JsonValue::Object(map)) => Ok(map
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        Ok(_) => Err(miette!(
            "Context file {} must contain a JSON object",
            path.display()
        )),
        Err(e) => Err(miette!(
            "Invalid JSON in context file {}: {}",
            path.display(),
            e
        )),
    }
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> miette::Result<i32> {
    let mut context = load_context(args.context.as_ref())?;
    for (name, raw) in args.params {
        context.insert(name, param_value(raw));
    }
    debug!(variables = context.len(), "loaded render context");

    let loader = match &args.base_dir {
        Some(dir) => FsLoader::with_base_dir(dir),
        None => FsLoader::new(),
    };
    let renderer = Renderer::builder().loader(Box::new(loader)).build();

    match renderer.render_file(&args.file, &context) {
        Ok(output) => {
            if args.json {
                let result = RenderResult { output };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).into_diagnostic()?
                );
            } else {
                println!("{}", output);
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string()
                });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!(
                    "{} {}",
                    "Render error:".if_supports_color(Stream::Stderr, |text| text.red()),
                    e
                );
            }
            Ok(exitcode::DATAERR)
        }
    }
}
