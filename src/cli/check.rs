//! Parse (and optionally optimize) an expression and render the tree

use super::{CliError, prepare};
use crate::output::{to_json, to_json_pretty};

/// How a tree is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Infix expression text
    #[default]
    Text,
    /// Indented tree, one node per line
    Tree,
    /// JSON object tree
    Json,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The relational algebra expression
    pub expression: String,
    /// Rewrite the tree before printing it
    pub optimize: bool,
    /// Round limit for the optimizer
    pub max_rounds: Option<usize>,
    /// Output format
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Only validate syntax, don't print the tree
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq, Eq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// The rendered tree
    Rendered(String),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        crate::tree(&options.expression)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let node = prepare(&options.expression, options.optimize, options.max_rounds)?;

    let rendered = match options.format {
        OutputFormat::Text => node.to_string(),
        OutputFormat::Tree => node.print_tree(),
        OutputFormat::Json if options.pretty => to_json_pretty(&node),
        OutputFormat::Json => to_json(&node),
    };
    Ok(CheckResult::Rendered(rendered))
}
