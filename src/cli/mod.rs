//! CLI support for relalg
//!
//! Provides programmatic access to the `relalg` commands so other tools can
//! embed them without spawning a process.

mod check;
mod convert;
mod docs;
mod explain;
mod infer;

pub use check::{CheckOptions, CheckResult, OutputFormat, execute_check};
pub use convert::schemas_from_json;
pub use docs::get_docs_overview;
pub use explain::{ExplainOptions, execute_explain};
pub use infer::{SchemaOptions, execute_schema};

use std::io;

use thiserror::Error;

use crate::{EvalError, Node, OptimizerConfig, Optimizer, ParseError, RewriteError, SchemaError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Optimization error: {0}")]
    Rewrite(#[from] RewriteError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid relation schemas: {0}")]
    InvalidSchemas(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No relation schemas provided. Use --relations or pipe JSON to stdin.")]
    NoSchemas,
}

/// Parses `expression` and, when asked, runs the optimizer over it.
fn prepare(expression: &str, optimize: bool, max_rounds: Option<usize>) -> Result<Node, CliError> {
    let node = crate::tree(expression)?;
    if !optimize {
        return Ok(node);
    }

    let mut config = OptimizerConfig::default();
    if let Some(max_rounds) = max_rounds {
        config.max_rounds = max_rounds;
    }
    let optimized = Optimizer::with_config(config).optimize(node)?;
    tracing::info!(
        rounds = optimized.rounds,
        rewrites = optimized.rewrites,
        "optimized expression"
    );
    Ok(optimized.node)
}
