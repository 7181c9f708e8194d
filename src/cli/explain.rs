//! Show the operation calls an engine would make for an expression

use std::collections::HashMap;

use super::{CliError, prepare};
use crate::evaluator::{CallTrace, Evaluator};

/// Options for the explain command
#[derive(Debug, Clone, Default)]
pub struct ExplainOptions {
    /// The relational algebra expression
    pub expression: String,
    /// Rewrite the tree first
    pub optimize: bool,
}

pub fn execute_explain(options: &ExplainOptions) -> Result<String, CliError> {
    let node = prepare(&options.expression, options.optimize, None)?;

    let environment: HashMap<String, CallTrace> = node
        .relations()
        .into_iter()
        .map(|name| (name.to_string(), CallTrace::named(name)))
        .collect();

    let trace = Evaluator::new(&environment).eval(&node)?;
    Ok(trace.to_string())
}
