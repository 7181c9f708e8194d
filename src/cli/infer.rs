//! Infer the result schema of an expression

use super::{CliError, prepare, schemas_from_json};
use crate::{output::schema_to_json, schema::result_format};

/// Options for the schema command
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    /// The relational algebra expression
    pub expression: String,
    /// JSON object mapping relation names to attribute arrays
    pub relations: Option<String>,
    /// Rewrite the tree before inferring
    pub optimize: bool,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Returns the inferred attribute names as a JSON array.
pub fn execute_schema(options: &SchemaOptions) -> Result<String, CliError> {
    let relations = options.relations.as_deref().ok_or(CliError::NoSchemas)?;
    let relations = schemas_from_json(relations)?;

    let node = prepare(&options.expression, options.optimize, None)?;
    let schema = result_format(&node, &relations)?;
    Ok(schema_to_json(&schema, options.pretty))
}
