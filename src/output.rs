//! JSON output for expression trees and schemas.
//!
//! Trees serialize as nested objects tagged by `kind`:
//!
//! ```json
//! {"kind": "unary", "operator": "π", "operation": "projection",
//!  "param": "name", "child": {"kind": "relation", "name": "people"}}
//! ```
//!
//! # Examples
//!
//! ```
//! use relalg::{output::to_json, parser::tree};
//!
//! let node = tree("people").unwrap();
//! assert_eq!(to_json(&node), r#"{"kind":"relation","name":"people"}"#);
//! ```

use serde_json::{Value, json};

use crate::{ast::Node, schema::Schema};

/// Converts a tree to a JSON value.
pub fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Relation(name) => json!({ "kind": "relation", "name": name }),
        Node::Unary { op, param, child } => json!({
            "kind": "unary",
            "operator": op.symbol().to_string(),
            "operation": op.operation_name(),
            "param": param,
            "child": node_to_value(child),
        }),
        Node::Binary { op, left, right } => json!({
            "kind": "binary",
            "operator": op.symbol().to_string(),
            "operation": op.operation_name(),
            "left": node_to_value(left),
            "right": node_to_value(right),
        }),
    }
}

/// Compact JSON rendering of a tree.
pub fn to_json(node: &Node) -> String {
    node_to_value(node).to_string()
}

/// Pretty JSON rendering of a tree, two spaces per level.
pub fn to_json_pretty(node: &Node) -> String {
    serde_json::to_string_pretty(&node_to_value(node)).unwrap_or_default()
}

/// JSON array of attribute names.
pub fn schema_to_json(schema: &Schema, pretty: bool) -> String {
    let value = json!(schema);
    if pretty {
        serde_json::to_string_pretty(&value).unwrap_or_default()
    } else {
        value.to_string()
    }
}
