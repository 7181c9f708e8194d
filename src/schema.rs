//! Static schema inference.
//!
//! [`result_format`] computes the attribute names an expression would produce
//! without evaluating it. Only the schemas of the leaf relations are needed.
//!
//! # Examples
//!
//! ```
//! use relalg::{parser::tree, schema::result_format};
//! use std::collections::HashMap;
//!
//! let mut relations = HashMap::new();
//! relations.insert("people".to_string(), vec!["id".to_string(), "name".to_string()]);
//!
//! let node = tree("ρ id➡pid (people)").unwrap();
//! assert_eq!(result_format(&node, &relations).unwrap(), vec!["pid", "name"]);
//! ```

use std::collections::HashMap;

use indexmap::IndexSet;
use thiserror::Error;

use crate::{
    ast::{BinaryOp, Node, UnaryOp},
    params::{ParamError, projection_attributes, rename_pairs},
};

/// Ordered attribute names of a relation.
pub type Schema = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("No schema known for relation '{0}'")]
    UnknownRelation(String),

    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Returns the attributes the relation produced by `node` will have.
///
/// Set operators take the left schema. Product keeps both schemas in order,
/// duplicates included. Join-class operators and division treat schemas as
/// sets, so their result is duplicate free; the order is left operand first.
pub fn result_format(
    node: &Node,
    relations: &HashMap<String, Schema>,
) -> Result<Schema, SchemaError> {
    match node {
        Node::Relation(name) => relations
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownRelation(name.clone())),

        Node::Unary { op, param, child } => match op {
            UnaryOp::Projection => Ok(projection_attributes(param)),
            UnaryOp::Selection => result_format(child, relations),
            UnaryOp::Rename => {
                let pairs = rename_pairs(param)?;
                let mut fields = result_format(child, relations)?;
                for field in fields.iter_mut() {
                    if let Some(new) = pairs.get(field.as_str()) {
                        *field = new.clone();
                    }
                }
                Ok(fields)
            }
        },

        Node::Binary { op, left, right } => {
            let left = result_format(left, relations)?;
            match op {
                BinaryOp::Difference | BinaryOp::Union | BinaryOp::Intersection => Ok(left),
                BinaryOp::Product => {
                    let mut fields = left;
                    fields.extend(result_format(right, relations)?);
                    Ok(fields)
                }
                BinaryOp::Division => {
                    let right: IndexSet<String> =
                        result_format(right, relations)?.into_iter().collect();
                    let quotient: IndexSet<String> =
                        left.into_iter().filter(|f| !right.contains(f)).collect();
                    Ok(quotient.into_iter().collect())
                }
                BinaryOp::Join
                | BinaryOp::JoinLeft
                | BinaryOp::JoinRight
                | BinaryOp::JoinFull
                | BinaryOp::Semijoin => {
                    let mut fields: IndexSet<String> = left.into_iter().collect();
                    fields.extend(result_format(right, relations)?);
                    Ok(fields.into_iter().collect())
                }
            }
        }
    }
}
