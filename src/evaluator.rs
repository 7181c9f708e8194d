use std::{collections::HashMap, fmt};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{BinaryOp, Node, UnaryOp},
    params::{ParamError, projection_attributes, rename_pairs},
};

/// Error type returned by [`Relation`] implementations.
pub type RelationError = Box<dyn std::error::Error + Send + Sync>;

/// A relation value the evaluator can compute with.
///
/// Storage engines implement this; each method is one named operation and
/// the evaluator never inspects relation contents itself.
pub trait Relation: Sized {
    fn product(&self, other: &Self) -> Result<Self, RelationError>;
    fn difference(&self, other: &Self) -> Result<Self, RelationError>;
    fn union(&self, other: &Self) -> Result<Self, RelationError>;
    fn intersection(&self, other: &Self) -> Result<Self, RelationError>;
    fn division(&self, other: &Self) -> Result<Self, RelationError>;
    fn join(&self, other: &Self) -> Result<Self, RelationError>;
    fn outer_left(&self, other: &Self) -> Result<Self, RelationError>;
    fn outer_right(&self, other: &Self) -> Result<Self, RelationError>;
    fn outer(&self, other: &Self) -> Result<Self, RelationError>;
    fn semijoin(&self, other: &Self) -> Result<Self, RelationError>;

    /// Keeps `attributes`, in that order.
    fn projection(&self, attributes: &[String]) -> Result<Self, RelationError>;

    /// Keeps the tuples satisfying `predicate`, which is passed through as
    /// written in the expression.
    fn selection(&self, predicate: &str) -> Result<Self, RelationError>;

    /// Renames attributes, old name to new name.
    fn rename(&self, mapping: &IndexMap<String, String>) -> Result<Self, RelationError>;
}

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Unknown relation '{0}'")]
    UnknownRelation(String),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("Operation '{operation}' failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: RelationError,
    },
}

/// Interprets expression trees against named relations.
///
/// # Examples
///
/// ```
/// use relalg::evaluator::{CallTrace, Evaluator};
/// use relalg::parser::tree;
/// use std::collections::HashMap;
///
/// let mut environment = HashMap::new();
/// environment.insert("people".to_string(), CallTrace::named("people"));
///
/// let node = tree("π name (people)").unwrap();
/// let result = Evaluator::new(&environment).eval(&node).unwrap();
/// assert_eq!(result.to_string(), r#"people.projection("name")"#);
/// ```
pub struct Evaluator<'env, R> {
    environment: &'env HashMap<String, R>,
}

impl<'env, R: Relation + Clone> Evaluator<'env, R> {
    pub fn new(environment: &'env HashMap<String, R>) -> Self {
        Evaluator { environment }
    }

    /// Evaluates `node` bottom up.
    pub fn eval(&self, node: &Node) -> Result<R, EvalError> {
        match node {
            Node::Relation(name) => self
                .environment
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownRelation(name.clone())),
            Node::Unary { op, param, child } => {
                let child = self.eval(child)?;
                self.eval_unary(*op, param, &child)
            }
            Node::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                self.eval_binary(*op, &left, &right)
            }
        }
    }

    fn eval_unary(&self, op: UnaryOp, param: &str, child: &R) -> Result<R, EvalError> {
        trace!(operation = op.operation_name(), param, "evaluating");
        let result = match op {
            UnaryOp::Projection => child.projection(&projection_attributes(param)),
            UnaryOp::Selection => child.selection(param),
            UnaryOp::Rename => child.rename(&rename_pairs(param)?),
        };
        result.map_err(|source| EvalError::Operation {
            operation: op.operation_name(),
            source,
        })
    }

    fn eval_binary(&self, op: BinaryOp, left: &R, right: &R) -> Result<R, EvalError> {
        trace!(operation = op.operation_name(), "evaluating");
        let result = match op {
            BinaryOp::Product => left.product(right),
            BinaryOp::Difference => left.difference(right),
            BinaryOp::Union => left.union(right),
            BinaryOp::Intersection => left.intersection(right),
            BinaryOp::Division => left.division(right),
            BinaryOp::Join => left.join(right),
            BinaryOp::JoinLeft => left.outer_left(right),
            BinaryOp::JoinRight => left.outer_right(right),
            BinaryOp::JoinFull => left.outer(right),
            BinaryOp::Semijoin => left.semijoin(right),
        };
        result.map_err(|source| EvalError::Operation {
            operation: op.operation_name(),
            source,
        })
    }
}

/// A relation that only records the operations applied to it.
///
/// Evaluating with call traces yields the chain of operation calls an
/// engine would perform, e.g. `people.join(skills).projection("name")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTrace(String);

impl CallTrace {
    pub fn named(name: impl Into<String>) -> Self {
        CallTrace(name.into())
    }

    fn call(&self, operation: &str, args: impl fmt::Display) -> Result<Self, RelationError> {
        Ok(CallTrace(format!("{}.{}({})", self.0, operation, args)))
    }
}

impl fmt::Display for CallTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Relation for CallTrace {
    fn product(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("product", other)
    }

    fn difference(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("difference", other)
    }

    fn union(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("union", other)
    }

    fn intersection(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("intersection", other)
    }

    fn division(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("division", other)
    }

    fn join(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("join", other)
    }

    fn outer_left(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("outer_left", other)
    }

    fn outer_right(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("outer_right", other)
    }

    fn outer(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("outer", other)
    }

    fn semijoin(&self, other: &Self) -> Result<Self, RelationError> {
        self.call("semijoin", other)
    }

    fn projection(&self, attributes: &[String]) -> Result<Self, RelationError> {
        let args: Vec<String> = attributes.iter().map(|a| format!("{:?}", a)).collect();
        self.call("projection", args.join(","))
    }

    fn selection(&self, predicate: &str) -> Result<Self, RelationError> {
        self.call("selection", format!("{:?}", predicate))
    }

    fn rename(&self, mapping: &IndexMap<String, String>) -> Result<Self, RelationError> {
        let pairs: Vec<String> = mapping
            .iter()
            .map(|(old, new)| format!("{:?}:{:?}", old, new))
            .collect();
        self.call("rename", format!("{{{}}}", pairs.join(",")))
    }
}
