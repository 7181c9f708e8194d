//! # Algebraic rewriting
//!
//! The optimizer rewrites an expression tree with a fixed set of identities
//! until none of them applies anymore.
//!
//! ## Rules
//!
//! | Rule | Before | After |
//! |------|--------|-------|
//! | [`SelectionFusion`] | `σ a (σ b (C))` | `σ a and b (C)` |
//! | [`SelectionIntoSetOperation`] | `σ p (X ∪ Y)` | `σ p (X) ∪ σ p (Y)` |
//! | [`ProjectionFusion`] | `π i (π j (R))` | `π i (R)` |
//! | [`SelectionBelowProjection`] | `σ j (π k (R))` | `π k (σ j (R))` |
//! | [`RenameFusion`] | `ρ b➡c (ρ a➡b (R))` | `ρ a➡c (R)` |
//!
//! A rule rewrites the node it is given and then descends into the children
//! of whatever it produced, so one application can fire several times along a
//! path. A round applies every rule once; [`Optimizer::optimize`] runs rounds
//! until one performs no rewrite.
//!
//! ## Examples
//!
//! ```
//! use relalg::{optimizer::Optimizer, parser::tree};
//!
//! let node = tree("σ age > 30 (σ age > 30 (people ∪ staff))").unwrap();
//! let optimized = Optimizer::new().optimize(node).unwrap();
//! assert_eq!(
//!     optimized.node.to_string(),
//!     "σ age > 30 (people) ∪ σ age > 30 (staff)"
//! );
//! ```
mod rules;

pub use rules::{
    ProjectionFusion, RenameFusion, SelectionBelowProjection, SelectionFusion,
    SelectionIntoSetOperation,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{ast::Node, params::ParamError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Param(#[from] ParamError),

    /// The rules kept firing. With the built-in rules this means a defect.
    #[error("Rewriting did not settle after {rounds} rounds")]
    RoundLimitExceeded { rounds: usize },
}

/// A local tree rewrite.
pub trait Rule {
    fn name(&self) -> &'static str;

    /// Rewrites `node` itself when its shape matches, returning the new node
    /// and how many rewrites were made. Children are not visited.
    fn rewrite_here(&self, node: Node) -> Result<(Node, usize), RewriteError>;

    /// Rewrites `node`, then every node below the result.
    fn apply(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let (node, mut changes) = self.rewrite_here(node)?;

        let node = match node {
            Node::Relation(_) => node,
            Node::Unary { op, param, child } => {
                let (child, n) = self.apply(*child)?;
                changes += n;
                Node::unary(op, param, child)
            }
            Node::Binary { op, left, right } => {
                let (left, l) = self.apply(*left)?;
                let (right, r) = self.apply(*right)?;
                changes += l + r;
                Node::binary(op, left, right)
            }
        };
        Ok((node, changes))
    }
}

/// The rules that hold for every expression, in the order they are applied.
pub fn general_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SelectionFusion),
        Box::new(SelectionIntoSetOperation),
        Box::new(ProjectionFusion),
        Box::new(SelectionBelowProjection),
        Box::new(RenameFusion),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Rounds allowed before giving up, the settling round included
    pub max_rounds: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig { max_rounds: 32 }
    }
}

/// Result of running the optimizer to a fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    pub node: Node,
    /// Rounds run, including the final one that changed nothing
    pub rounds: usize,
    /// Rewrites made over all rounds
    pub rewrites: usize,
}

pub struct Optimizer {
    rules: Vec<Box<dyn Rule>>,
    config: OptimizerConfig,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::with_config(OptimizerConfig::default())
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self::with_rules(general_rules(), config)
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>, config: OptimizerConfig) -> Self {
        Optimizer { rules, config }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Applies every rule once, in order.
    pub fn round(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let mut node = node;
        let mut total = 0;

        for rule in &self.rules {
            let (rewritten, changes) = rule.apply(node)?;
            if changes > 0 {
                debug!(rule = rule.name(), changes, "rule fired");
            }
            node = rewritten;
            total += changes;
        }
        Ok((node, total))
    }

    /// Runs rounds until one makes no rewrite.
    pub fn optimize(&self, node: Node) -> Result<Optimized, RewriteError> {
        let mut node = node;
        let mut rewrites = 0;

        for round in 1..=self.config.max_rounds {
            let (rewritten, changes) = self.round(node)?;
            node = rewritten;
            rewrites += changes;

            if changes == 0 {
                debug!(rounds = round, rewrites, result = %node, "optimized");
                return Ok(Optimized {
                    node,
                    rounds: round,
                    rewrites,
                });
            }
        }

        warn!(max_rounds = self.config.max_rounds, last = %node, "rewriting did not settle");
        Err(RewriteError::RoundLimitExceeded {
            rounds: self.config.max_rounds,
        })
    }
}

/// Optimizes `node` with the general rules and the default round limit.
pub fn optimize(node: Node) -> Result<Node, RewriteError> {
    Optimizer::new().optimize(node).map(|optimized| optimized.node)
}
