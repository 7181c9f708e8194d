//! The algebraic identities applied by the optimizer.
//!
//! Each rule only ever looks at a node and its direct child. Shapes that do
//! not match are handed back untouched.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use super::{RewriteError, Rule};
use crate::{
    ast::{Node, UnaryOp},
    lexer::{QuoteState, is_whole_parameter},
    params::{rename_pairs, render_rename},
};

/// `σ a (σ b (C))` → `σ a and b (C)`, or `σ a (C)` when `a == b`.
///
/// Chains of any length collapse in a single application.
pub struct SelectionFusion;

/// `σ p (X ∪ Y)` → `σ p (X) ∪ σ p (Y)`, likewise for `-` and `∩`.
pub struct SelectionIntoSetOperation;

/// `π i (π j (R))` → `π i (R)`.
pub struct ProjectionFusion;

/// `σ j (π k (R))` → `π k (σ j (R))`.
pub struct SelectionBelowProjection;

/// `ρ a (ρ b (C))` → `ρ c (C)` where `c` is the composition of both renames.
pub struct RenameFusion;

/// True when `predicate` has an operator binding looser than `and` outside of
/// parentheses and string literals.
fn has_loose_operator(predicate: &str) -> bool {
    let mut quotes = QuoteState::default();
    let mut depth = 0usize;
    let mut word = String::new();

    for ch in predicate.chars().chain(std::iter::once(' ')) {
        let outside = quotes.feed(ch);
        if outside && (ch.is_alphanumeric() || ch == '_') {
            word.push(ch);
            continue;
        }
        if depth == 0 && matches!(word.as_str(), "or" | "if" | "lambda") {
            return true;
        }
        word.clear();
        match ch {
            '(' if outside => depth += 1,
            ')' if outside => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

/// Conjunction of two predicates, or `None` when plain `and` would change
/// the meaning of either side.
///
/// A parenthesized predicate has to lead the conjunction, since a parameter
/// ends at its first unquoted `(` past a leading group. When neither order
/// reads back whole the predicates stay apart.
fn merge_predicates(outer: &str, inner: &str) -> Option<String> {
    if outer.trim() == inner.trim() {
        return Some(outer.to_string());
    }
    if has_loose_operator(outer) || has_loose_operator(inner) {
        return None;
    }
    [
        format!("{} and {}", outer, inner),
        format!("{} and {}", inner, outer),
    ]
    .into_iter()
    .find(|merged| is_whole_parameter(merged))
}

/// Composes two renames where `inner` is applied first.
///
/// An outer pair whose source is produced by the inner rename is folded into
/// the inner pair and dropped; identity pairs disappear.
fn compose_renames(
    outer: &IndexMap<String, String>,
    inner: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut composed = IndexMap::new();

    for (old, mid) in inner {
        let new = outer.get(mid).unwrap_or(mid);
        if old != new {
            composed.insert(old.clone(), new.clone());
        }
    }

    let produced: HashSet<&String> = inner.values().collect();
    for (old, new) in outer {
        if inner.contains_key(old) || produced.contains(old) || old == new {
            continue;
        }
        composed.insert(old.clone(), new.clone());
    }
    composed
}

impl Rule for SelectionFusion {
    fn name(&self) -> &'static str {
        "selection_fusion"
    }

    fn rewrite_here(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let mut changes = 0;
        let mut node = node;

        loop {
            let (outer, child) = match node.into_unary(UnaryOp::Selection) {
                Ok(parts) => parts,
                Err(node) => return Ok((node, changes)),
            };
            let (inner, grandchild) = match child.into_unary(UnaryOp::Selection) {
                Ok(parts) => parts,
                Err(child) => return Ok((Node::selection(outer, child), changes)),
            };

            match merge_predicates(&outer, &inner) {
                Some(predicate) => {
                    changes += 1;
                    node = Node::selection(predicate, grandchild);
                }
                None => {
                    debug!(%outer, %inner, "selections kept apart");
                    let child = Node::selection(inner, grandchild);
                    return Ok((Node::selection(outer, child), changes));
                }
            }
        }
    }
}

impl Rule for SelectionIntoSetOperation {
    fn name(&self) -> &'static str {
        "selection_into_set_operation"
    }

    fn rewrite_here(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let (predicate, child) = match node.into_unary(UnaryOp::Selection) {
            Ok(parts) => parts,
            Err(node) => return Ok((node, 0)),
        };

        match child.into_binary() {
            Ok((op, left, right)) if op.is_set_operation() => {
                let left = Node::selection(predicate.clone(), left);
                let right = Node::selection(predicate, right);
                Ok((Node::binary(op, left, right), 1))
            }
            Ok((op, left, right)) => Ok((Node::selection(predicate, Node::binary(op, left, right)), 0)),
            Err(child) => Ok((Node::selection(predicate, child), 0)),
        }
    }
}

impl Rule for ProjectionFusion {
    fn name(&self) -> &'static str {
        "projection_fusion"
    }

    fn rewrite_here(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let (attributes, mut child) = match node.into_unary(UnaryOp::Projection) {
            Ok(parts) => parts,
            Err(node) => return Ok((node, 0)),
        };

        let mut changes = 0;
        loop {
            match child.into_unary(UnaryOp::Projection) {
                Ok((_, grandchild)) => {
                    changes += 1;
                    child = grandchild;
                }
                Err(rest) => return Ok((Node::projection(attributes, rest), changes)),
            }
        }
    }
}

impl Rule for SelectionBelowProjection {
    fn name(&self) -> &'static str {
        "selection_below_projection"
    }

    fn rewrite_here(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let (predicate, child) = match node.into_unary(UnaryOp::Selection) {
            Ok(parts) => parts,
            Err(node) => return Ok((node, 0)),
        };

        match child.into_unary(UnaryOp::Projection) {
            Ok((attributes, grandchild)) => Ok((
                Node::projection(attributes, Node::selection(predicate, grandchild)),
                1,
            )),
            Err(child) => Ok((Node::selection(predicate, child), 0)),
        }
    }
}

impl Rule for RenameFusion {
    fn name(&self) -> &'static str {
        "rename_fusion"
    }

    fn rewrite_here(&self, node: Node) -> Result<(Node, usize), RewriteError> {
        let mut changes = 0;
        let mut node = node;

        loop {
            let (outer, child) = match node.into_unary(UnaryOp::Rename) {
                Ok(parts) => parts,
                Err(node) => return Ok((node, changes)),
            };
            let (inner, grandchild) = match child.into_unary(UnaryOp::Rename) {
                Ok(parts) => parts,
                Err(child) => return Ok((Node::rename(outer, child), changes)),
            };

            let composed = compose_renames(&rename_pairs(&outer)?, &rename_pairs(&inner)?);
            changes += 1;
            if composed.is_empty() {
                debug!(%outer, %inner, "renames cancel out");
                return Ok((grandchild, changes));
            }
            node = Node::rename(render_rename(&composed), grandchild);
        }
    }
}

#[test]
fn test_loose_operator_detection() {
    assert!(has_loose_operator("a == 1 or b == 2"));
    assert!(!has_loose_operator("(a == 1 or b == 2)"));
    assert!(!has_loose_operator("name == 'this or that'"));
    assert!(!has_loose_operator("order > 3 and color == 'red'"));
}

#[test]
fn test_merge_predicates_leads_with_group() {
    assert_eq!(merge_predicates("c", "(a or b)").as_deref(), Some("(a or b) and c"));
    assert_eq!(merge_predicates("(a or b)", "c").as_deref(), Some("(a or b) and c"));
    assert_eq!(merge_predicates("(a or b)", "(c or d)"), None);
}

#[test]
fn test_compose_renames_keeps_untouched_outer_pairs() {
    let outer = rename_pairs("b➡c,x➡y").unwrap();
    let inner = rename_pairs("a➡b").unwrap();
    assert_eq!(render_rename(&compose_renames(&outer, &inner)), "a➡c,x➡y");
}
