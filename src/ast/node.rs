use std::fmt;

use crate::ast::{BinaryOp, UnaryOp};

/// A node of a relational algebra expression tree.
///
/// Leaves are relations and internal nodes are operators. Children are
/// exclusively owned, so a tree is always acyclic and every rewrite hands
/// back a whole new subtree rather than patching a shared one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Named relation (leaf)
    ///
    /// # Example
    /// ```text
    /// people
    /// ```
    Relation(String),

    /// Unary operator applied to one operand
    ///
    /// # Example
    /// ```text
    /// π name, age (people)
    /// ```
    Unary {
        op: UnaryOp,
        param: String,
        child: Box<Node>,
    },

    /// Binary operator applied to two operands
    ///
    /// # Example
    /// ```text
    /// people ⋈ skills
    /// ```
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn relation(name: impl Into<String>) -> Self {
        Node::Relation(name.into())
    }

    pub fn unary(op: UnaryOp, param: impl Into<String>, child: Node) -> Self {
        Node::Unary {
            op,
            param: param.into(),
            child: Box::new(child),
        }
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn projection(attributes: impl Into<String>, child: Node) -> Self {
        Self::unary(UnaryOp::Projection, attributes, child)
    }

    pub fn selection(predicate: impl Into<String>, child: Node) -> Self {
        Self::unary(UnaryOp::Selection, predicate, child)
    }

    pub fn rename(mapping: impl Into<String>, child: Node) -> Self {
        Self::unary(UnaryOp::Rename, mapping, child)
    }

    /// The unary operator at this node, if any.
    pub fn unary_op(&self) -> Option<UnaryOp> {
        match self {
            Node::Unary { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// The binary operator at this node, if any.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            Node::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Splits a unary node with operator `expected` into its parameter and
    /// operand. Any other node is handed back unchanged.
    pub fn into_unary(self, expected: UnaryOp) -> Result<(String, Node), Node> {
        match self {
            Node::Unary { op, param, child } if op == expected => Ok((param, *child)),
            other => Err(other),
        }
    }

    /// Splits a binary node into its operator and operands. Any other node is
    /// handed back unchanged.
    pub fn into_binary(self) -> Result<(BinaryOp, Node, Node), Node> {
        match self {
            Node::Binary { op, left, right } => Ok((op, *left, *right)),
            other => Err(other),
        }
    }

    /// Returns the leftmost leaf of the tree.
    pub fn left_leaf(&self) -> &Node {
        match self {
            Node::Relation(_) => self,
            Node::Unary { child, .. } => child.left_leaf(),
            Node::Binary { left, .. } => left.left_leaf(),
        }
    }

    /// Names of every relation referenced, left to right, repeats included.
    pub fn relations(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_relations(&mut names);
        names
    }

    fn collect_relations<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Node::Relation(name) => names.push(name),
            Node::Unary { child, .. } => child.collect_relations(names),
            Node::Binary { left, right, .. } => {
                left.collect_relations(names);
                right.collect_relations(names);
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Node::Relation(_) => 1,
            Node::Unary { child, .. } => 1 + child.size(),
            Node::Binary { left, right, .. } => 1 + left.size() + right.size(),
        }
    }

    /// Indented rendering, one node per line, two spaces per level.
    ///
    /// ```text
    /// ∪
    ///   σ	age > 30
    ///     people
    ///   staff
    /// ```
    pub fn print_tree(&self) -> String {
        let mut lines = Vec::new();
        self.tree_lines(0, &mut lines);
        lines.join("\n")
    }

    fn tree_lines(&self, level: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(level);
        match self {
            Node::Relation(name) => lines.push(format!("{}{}", indent, name)),
            Node::Unary { op, param, child } => {
                lines.push(format!("{}{}\t{}", indent, op, param));
                child.tree_lines(level + 1, lines);
            }
            Node::Binary { op, left, right } => {
                lines.push(format!("{}{}", indent, op));
                left.tree_lines(level + 1, lines);
                right.tree_lines(level + 1, lines);
            }
        }
    }
}

/// Infix rendering that parses back to an equal tree.
///
/// Binary operators group to the left, so only a binary right operand needs
/// parentheses.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Relation(name) => write!(f, "{}", name),
            Node::Unary { op, param, child } => write!(f, "{} {} ({})", op, param, child),
            Node::Binary { op, left, right } => match right.as_ref() {
                Node::Binary { .. } => write!(f, "{} {} ({})", left, op, right),
                _ => write!(f, "{} {} {}", left, op, right),
            },
        }
    }
}
