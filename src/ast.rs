//! # Relational Algebra - Abstract Syntax Tree
//!
//! This module defines the tokens and the expression tree for relational
//! algebra expressions such as:
//!
//! ```text
//! π name (σ age > 30 (people ⋈ skills))
//! ```
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Nested token sequences produced by the lexer
//! - **[operators]** - The fixed unary and binary operator catalog
//! - **[node]** - The expression tree itself
//!
//! ## Precedence
//!
//! Every unary operator binds tighter than every binary operator. Binary
//! operators have no precedence among themselves: they group strictly left
//! to right, so `A - B ∪ C` means `(A - B) ∪ C`. Parentheses bind tightest.
//!
//! ## Operators
//!
//! | Symbol | Operator | Parameter |
//! |--------|----------|-----------|
//! | `π` | projection | `a, b, c` |
//! | `σ` | selection | predicate text |
//! | `ρ` | rename | `old➡new, ...` |
//! | `*` | product | |
//! | `-` | difference | |
//! | `∪` | union | |
//! | `∩` | intersection | |
//! | `÷` | division | |
//! | `⋈` | join | |
//! | `⧑` `⧒` `⧓` | left, right, full outer join | |
//! | `⋉` / `semijoin` | semijoin | |
pub mod node;
pub mod operators;
pub mod tokens;

pub use node::Node;
pub use operators::{ARROW, BinaryOp, SEMIJOIN_KEYWORD, UnaryOp};
pub use tokens::Token;
