use std::fmt;

use crate::ast::{BinaryOp, UnaryOp};

/// Output of the tokenizer.
///
/// Parenthesized sub-expressions become a single [`Token::Group`], so the
/// parser never sees parentheses and a group always binds tightest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unary operator symbol
    ///
    /// Always followed by a [`Token::Parameter`].
    ///
    /// # Examples
    /// ```text
    /// π
    /// σ
    /// ρ
    /// ```
    Unary(UnaryOp),

    /// Binary operator symbol or keyword
    ///
    /// # Examples
    /// ```text
    /// ⋈
    /// semijoin
    /// ```
    Binary(BinaryOp),

    /// Raw parameter text of the preceding unary operator, trimmed
    ///
    /// # Examples
    /// ```text
    /// id, name
    /// age > 30 and name == 'x'
    /// id➡pid
    /// ```
    Parameter(String),

    /// A relation name run, or a stray character that is not an operator
    Name(String),

    /// Tokens of a parenthesized sub-expression
    Group(Vec<Token>),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Unary(op) => write!(f, "{}", op),
            Token::Binary(op) => write!(f, "{}", op),
            Token::Parameter(text) | Token::Name(text) => write!(f, "{}", text),
            Token::Group(tokens) => write!(f, "({})", render(tokens)),
        }
    }
}

/// Renders a token sequence back to expression text, for error messages.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
