use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{BinaryOp, Node, Token, UnaryOp, tokens::render},
    lexer::{LexError, Lexer, is_valid_relation_name},
};

/// Errors raised while turning tokens into a tree.
///
/// Every variant carries the fragment of the expression that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Empty expression")]
    EmptyExpression,

    #[error("'{0}' is not a valid relation name")]
    InvalidRelationName(String),

    #[error("Expected left operand for '{operator}' in '{fragment}'")]
    MissingLeftOperand { operator: BinaryOp, fragment: String },

    #[error("Expected right operand for '{operator}' in '{fragment}'")]
    MissingRightOperand { operator: BinaryOp, fragment: String },

    #[error("Expected a parameter and an operand after '{operator}' in '{fragment}'")]
    IncompleteUnary { operator: UnaryOp, fragment: String },

    #[error("Unexpected '{fragment}' before '{operator}'")]
    UnexpectedTokens { operator: UnaryOp, fragment: String },

    #[error("Expected operator in '{fragment}'")]
    ExpectedOperator { fragment: String },
}

type NameValidator = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Builds expression trees from token sequences.
///
/// The token sequence is scanned right to left for a binary operator first,
/// so binary operators bind looser than unary ones and group to the left.
/// Parenthesized groups are single tokens and therefore bind tightest.
pub struct Parser {
    is_valid_name: NameValidator,
}

impl Default for Parser {
    fn default() -> Self {
        Self::with_name_validator(is_valid_relation_name)
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `validator` to accept or reject relation names at the leaves.
    pub fn with_name_validator<F>(validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Parser {
            is_valid_name: Box::new(validator),
        }
    }

    /// Tokenizes and parses an expression.
    pub fn parse_str(&self, expression: &str) -> Result<Node, ParseError> {
        let tokens = Lexer::new(expression).tokenize()?;
        let node = self.parse(&tokens)?;
        debug!(expression, tree = %node, "parsed");
        Ok(node)
    }

    /// Parses a token sequence produced by the lexer.
    pub fn parse(&self, tokens: &[Token]) -> Result<Node, ParseError> {
        // ((((R)))) is just R
        let mut tokens = tokens;
        while let [Token::Group(inner)] = tokens {
            tokens = inner.as_slice();
        }

        match tokens {
            [] => return Err(ParseError::EmptyExpression),
            [Token::Name(name)] => return self.parse_relation(name),
            _ => {}
        }

        let rightmost_binary = tokens.iter().enumerate().rev().find_map(|(i, t)| match t {
            Token::Binary(op) => Some((i, *op)),
            _ => None,
        });
        if let Some((i, operator)) = rightmost_binary {
            return self.parse_binary(tokens, i, operator);
        }

        let rightmost_unary = tokens.iter().enumerate().rev().find_map(|(i, t)| match t {
            Token::Unary(op) => Some((i, *op)),
            _ => None,
        });
        if let Some((i, operator)) = rightmost_unary {
            return self.parse_unary(tokens, i, operator);
        }

        Err(ParseError::ExpectedOperator {
            fragment: render(tokens),
        })
    }

    fn parse_relation(&self, name: &str) -> Result<Node, ParseError> {
        if !(self.is_valid_name)(name) {
            return Err(ParseError::InvalidRelationName(name.to_string()));
        }
        Ok(Node::Relation(name.to_string()))
    }

    fn parse_binary(
        &self,
        tokens: &[Token],
        i: usize,
        operator: BinaryOp,
    ) -> Result<Node, ParseError> {
        let (left, right) = (&tokens[..i], &tokens[i + 1..]);

        if left.is_empty() {
            return Err(ParseError::MissingLeftOperand {
                operator,
                fragment: render(tokens),
            });
        }
        if right.is_empty() {
            return Err(ParseError::MissingRightOperand {
                operator,
                fragment: render(tokens),
            });
        }

        Ok(Node::binary(operator, self.parse(left)?, self.parse(right)?))
    }

    fn parse_unary(&self, tokens: &[Token], i: usize, operator: UnaryOp) -> Result<Node, ParseError> {
        if i > 0 {
            return Err(ParseError::UnexpectedTokens {
                operator,
                fragment: render(&tokens[..i]),
            });
        }

        match &tokens[i + 1..] {
            [Token::Parameter(param), operand @ ..] if !operand.is_empty() => {
                Ok(Node::unary(operator, param.trim(), self.parse(operand)?))
            }
            _ => Err(ParseError::IncompleteUnary {
                operator,
                fragment: render(tokens),
            }),
        }
    }
}

/// Parses an expression with the default relation-name rules.
pub fn tree(expression: &str) -> Result<Node, ParseError> {
    Parser::new().parse_str(expression)
}

#[test]
fn test_binary_groups_left() {
    let node = tree("A - B ∪ C").unwrap();
    assert_eq!(
        node,
        Node::binary(
            BinaryOp::Union,
            Node::binary(BinaryOp::Difference, Node::relation("A"), Node::relation("B")),
            Node::relation("C"),
        )
    );
}

#[test]
fn test_unary_binds_tighter() {
    let node = tree("π a (R) ⋈ S").unwrap();
    assert_eq!(node.binary_op(), Some(BinaryOp::Join));
}
