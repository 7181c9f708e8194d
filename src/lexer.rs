use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::ast::{BinaryOp, Token, UnaryOp};

/// Lexical shape of a relation name run.
pub static RELATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[_A-Za-z][_A-Za-z0-9]*").expect("relation name pattern is valid")
});

/// Default relation-name predicate: the whole text is one name run and is not
/// an operator keyword.
pub fn is_valid_relation_name(name: &str) -> bool {
    RELATION_NAME
        .find(name)
        .is_some_and(|m| m.end() == name.len())
        && BinaryOp::from_keyword(name).is_none()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Missing matching ')' in '{fragment}'")]
    UnmatchedParenthesis { fragment: String },
}

/// Tracks whether a scan is inside a single-quoted string literal.
///
/// A backslash escapes the character after it, so `\'` never toggles.
#[derive(Debug, Default)]
pub(crate) struct QuoteState {
    inside: bool,
    escape: bool,
}

impl QuoteState {
    /// Feeds one character; returns true when it is outside any literal.
    pub(crate) fn feed(&mut self, ch: char) -> bool {
        if ch == '\'' && !self.escape {
            self.inside = !self.inside;
        }
        self.escape = ch == '\\' && !self.escape;
        !self.inside
    }
}

/// Position of the `)` closing the first `(` at or after `start`.
fn find_matching_parenthesis(input: &[char], start: usize) -> Option<usize> {
    let mut quotes = QuoteState::default();
    let mut depth = 0usize;

    for (i, &ch) in input.iter().enumerate().skip(start) {
        if !quotes.feed(ch) {
            continue;
        }
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Like `find`, but skips occurrences inside string literals.
fn find_outside_strings(input: &[char], start: usize, needle: char) -> Option<usize> {
    let mut quotes = QuoteState::default();
    input
        .iter()
        .enumerate()
        .skip(start)
        .find(|&(_, &ch)| quotes.feed(ch) && ch == needle)
        .map(|(i, _)| i)
}

/// True when `text`, read as a unary parameter, is consumed whole rather
/// than cut at an unquoted `(` that would be taken for the operand.
pub(crate) fn is_whole_parameter(text: &str) -> bool {
    let input: Vec<char> = text.trim().chars().collect();
    let search_from = match input.first() {
        Some('(') => match find_matching_parenthesis(&input, 0) {
            Some(end) => end + 1,
            None => return false,
        },
        _ => 0,
    };
    find_outside_strings(&input, search_from, '(').is_none()
}

/// Splits an expression into nested tokens.
///
/// Parenthesized groups become [`Token::Group`]s, unary operators are
/// followed by their raw [`Token::Parameter`] and everything else is either a
/// binary operator or a relation name run.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    name_pattern: Regex,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self::with_name_pattern(input, RELATION_NAME.clone())
    }

    /// Uses `pattern` to delimit relation name runs. The pattern is matched at
    /// the current position and should start with `^`.
    pub fn with_name_pattern(input: &str, pattern: Regex) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            name_pattern: pattern,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn rest(&self) -> String {
        self.slice(self.position, self.input.len())
    }

    fn unmatched(&self) -> LexError {
        LexError::UnmatchedParenthesis {
            fragment: self.rest().trim().to_string(),
        }
    }

    /// Tokenizes the whole input.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(ch) = self.current_char() else {
                break;
            };

            if ch == '(' {
                items.push(self.read_group()?);
            } else if let Some(op) = UnaryOp::from_symbol(ch) {
                self.advance();
                items.push(Token::Unary(op));
                items.push(self.read_parameter()?);
            } else {
                items.push(self.read_atom());
            }
        }

        trace!(tokens = ?items, "tokenized");
        Ok(items)
    }

    fn read_group(&mut self) -> Result<Token, LexError> {
        let end = find_matching_parenthesis(&self.input, self.position)
            .ok_or_else(|| self.unmatched())?;

        let inner = self.slice(self.position + 1, end);
        let tokens = Lexer::with_name_pattern(&inner, self.name_pattern.clone()).tokenize()?;
        self.position = end + 1;
        Ok(Token::Group(tokens))
    }

    /// Reads the parameter of a unary operator: everything up to the operand.
    ///
    /// A parameter that itself starts with `(` runs past its own closing
    /// parenthesis to the next `(`, which allows `σ (a == '(') (R)`.
    fn read_parameter(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let search_from = if self.current_char() == Some('(') {
            find_matching_parenthesis(&self.input, self.position)
                .ok_or_else(|| self.unmatched())?
                + 1
        } else {
            self.position
        };

        let end = find_outside_strings(&self.input, search_from, '(').unwrap_or(self.input.len());
        let param = self.slice(self.position, end).trim().to_string();
        self.position = end;
        Ok(Token::Parameter(param))
    }

    /// Reads a relation name run, a keyword, or a single character.
    fn read_atom(&mut self) -> Token {
        let rest = self.rest();
        let run = self
            .name_pattern
            .find(&rest)
            .filter(|m| m.start() == 0 && !m.is_empty())
            .map(|m| m.as_str().to_string());

        match run {
            Some(word) => {
                self.position += word.chars().count();
                match BinaryOp::from_keyword(&word) {
                    Some(op) => Token::Binary(op),
                    None => Token::Name(word),
                }
            }
            None => {
                let ch = rest.chars().next().unwrap_or_default();
                self.advance();
                match BinaryOp::from_symbol(ch) {
                    Some(op) => Token::Binary(op),
                    None => Token::Name(ch.to_string()),
                }
            }
        }
    }
}

/// Tokenizes `expression` with the default relation-name pattern.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(expression).tokenize()
}

#[test]
fn test_quote_state_escape() {
    let mut quotes = QuoteState::default();
    let outside: Vec<bool> = "a'\\')'b".chars().map(|ch| quotes.feed(ch)).collect();
    assert_eq!(outside, vec![true, false, false, false, false, true, true]);
}

#[test]
fn test_whole_parameter() {
    assert!(is_whole_parameter("a > 1 and b < 2"));
    assert!(is_whole_parameter("(a or b) and c"));
    assert!(is_whole_parameter("name == '(' and c"));
    assert!(!is_whole_parameter("c and (a or b)"));
    assert!(!is_whole_parameter("(a or b) and (c or d)"));
}

#[test]
fn test_matching_parenthesis_skips_strings() {
    let input: Vec<char> = "(a = ')') b".chars().collect();
    assert_eq!(find_matching_parenthesis(&input, 0), Some(8));
}
