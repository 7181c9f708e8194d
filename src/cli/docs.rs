//! Documentation content for relalg CLI

/// Get the operator and grammar reference
pub fn get_docs_overview() -> &'static str {
    r#"RELALG - RELATIONAL ALGEBRA REFERENCE

An expression is a relation name, a unary operator applied to an expression,
or two expressions joined by a binary operator.

UNARY OPERATORS (bind tightest)

  π a, b (R)          projection: keep attributes a and b
  σ age > 30 (R)      selection: keep tuples matching the predicate
  ρ id➡pid (R)        rename: id becomes pid (comma-separate several pairs)

BINARY OPERATORS (group left to right, no precedence among them)

  R * S               product
  R - S               difference
  R ∪ S               union
  R ∩ S               intersection
  R ÷ S               division
  R ⋈ S               natural join
  R ⧑ S               left outer join
  R ⧒ S               right outer join
  R ⧓ S               full outer join
  R ⋉ S               semijoin (also written R semijoin S)

GROUPING

  A - B ∪ C           means (A - B) ∪ C
  A - (B ∪ C)         parentheses bind tightest
  σ name == ')' (R)   parentheses inside quoted strings are ignored

OPTIMIZATIONS (relalg check --optimize)

  σ a (σ b (R))       => σ a and b (R)
  σ p (R ∪ S)         => σ p (R) ∪ σ p (S)     (also - and ∩)
  π a (π a, b (R))    => π a (R)
  σ p (π a (R))       => π a (σ p (R))
  ρ b➡c (ρ a➡b (R))   => ρ a➡c (R)

COMMANDS

  relalg check EXPR              print the parsed expression
  relalg check EXPR --optimize   print the rewritten expression
  relalg schema EXPR             print the result attributes
  relalg explain EXPR            print the operation calls
"#
}
