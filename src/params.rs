//! Parsing of unary operator parameters.
//!
//! Projection takes `a, b, c`, rename takes `old➡new, old2➡new2`. Whitespace
//! around names is insignificant in both. Selection predicates are opaque and
//! never parsed here.

use indexmap::IndexMap;
use thiserror::Error;

use crate::ast::ARROW;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Rename pair '{0}' must have the form old➡new")]
    MalformedRename(String),
}

/// Attribute list of a projection, in the order given.
pub fn projection_attributes(param: &str) -> Vec<String> {
    param.split(',').map(|a| a.trim().to_string()).collect()
}

/// Old to new name mapping of a rename, in the order given.
///
/// A repeated old name keeps the last mapping.
pub fn rename_pairs(param: &str) -> Result<IndexMap<String, String>, ParamError> {
    let mut pairs = IndexMap::new();

    for pair in param.split(',') {
        let (old, new) = pair
            .split_once(ARROW)
            .ok_or_else(|| ParamError::MalformedRename(pair.trim().to_string()))?;
        let (old, new) = (old.trim(), new.trim());
        if old.is_empty() || new.is_empty() {
            return Err(ParamError::MalformedRename(pair.trim().to_string()));
        }
        pairs.insert(old.to_string(), new.to_string());
    }
    Ok(pairs)
}

/// Renders a mapping back to rename parameter text.
pub fn render_rename(pairs: &IndexMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(old, new)| format!("{old}{ARROW}{new}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[test]
fn test_projection_trims() {
    assert_eq!(projection_attributes(" id ,name"), vec!["id", "name"]);
}

#[test]
fn test_rename_pairs() {
    let pairs = rename_pairs("id ➡ pid, name➡n").unwrap();
    assert_eq!(pairs.get("id").map(String::as_str), Some("pid"));
    assert_eq!(pairs.get("name").map(String::as_str), Some("n"));
    assert_eq!(render_rename(&pairs), "id➡pid,name➡n");
}

#[test]
fn test_rename_without_arrow() {
    assert_eq!(
        rename_pairs("id➡pid, name"),
        Err(ParamError::MalformedRename("name".to_string()))
    );
}
