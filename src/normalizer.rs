//! Singular-vs-repeated resolution for repeatable elements.
//!
//! The decoder renders one occurrence of a repeatable element as a bare
//! node and two or more as a sequence. Every repeatable group goes through
//! [`to_sequence`] before it is iterated.

use crate::tree;
use serde_json::Value;

/// Canonical ordered sequence for a possibly-repeated node.
///
/// - absent, `null` or a blank string: empty
/// - a sequence: its elements, in order
/// - anything else: a one-element sequence
pub fn to_sequence(node: Option<&Value>) -> Vec<&Value> {
    match node {
        None | Some(Value::Null) => Vec::new(),
        Some(blank) if is_blank(blank) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// Whether a node is an empty element, which the decoder renders as blank text.
pub fn is_blank(node: &Value) -> bool {
    matches!(node, Value::String(s) if s.trim().is_empty())
}

/// Resolves `path` and normalizes whatever is found there.
pub fn sequence_at<'a>(tree: &'a Value, path: &str) -> Vec<&'a Value> {
    to_sequence(tree::resolve(tree, path))
}

/// First non-blank occurrence of a repeatable element, if any.
pub fn first_at<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    sequence_at(tree, path)
        .into_iter()
        .find(|occurrence| !is_blank(occurrence))
}
