//! Default-producing navigation over a decoded document tree.
//!
//! Paths are dot-separated element names (`"SCORE.BureauScore"`). Absence is
//! the normal case in bureau documents, so every lookup here answers `None`
//! (or a caller-provided default) instead of failing. The only fallible
//! accessors are [`require_object`] and [`leaf_text`], which report a
//! [`ShapeError`] when a node has the wrong container kind.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Key under which the decoder stores element attributes.
pub const ATTRIBUTES_KEY: &str = "$";
/// Key under which the decoder stores element text when the element also
/// carries attributes or children.
pub const TEXT_KEY: &str = "_";

/// A node had a different container kind than the caller needed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("required branch is missing")]
    Missing,
    #[error("expected a mapping, found {found}")]
    NotAMapping { found: &'static str },
    #[error("expected a leaf value, found {found}")]
    NotALeaf { found: &'static str },
}

/// Human-readable name of a node's kind, used in shape diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Walks `path` through nested mappings.
///
/// Returns `None` when a segment is absent, when a node on the way is not a
/// mapping, or when the final value is `null`. An empty path resolves to the
/// tree itself.
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = current.as_object()?.get(segment)?;
    }
    match current {
        Value::Null => None,
        found => Some(found),
    }
}

/// Like [`resolve`], falling back to `default` when nothing is found.
pub fn resolve_or<'a>(tree: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    resolve(tree, path).unwrap_or(default)
}

/// Resolves a branch that must exist and must be a mapping.
pub fn require_object<'a>(tree: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ShapeError> {
    match resolve(tree, path) {
        None => Err(ShapeError::Missing),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ShapeError::NotAMapping {
            found: kind_of(other),
        }),
    }
}

/// Resolves an optional branch that, when present, must be a mapping.
///
/// Absent branches are fine and yield `None`. A blank string counts as
/// absent since that is how the decoder renders an empty element.
pub fn optional_object<'a>(
    tree: &'a Value,
    path: &str,
) -> Result<Option<&'a Map<String, Value>>, ShapeError> {
    match resolve(tree, path) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(other) => Err(ShapeError::NotAMapping {
            found: kind_of(other),
        }),
    }
}

/// Reads the text of a leaf node.
///
/// Scalars are rendered as text. A mapping carrying decoder text is reduced
/// to that text, and one carrying only attributes is an empty leaf. Anything
/// else in leaf position is a container and reports a [`ShapeError`].
pub fn leaf_text(node: Option<&Value>) -> Result<Option<Cow<'_, str>>, ShapeError> {
    let node = match node {
        None | Some(Value::Null) => return Ok(None),
        Some(node) => node,
    };

    match node {
        Value::String(s) => Ok(Some(Cow::Borrowed(s.as_str()))),
        Value::Number(n) => Ok(Some(Cow::Owned(n.to_string()))),
        Value::Bool(b) => Ok(Some(Cow::Owned(b.to_string()))),
        Value::Object(map) => {
            if let Some(text) = map.get(TEXT_KEY) {
                return leaf_text(Some(text));
            }
            if map.keys().all(|k| k == ATTRIBUTES_KEY) {
                Ok(None)
            } else {
                Err(ShapeError::NotALeaf { found: "a mapping" })
            }
        }
        Value::Array(_) => Err(ShapeError::NotALeaf { found: "a sequence" }),
        Value::Null => Ok(None),
    }
}

/// Resolves a text leaf, defaulting to an empty string.
pub fn resolve_text(tree: &Value, path: &str) -> Result<String, ShapeError> {
    Ok(leaf_text(resolve(tree, path))?
        .map(Cow::into_owned)
        .unwrap_or_default())
}

/// Joins a parent path and a child segment for diagnostics.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else if child.is_empty() {
        parent.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_walks_nested_mappings() {
        let tree = json!({"a": {"b": {"c": "leaf"}}});

        assert_eq!(resolve(&tree, "a.b.c"), Some(&json!("leaf")));
        assert_eq!(resolve(&tree, "a.b"), Some(&json!({"c": "leaf"})));
        assert_eq!(resolve(&tree, ""), Some(&tree));
    }

    #[test]
    fn test_resolve_absent_null_and_scalar_midpath() {
        let tree = json!({"a": {"b": null, "s": "text"}});

        assert_eq!(resolve(&tree, "a.missing"), None);
        assert_eq!(resolve(&tree, "a.b"), None);
        assert_eq!(resolve(&tree, "a.b.c"), None);
        assert_eq!(resolve(&tree, "a.s.deeper"), None);
        assert_eq!(resolve(&json!("root scalar"), "a"), None);
    }

    #[test]
    fn test_resolve_or_uses_default() {
        let tree = json!({"a": {}});
        let fallback = json!("fallback");

        assert_eq!(resolve_or(&tree, "a.x", &fallback), &fallback);
    }

    #[test]
    fn test_require_object() {
        let tree = json!({"env": {"k": "v"}, "flat": "text"});

        assert!(require_object(&tree, "env").is_ok());
        assert_eq!(require_object(&tree, "nope"), Err(ShapeError::Missing));
        assert_eq!(
            require_object(&tree, "flat"),
            Err(ShapeError::NotAMapping { found: "a string" })
        );
    }

    #[test]
    fn test_optional_object_treats_blank_as_absent() {
        let tree = json!({"empty": "", "list": [], "map": {}});

        assert_eq!(optional_object(&tree, "empty"), Ok(None));
        assert_eq!(optional_object(&tree, "missing"), Ok(None));
        assert!(optional_object(&tree, "map").unwrap().is_some());
        assert!(optional_object(&tree, "list").is_err());
    }

    #[test]
    fn test_leaf_text_unwraps_text_nodes() {
        let with_attrs = json!({"$": {"currency": "INR"}, "_": "1250"});
        let attrs_only = json!({"$": {"currency": "INR"}});
        let nested = json!({"child": "x"});

        assert_eq!(leaf_text(Some(&with_attrs)).unwrap().as_deref(), Some("1250"));
        assert_eq!(leaf_text(Some(&attrs_only)).unwrap(), None);
        assert_eq!(
            leaf_text(Some(&nested)),
            Err(ShapeError::NotALeaf { found: "a mapping" })
        );
        assert_eq!(
            leaf_text(Some(&json!(["a", "b"]))),
            Err(ShapeError::NotALeaf { found: "a sequence" })
        );
        assert_eq!(leaf_text(Some(&json!(42))).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_resolve_text_defaults_to_empty() {
        let tree = json!({"name": {"first": "Asha"}});

        assert_eq!(resolve_text(&tree, "name.first").unwrap(), "Asha");
        assert_eq!(resolve_text(&tree, "name.last").unwrap(), "");
        assert!(resolve_text(&tree, "name").is_err());
    }
}
