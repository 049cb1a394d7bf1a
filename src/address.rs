//! Display-string assembly for holder addresses.

use crate::tree::{self, ShapeError};
use serde_json::Value;

pub const ADDRESS_SEPARATOR: &str = ", ";

/// Holder-address leaves, in display order.
pub const HOLDER_ADDRESS_LINES: [&str; 4] = [
    "First_Line_Of_Address_non_normalized",
    "Second_Line_Of_Address_non_normalized",
    "Third_Line_Of_Address_non_normalized",
    "City_non_normalized",
];

/// Trims each candidate, drops absent or blank ones, and joins the rest
/// with `", "` in their original order.
pub fn assemble_address<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let parts: Vec<String> = lines
        .into_iter()
        .flatten()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    parts.join(ADDRESS_SEPARATOR)
}

/// Assembles the address stored under one holder-address node.
///
/// On a shape fault, the offending line name is returned alongside the error.
pub fn holder_address(node: Option<&Value>) -> Result<String, (&'static str, ShapeError)> {
    let Some(node) = node else {
        return Ok(String::new());
    };

    let mut lines = Vec::with_capacity(HOLDER_ADDRESS_LINES.len());
    for line in HOLDER_ADDRESS_LINES {
        let text = tree::leaf_text(tree::resolve(node, line)).map_err(|e| (line, e))?;
        lines.push(text);
    }

    Ok(assemble_address(lines))
}
