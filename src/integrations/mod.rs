//! External format integrations.

pub mod xml_tree {
    pub use crate::xml_tree::*;
}
