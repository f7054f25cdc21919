//! Instance identity of nodes inside one entity's reference tree.

use std::fmt;

/// Position of a nested record relative to the ingested entity.
///
/// The root is the empty path; children append their field name
/// (`device_type.manufacturer`) or an indexed tag slot (`tags[1]`). Two
/// nodes with equal content but different positions have different paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    /// The path of the ingested entity itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the record held in `field`.
    #[must_use]
    pub fn child(&self, field: &str) -> Self {
        if self.0.is_empty() {
            Self(field.to_string())
        } else {
            Self(format!("{}.{field}", self.0))
        }
    }

    /// Path of the `index`-th tag.
    #[must_use]
    pub fn tag(&self, index: usize) -> Self {
        self.child(&format!("tags[{index}]"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}
