//! Object state reported by the inventory and the lookup parameters used
//! to ask for it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The inventory's current view of one object.
///
/// `object` holds the kind-specific payload; the engine decodes it through
/// its type registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Row identifier in the inventory.
    pub object_id: u64,
    /// Type tag, e.g. `dcim.site`.
    pub object_type: String,
    /// Opaque version token used for optimistic concurrency on update.
    pub object_change_id: u64,
    /// The object itself.
    pub object: serde_json::Value,
}

/// Query descriptor for locating an object in the inventory.
///
/// Keys follow the inventory's filter syntax: `q` carries the natural key,
/// `a__b` names a field reached through nested references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupParams(BTreeMap<String, String>);

impl LookupParams {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a descriptor with only the natural key query.
    #[must_use]
    pub fn query(q: impl Into<String>) -> Self {
        Self::new().with("q", q)
    }

    /// Adds a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds a nested-field filter. An empty value says nothing about the
    /// object and is left out.
    pub fn insert_filter(&mut self, key: impl Into<String>, value: &str) {
        if !value.is_empty() {
            self.insert(key, value);
        }
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the natural key query, if any.
    #[must_use]
    pub fn q(&self) -> Option<&str> {
        self.get("q")
    }

    /// Iterates parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LookupParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in &self.0 {
            if !first {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LookupParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
