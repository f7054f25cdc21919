//! The `Record` trait and helpers shared by every record kind.

use crate::{Entity, ObjectType, Tag, ValidationError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Name and slug given to synthesized placeholder records.
pub const PLACEHOLDER_NAME: &str = "undefined";

/// Capabilities every inventory record kind provides to the reconciler.
///
/// Nested references are deliberately not covered here: walking and patching
/// them is the engine's business and lives next to the wrapper that drives it.
pub trait Record:
    Clone + Default + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Inventory type tag of this kind.
    const OBJECT_TYPE: ObjectType;

    /// Inventory row id, `0` when unresolved.
    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    /// The field the inventory identifies this kind by (name, model, address,
    /// prefix).
    fn natural_key(&self) -> &str;

    /// True when the record carries enough data to be looked up.
    fn has_identity(&self) -> bool {
        self.id() > 0 || !self.natural_key().is_empty()
    }

    /// A minimal valid record standing in for a required reference that was
    /// not supplied. Required references of the placeholder are placeholders
    /// too.
    fn placeholder() -> Self;

    /// Kind-specific field validation.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Idempotent cleanup of an ingested value: derives slugs, drops empty
    /// tag lists and nameless tags. Nested records are normalised by the
    /// engine when it walks them.
    fn normalise(&mut self);

    /// Fills fields the inventory requires on creation.
    fn set_defaults(&mut self) {}

    fn tags(&self) -> Option<&[Tag]>;

    fn set_tags(&mut self, tags: Option<Vec<Tag>>);

    /// A record carrying only `id`.
    #[must_use]
    fn reference(id: u64) -> Self {
        let mut record = Self::default();
        record.set_id(id);
        record
    }

    /// The minimal form a parent keeps for this record once it is resolved
    /// and unchanged.
    #[must_use]
    fn reference_of(&self) -> Self {
        Self::reference(self.id())
    }

    /// Takes identity fields from `actual` and keeps the actual value of every
    /// optional scalar the intended record leaves unset. Nested references and
    /// tags are left alone.
    fn merge_from_actual(&mut self, actual: &Self);

    fn into_entity(self) -> Entity;

    fn from_entity(entity: Entity) -> Option<Self>;
}

/// Turns a display name into an inventory slug.
///
/// ASCII letters and digits are kept (lower-cased); any run of other
/// characters becomes a single `-`, never leading or trailing.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Keeps `dst` unless it is unset, in which case `src` is taken.
pub(crate) fn fill<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if dst.is_none() {
        dst.clone_from(src);
    }
}

pub(crate) fn fill_slug(slug: &mut String, name: &str) {
    if slug.is_empty() {
        *slug = slugify(name);
    }
}

/// Copies the identity fields of a named, slugged record.
pub(crate) fn adopt_identity(
    (id, name, slug): (&mut u64, &mut String, &mut String),
    (actual_id, actual_name, actual_slug): (u64, &str, &str),
) {
    *id = actual_id;
    if !actual_name.is_empty() {
        *name = actual_name.to_string();
    }
    if !actual_slug.is_empty() {
        *slug = actual_slug.to_string();
    }
}

/// Normalises every tag, drops nameless ones and duplicates by name, and
/// collapses an empty list to `None`.
pub(crate) fn normalise_tags(tags: &mut Option<Vec<Tag>>) {
    let Some(list) = tags.take() else {
        return;
    };
    let mut kept: Vec<Tag> = Vec::with_capacity(list.len());
    for mut tag in list {
        if tag.name.is_empty() || kept.iter().any(|t| t.name == tag.name) {
            continue;
        }
        tag.normalise();
        kept.push(tag);
    }
    if !kept.is_empty() {
        *tags = Some(kept);
    }
}

pub(crate) fn placeholder_string() -> String {
    PLACEHOLDER_NAME.to_string()
}

/// Implements the accessors every tagged record shares.
macro_rules! record_plumbing {
    ($variant:ident) => {
        fn id(&self) -> u64 {
            self.id
        }

        fn set_id(&mut self, id: u64) {
            self.id = id;
        }

        fn tags(&self) -> Option<&[crate::Tag]> {
            self.tags.as_deref()
        }

        fn set_tags(&mut self, tags: Option<Vec<crate::Tag>>) {
            self.tags = tags;
        }

        fn into_entity(self) -> crate::Entity {
            crate::Entity::$variant(self)
        }

        fn from_entity(entity: crate::Entity) -> Option<Self> {
            match entity {
                crate::Entity::$variant(record) => Some(record),
                _ => None,
            }
        }
    };
}
