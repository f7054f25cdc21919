//! Tags.

use crate::record::{adopt_identity, fill, fill_slug, is_zero, placeholder_string};
use crate::{Entity, ObjectType, Record};
use serde::{Deserialize, Serialize};

/// A named label shared by any number of records.
///
/// Tags are identified by name; the slug is derived from it when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tag {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Tag {
    const OBJECT_TYPE: ObjectType = ObjectType::Tag;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn placeholder() -> Self {
        Self {
            name: placeholder_string(),
            slug: placeholder_string(),
            ..Self::default()
        }
    }

    fn normalise(&mut self) {
        fill_slug(&mut self.slug, &self.name);
    }

    fn tags(&self) -> Option<&[Tag]> {
        None
    }

    fn set_tags(&mut self, _tags: Option<Vec<Tag>>) {}

    fn merge_from_actual(&mut self, actual: &Self) {
        adopt_identity(
            (&mut self.id, &mut self.name, &mut self.slug),
            (actual.id, actual.name.as_str(), actual.slug.as_str()),
        );
        fill(&mut self.color, &actual.color);
    }

    fn into_entity(self) -> Entity {
        Entity::Tag(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}
