use invsync_engine::{
    dedup_objects_to_reconcile, merge_tags, new_data_wrapper, structural_hash, ComparableData,
    DataWrapper, NodePath, ReconcileError, ResolutionIndex,
};
use invsync_model::{Entity, ObjectType, Record, Site, Tag};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn tag(id: u64, name: &str) -> Tag {
    Tag {
        id,
        ..Tag::named(name)
    }
}

// ── Tag merge ────────────────────────────────────────────────────

#[test]
fn merge_keeps_actual_tags_and_appends_new_ones() {
    let actual = [tag(1, "tag 1"), tag(3, "tag 3")];
    let intended = [Tag::named("tag 1"), Tag::named("tag 2")];

    let merged = merge_tags(Some(&actual), Some(&intended), &ResolutionIndex::default()).unwrap();

    assert_eq!(merged, vec![tag(1, "tag 1"), tag(3, "tag 3"), tag(0, "tag 2")]);
}

#[test]
fn merge_of_nothing_is_none() {
    assert_eq!(merge_tags(None, None, &ResolutionIndex::default()), None);
    assert_eq!(merge_tags(Some(&[]), Some(&[]), &ResolutionIndex::default()), None);
}

#[test]
fn merge_without_actual_marks_every_tag_for_creation() {
    let intended = [Tag::named("a"), Tag::named("b")];
    let merged = merge_tags(None, Some(&intended), &ResolutionIndex::default()).unwrap();
    assert!(merged.iter().all(|t| t.id == 0));
    assert_eq!(merged.len(), 2);
}

// ── Hashing ──────────────────────────────────────────────────────

#[test]
fn hash_ignores_absent_fields() {
    let a = Site::named("Site A").into_entity();
    let b = Entity::decode(ObjectType::Site, json!({"name": "Site A", "tags": null})).unwrap();
    assert_eq!(structural_hash(&a).unwrap(), structural_hash(&b).unwrap());
}

#[test]
fn hash_is_hex_sha256() {
    let hash = structural_hash(&Site::named("Site A").into_entity()).unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

proptest! {
    #[test]
    fn hash_is_deterministic(
        name in "[a-zA-Z0-9 ]{1,24}",
        description in proptest::option::of("[a-z ]{0,16}"),
    ) {
        let mut site = Site::named(name.clone());
        site.description = description.clone();
        let copy = site.clone();
        prop_assert_eq!(
            structural_hash(&site.into_entity()).unwrap(),
            structural_hash(&copy.into_entity()).unwrap()
        );
    }

    #[test]
    fn hash_tracks_field_changes(name in "[a-zA-Z0-9]{1,24}", other in "[a-zA-Z0-9]{1,24}") {
        prop_assume!(name != other);
        let a = Site::named(name).into_entity();
        let b = Site::named(other).into_entity();
        prop_assert_ne!(structural_hash(&a).unwrap(), structural_hash(&b).unwrap());
    }
}

// ── Wrappers ─────────────────────────────────────────────────────

#[test]
fn registry_knows_every_object_type() {
    for kind in ObjectType::ALL {
        let wrapper = new_data_wrapper(kind.as_str()).unwrap();
        assert_eq!(wrapper.object_type(), kind);
        assert_eq!(wrapper.id(), 0);
        assert!(wrapper.data().is_none());
    }
}

#[test]
fn registry_rejects_unknown_tags() {
    assert!(matches!(
        new_data_wrapper("dcim.rack"),
        Err(ReconcileError::UnsupportedDataType(_))
    ));
}

#[test]
fn empty_top_level_wrapper_is_invalid() {
    let wrapper = DataWrapper::<Site>::new();
    assert!(!wrapper.is_valid());

    let named = DataWrapper::from_record(Site::named("Site A"));
    assert!(named.is_valid());
}

#[test]
fn nested_objects_are_children_first_and_memoized() {
    let mut wrapper = new_data_wrapper("dcim.devicetype").unwrap();
    wrapper
        .decode(json!({"model": "ISR4321", "tags": [{"name": "edge"}]}))
        .unwrap();
    wrapper.normalise();

    let paths: Vec<String> = wrapper
        .nested_objects()
        .unwrap()
        .iter()
        .map(|n| n.path.as_str().to_string())
        .collect();
    assert_eq!(paths, vec!["manufacturer", "tags[0]", ""]);

    let nested = wrapper.nested_objects().unwrap();
    assert!(nested[0].wrapper.is_placeholder());
    assert!(nested[0].wrapper.has_parent());
    assert!(!nested[1].wrapper.is_placeholder());
    assert_eq!(nested[2].path, NodePath::root());
    assert!(nested[2].wrapper.is_intended());
}

#[test]
fn dedup_keeps_first_of_identical_records() {
    let objects: Vec<Box<dyn ComparableData>> = vec![
        Box::new(DataWrapper::from_record(Tag::named("shared"))),
        Box::new(DataWrapper::from_record(Site::named("shared"))),
        Box::new(DataWrapper::from_record(Tag::named("shared"))),
        Box::new(DataWrapper::from_record(Tag::named("other"))),
    ];

    let unique = dedup_objects_to_reconcile(objects).unwrap();

    let kinds: Vec<ObjectType> = unique.iter().map(|o| o.object_type()).collect();
    assert_eq!(kinds, vec![ObjectType::Tag, ObjectType::Site, ObjectType::Tag]);
}
