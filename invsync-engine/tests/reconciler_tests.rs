mod common;

use common::{entity, params, ScriptedLookup};
use invsync_engine::{ReconcileError, Reconciler, ReconcilerConfig};
use invsync_model::{ObjectType, ValidationError};
use invsync_types::{ChangeId, ChangeType};
use pretty_assertions::assert_eq;
use serde_json::json;

fn reconciler() -> Reconciler {
    Reconciler::default()
}

// ── Creation ─────────────────────────────────────────────────────

#[test]
fn new_site_is_created_with_slug_and_default_status() {
    let lookup = ScriptedLookup::new();
    let change_set = reconciler()
        .prepare(&entity("dcim.site", json!({"name": "Site A"})), &lookup)
        .unwrap();

    assert_eq!(change_set.len(), 1);
    let change = &change_set.changes[0];
    assert_eq!(change.change_type, ChangeType::Create);
    assert_eq!(change.object_type, "dcim.site");
    assert_eq!(change.object_id, None);
    assert_eq!(change.object_version, None);
    assert_eq!(
        change.data,
        json!({"name": "Site A", "slug": "site-a", "status": "active"})
    );
    assert_eq!(lookup.calls(), vec![(ObjectType::Site, params(&[("q", "Site A")]))]);
}

#[test]
fn device_with_only_a_name_creates_placeholders_first() {
    let lookup = ScriptedLookup::new();
    let change_set = reconciler()
        .prepare(&entity("dcim.device", json!({"name": "router01"})), &lookup)
        .unwrap();

    let kinds: Vec<&str> = change_set.iter().map(|c| c.object_type.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "dcim.site",
            "dcim.manufacturer",
            "dcim.devicetype",
            "dcim.devicerole",
            "dcim.device",
        ]
    );
    assert!(change_set.iter().all(|c| c.change_type == ChangeType::Create));

    let site = json!({"name": "undefined", "slug": "undefined", "status": "active"});
    let manufacturer = json!({"name": "undefined", "slug": "undefined"});
    let device_type = json!({
        "model": "undefined",
        "slug": "undefined",
        "manufacturer": manufacturer,
    });
    let role = json!({"name": "undefined", "slug": "undefined", "color": "000000"});

    assert_eq!(change_set.changes[0].data, site);
    assert_eq!(change_set.changes[1].data, manufacturer);
    assert_eq!(change_set.changes[2].data, device_type);
    assert_eq!(change_set.changes[3].data, role);
    assert_eq!(
        change_set.changes[4].data,
        json!({
            "name": "router01",
            "site": site,
            "device_type": device_type,
            "role": role,
            "status": "active",
        })
    );
}

#[test]
fn device_lookups_follow_reference_order() {
    let lookup = ScriptedLookup::new();
    reconciler()
        .prepare(&entity("dcim.device", json!({"name": "router01"})), &lookup)
        .unwrap();

    assert_eq!(
        lookup.calls(),
        vec![
            (ObjectType::Site, params(&[("q", "undefined")])),
            (ObjectType::Manufacturer, params(&[("q", "undefined")])),
            (
                ObjectType::DeviceType,
                params(&[("q", "undefined"), ("manufacturer__name", "undefined")])
            ),
            (ObjectType::DeviceRole, params(&[("q", "undefined")])),
            (
                ObjectType::Device,
                params(&[("q", "router01"), ("site__name", "undefined")])
            ),
        ]
    );
}

#[test]
fn last_change_reuses_change_set_id() {
    let lookup = ScriptedLookup::new();
    let change_set = reconciler()
        .prepare(&entity("dcim.device", json!({"name": "router01"})), &lookup)
        .unwrap();

    let last = change_set.changes.last().unwrap();
    assert_eq!(last.change_id, ChangeId::from(change_set.change_set_id));
    assert_ne!(change_set.changes[0].change_id, last.change_id);
}

#[test]
fn shared_manufacturer_is_created_once() {
    let lookup = ScriptedLookup::new();
    let change_set = reconciler()
        .prepare(
            &entity(
                "dcim.device",
                json!({
                    "name": "router01",
                    "site": {"name": "Site A"},
                    "role": {"name": "WAN Router"},
                    "device_type": {"model": "ISR4321", "manufacturer": {"name": "Cisco"}},
                    "platform": {"name": "IOS", "manufacturer": {"name": "Cisco"}},
                }),
            ),
            &lookup,
        )
        .unwrap();

    let manufacturers = change_set
        .iter()
        .filter(|c| c.object_type == "dcim.manufacturer")
        .count();
    assert_eq!(manufacturers, 1);
    assert_eq!(change_set.len(), 6);
}

// ── Updates ──────────────────────────────────────────────────────

#[test]
fn tags_are_merged_additively() {
    let lookup = ScriptedLookup::new()
        .found(
            ObjectType::Tag,
            params(&[("q", "tag 1")]),
            json!({"id": 1, "name": "tag 1", "slug": "tag-1"}),
        )
        .found_at(
            ObjectType::Site,
            params(&[("q", "Site A")]),
            json!({
                "id": 1,
                "name": "Site A",
                "slug": "site-a",
                "status": "active",
                "tags": [
                    {"id": 1, "name": "tag 1", "slug": "tag-1"},
                    {"id": 3, "name": "tag 3", "slug": "tag-3"},
                ],
            }),
            42,
        );

    let change_set = reconciler()
        .prepare(
            &entity(
                "dcim.site",
                json!({"name": "Site A", "tags": [{"name": "tag 1"}, {"name": "tag 2"}]}),
            ),
            &lookup,
        )
        .unwrap();

    assert_eq!(change_set.len(), 2);

    let tag = &change_set.changes[0];
    assert_eq!(tag.change_type, ChangeType::Create);
    assert_eq!(tag.object_type, "extras.tag");
    assert_eq!(tag.data, json!({"name": "tag 2", "slug": "tag-2"}));

    let site = &change_set.changes[1];
    assert_eq!(site.change_type, ChangeType::Update);
    assert_eq!(site.object_id, Some(1));
    assert_eq!(site.object_version, Some(42));
    assert_eq!(
        site.data,
        json!({
            "id": 1,
            "name": "Site A",
            "slug": "site-a",
            "status": "active",
            "tags": [
                {"id": 1, "name": "tag 1", "slug": "tag-1"},
                {"id": 3, "name": "tag 3", "slug": "tag-3"},
                {"name": "tag 2", "slug": "tag-2"},
            ],
        })
    );
}

#[test]
fn unchanged_device_role_is_a_no_op() {
    let lookup = ScriptedLookup::new().found(
        ObjectType::DeviceRole,
        params(&[("q", "WAN Router")]),
        json!({
            "id": 7,
            "name": "WAN Router",
            "slug": "wan-router",
            "color": "509415",
            "description": "edge routers",
        }),
    );

    let change_set = reconciler()
        .prepare(
            &entity(
                "dcim.devicerole",
                json!({
                    "name": "WAN Router",
                    "slug": "wan-router",
                    "color": "509415",
                    "description": "edge routers",
                }),
            ),
            &lookup,
        )
        .unwrap();

    assert!(change_set.is_empty());
}

#[test]
fn intended_value_wins_over_actual() {
    let lookup = ScriptedLookup::new().found(
        ObjectType::DeviceRole,
        params(&[("q", "WAN Router")]),
        json!({"id": 7, "name": "WAN Router", "slug": "wan-router", "color": "509415"}),
    );

    let change_set = reconciler()
        .prepare(
            &entity("dcim.devicerole", json!({"name": "WAN Router", "color": "ff0000"})),
            &lookup,
        )
        .unwrap();

    assert_eq!(change_set.len(), 1);
    assert_eq!(
        change_set.changes[0].data,
        json!({"id": 7, "name": "WAN Router", "slug": "wan-router", "color": "ff0000"})
    );
}

fn existing_device_lookup() -> ScriptedLookup {
    ScriptedLookup::new()
        .found(
            ObjectType::Site,
            params(&[("q", "Site A")]),
            json!({"id": 1, "name": "Site A", "slug": "site-a", "status": "active"}),
        )
        .found(
            ObjectType::Platform,
            params(&[("q", "IOS")]),
            json!({"id": 4, "name": "IOS", "slug": "ios"}),
        )
        .found_at(
            ObjectType::Device,
            params(&[("q", "router01"), ("site__name", "Site A")]),
            json!({
                "id": 10,
                "name": "router01",
                "site": {"id": 1, "name": "Site A", "slug": "site-a"},
                "device_type": {"id": 2, "model": "ISR4321", "slug": "isr4321"},
                "role": {"id": 3, "name": "WAN Router", "slug": "wan-router"},
                "platform": {"id": 4, "name": "IOS", "slug": "ios"},
                "serial": "FOC1234",
                "status": "active",
            }),
            5,
        )
}

#[test]
fn existing_device_with_same_references_is_a_no_op() {
    let lookup = existing_device_lookup();
    let change_set = reconciler()
        .prepare(
            &entity(
                "dcim.device",
                json!({"name": "router01", "site": {"name": "Site A"}, "platform": {"name": "IOS"}}),
            ),
            &lookup,
        )
        .unwrap();

    assert!(change_set.is_empty());
}

#[test]
fn unchanged_reference_is_trimmed_to_its_id() {
    let lookup = existing_device_lookup();
    let change_set = reconciler()
        .prepare(
            &entity(
                "dcim.device",
                json!({
                    "name": "router01",
                    "site": {"name": "Site A"},
                    "platform": {"name": "IOS"},
                    "serial": "FOC9999",
                }),
            ),
            &lookup,
        )
        .unwrap();

    assert_eq!(change_set.len(), 1);
    let device = &change_set.changes[0];
    assert_eq!(device.change_type, ChangeType::Update);
    assert_eq!(device.object_id, Some(10));
    assert_eq!(device.object_version, Some(5));
    assert_eq!(
        device.data,
        json!({
            "id": 10,
            "name": "router01",
            "site": {"id": 1},
            "device_type": {"id": 2},
            "role": {"id": 3},
            "platform": {"id": 4},
            "serial": "FOC9999",
            "status": "active",
        })
    );
}

#[test]
fn ip_assigned_to_existing_interface_carries_minimal_reference() {
    let lookup = ScriptedLookup::new()
        .found(
            ObjectType::Site,
            params(&[("q", "Site A")]),
            json!({"id": 1, "name": "Site A", "slug": "site-a", "status": "active"}),
        )
        .found(
            ObjectType::Device,
            params(&[("q", "router01"), ("site__name", "Site A")]),
            json!({
                "id": 10,
                "name": "router01",
                "site": {"id": 1, "name": "Site A"},
                "device_type": {"id": 2, "model": "ISR4321"},
                "role": {"id": 3, "name": "WAN Router"},
                "status": "active",
            }),
        )
        .found(
            ObjectType::Interface,
            params(&[
                ("q", "GigabitEthernet0/0"),
                ("device__name", "router01"),
                ("device__site__name", "Site A"),
            ]),
            json!({
                "id": 20,
                "name": "GigabitEthernet0/0",
                "device": {"id": 10, "name": "router01"},
                "type": "1000base-t",
            }),
        );

    let change_set = reconciler()
        .prepare(
            &entity(
                "ipam.ipaddress",
                json!({
                    "address": "192.168.0.1/24",
                    "assigned_object": {
                        "interface": {
                            "name": "GigabitEthernet0/0",
                            "device": {"name": "router01", "site": {"name": "Site A"}},
                        },
                    },
                }),
            ),
            &lookup,
        )
        .unwrap();

    assert_eq!(change_set.len(), 1);
    let ip = &change_set.changes[0];
    assert_eq!(ip.change_type, ChangeType::Create);
    assert_eq!(
        ip.data,
        json!({
            "address": "192.168.0.1/24",
            "assigned_object": {"interface": {"id": 20, "device": {"id": 10}}},
            "status": "active",
        })
    );
    assert_eq!(
        lookup.calls_for(ObjectType::IpAddress),
        vec![params(&[
            ("q", "192.168.0.1/24"),
            ("interface__name", "GigabitEthernet0/0"),
            ("interface__device__name", "router01"),
            ("interface__device__site__name", "Site A"),
        ])]
    );
}

// ── Lookups ──────────────────────────────────────────────────────

fn device_sharing_a_manufacturer() -> invsync_types::IngestEntity {
    entity(
        "dcim.device",
        json!({
            "name": "router01",
            "device_type": {"model": "ISR4321", "manufacturer": {"name": "Cisco"}},
            "platform": {"name": "IOS", "manufacturer": {"name": "Cisco"}},
        }),
    )
}

#[test]
fn identical_lookups_are_issued_once() {
    let lookup = ScriptedLookup::new();
    reconciler()
        .prepare(&device_sharing_a_manufacturer(), &lookup)
        .unwrap();

    assert_eq!(lookup.calls_for(ObjectType::Manufacturer).len(), 1);
}

#[test]
fn lookups_repeat_without_memoization() {
    let lookup = ScriptedLookup::new();
    let reconciler = Reconciler::new(ReconcilerConfig {
        memoize_lookups: false,
        ..ReconcilerConfig::default()
    });
    reconciler
        .prepare(&device_sharing_a_manufacturer(), &lookup)
        .unwrap();

    assert_eq!(lookup.calls_for(ObjectType::Manufacturer).len(), 2);
}

#[test]
fn lookup_failure_aborts_reconciliation() {
    let lookup = ScriptedLookup::new().failing_on(ObjectType::Site);
    let err = reconciler()
        .prepare(&entity("dcim.device", json!({"name": "router01"})), &lookup)
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Lookup {
            object_type: ObjectType::Site,
            ..
        }
    ));
    assert_eq!(lookup.calls().len(), 1);
}

#[test]
fn state_of_the_wrong_kind_is_malformed() {
    let lookup = ScriptedLookup::new().answering(
        ObjectType::Site,
        params(&[("q", "Site A")]),
        invsync_types::ObjectState {
            object_id: 1,
            object_type: "dcim.device".into(),
            object_change_id: 1,
            object: json!({"id": 1, "name": "Site A"}),
        },
    );
    let err = reconciler()
        .prepare(&entity("dcim.site", json!({"name": "Site A"})), &lookup)
        .unwrap_err();

    assert!(matches!(err, ReconcileError::MalformedState { .. }));
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn entity_without_identity_is_rejected() {
    let lookup = ScriptedLookup::new();
    for (data_type, payload) in [
        ("dcim.site", json!({})),
        ("dcim.device", json!({"serial": "FOC1234"})),
        ("ipam.ipaddress", json!({"status": "active"})),
    ] {
        let err = reconciler()
            .prepare(&entity(data_type, payload), &lookup)
            .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InvalidEntity(ValidationError::MissingIdentity { .. })
        ));
    }
    assert!(lookup.calls().is_empty());
}

#[test]
fn unknown_type_is_unsupported() {
    let err = reconciler()
        .prepare(&entity("dcim.cable", json!({"label": "x"})), &ScriptedLookup::new())
        .unwrap_err();
    assert!(matches!(err, ReconcileError::UnsupportedDataType(t) if t == "dcim.cable"));
}

#[test]
fn undecodable_payload_is_a_decode_error() {
    let err = reconciler()
        .prepare(&entity("dcim.site", json!({"name": 5})), &ScriptedLookup::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::Decode {
            object_type: ObjectType::Site,
            ..
        }
    ));
}

#[test]
fn invalid_enumerated_values_are_rejected() {
    let lookup = ScriptedLookup::new();
    let cases = [
        (
            "dcim.interface",
            json!({"name": "eth0", "type": "warp-drive"}),
            ValidationError::InvalidInterfaceType("warp-drive".into()),
        ),
        (
            "dcim.interface",
            json!({"name": "eth0", "mode": "sideways"}),
            ValidationError::InvalidInterfaceMode("sideways".into()),
        ),
        (
            "ipam.ipaddress",
            json!({"address": "10.0.0.1/32", "role": "primary"}),
            ValidationError::InvalidIpAddressRole("primary".into()),
        ),
    ];
    for (data_type, payload, expected) in cases {
        match reconciler().prepare(&entity(data_type, payload), &lookup) {
            Err(ReconcileError::InvalidEntity(e)) => assert_eq!(e, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    let err = reconciler()
        .prepare(
            &entity("ipam.ipaddress", json!({"address": "10.0.0.1/32", "status": "lost"})),
            &lookup,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::InvalidEntity(ValidationError::InvalidStatus { .. })
    ));
}

// ── Batches ──────────────────────────────────────────────────────

#[test]
fn batch_creates_a_shared_tag_once() {
    let lookup = ScriptedLookup::new().found(
        ObjectType::Manufacturer,
        params(&[("q", "Cisco")]),
        json!({"id": 1, "name": "Cisco", "slug": "cisco"}),
    );
    let entities = [
        entity(
            "dcim.devicetype",
            json!({"model": "ISR4321", "manufacturer": {"name": "Cisco"}, "tags": [{"name": "shared"}]}),
        ),
        entity(
            "dcim.devicetype",
            json!({"model": "ASR1001", "manufacturer": {"name": "Cisco"}, "tags": [{"name": "shared"}]}),
        ),
    ];

    let change_set = reconciler().prepare_batch(&entities, &lookup).unwrap();

    let kinds: Vec<&str> = change_set.iter().map(|c| c.object_type.as_str()).collect();
    assert_eq!(kinds, vec!["extras.tag", "dcim.devicetype", "dcim.devicetype"]);
    assert_eq!(change_set.changes[0].data, json!({"name": "shared", "slug": "shared"}));
    assert_eq!(
        change_set.changes[1].data,
        json!({
            "model": "ISR4321",
            "slug": "isr4321",
            "manufacturer": {"id": 1},
            "tags": [{"name": "shared", "slug": "shared"}],
        })
    );
}

#[test]
fn batch_aborts_on_any_invalid_entity() {
    let entities = [
        entity("dcim.site", json!({"name": "Site A"})),
        entity("dcim.site", json!({})),
    ];
    let result = reconciler().prepare_batch(&entities, &ScriptedLookup::new());
    assert!(matches!(result, Err(ReconcileError::InvalidEntity(_))));
}
