use invsync_types::{
    Change, ChangeSet, ChangeSetId, ChangeSetResponse, ChangeType, IngestEntity, LookupParams,
    ObjectState,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── ChangeType ────────────────────────────────────────────────────

#[test]
fn change_type_wire_names() {
    assert_eq!(serde_json::to_value(ChangeType::Create).unwrap(), json!("create"));
    assert_eq!(serde_json::to_value(ChangeType::Update).unwrap(), json!("update"));
    assert_eq!("update".parse::<ChangeType>().unwrap(), ChangeType::Update);
    assert!("delete".parse::<ChangeType>().is_err());
}

// ── Change ────────────────────────────────────────────────────────

#[test]
fn create_change_omits_object_id_and_version() {
    let change = Change::create("dcim.site", json!({"name": "Site A"}));
    let value = serde_json::to_value(&change).unwrap();
    assert!(value.get("object_id").is_none());
    assert!(value.get("object_version").is_none());
    assert_eq!(value["change_type"], json!("create"));
    assert_eq!(value["object_type"], json!("dcim.site"));
}

#[test]
fn update_change_carries_object_id_and_version() {
    let change = Change::update("dcim.site", 7, 42, json!({"id": 7}));
    let value = serde_json::to_value(&change).unwrap();
    assert_eq!(value["object_id"], json!(7));
    assert_eq!(value["object_version"], json!(42));
    assert!(!change.is_create());
}

// ── ChangeSet ─────────────────────────────────────────────────────

#[test]
fn change_set_wire_shape() {
    let mut set = ChangeSet::new();
    set.push(Change::create("extras.tag", json!({"name": "t"})));
    let value = serde_json::to_value(&set).unwrap();
    assert_eq!(value["change_set_id"], json!(set.change_set_id.to_string()));
    assert_eq!(value["change_set"].as_array().unwrap().len(), 1);
}

#[test]
fn change_set_serde_roundtrip() {
    let mut set = ChangeSet::new();
    set.push(Change::create("dcim.manufacturer", json!({"name": "Cisco"})));
    set.push(Change::update("dcim.site", 1, 2, json!({"id": 1})));
    let parsed: ChangeSet = serde_json::from_str(&set.to_json().unwrap()).unwrap();
    assert_eq!(parsed, set);
}

#[test]
fn empty_change_set() {
    let set = ChangeSet::default();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
}

// ── ChangeSetResponse ─────────────────────────────────────────────

#[test]
fn response_success_and_failure() {
    let id = ChangeSetId::new();
    assert!(ChangeSetResponse::success(id).is_success());
    let failed = ChangeSetResponse::failure(id, json!(["boom"]));
    assert!(!failed.is_success());
}

#[test]
fn response_without_errors_field_decodes() {
    let id = ChangeSetId::new();
    let body = format!(r#"{{"change_set_id":"{id}","result":"success"}}"#);
    let response: ChangeSetResponse = serde_json::from_str(&body).unwrap();
    assert!(response.is_success());
    assert!(response.errors.is_null());
}

// ── ObjectState / LookupParams / IngestEntity ─────────────────────

#[test]
fn object_state_decodes() {
    let state: ObjectState = serde_json::from_value(json!({
        "object_id": 3,
        "object_type": "dcim.site",
        "object_change_id": 11,
        "object": {"id": 3, "name": "Site A", "slug": "site-a"}
    }))
    .unwrap();
    assert_eq!(state.object_id, 3);
    assert_eq!(state.object_change_id, 11);
    assert_eq!(state.object["slug"], json!("site-a"));
}

#[test]
fn lookup_params_are_ordered() {
    let params = LookupParams::query("eth0")
        .with("device__name", "router01")
        .with("device__site__name", "Site A");
    let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["device__name", "device__site__name", "q"]);
    assert_eq!(params.q(), Some("eth0"));
    assert_eq!(params.len(), 3);
    assert_eq!(
        params.to_string(),
        "device__name=router01&device__site__name=Site A&q=eth0"
    );
}

#[test]
fn lookup_params_skip_empty_filters() {
    let mut params = LookupParams::query("router01");
    params.insert_filter("site__name", "");
    assert_eq!(params, LookupParams::query("router01"));

    params.insert_filter("site__name", "Site A");
    assert_eq!(params.get("site__name"), Some("Site A"));
}

#[test]
fn lookup_params_collect() {
    let params: LookupParams = [("q", "Cisco")].into_iter().collect();
    assert_eq!(params, LookupParams::query("Cisco"));
    assert_eq!(serde_json::to_value(&params).unwrap(), json!({"q": "Cisco"}));
}

#[test]
fn ingest_entity_from_json() {
    let entity = IngestEntity::from_json(
        r#"{"request_id":"req-1","data_type":"dcim.site","entity":{"name":"Site A"}}"#,
    )
    .unwrap();
    assert_eq!(entity.request_id, "req-1");
    assert_eq!(entity.data_type, "dcim.site");
    assert_eq!(entity.entity, json!({"name": "Site A"}));
}

#[test]
fn ingest_entity_request_id_defaults_to_empty() {
    let entity = IngestEntity::from_json(r#"{"data_type":"dcim.site","entity":{}}"#).unwrap();
    assert!(entity.request_id.is_empty());
}
