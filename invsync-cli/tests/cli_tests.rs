use invsync_cli::{apply, load_entities, load_inventory, plan, plan_batch, write_json};
use invsync_engine::{IngestionState, MemoryInventory, ReconcilerConfig};
use invsync_model::ObjectType;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
    path
}

// ── Loading ──────────────────────────────────────────────────────

#[test]
fn missing_inventory_is_empty() {
    let dir = TempDir::new().unwrap();
    let inventory = load_inventory(&dir.path().join("absent.json")).unwrap();
    assert!(inventory.is_empty());
}

#[test]
fn inventory_snapshot_loads() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "inventory.json",
        json!([
            {"object_type": "dcim.site", "object": {"id": 1, "name": "Site A", "slug": "site-a"}},
            {"object_type": "extras.tag", "object": {"id": 2, "name": "edge", "slug": "edge"}},
        ]),
    );

    let inventory = load_inventory(&path).unwrap();
    assert_eq!(inventory.count(ObjectType::Site), 1);
    assert_eq!(inventory.count(ObjectType::Tag), 1);
}

#[test]
fn malformed_inventory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inventory.json", json!({"not": "a list"}));
    assert!(load_inventory(&path).is_err());
}

#[test]
fn entities_load_from_list_or_single_object() {
    let dir = TempDir::new().unwrap();
    let list = write(
        &dir,
        "list.json",
        json!([
            {"request_id": "r1", "data_type": "dcim.site", "entity": {"name": "Site A"}},
            {"data_type": "dcim.site", "entity": {"name": "Site B"}},
        ]),
    );
    let single = write(
        &dir,
        "single.json",
        json!({"data_type": "extras.tag", "entity": {"name": "edge"}}),
    );
    let scalar = write(&dir, "scalar.json", json!("dcim.site"));

    let entities = load_entities(&list).unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[1].request_id, "");
    assert_eq!(load_entities(&single).unwrap()[0].data_type, "extras.tag");
    assert!(load_entities(&scalar).is_err());
}

// ── Commands ─────────────────────────────────────────────────────

#[test]
fn plan_leaves_inventory_untouched() {
    let inventory = Arc::new(MemoryInventory::new());
    let entities = vec![invsync_types::IngestEntity::new(
        "r1",
        "dcim.device",
        json!({"name": "router01"}),
    )];

    let logs = plan(&entities, inventory.clone(), ReconcilerConfig::default());

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].state, IngestionState::New);
    assert_eq!(logs[0].change_set.as_ref().map(|cs| cs.len()), Some(5));
    assert!(inventory.is_empty());
}

#[test]
fn batch_plan_shares_new_records() {
    let inventory = MemoryInventory::new();
    let entities = vec![
        invsync_types::IngestEntity::new("r1", "dcim.site", json!({"name": "Site A", "tags": [{"name": "edge"}]})),
        invsync_types::IngestEntity::new("r1", "dcim.site", json!({"name": "Site B", "tags": [{"name": "edge"}]})),
    ];

    let change_set = plan_batch(&entities, &inventory, ReconcilerConfig::default()).unwrap();

    let tags = change_set
        .iter()
        .filter(|c| c.object_type == "extras.tag")
        .count();
    assert_eq!(tags, 1);
    assert_eq!(change_set.len(), 3);
}

#[tokio::test]
async fn apply_reconciles_and_reports_failures() {
    let inventory = Arc::new(MemoryInventory::new());
    let entities = vec![
        invsync_types::IngestEntity::new("r1", "dcim.site", json!({"name": "Site A"})),
        invsync_types::IngestEntity::new("r1", "dcim.site", json!({"status": "bogus"})),
        invsync_types::IngestEntity::new("r1", "extras.tag", json!({"name": "edge"})),
    ];

    let logs = apply(entities, inventory.clone(), ReconcilerConfig::default())
        .await
        .unwrap();

    assert_eq!(logs.len(), 3);
    assert_eq!(logs.iter().filter(|l| l.is_failed()).count(), 1);
    assert_eq!(inventory.len(), 2);
}

#[tokio::test]
async fn applied_snapshot_reloads_to_a_no_op_plan() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("inventory.json");
    let entities = vec![invsync_types::IngestEntity::new(
        "r1",
        "dcim.device",
        json!({"name": "router01", "site": {"name": "Site A"}}),
    )];

    let inventory = Arc::new(load_inventory(&snapshot).unwrap());
    apply(entities.clone(), inventory.clone(), ReconcilerConfig::default())
        .await
        .unwrap();
    write_json(Some(snapshot.as_path()), &inventory.snapshot()).unwrap();

    let reloaded = Arc::new(load_inventory(&snapshot).unwrap());
    let logs = plan(&entities, reloaded, ReconcilerConfig::default());
    assert_eq!(logs[0].state, IngestionState::NoChanges);
}
