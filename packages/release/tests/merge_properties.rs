//! Behavioural tests for the merge engine.
//!
//! Each test applies fragments the way the converter does: many small,
//! release-shaped fragments folded into one release.

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

use ted_ocds_release::{
    create_ocds_schema, Entity, Fragment, MergeEngine, MergeError, Release,
};

fn engine() -> MergeEngine {
    MergeEngine::new(create_ocds_schema())
}

fn entity(value: Value) -> Entity {
    value
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("not an object: {value}"))
}

fn apply_all(fragments: &[Value]) -> Release {
    let engine = engine();
    let mut release = Release::new();
    for fragment in fragments {
        engine
            .apply(&mut release, fragment.clone())
            .unwrap_or_else(|e| panic!("fragment {fragment} failed: {e}"));
    }
    release
}

/// Fragments touching unrelated paths, as separate producers would emit them.
fn disjoint_fragments() -> Vec<Value> {
    vec![
        json!({"id": "00123456-2024", "ocid": "ocds-0c46vo-P-1"}),
        json!({"tender": {"lots": [{"id": "LOT-0001", "title": "Cleaning"}]}}),
        json!({"tender": {"documents": [{"id": "DOC-1", "url": "https://example.eu/d"}]}}),
        json!({"parties": [{"id": "ORG-0001", "name": "City of Ghent"}]}),
        json!({"awards": [{"id": "RES-0001", "status": "active"}]}),
        json!({"statistics": [{"id": "1", "value": 3, "measure": "tenders"}]}),
    ]
}

#[test]
fn test_disjoint_fragments_commute() {
    let forward = disjoint_fragments();
    let mut backward = forward.clone();
    backward.reverse();

    let mut rotated = forward.clone();
    rotated.rotate_left(2);

    let expected = apply_all(&forward);
    assert_eq!(apply_all(&backward), expected);
    assert_eq!(apply_all(&rotated), expected);
}

#[test]
fn test_reapplying_fragments_is_idempotent() {
    let engine = engine();
    let fragments = disjoint_fragments();

    let once = apply_all(&fragments);
    let mut twice = once.clone();
    for fragment in &fragments {
        engine.apply(&mut twice, fragment.clone()).unwrap();
    }

    assert_eq!(twice, once);
}

#[test]
fn test_identities_stay_unique() {
    let release = apply_all(&[
        json!({"parties": [{"id": "ORG-0001", "roles": ["buyer"]}]}),
        json!({"parties": [{"id": "ORG-0002", "roles": ["tenderer"]}]}),
        json!({"parties": [{"id": "ORG-0001", "name": "City of Ghent"}]}),
        json!({"parties": [{"id": "ORG-0002", "roles": ["supplier"]}, {"id": "ORG-0001"}]}),
    ]);

    let ids: Vec<&str> = release
        .get("parties")
        .and_then(Value::as_array)
        .map(|parties| {
            parties
                .iter()
                .filter_map(|p| p.get("id").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    assert_eq!(ids, vec!["ORG-0001", "ORG-0002"]);
}

#[test]
fn test_roles_are_unioned_in_first_seen_order() {
    let release = apply_all(&[
        json!({"parties": [{"id": "ORG-1", "roles": ["buyer"]}]}),
        json!({"parties": [{"id": "ORG-1", "roles": ["tenderer", "buyer"]}]}),
        json!({"parties": [{"id": "ORG-1", "roles": ["supplier", "tenderer"]}]}),
    ]);

    assert_eq!(
        release.entity("parties", "ORG-1").and_then(|p| p.get("roles")),
        Some(&json!(["buyer", "tenderer", "supplier"]))
    );
}

#[test]
fn test_new_entity_leaves_existing_entities_unchanged() {
    let engine = engine();
    let mut release = Release::from_value(json!({
        "awards": [{"id": "RES-0001", "status": "active", "suppliers": [{"id": "ORG-1"}]}]
    }))
    .unwrap();
    let before = release.entity("awards", "RES-0001").cloned();

    engine
        .apply(
            &mut release,
            Fragment::Awards(vec![entity(json!({"id": "RES-0002", "status": "unsuccessful"}))]),
        )
        .unwrap();

    assert_eq!(release.entity("awards", "RES-0001").cloned(), before);
    assert_eq!(
        release.entity("awards", "RES-0002").cloned(),
        Some(entity(json!({"id": "RES-0002", "status": "unsuccessful"})))
    );
}

#[test]
fn test_buyer_supplier_scenario() {
    let engine = engine();
    let mut release = Release::from_value(json!({
        "parties": [{"id": "ORG-1", "roles": ["buyer"]}]
    }))
    .unwrap();

    engine
        .apply(
            &mut release,
            Fragment::Parties(vec![
                entity(json!({"id": "ORG-1", "roles": ["supplier"]})),
                entity(json!({"id": "ORG-2", "roles": ["tenderer"]})),
            ]),
        )
        .unwrap();

    assert_eq!(
        release.into_value(),
        json!({"parties": [
            {"id": "ORG-1", "roles": ["buyer", "supplier"]},
            {"id": "ORG-2", "roles": ["tenderer"]}
        ]})
    );
}

#[test]
fn test_typed_fragments_build_a_release() {
    let engine = engine();
    let mut release = Release::new();

    let fragments = vec![
        Fragment::Release(entity(json!({"id": "N-1", "tag": ["tender"]}))),
        Fragment::Tender(entity(json!({"id": "P-1", "title": "Road works"}))),
        Fragment::Buyer(entity(json!({"id": "ORG-1"}))),
        Fragment::Lots(vec![entity(json!({"id": "LOT-0001"}))]),
        Fragment::Items(vec![entity(json!({
            "id": "1",
            "relatedLot": "LOT-0001",
            "classification": {"scheme": "CPV", "id": "45233000"}
        }))]),
        Fragment::Bids(vec![entity(json!({"id": "TEN-0001", "relatedLots": ["LOT-0001"]}))]),
    ];
    let applied = engine.apply_all(&mut release, fragments).unwrap();

    assert_eq!(applied, 6);
    assert_eq!(
        release.into_value(),
        json!({
            "id": "N-1",
            "tag": ["tender"],
            "buyer": {"id": "ORG-1"},
            "tender": {
                "id": "P-1",
                "title": "Road works",
                "lots": [{"id": "LOT-0001"}],
                "items": [{
                    "id": "1",
                    "relatedLot": "LOT-0001",
                    "classification": {"scheme": "CPV", "id": "45233000"}
                }]
            },
            "bids": {"details": [{"id": "TEN-0001", "relatedLots": ["LOT-0001"]}]}
        })
    );
}

#[test]
fn test_failed_fragment_is_atomic() {
    let engine = engine();
    let mut release = apply_all(&disjoint_fragments());
    let before = release.clone();

    let mut fields = Map::new();
    fields.insert("tender".to_string(), json!({"title": "Changed"}));
    fields.insert("parties".to_string(), json!([{"id": "ORG-0001", "name": "Renamed"}]));
    fields.insert("contracts".to_string(), json!([{"id": null}]));

    let err = engine.apply(&mut release, fields).unwrap_err();

    assert!(matches!(err, MergeError::MalformedFragment { .. }));
    assert_eq!(release, before);
}

#[test]
fn test_later_scalar_wins() {
    let release = apply_all(&[
        json!({"tender": {"lots": [{"id": "LOT-0001", "title": "First"}]}}),
        json!({"tender": {"lots": [{"id": "LOT-0001", "title": "Second"}]}}),
    ]);

    assert_eq!(
        release.get("tender.lots"),
        Some(&json!([{"id": "LOT-0001", "title": "Second"}]))
    );
}

#[test]
fn test_release_merges_into_procedure_release() {
    let engine = engine();
    let mut procedure = apply_all(&[
        json!({"ocid": "ocds-0c46vo-P-1", "tag": ["tender"]}),
        json!({"tender": {"lots": [{"id": "LOT-0001", "title": "Cleaning"}]}}),
    ]);

    let award_notice = apply_all(&[
        json!({"ocid": "ocds-0c46vo-P-1", "tag": ["award", "contract"]}),
        json!({"tender": {"lots": [{"id": "LOT-0001", "status": "complete"}]}}),
        json!({"awards": [{"id": "RES-0001", "relatedLots": ["LOT-0001"]}]}),
    ]);

    engine.apply(&mut procedure, award_notice).unwrap();

    assert_eq!(
        procedure.into_value(),
        json!({
            "ocid": "ocds-0c46vo-P-1",
            "tag": ["award", "contract"],
            "tender": {"lots": [{"id": "LOT-0001", "title": "Cleaning", "status": "complete"}]},
            "awards": [{"id": "RES-0001", "relatedLots": ["LOT-0001"]}]
        })
    );
}

#[test]
fn test_secondary_key_merge_is_order_independent() {
    let by_field = json!({"withheldInformation": [{"field": "win-cho", "rationale": "Commercial interest"}]});
    let by_id = json!({"withheldInformation": [{"id": "win-cho-RES-0001", "field": "win-cho"}]});

    let field_first = apply_all(&[by_field.clone(), by_id.clone()]);
    let id_first = apply_all(&[by_id, by_field]);

    assert_eq!(
        field_first.get("withheldInformation"),
        Some(&json!([{
            "id": "win-cho-RES-0001",
            "field": "win-cho",
            "rationale": "Commercial interest"
        }]))
    );
    assert_eq!(field_first, id_first);
}

#[test]
fn test_items_by_related_lot_then_id() {
    let release = apply_all(&[
        json!({"tender": {"items": [{"relatedLot": "LOT-0001", "quantity": 2}]}}),
        json!({"tender": {"items": [{"id": "1", "relatedLot": "LOT-0001"}]}}),
    ]);

    assert_eq!(
        release.get("tender.items"),
        Some(&json!([{"id": "1", "relatedLot": "LOT-0001", "quantity": 2}]))
    );
}

#[test]
fn test_secondary_key_does_not_merge_distinct_ids() {
    let release = apply_all(&[
        json!({"withheldInformation": [{"id": "win-cho-RES-0001", "field": "win-cho"}]}),
        json!({"withheldInformation": [{"id": "win-cho-RES-0002", "field": "win-cho"}]}),
    ]);

    let withheld = release.get("withheldInformation").and_then(Value::as_array);
    assert_eq!(withheld.map(Vec::len), Some(2));
}
