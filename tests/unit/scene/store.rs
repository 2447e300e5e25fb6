use super::*;
use crate::foundation::core::Point;
use crate::scene::object::{Geometry, ObjectId, ShapeKind, TextConfig};

fn text(id: u64, content: &str) -> DesignObject {
    DesignObject {
        id: ObjectId(id),
        kind: TextConfig::new(content).into_kind().unwrap(),
        geometry: Geometry::at(Point::new(250.0, 290.0)),
    }
}

fn shape(id: u64) -> DesignObject {
    DesignObject {
        id: ObjectId(id),
        kind: ShapeKind::Triangle.default_kind(),
        geometry: Geometry::at(Point::new(10.0, 20.0)),
    }
}

#[test]
fn snapshot_then_restore_keeps_order_and_attributes() {
    let mut store = SceneStore::new();
    let mut rotated = shape(2);
    rotated.geometry.rotation_deg = 45.0;
    let objects = vec![text(1, "HELLO"), rotated];
    store
        .snapshot(View::Front, &objects, Some(vec![1, 2, 3]))
        .unwrap();

    let restored = store.restore(View::Front);
    assert_eq!(restored.skipped, 0);
    assert_eq!(restored.objects, objects);
    assert_eq!(store.preview(View::Front), Some(&[1u8, 2, 3][..]));
    assert_eq!(store.object_count(View::Front), 2);
}

#[test]
fn never_visited_view_restores_nothing() {
    let store = SceneStore::new();
    let restored = store.restore(View::Back);
    assert!(restored.objects.is_empty());
    assert!(store.preview(View::Back).is_none());
}

#[test]
fn bad_record_is_skipped_and_the_rest_restore() {
    let mut store = SceneStore::new();
    let good_a = ObjectRecord::from_object(&text(1, "A")).unwrap();
    let good_b = ObjectRecord::from_object(&shape(3)).unwrap();
    let broken = ObjectRecord(serde_json::json!({ "id": 2, "kind": { "type": "hologram" } }));
    store.set_records(View::Back, vec![good_a, broken, good_b]);

    let restored = store.restore(View::Back);
    assert_eq!(restored.skipped, 1);
    let ids: Vec<_> = restored.objects.iter().map(|o| o.id).collect();
    assert_eq!(ids, [ObjectId(1), ObjectId(3)]);
}

#[test]
fn records_that_would_not_draw_are_skipped() {
    let mut zero_font = serde_json::to_value(text(1, "A")).unwrap();
    zero_font["kind"]["style"]["fontSize"] = serde_json::json!(0.0);
    let mut flat_scale = serde_json::to_value(shape(2)).unwrap();
    flat_scale["geometry"]["scale"] = serde_json::json!({ "x": 0.0, "y": 1.0 });
    let mut empty_box = serde_json::to_value(shape(3)).unwrap();
    empty_box["kind"]["width"] = serde_json::json!(-1.0);

    let records = vec![
        ObjectRecord(zero_font),
        ObjectRecord(flat_scale),
        ObjectRecord(empty_box),
        ObjectRecord::from_object(&shape(4)).unwrap(),
    ];
    let restored = restore_records(View::Front, &records);
    assert_eq!(restored.skipped, 3);
    assert_eq!(restored.objects.len(), 1);
    assert_eq!(restored.objects[0].id, ObjectId(4));
}

#[test]
fn records_by_view_skips_empty_views() {
    let mut store = SceneStore::new();
    store.snapshot(View::Front, &[text(1, "X")], None).unwrap();
    store.snapshot(View::Back, &[], None).unwrap();
    let by_view = store.records_by_view();
    assert_eq!(by_view.keys().copied().collect::<Vec<_>>(), [View::Front]);
}

#[test]
fn design_document_json_uses_view_keys() {
    let mut views = BTreeMap::new();
    views.insert(
        View::LeftSleeve,
        vec![ObjectRecord::from_object(&text(7, "7")).unwrap()],
    );
    let doc = DesignDocument {
        product_id: "tee-1".to_string(),
        color: Color::rgb(255, 0, 0),
        views,
    };
    let json = doc.to_json().unwrap();
    assert!(json.contains("\"leftSleeve\""));
    assert!(json.contains("\"productId\""));
    assert!(json.contains("#ff0000"));
    assert_eq!(DesignDocument::from_json(&json).unwrap(), doc);
}
