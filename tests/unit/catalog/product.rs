use serde_json::json;

use super::*;

fn tee() -> serde_json::Value {
    json!({
        "_id": "64f0c0ffee",
        "title": "Heavyweight Tee",
        "description": "Boxy fit",
        "price": 29.5,
        "category": "T-Shirts",
        "colors": ["#ffffff", "#000000"],
        "sizes": ["S", "M", "L"],
        "images": ["/uploads/tee-gallery.png"],
        "views": {
            "back": "/uploads/tee-back.png",
            "leftSleeve": "  ",
            "insideLabel": "/uploads/label.png"
        }
    })
}

#[test]
fn parses_catalog_record() {
    let p = Product::from_json(&tee().to_string()).unwrap();
    assert_eq!(p.id, "64f0c0ffee");
    assert_eq!(p.palette(), vec![Color::WHITE, Color::BLACK]);
    assert_eq!(p.sizes.len(), 3);
    assert!(p.customizable);
    assert_eq!(p.default_color(), Color::WHITE);
}

#[test]
fn front_falls_back_to_first_gallery_image_only() {
    let p = Product::from_json(&tee().to_string()).unwrap();
    assert_eq!(p.view_image(View::Front), Some("/uploads/tee-gallery.png"));
    assert_eq!(p.view_image(View::Back), Some("/uploads/tee-back.png"));
    assert_eq!(p.view_image(View::LeftSleeve), None);
    assert_eq!(p.view_image(View::RightSleeve), None);
    assert_eq!(p.view_image(View::InsideLabel), Some("/uploads/label.png"));
}

#[test]
fn explicit_front_view_wins_over_gallery() {
    let mut p = Product::from_json(&tee().to_string()).unwrap();
    p.views.set(View::Front, Some("/uploads/tee-front.png".to_string()));
    assert_eq!(p.view_image(View::Front), Some("/uploads/tee-front.png"));
}

#[test]
fn default_color_without_colors_is_white() {
    let mut v = tee();
    v["colors"] = json!([]);
    let p = Product::from_json(&v.to_string()).unwrap();
    assert_eq!(p.default_color(), Color::WHITE);
}

#[test]
fn free_form_colors_do_not_reject_the_product() {
    let mut v = tee();
    v["colors"] = json!(["heather", "navy", "#000000"]);
    let p = Product::from_json(&v.to_string()).unwrap();
    assert_eq!(p.colors.len(), 3);
    assert_eq!(p.palette(), vec![Color::rgb(0, 0, 128), Color::BLACK]);
    assert_eq!(p.default_color(), Color::rgb(0, 0, 128));
}

#[test]
fn rejects_records_without_identity() {
    let mut v = tee();
    v["_id"] = json!("");
    assert!(matches!(
        Product::from_json(&v.to_string()),
        Err(DrapeError::Validation(_))
    ));
    assert!(Product::from_json("{}").is_err());
}
