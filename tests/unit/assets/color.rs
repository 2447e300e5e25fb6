use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::from_hex("00FF00").unwrap(), Color::rgb(0, 255, 0));
    assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    assert_eq!(
        Color::from_hex("#0000ff80").unwrap(),
        Color::rgba(0, 0, 255, 128)
    );
    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#gggggg").is_err());
}

#[test]
fn hex_round_trips_through_display() {
    assert_eq!(Color::rgb(0x1a, 0x1a, 0x1a).to_string(), "#1a1a1a");
    assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
}

#[test]
fn serde_accepts_hex_object_and_array() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgb(255, 0, 0));

    let c: Color = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));

    let c: Color = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Color::rgba(1, 2, 3, 4));

    assert!(serde_json::from_value::<Color>(json!([1, 2])).is_err());
    assert_eq!(serde_json::to_value(Color::WHITE).unwrap(), json!("#ffffff"));
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Color::rgb(10, 20, 30).to_premul(), [10, 20, 30, 255]);
    assert_eq!(Color::rgba(255, 255, 255, 0).to_premul(), [0, 0, 0, 0]);
    assert_eq!(Color::rgba(255, 0, 0, 128).to_premul(), [128, 0, 0, 128]);
}

#[test]
fn css_keywords_and_hex_are_accepted() {
    assert_eq!(Color::from_css("navy").unwrap(), Color::rgb(0, 0, 128));
    assert_eq!(Color::from_css(" Grey ").unwrap(), Color::rgb(128, 128, 128));
    assert_eq!(Color::from_css("#ABC").unwrap(), Color::rgb(0xaa, 0xbb, 0xcc));
    assert_eq!(Color::from_css("transparent").unwrap().a, 0);
    assert!(Color::from_css("heather charcoal").is_err());
    assert!(Color::from_hex("navy").is_err());
}
