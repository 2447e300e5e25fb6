use super::*;

#[test]
fn font_combinations_match_ui_order() {
    let names: Vec<_> = font_combinations().iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        [
            "Vintage Sport",
            "Modern Minimal",
            "Bold Street",
            "Classic Serif",
            "Retro Wave",
            "Luxury Edge"
        ]
    );
}

#[test]
fn vintage_sport_is_italic_bebas() {
    let p = find_text_preset("vintage sport").unwrap();
    assert_eq!(p.config.text, "VARSITY");
    assert_eq!(p.config.font_family, "Bebas Neue");
    assert_eq!(p.config.font_size, 60.0);
    assert_eq!(p.config.font_weight, "900");
    assert_eq!(p.config.font_style, FontStyle::Italic);
    assert_eq!(p.config.fill, Color::BLACK);
}

#[test]
fn quotes_keep_default_typography() {
    let q = find_text_preset("STAY REAL").unwrap();
    assert_eq!(q.config.fill, Color::from_hex("#ff4d00").unwrap());
    assert_eq!(q.config.font_family, "Inter");
    assert_eq!(q.config.font_size, 32.0);
    assert_eq!(quotes().len(), 6);
}

#[test]
fn unknown_preset_is_none() {
    assert!(find_text_preset("Comic Relief").is_none());
}
