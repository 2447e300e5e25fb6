use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EngineConfig::from_json("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.viewport, Viewport::default());
    assert_eq!(cfg.duplicate_offset, Vec2::new(20.0, 20.0));
    assert_eq!(cfg.mask_blend, BlendMode::Multiply);
    assert_eq!(cfg.load_timeout(), std::time::Duration::from_secs(10));
}

#[test]
fn partial_override_keeps_other_defaults() {
    let cfg = EngineConfig::from_json(
        r#"{ "viewport": { "width": 100, "height": 120 }, "maskBlend": "hue", "skipEmptyViews": true }"#,
    )
    .unwrap();
    assert_eq!(cfg.viewport, Viewport::new(100, 120).unwrap());
    assert_eq!(cfg.mask_blend, BlendMode::Multiply);
    assert!(cfg.skip_empty_views);
    assert_eq!(cfg.export_multiplier, 2.0);
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{ "viewport": { "width": 0, "height": 10 } }"#,
        r#"{ "highlightOpacity": 1.5 }"#,
        r#"{ "exportMultiplier": 0 }"#,
        r#"{ "loadTimeoutMs": 0 }"#,
        r#"{ "maskBlend": "overlay" }"#,
    ] {
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(err.to_string().starts_with("validation error:"), "{json}: {err}");
    }
}

#[test]
fn from_path_reports_missing_file() {
    let err = EngineConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("read engine config"));
}

#[test]
fn composite_context_carries_color() {
    let cfg = EngineConfig::default();
    let ctx = cfg.composite_context(Color::rgb(1, 2, 3));
    assert_eq!(ctx.color, Color::rgb(1, 2, 3));
    assert_eq!(ctx.highlight_opacity, 0.3);
    assert_eq!(ctx.viewport, cfg.viewport);
}
