use super::*;

#[test]
fn viewport_default_matches_design_canvas() {
    let vp = Viewport::default();
    assert_eq!((vp.width, vp.height), (500, 580));
    assert_eq!(vp.center(), Point::new(250.0, 290.0));
}

#[test]
fn viewport_rejects_zero_dimensions() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, 0).is_err());
    assert!(Viewport::new(1, 1).is_ok());
}

#[test]
fn scaled_px_rounds_and_validates() {
    let vp = Viewport::default();
    assert_eq!(vp.scaled_px(2.0).unwrap(), (1000, 1160));
    assert_eq!(vp.scaled_px(0.2).unwrap(), (100, 116));
    assert_eq!(vp.scaled_px(0.0001).unwrap(), (1, 1));
    assert!(vp.scaled_px(0.0).is_err());
    assert!(vp.scaled_px(f64::NAN).is_err());
    assert!(vp.scaled_px(1_000.0).is_err());
}
