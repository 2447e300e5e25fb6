use super::*;

#[test]
fn transparent_raster_is_blank() {
    let r = Raster::transparent(3, 2).unwrap();
    assert_eq!(r.data.len(), 3 * 2 * 4);
    assert!(r.is_blank());
    assert_eq!(r.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(r.pixel(3, 0), None);
}

#[test]
fn png_encoding_unpremultiplies() {
    let mut r = Raster::transparent(1, 1).unwrap();
    r.data.copy_from_slice(&[100, 50, 25, 128]);
    assert!(!r.is_blank());

    let png = r.to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    let px = decoded.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i16::from(px[0]) - 199).abs() <= 1);
    assert!((i16::from(px[1]) - 100).abs() <= 1);
}
