use super::*;
use crate::foundation::core::Point;
use crate::render::composite::BlendMode;
use crate::render::compositor::{CompositeContext, PhotoOutcome, build_backgrounds};
use crate::scene::object::Geometry;
use crate::scene::view::View;

fn viewport() -> Viewport {
    Viewport::new(50, 50).unwrap()
}

fn white_photo() -> Arc<PreparedImage> {
    Arc::new(PreparedImage::from_premul(10, 10, vec![255; 10 * 10 * 4]).unwrap())
}

fn ctx(color: Color) -> CompositeContext {
    CompositeContext {
        viewport: viewport(),
        color,
        mask_blend: BlendMode::Multiply,
        highlight_opacity: 0.3,
    }
}

fn render(
    backgrounds: Option<&BackgroundStack>,
    objects: &[DesignObject],
    images: &ImageCache,
    multiplier: f64,
) -> Raster {
    let fonts = FontBook::new(false, Vec::new());
    StageRenderer {
        viewport: viewport(),
        images,
        fonts: &fonts,
    }
    .render(backgrounds, objects, multiplier)
    .unwrap()
}

#[test]
fn empty_stage_is_blank_at_scaled_size() {
    let r = render(None, &[], &ImageCache::new(), 2.0);
    assert_eq!((r.width, r.height), (100, 100));
    assert!(r.is_blank());
}

#[test]
fn white_product_stays_white() {
    let stack = build_backgrounds(
        View::Front,
        &PhotoOutcome::Loaded(white_photo()),
        &ctx(Color::WHITE),
    );
    let r = render(Some(&stack), &[], &ImageCache::new(), 1.0);
    let px = r.pixel(25, 25).unwrap();
    assert!(px.iter().all(|c| *c >= 250), "{px:?}");
}

#[test]
fn tint_multiplies_and_highlight_lifts() {
    let stack = build_backgrounds(
        View::Front,
        &PhotoOutcome::Loaded(white_photo()),
        &ctx(Color::rgb(255, 0, 0)),
    );
    let [r, g, b, a] = render(Some(&stack), &[], &ImageCache::new(), 1.0)
        .pixel(25, 25)
        .unwrap();
    assert!(r >= 250);
    assert_eq!(a, 255);
    assert!(g > 0 && g < 128, "highlight should lift green a little, got {g}");
    assert!(g.abs_diff(b) <= 2);
}

#[test]
fn placeholder_fills_viewport() {
    let stack = build_backgrounds(View::Back, &PhotoOutcome::Missing, &ctx(Color::WHITE));
    let r = render(Some(&stack), &[], &ImageCache::new(), 1.0);
    let p = Color::PLACEHOLDER;
    assert_eq!(r.pixel(1, 1), Some([p.r, p.g, p.b, 255]));
}

#[test]
fn shape_draws_at_its_position() {
    let obj = DesignObject {
        id: crate::scene::object::ObjectId(1),
        kind: ObjectKind::Shape {
            shape: ShapeKind::Rectangle,
            fill: Color::rgb(255, 0, 0),
            width: 20.0,
            height: 20.0,
        },
        geometry: Geometry::at(Point::new(25.0, 25.0)),
    };
    let r = render(None, &[obj], &ImageCache::new(), 1.0);
    assert_eq!(r.pixel(25, 25), Some([255, 0, 0, 255]));
    assert_eq!(r.pixel(2, 2), Some([0, 0, 0, 0]));
}

#[test]
fn objects_draw_above_backgrounds() {
    let stack = build_backgrounds(
        View::Front,
        &PhotoOutcome::Loaded(white_photo()),
        &ctx(Color::WHITE),
    );
    let obj = DesignObject {
        id: crate::scene::object::ObjectId(1),
        kind: ShapeKind::Circle.default_kind(),
        geometry: Geometry::at(Point::new(25.0, 25.0)),
    };
    let r = render(Some(&stack), &[obj], &ImageCache::new(), 1.0);
    let ink = Color::INK;
    assert_eq!(r.pixel(25, 25), Some([ink.r, ink.g, ink.b, 255]));
}

#[test]
fn cached_image_and_missing_image_both_draw() {
    let mut images = ImageCache::new();
    let mut px = Vec::new();
    for _ in 0..(4 * 4) {
        px.extend_from_slice(&[0, 0, 255, 255]);
    }
    images.insert(
        "clipart/star.png".to_string(),
        Arc::new(PreparedImage::from_premul(4, 4, px).unwrap()),
    );

    let mut star = DesignObject {
        id: crate::scene::object::ObjectId(1),
        kind: ObjectKind::Image {
            source: "clipart/star.png".to_string(),
            natural_width: 4,
            natural_height: 4,
        },
        geometry: Geometry::at(Point::new(12.0, 12.0)),
    };
    star.scale_to_width(16.0);
    let ghost = DesignObject {
        id: crate::scene::object::ObjectId(2),
        kind: ObjectKind::Image {
            source: "clipart/gone.png".to_string(),
            natural_width: 16,
            natural_height: 16,
        },
        geometry: Geometry::at(Point::new(38.0, 38.0)),
    };

    let r = render(None, &[star, ghost], &images, 1.0);
    let [r0, g0, b0, a0] = r.pixel(12, 12).unwrap();
    assert!(r0 <= 5 && g0 <= 5 && b0 >= 250 && a0 >= 250);
    assert_ne!(r.pixel(38, 38).unwrap()[3], 0);
}
