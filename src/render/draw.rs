//! CPU rasterization of a stage (backgrounds plus design objects) into a [`Raster`].
//!
//! Background layers are drawn one at a time into a full-canvas scratch pixmap and blended onto
//! the canvas with their own [`BlendMode`](crate::render::composite::BlendMode); design objects
//! are then drawn directly with source-over in z-order.

use std::collections::HashMap;
use std::sync::Arc;

use resvg::tiny_skia;

use crate::assets::color::Color;
use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Rect, Viewport};
use crate::foundation::error::{DrapeError, DrapeResult};
use crate::render::composite::blend_in_place;
use crate::render::compositor::silhouette_fill;
use crate::render::raster::Raster;
use crate::render::text::{FontBook, draw_text};
use crate::scene::background::{BackgroundKind, BackgroundLayer, BackgroundStack};
use crate::scene::object::{DesignObject, ObjectKind, ShapeKind};

/// Decoded image assets keyed by the reference stored on image objects.
pub(crate) type ImageCache = HashMap<String, Arc<PreparedImage>>;

/// Everything needed to turn a stage into pixels.
pub(crate) struct StageRenderer<'a> {
    pub(crate) viewport: Viewport,
    pub(crate) images: &'a ImageCache,
    pub(crate) fonts: &'a FontBook,
}

impl StageRenderer<'_> {
    /// Rasterize `backgrounds` and `objects` at `multiplier` times the viewport size.
    #[tracing::instrument(level = "debug", skip_all, fields(objects = objects.len(), multiplier = multiplier))]
    pub(crate) fn render(
        &self,
        backgrounds: Option<&BackgroundStack>,
        objects: &[DesignObject],
        multiplier: f64,
    ) -> DrapeResult<Raster> {
        let (w, h) = self.viewport.scaled_px(multiplier)?;
        let mut raster = Raster::transparent(w, h)?;
        let m = multiplier as f32;

        if let Some(stack) = backgrounds {
            for layer in stack.layers() {
                let layer_px = render_layer(layer, w, h, m)?;
                blend_in_place(layer.blend, &mut raster.data, layer_px.data(), layer.opacity)?;
            }
        }

        if objects.is_empty() {
            return Ok(raster);
        }

        let size = tiny_skia::IntSize::from_wh(w, h)
            .ok_or_else(|| DrapeError::render("invalid canvas size"))?;
        let mut canvas = tiny_skia::Pixmap::from_vec(std::mem::take(&mut raster.data), size)
            .ok_or_else(|| DrapeError::render("canvas buffer does not match its size"))?;

        let base = tiny_skia::Transform::from_scale(m, m);
        for obj in objects {
            let xform = base.pre_concat(to_skia(obj.geometry.transform()));
            self.draw_object(&mut canvas, obj, xform)?;
        }

        raster.data = canvas.take();
        Ok(raster)
    }

    fn draw_object(
        &self,
        canvas: &mut tiny_skia::Pixmap,
        obj: &DesignObject,
        xform: tiny_skia::Transform,
    ) -> DrapeResult<()> {
        let opacity = obj.geometry.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }

        match &obj.kind {
            ObjectKind::Text { content, style } => {
                draw_text(canvas, self.fonts, content, style, opacity, xform)?;
            }
            ObjectKind::Shape {
                shape,
                fill,
                width,
                height,
            } => {
                let Some(path) = shape_path(*shape, *width, *height) else {
                    return Ok(());
                };
                let paint = solid_paint(*fill, opacity);
                canvas.fill_path(&path, &paint, tiny_skia::FillRule::Winding, xform, None);
            }
            ObjectKind::Image {
                source,
                natural_width,
                natural_height,
            } => {
                let (w, h) = (*natural_width as f32, *natural_height as f32);
                let local = xform.pre_translate(-w / 2.0, -h / 2.0);
                match self.images.get(source) {
                    Some(img) => {
                        let src = pixmap_ref(img)?;
                        let paint = tiny_skia::PixmapPaint {
                            opacity: opacity as f32,
                            quality: tiny_skia::FilterQuality::Bilinear,
                            ..Default::default()
                        };
                        let sx = w / img.width.max(1) as f32;
                        let sy = h / img.height.max(1) as f32;
                        canvas.draw_pixmap(0, 0, src, &paint, local.pre_scale(sx, sy), None);
                    }
                    None => {
                        tracing::warn!(source = %source, "image not decoded; drawing placeholder");
                        draw_missing_image(canvas, w, h, opacity, local);
                    }
                }
            }
        }
        Ok(())
    }
}

fn render_layer(
    layer: &BackgroundLayer,
    w: u32,
    h: u32,
    m: f32,
) -> DrapeResult<tiny_skia::Pixmap> {
    let mut px =
        tiny_skia::Pixmap::new(w, h).ok_or_else(|| DrapeError::render("invalid layer size"))?;
    let placement = layer.placement;

    match layer.kind {
        BackgroundKind::Placeholder => {
            let fill = layer.fill.unwrap_or(Color::PLACEHOLDER);
            if let Some(rect) = skia_rect(placement) {
                px.fill_rect(
                    rect,
                    &solid_paint(fill, 1.0),
                    tiny_skia::Transform::from_scale(m, m),
                    None,
                );
            }
        }
        BackgroundKind::Texture | BackgroundKind::Highlight | BackgroundKind::ColorMask => {
            let Some(photo) = layer.photo.as_ref() else {
                return Ok(px);
            };
            let xform = placement_transform(placement, photo, m);
            let paint = tiny_skia::PixmapPaint {
                quality: tiny_skia::FilterQuality::Bilinear,
                ..Default::default()
            };
            if layer.kind == BackgroundKind::ColorMask {
                let fill = layer.fill.unwrap_or(Color::WHITE);
                let tinted = silhouette_fill(photo, fill);
                let src = tiny_skia::PixmapRef::from_bytes(&tinted, photo.width, photo.height)
                    .ok_or_else(|| DrapeError::render("invalid mask size"))?;
                px.draw_pixmap(0, 0, src, &paint, xform, None);
            } else {
                px.draw_pixmap(0, 0, pixmap_ref(photo)?, &paint, xform, None);
            }
        }
    }
    Ok(px)
}

fn placement_transform(placement: Rect, photo: &PreparedImage, m: f32) -> tiny_skia::Transform {
    let sx = placement.width() as f32 / photo.width.max(1) as f32;
    let sy = placement.height() as f32 / photo.height.max(1) as f32;
    tiny_skia::Transform::from_scale(m, m)
        .pre_translate(placement.x0 as f32, placement.y0 as f32)
        .pre_scale(sx, sy)
}

fn pixmap_ref(img: &PreparedImage) -> DrapeResult<tiny_skia::PixmapRef<'_>> {
    tiny_skia::PixmapRef::from_bytes(&img.rgba8_premul, img.width, img.height)
        .ok_or_else(|| DrapeError::render("prepared image size does not match its buffer"))
}

fn shape_path(shape: ShapeKind, w: f64, h: f64) -> Option<tiny_skia::Path> {
    let (w, h) = (w as f32, h as f32);
    let rect = tiny_skia::Rect::from_xywh(-w / 2.0, -h / 2.0, w, h)?;
    match shape {
        ShapeKind::Rectangle => Some(tiny_skia::PathBuilder::from_rect(rect)),
        ShapeKind::Circle => tiny_skia::PathBuilder::from_oval(rect),
        ShapeKind::Triangle => {
            let mut pb = tiny_skia::PathBuilder::new();
            pb.move_to(0.0, -h / 2.0);
            pb.line_to(w / 2.0, h / 2.0);
            pb.line_to(-w / 2.0, h / 2.0);
            pb.close();
            pb.finish()
        }
    }
}

fn draw_missing_image(
    canvas: &mut tiny_skia::Pixmap,
    w: f32,
    h: f32,
    opacity: f64,
    xform: tiny_skia::Transform,
) {
    let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, w.max(1.0), h.max(1.0)) else {
        return;
    };
    canvas.fill_rect(rect, &solid_paint(Color::PLACEHOLDER, opacity), xform, None);
    let path = tiny_skia::PathBuilder::from_rect(rect);
    let stroke = tiny_skia::Stroke {
        width: 2.0,
        ..Default::default()
    };
    canvas.stroke_path(
        &path,
        &solid_paint(Color::rgb(0x9c, 0xa3, 0xaf), opacity),
        &stroke,
        xform,
        None,
    );
}

fn solid_paint(color: Color, opacity: f64) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    let a = (f64::from(color.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    paint.set_color_rgba8(color.r, color.g, color.b, a);
    paint.anti_alias = true;
    paint
}

fn skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}

fn to_skia(a: Affine) -> tiny_skia::Transform {
    let [sx, ky, kx, sy, tx, ty] = a.as_coeffs();
    tiny_skia::Transform::from_row(
        sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
