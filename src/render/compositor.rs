//! Background compositing for a product view.
//!
//! A view's background is three layers over the fitted product photograph:
//!
//! 1. **Texture**: the photograph, centered and uniformly scaled to fit the viewport.
//! 2. **ColorMask**: the product tint over the photograph's silhouette, blended so the shading
//!    below survives (multiply by default).
//! 3. **Highlight**: a low-opacity screen copy of the photograph restoring specular detail.
//!
//! Only the mask fill depends on the product color, so a color change retints the mask without
//! touching the photograph.

use std::sync::Arc;

use crate::assets::color::Color;
use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Rect, Viewport};
use crate::render::composite::BlendMode;
use crate::scene::background::{
    BackgroundKind, BackgroundLayer, BackgroundStack, BackgroundStatus,
};
use crate::scene::view::View;

/// Result of fetching a view's photograph.
#[derive(Clone, Debug)]
pub enum PhotoOutcome {
    /// Decoded photograph.
    Loaded(Arc<PreparedImage>),
    /// The product has no photograph for the view.
    Missing,
    /// Fetch or decode failed.
    Failed(String),
    /// The load exceeded the configured timeout.
    TimedOut,
}

/// Session state every background rebuild reads.
///
/// The product tint is session-global; it is passed in explicitly on every rebuild instead of
/// living in shared mutable state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeContext {
    /// Design viewport.
    pub viewport: Viewport,
    /// Current product tint.
    pub color: Color,
    /// Blend mode of the color mask.
    pub mask_blend: BlendMode,
    /// Opacity of the highlight layer.
    pub highlight_opacity: f32,
}

/// Destination rectangle of an `img_w` x `img_h` photograph fitted into `viewport`.
///
/// Uniform scale `min(vw/iw, vh/ih)`, centered; the unused axis is letterboxed.
pub fn fit_placement(viewport: Viewport, img_w: u32, img_h: u32) -> Rect {
    let vw = f64::from(viewport.width);
    let vh = f64::from(viewport.height);
    let iw = f64::from(img_w.max(1));
    let ih = f64::from(img_h.max(1));

    let scale = (vw / iw).min(vh / ih);
    let w = iw * scale;
    let h = ih * scale;
    let x0 = (vw - w) / 2.0;
    let y0 = (vh - h) / 2.0;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// Build the background stack of `view`.
#[tracing::instrument(level = "debug", skip(photo, ctx), fields(color = %ctx.color))]
pub fn build_backgrounds(view: View, photo: &PhotoOutcome, ctx: &CompositeContext) -> BackgroundStack {
    let (photo, status) = match photo {
        PhotoOutcome::Loaded(p) => (Arc::clone(p), BackgroundStatus::Loaded),
        PhotoOutcome::Missing => return placeholder_stack(view, ctx, BackgroundStatus::Missing),
        PhotoOutcome::Failed(msg) => {
            return placeholder_stack(view, ctx, BackgroundStatus::Failed(msg.clone()));
        }
        PhotoOutcome::TimedOut => {
            return placeholder_stack(view, ctx, BackgroundStatus::TimedOut);
        }
    };

    let placement = fit_placement(ctx.viewport, photo.width, photo.height);
    let layers = vec![
        BackgroundLayer {
            kind: BackgroundKind::Texture,
            placement,
            photo: Some(Arc::clone(&photo)),
            fill: None,
            blend: BlendMode::Normal,
            opacity: 1.0,
        },
        BackgroundLayer {
            kind: BackgroundKind::ColorMask,
            placement,
            photo: Some(Arc::clone(&photo)),
            fill: Some(ctx.color),
            blend: ctx.mask_blend,
            opacity: 1.0,
        },
        BackgroundLayer {
            kind: BackgroundKind::Highlight,
            placement,
            photo: Some(photo),
            fill: None,
            blend: BlendMode::Screen,
            opacity: ctx.highlight_opacity.clamp(0.0, 1.0),
        },
    ];

    BackgroundStack {
        view,
        layers,
        status,
    }
}

fn placeholder_stack(view: View, ctx: &CompositeContext, status: BackgroundStatus) -> BackgroundStack {
    BackgroundStack {
        view,
        layers: vec![BackgroundLayer {
            kind: BackgroundKind::Placeholder,
            placement: ctx.viewport.rect(),
            photo: None,
            fill: Some(Color::PLACEHOLDER),
            blend: BlendMode::Normal,
            opacity: 1.0,
        }],
        status,
    }
}

/// Premultiplied silhouette of `photo` filled with `color`.
///
/// Each pixel carries the tint at the photograph's coverage, so transparent surroundings of a
/// cut-out garment stay untinted.
pub(crate) fn silhouette_fill(photo: &PreparedImage, color: Color) -> Vec<u8> {
    let c = color.to_premul();
    let mut out = Vec::with_capacity(photo.rgba8_premul.len());
    for px in photo.rgba8_premul.chunks_exact(4) {
        let a = u16::from(px[3]);
        for ch in c {
            out.push(crate::foundation::math::mul_div255_u8(u16::from(ch), a));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
