use std::sync::Arc;

use crate::assets::color::Color;
use crate::assets::decode::PreparedImage;
use crate::foundation::core::Rect;
use crate::render::composite::BlendMode;
use crate::scene::view::View;

/// Role of a system-owned background layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackgroundKind {
    /// The product photograph, fitted into the viewport.
    Texture,
    /// Product tint over the photograph's silhouette.
    ColorMask,
    /// Low-opacity lightening copy of the photograph.
    Highlight,
    /// Neutral stand-in when a view has no usable photograph.
    Placeholder,
}

/// Why a background stack looks the way it does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundStatus {
    /// Photograph fetched and decoded.
    Loaded,
    /// The product has no photograph for this view.
    Missing,
    /// Fetch or decode failed; the message is kept for diagnostics.
    Failed(String),
    /// The load did not finish within the configured timeout.
    TimedOut,
}

/// A non-interactive compositing layer.
///
/// Layers are never selectable, never hit-tested and never serialized with design objects;
/// they only take part in rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundLayer {
    /// Layer role.
    pub kind: BackgroundKind,
    /// Destination rectangle in viewport units.
    pub placement: Rect,
    /// Photograph pixels (texture, highlight) or silhouette source (color mask).
    pub photo: Option<Arc<PreparedImage>>,
    /// Solid fill (color mask, placeholder).
    pub fill: Option<Color>,
    /// How the layer combines with what is below.
    pub blend: BlendMode,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f32,
}

/// The ordered background layers of one view, bottom first.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStack {
    pub(crate) view: View,
    pub(crate) layers: Vec<BackgroundLayer>,
    pub(crate) status: BackgroundStatus,
}

impl BackgroundStack {
    /// View the stack was built for.
    pub fn view(&self) -> View {
        self.view
    }

    /// Layers, bottom first.
    pub fn layers(&self) -> &[BackgroundLayer] {
        &self.layers
    }

    /// Load status of the photograph.
    pub fn status(&self) -> &BackgroundStatus {
        &self.status
    }

    /// First layer of `kind`.
    pub fn layer(&self, kind: BackgroundKind) -> Option<&BackgroundLayer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    /// Current tint of the color mask, if the stack has one.
    pub fn mask_fill(&self) -> Option<Color> {
        self.layer(BackgroundKind::ColorMask).and_then(|l| l.fill)
    }

    /// Return `true` when the stack stands in for a missing or failed photograph.
    pub fn is_placeholder(&self) -> bool {
        self.layer(BackgroundKind::Placeholder).is_some()
    }

    /// Photograph backing the texture layer.
    pub fn photo(&self) -> Option<&Arc<PreparedImage>> {
        self.layer(BackgroundKind::Texture)
            .and_then(|l| l.photo.as_ref())
    }

    /// Retint the color mask in place; returns `false` when there is no mask.
    pub(crate) fn set_mask_fill(&mut self, color: Color) -> bool {
        match self
            .layers
            .iter_mut()
            .find(|l| l.kind == BackgroundKind::ColorMask)
        {
            Some(layer) => {
                layer.fill = Some(color);
                true
            }
            None => false,
        }
    }
}
