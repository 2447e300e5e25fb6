use crate::foundation::error::{DrapeError, DrapeResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Fixed design viewport in viewport units.
///
/// Every view of a product is edited on a viewport of the same dimensions; exports scale it by a
/// resolution multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in viewport units.
    pub width: u32,
    /// Height in viewport units.
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 500,
            height: 580,
        }
    }
}

impl Viewport {
    /// Create a validated viewport with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> DrapeResult<Self> {
        if width == 0 || height == 0 {
            return Err(DrapeError::validation("viewport dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Center point of the viewport.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Full viewport rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Pixel dimensions of a raster of this viewport at `multiplier`.
    ///
    /// Each side is rounded and clamped to at least one pixel.
    pub fn scaled_px(self, multiplier: f64) -> DrapeResult<(u32, u32)> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(DrapeError::validation(
                "resolution multiplier must be finite and > 0",
            ));
        }
        let w = (f64::from(self.width) * multiplier).round().max(1.0);
        let h = (f64::from(self.height) * multiplier).round().max(1.0);

        const MAX_DIM: f64 = 16_384.0;
        if w > MAX_DIM || h > MAX_DIM {
            return Err(DrapeError::validation(format!(
                "raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        Ok((w as u32, h as u32))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
