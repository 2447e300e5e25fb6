use anyhow::Context;
use image::ImageEncoder;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{DrapeError, DrapeResult};

/// A rendered canvas as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha**; [`Raster::to_png`] converts to straight alpha on the way
/// out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, premultiplied.
    pub data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> DrapeResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| DrapeError::render("raster size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Premultiplied RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Return `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Encode as a straight-alpha PNG.
    pub fn to_png(&self) -> DrapeResult<Vec<u8>> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);

        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(
                &straight,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .context("encode png")
            .map_err(|e| DrapeError::render(format!("{e:#}")))?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
