use serde::{Deserialize, Serialize};

use crate::foundation::error::{DrapeError, DrapeResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Separable blend modes used by background layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Darkening multiply; keeps the shading of what is below.
    #[serde(alias = "hue")]
    Multiply,
    /// Lightening screen.
    Screen,
}

/// Source-over with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let Some((src, sa)) = scale_src(src, opacity) else {
        return dst;
    };
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Multiply blend: `Sc*Dc + Sc*(1-Da) + Dc*(1-Sa)`.
pub fn multiply(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let Some((src, sa)) = scale_src(src, opacity) else {
        return dst;
    };
    let da = dst[3];
    let inv_sa = 255u16 - u16::from(sa);
    let inv_da = 255u16 - u16::from(da);

    let mut out = [0u8; 4];
    out[3] = union_alpha(sa, da);
    for i in 0..3 {
        let sc = u16::from(src[i]);
        let dc = u16::from(dst[i]);
        let v = u16::from(mul_div255(sc, dc))
            + u16::from(mul_div255(sc, inv_da))
            + u16::from(mul_div255(dc, inv_sa));
        out[i] = v.min(u16::from(out[3])) as u8;
    }
    out
}

/// Screen blend: `Sc + Dc - Sc*Dc`.
pub fn screen(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let Some((src, sa)) = scale_src(src, opacity) else {
        return dst;
    };
    let da = dst[3];

    let mut out = [0u8; 4];
    out[3] = union_alpha(sa, da);
    for i in 0..3 {
        let sc = u16::from(src[i]);
        let dc = u16::from(dst[i]);
        let v = (sc + dc).saturating_sub(u16::from(mul_div255(sc, dc)));
        out[i] = v.min(u16::from(out[3])) as u8;
    }
    out
}

/// Blend one pixel with `mode`.
pub fn blend(mode: BlendMode, dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => over(dst, src, opacity),
        BlendMode::Multiply => multiply(dst, src, opacity),
        BlendMode::Screen => screen(dst, src, opacity),
    }
}

/// Blend a whole premultiplied RGBA8 buffer onto another of equal size.
pub fn blend_in_place(
    mode: BlendMode,
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
) -> DrapeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DrapeError::render(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend(mode, [d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Apply layer opacity to a source pixel; `None` when it contributes nothing.
fn scale_src(src: PremulRgba8, opacity: f32) -> Option<(PremulRgba8, u8)> {
    if opacity <= 0.0 || src[3] == 0 {
        return None;
    }
    let op = unit_to_u8(opacity);
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return None;
    }
    Some((
        [
            mul_div255(u16::from(src[0]), op),
            mul_div255(u16::from(src[1]), op),
            mul_div255(u16::from(src[2]), op),
            sa,
        ],
        sa,
    ))
}

fn union_alpha(sa: u8, da: u8) -> u8 {
    let v = u16::from(sa) + u16::from(da) - u16::from(mul_div255(u16::from(sa), u16::from(da)));
    v.min(255) as u8
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
