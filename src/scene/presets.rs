//! Ready-made text styles, quotes and palettes offered by the design UI.

use crate::assets::color::Color;
use crate::scene::object::{FontStyle, ShapeKind, TextConfig};

/// A named text configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPreset {
    /// Display name (the sample text for quotes).
    pub name: &'static str,
    /// Configuration passed to `add_text`.
    pub config: TextConfig,
}

fn combo(
    name: &'static str,
    text: &str,
    family: &str,
    size: f64,
    weight: &str,
    style: FontStyle,
    spacing: f64,
) -> TextPreset {
    TextPreset {
        name,
        config: TextConfig {
            text: text.to_string(),
            font_family: family.to_string(),
            font_size: size,
            font_weight: weight.to_string(),
            font_style: style,
            letter_spacing: spacing,
            ..TextConfig::default()
        },
    }
}

/// Font combinations, in UI order.
pub fn font_combinations() -> Vec<TextPreset> {
    use FontStyle::{Italic, Normal};
    vec![
        combo("Vintage Sport", "VARSITY", "Bebas Neue", 60.0, "900", Italic, 0.0),
        combo("Modern Minimal", "ESSENTIALS", "Inter", 40.0, "400", Normal, 10.0),
        combo("Bold Street", "CREATIVE", "Montserrat", 45.0, "900", Normal, 0.0),
        combo("Classic Serif", "ESTABLISHED", "Playfair Display", 35.0, "700", Italic, 0.0),
        combo("Retro Wave", "RADICAL", "Courier New", 40.0, "bold", Normal, 0.0),
        combo("Luxury Edge", "PREMIUM", "Inter", 30.0, "900", Normal, 15.0),
    ]
}

/// Ready quotes: default typography with a per-quote fill.
pub fn quotes() -> Vec<TextPreset> {
    [
        ("BURN FOR WHAT YOU LOVE", Color::rgb(0xdc, 0x26, 0x26)),
        ("DON'T LIVE IN A COMFORT ZONE", Color::rgb(0x25, 0x63, 0xeb)),
        ("BETTER AN OOPS THAN WHAT IF", Color::rgb(0x16, 0xa3, 0x4a)),
        ("CONSISTENCY IS KEY", Color::INK),
        ("STAY REAL", Color::rgb(0xff, 0x4d, 0x00)),
        ("LIMITLESS", Color::rgb(0x8b, 0x5c, 0xf6)),
    ]
    .into_iter()
    .map(|(text, fill)| TextPreset {
        name: text,
        config: TextConfig {
            fill,
            ..TextConfig::new(text)
        },
    })
    .collect()
}

/// Look up a font combination or quote by name (case-insensitive).
pub fn find_text_preset(name: &str) -> Option<TextPreset> {
    let needle = name.trim();
    font_combinations()
        .into_iter()
        .chain(quotes())
        .find(|p| p.name.eq_ignore_ascii_case(needle))
}

/// Shapes of the basic-shapes palette.
pub const BASIC_SHAPES: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Rectangle, ShapeKind::Triangle];

/// Swatches offered for object fills.
pub const FILL_SWATCHES: [Color; 14] = [
    Color::WHITE,
    Color::BLACK,
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x80, 0x80, 0x80),
    Color::rgb(0xff, 0xa5, 0x00),
    Color::rgb(0x80, 0x00, 0x80),
    Color::rgb(0x00, 0x80, 0x00),
    Color::rgb(0x00, 0x00, 0x80),
    Color::rgb(0x80, 0x00, 0x00),
];

#[cfg(test)]
#[path = "../../tests/unit/scene/presets.rs"]
mod tests;
