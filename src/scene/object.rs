use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::foundation::error::{DrapeError, DrapeResult};

/// Session-unique identity of a design object.
///
/// Identity survives edits and view switches; duplicates always receive a fresh id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Placement of an object: center point, non-uniform scale and rotation around the center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    /// Center in viewport units.
    pub position: Point,
    /// Scale factors applied to the intrinsic size.
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation_deg: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "one")]
    pub opacity: f64,
}

fn unit_scale() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

fn one() -> f64 {
    1.0
}

impl Geometry {
    /// Unscaled, unrotated, opaque placement centered on `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            scale: unit_scale(),
            rotation_deg: 0.0,
            opacity: 1.0,
        }
    }

    /// Affine mapping object-local coordinates (origin at the object center) to viewport units.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// CSS-like font style of a text object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic face.
    Italic,
    /// Slanted upright face.
    Oblique,
}

impl FontStyle {
    /// CSS keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }
}

impl FromStr for FontStyle {
    type Err = DrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "" => Ok(FontStyle::Normal),
            "italic" => Ok(FontStyle::Italic),
            "oblique" => Ok(FontStyle::Oblique),
            other => Err(DrapeError::validation(format!(
                "unknown font style '{other}'"
            ))),
        }
    }
}

/// Typography and fill of a text object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in viewport units.
    pub font_size: f64,
    /// CSS weight (`"400"`, `"700"`, `"bold"`, ...).
    pub font_weight: String,
    /// Upright/italic.
    #[serde(default)]
    pub font_style: FontStyle,
    /// Extra space between glyphs, in thousandths of an em.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Glyph fill.
    pub fill: Color,
}

/// Primitive shape kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Circle inscribed in the shape box.
    Circle,
    /// Axis-aligned rectangle filling the shape box.
    #[serde(alias = "rect")]
    Rectangle,
    /// Isosceles triangle with its apex at the top center of the shape box.
    Triangle,
}

impl FromStr for ShapeKind {
    type Err = DrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "rect" | "rectangle" => Ok(ShapeKind::Rectangle),
            "triangle" => Ok(ShapeKind::Triangle),
            other => Err(DrapeError::validation(format!("unknown shape '{other}'"))),
        }
    }
}

/// Variant payload of a design object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    /// Editable text.
    Text {
        /// Text content.
        content: String,
        /// Typography and fill.
        style: TextStyle,
    },
    /// Raster image (clipart or upload).
    Image {
        /// Asset reference the pixels come from.
        source: String,
        /// Decoded width in pixels (intrinsic width of the object).
        natural_width: u32,
        /// Decoded height in pixels (intrinsic height of the object).
        natural_height: u32,
    },
    /// Basic filled shape.
    Shape {
        /// Primitive kind.
        shape: ShapeKind,
        /// Fill color.
        fill: Color,
        /// Intrinsic width.
        width: f64,
        /// Intrinsic height.
        height: f64,
    },
}

/// A user-placed, editable element layered above the background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignObject {
    /// Stable identity.
    pub id: ObjectId,
    /// Variant payload.
    pub kind: ObjectKind,
    /// Placement.
    pub geometry: Geometry,
}

impl DesignObject {
    /// Short type tag (`"text"`, `"image"`, `"shape"`).
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Text { .. } => "text",
            ObjectKind::Image { .. } => "image",
            ObjectKind::Shape { .. } => "shape",
        }
    }

    /// Text content, for text objects.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Own fill color, for text and shape objects.
    pub fn fill(&self) -> Option<Color> {
        match &self.kind {
            ObjectKind::Text { style, .. } => Some(style.fill),
            ObjectKind::Shape { fill, .. } => Some(*fill),
            ObjectKind::Image { .. } => None,
        }
    }

    /// Unscaled size in viewport units.
    ///
    /// Text is measured with an average glyph advance since exact shaping happens at raster
    /// time.
    pub fn intrinsic_size(&self) -> (f64, f64) {
        match &self.kind {
            ObjectKind::Text { content, style } => {
                let glyphs = content.chars().count().max(1) as f64;
                let spacing = style.letter_spacing / 1000.0 * style.font_size;
                let w = glyphs * (style.font_size * 0.6 + spacing);
                (w.max(1.0), style.font_size * 1.2)
            }
            ObjectKind::Image {
                natural_width,
                natural_height,
                ..
            } => (f64::from(*natural_width), f64::from(*natural_height)),
            ObjectKind::Shape { width, height, .. } => (*width, *height),
        }
    }

    /// Axis-aligned bounds of the transformed object in viewport units.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.intrinsic_size();
        let local = Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0);
        self.geometry.transform().transform_rect_bbox(local)
    }

    /// Return `true` when `p` lies inside the object's transformed box.
    pub fn contains(&self, p: Point) -> bool {
        let (w, h) = self.intrinsic_size();
        let local = self.geometry.transform().inverse() * p;
        local.x.abs() <= w / 2.0 && local.y.abs() <= h / 2.0
    }

    /// Check the invariants every drawable object holds: finite placement, positive scale,
    /// positive text size and shape box.
    pub fn validate(&self) -> DrapeResult<()> {
        let g = &self.geometry;
        for update in [
            PropertyUpdate::Position(g.position),
            PropertyUpdate::ScaleX(g.scale.x),
            PropertyUpdate::ScaleY(g.scale.y),
            PropertyUpdate::Rotation(g.rotation_deg),
            PropertyUpdate::Opacity(g.opacity),
        ] {
            update.validate()?;
        }
        match &self.kind {
            ObjectKind::Text { style, .. } => {
                PropertyUpdate::FontSize(style.font_size).validate()?;
                PropertyUpdate::LetterSpacing(style.letter_spacing).validate()
            }
            ObjectKind::Shape { width, height, .. } => {
                if width.is_finite() && height.is_finite() && *width > 0.0 && *height > 0.0 {
                    Ok(())
                } else {
                    Err(DrapeError::validation("shape size must be finite and > 0"))
                }
            }
            ObjectKind::Image { .. } => Ok(()),
        }
    }

    /// Scale uniformly so the rendered width equals `width`.
    pub fn scale_to_width(&mut self, width: f64) {
        let (w, _) = self.intrinsic_size();
        if w > 0.0 && width.is_finite() && width > 0.0 {
            let s = width / w;
            self.geometry.scale = Vec2::new(s, s);
        }
    }
}

/// Configuration for a new text object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextConfig {
    /// Text content.
    pub text: String,
    /// Font family.
    pub font_family: String,
    /// Font size.
    pub font_size: f64,
    /// CSS weight.
    pub font_weight: String,
    /// Upright/italic.
    pub font_style: FontStyle,
    /// Letter spacing in thousandths of an em.
    pub letter_spacing: f64,
    /// Fill color.
    pub fill: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            text: "YOUR TEXT".to_string(),
            font_family: "Inter".to_string(),
            font_size: 32.0,
            font_weight: "700".to_string(),
            font_style: FontStyle::Normal,
            letter_spacing: 0.0,
            fill: Color::BLACK,
        }
    }
}

impl TextConfig {
    /// Default styling with custom content.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_kind(self) -> DrapeResult<ObjectKind> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(DrapeError::validation("font size must be finite and > 0"));
        }
        if !self.letter_spacing.is_finite() {
            return Err(DrapeError::validation("letter spacing must be finite"));
        }
        Ok(ObjectKind::Text {
            content: self.text,
            style: TextStyle {
                font_family: self.font_family,
                font_size: self.font_size,
                font_weight: self.font_weight,
                font_style: self.font_style,
                letter_spacing: self.letter_spacing,
                fill: self.fill,
            },
        })
    }
}

impl ShapeKind {
    pub(crate) fn default_kind(self) -> ObjectKind {
        ObjectKind::Shape {
            shape: self,
            fill: Color::INK,
            width: 100.0,
            height: 100.0,
        }
    }
}

/// A single property edit applied to the active selection.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyUpdate {
    /// Fill of text or shape objects.
    Fill(Color),
    /// Text content.
    Text(String),
    /// Font family.
    FontFamily(String),
    /// Font size.
    FontSize(f64),
    /// CSS font weight.
    FontWeight(String),
    /// Font style.
    FontStyle(FontStyle),
    /// Letter spacing in thousandths of an em.
    LetterSpacing(f64),
    /// Center position.
    Position(Point),
    /// Horizontal center coordinate.
    Left(f64),
    /// Vertical center coordinate.
    Top(f64),
    /// Horizontal scale.
    ScaleX(f64),
    /// Vertical scale.
    ScaleY(f64),
    /// Rotation in degrees.
    Rotation(f64),
    /// Opacity in `[0, 1]`.
    Opacity(f64),
}

impl PropertyUpdate {
    /// Build an update from a UI property name and JSON value.
    ///
    /// Accepts the canvas property names used by the design UI (`fill`, `text`, `fontFamily`,
    /// `fontSize`, `fontWeight`, `fontStyle`, `charSpacing`, `left`, `top`, `scaleX`, `scaleY`,
    /// `angle`, `opacity`).
    pub fn from_name_value(name: &str, value: &serde_json::Value) -> DrapeResult<Self> {
        fn num(name: &str, v: &serde_json::Value) -> DrapeResult<f64> {
            let n = match v {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            n.filter(|n| n.is_finite())
                .ok_or_else(|| DrapeError::validation(format!("'{name}' expects a number")))
        }
        fn string(name: &str, v: &serde_json::Value) -> DrapeResult<String> {
            match v {
                serde_json::Value::String(s) => Ok(s.clone()),
                serde_json::Value::Number(n) => Ok(n.to_string()),
                _ => Err(DrapeError::validation(format!("'{name}' expects a string"))),
            }
        }

        let update = match name {
            "fill" => PropertyUpdate::Fill(Color::from_hex(&string(name, value)?)?),
            "text" => PropertyUpdate::Text(string(name, value)?),
            "fontFamily" => PropertyUpdate::FontFamily(string(name, value)?),
            "fontSize" => PropertyUpdate::FontSize(num(name, value)?),
            "fontWeight" => PropertyUpdate::FontWeight(string(name, value)?),
            "fontStyle" => PropertyUpdate::FontStyle(string(name, value)?.parse()?),
            "charSpacing" | "letterSpacing" => PropertyUpdate::LetterSpacing(num(name, value)?),
            "left" => PropertyUpdate::Left(num(name, value)?),
            "top" => PropertyUpdate::Top(num(name, value)?),
            "scaleX" => PropertyUpdate::ScaleX(num(name, value)?),
            "scaleY" => PropertyUpdate::ScaleY(num(name, value)?),
            "angle" | "rotation" => PropertyUpdate::Rotation(num(name, value)?),
            "opacity" => PropertyUpdate::Opacity(num(name, value)?),
            other => {
                return Err(DrapeError::validation(format!(
                    "unknown property '{other}'"
                )));
            }
        };
        update.validate()?;
        Ok(update)
    }

    /// Reject non-finite or out-of-range values.
    pub fn validate(&self) -> DrapeResult<()> {
        let finite = |v: f64, what: &str| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(DrapeError::validation(format!("{what} must be finite")))
            }
        };
        match self {
            PropertyUpdate::FontSize(v) if !(v.is_finite() && *v > 0.0) => Err(
                DrapeError::validation("font size must be finite and > 0"),
            ),
            PropertyUpdate::ScaleX(v) | PropertyUpdate::ScaleY(v)
                if !(v.is_finite() && *v > 0.0) =>
            {
                Err(DrapeError::validation("scale must be finite and > 0"))
            }
            PropertyUpdate::LetterSpacing(v) => finite(*v, "letter spacing"),
            PropertyUpdate::Left(v) | PropertyUpdate::Top(v) => finite(*v, "position"),
            PropertyUpdate::Position(p) => {
                finite(p.x, "position")?;
                finite(p.y, "position")
            }
            PropertyUpdate::Rotation(v) => finite(*v, "rotation"),
            PropertyUpdate::Opacity(v) => finite(*v, "opacity"),
            _ => Ok(()),
        }
    }

    /// Apply to `obj`; returns `false` when the property does not exist on that object type.
    pub(crate) fn apply(&self, obj: &mut DesignObject) -> bool {
        let geom = &mut obj.geometry;
        match (self, &mut obj.kind) {
            (PropertyUpdate::Fill(c), ObjectKind::Text { style, .. }) => style.fill = *c,
            (PropertyUpdate::Fill(c), ObjectKind::Shape { fill, .. }) => *fill = *c,
            (PropertyUpdate::Text(t), ObjectKind::Text { content, .. }) => content.clone_from(t),
            (PropertyUpdate::FontFamily(f), ObjectKind::Text { style, .. }) => {
                style.font_family.clone_from(f);
            }
            (PropertyUpdate::FontSize(s), ObjectKind::Text { style, .. }) => style.font_size = *s,
            (PropertyUpdate::FontWeight(w), ObjectKind::Text { style, .. }) => {
                style.font_weight.clone_from(w);
            }
            (PropertyUpdate::FontStyle(s), ObjectKind::Text { style, .. }) => style.font_style = *s,
            (PropertyUpdate::LetterSpacing(s), ObjectKind::Text { style, .. }) => {
                style.letter_spacing = *s;
            }
            (PropertyUpdate::Position(p), _) => geom.position = *p,
            (PropertyUpdate::Left(x), _) => geom.position.x = *x,
            (PropertyUpdate::Top(y), _) => geom.position.y = *y,
            (PropertyUpdate::ScaleX(s), _) => geom.scale.x = *s,
            (PropertyUpdate::ScaleY(s), _) => geom.scale.y = *s,
            (PropertyUpdate::Rotation(r), _) => geom.rotation_deg = *r,
            (PropertyUpdate::Opacity(o), _) => geom.opacity = o.clamp(0.0, 1.0),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
