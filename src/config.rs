use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::{Vec2, Viewport};
use crate::foundation::error::{DrapeError, DrapeResult};
use crate::render::composite::BlendMode;
use crate::render::compositor::CompositeContext;

/// Engine-wide settings of a design session.
///
/// Every field has a default matching the stock product customizer, so an empty JSON object is
/// a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Design viewport shared by all views.
    pub viewport: Viewport,
    /// Base joined onto relative asset references.
    pub asset_base_url: String,
    /// Offset applied to duplicated objects.
    pub duplicate_offset: Vec2,
    /// Opacity of the highlight layer.
    pub highlight_opacity: f32,
    /// Blend mode of the color mask.
    pub mask_blend: BlendMode,
    /// Resolution multiplier of scene-store thumbnails.
    pub preview_multiplier: f64,
    /// Default export resolution multiplier.
    pub export_multiplier: f64,
    /// Upper bound on one view's background load, in milliseconds.
    pub load_timeout_ms: u64,
    /// Initial display width of clipart images.
    pub clipart_width: f64,
    /// Initial display width of uploaded images.
    pub upload_width: f64,
    /// Leave views with no photograph and no objects out of batch exports.
    pub skip_empty_views: bool,
    /// Extra font directories (`.ttf`, `.otf`, `.ttc`).
    pub font_dirs: Vec<PathBuf>,
    /// Also load the fonts installed on the system.
    pub load_system_fonts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            asset_base_url: "http://localhost:5000".to_string(),
            duplicate_offset: Vec2::new(20.0, 20.0),
            highlight_opacity: 0.3,
            mask_blend: BlendMode::Multiply,
            preview_multiplier: 0.2,
            export_multiplier: 2.0,
            load_timeout_ms: 10_000,
            clipart_width: 120.0,
            upload_width: 150.0,
            skip_empty_views: false,
            font_dirs: Vec::new(),
            load_system_fonts: true,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(s: &str) -> DrapeResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| DrapeError::validation(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DrapeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config '{}'", path.display()))?;
        Self::from_json(&s)
    }

    /// Reject settings no session can run with.
    pub fn validate(&self) -> DrapeResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        if !(0.0..=1.0).contains(&self.highlight_opacity) {
            return Err(DrapeError::validation("highlightOpacity must be in [0, 1]"));
        }
        for (name, v) in [
            ("previewMultiplier", self.preview_multiplier),
            ("exportMultiplier", self.export_multiplier),
            ("clipartWidth", self.clipart_width),
            ("uploadWidth", self.upload_width),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(DrapeError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.duplicate_offset.is_finite() {
            return Err(DrapeError::validation("duplicateOffset must be finite"));
        }
        if self.load_timeout_ms == 0 {
            return Err(DrapeError::validation("loadTimeoutMs must be > 0"));
        }
        Ok(())
    }

    /// Load timeout as a duration.
    pub fn load_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.load_timeout_ms)
    }

    pub(crate) fn composite_context(&self, color: Color) -> CompositeContext {
        CompositeContext {
            viewport: self.viewport,
            color,
            mask_blend: self.mask_blend,
            highlight_opacity: self.highlight_opacity,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
