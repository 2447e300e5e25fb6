use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::error::{DrapeError, DrapeResult};
use crate::scene::view::View;

/// Per-view background photograph references of a product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViews {
    /// Front photograph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    /// Back photograph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    /// Left sleeve photograph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_sleeve: Option<String>,
    /// Right sleeve photograph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_sleeve: Option<String>,
    /// Inside label photograph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inside_label: Option<String>,
    /// Outside label photograph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outside_label: Option<String>,
}

impl ProductViews {
    /// Reference registered for `view`, ignoring blank entries.
    pub fn get(&self, view: View) -> Option<&str> {
        let slot = match view {
            View::Front => &self.front,
            View::Back => &self.back,
            View::LeftSleeve => &self.left_sleeve,
            View::RightSleeve => &self.right_sleeve,
            View::InsideLabel => &self.inside_label,
            View::OutsideLabel => &self.outside_label,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Set or clear the reference for `view`.
    pub fn set(&mut self, view: View, reference: Option<String>) {
        let slot = match view {
            View::Front => &mut self.front,
            View::Back => &mut self.back,
            View::LeftSleeve => &mut self.left_sleeve,
            View::RightSleeve => &mut self.right_sleeve,
            View::InsideLabel => &mut self.inside_label,
            View::OutsideLabel => &mut self.outside_label,
        };
        *slot = reference;
    }
}

/// Catalog product descriptor consumed read-only by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Marketing description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Catalog category.
    #[serde(default)]
    pub category: String,
    /// Selectable tints, in display order, as the catalog writes them (hex or CSS keyword).
    #[serde(default)]
    pub colors: Vec<String>,
    /// Selectable sizes, in display order.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Gallery images; the first one doubles as the Front photograph.
    #[serde(default)]
    pub images: Vec<String>,
    /// Per-view photographs.
    #[serde(default)]
    pub views: ProductViews,
    /// Whether the product may be opened in the design canvas.
    #[serde(default = "default_customizable")]
    pub customizable: bool,
}

fn default_customizable() -> bool {
    true
}

impl Product {
    /// Parse a catalog JSON record.
    pub fn from_json(s: &str) -> DrapeResult<Self> {
        let product: Self = serde_json::from_str(s)?;
        product.validate()?;
        Ok(product)
    }

    /// Read and parse a catalog JSON record from disk.
    pub fn from_path(path: impl AsRef<Path>) -> DrapeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read product json '{}'", path.display()))?;
        Self::from_json(&s)
    }

    /// Check the descriptor carries enough data to open a design session.
    pub fn validate(&self) -> DrapeResult<()> {
        if self.id.trim().is_empty() {
            return Err(DrapeError::validation("product id must be non-empty"));
        }
        if self.title.trim().is_empty() {
            return Err(DrapeError::validation("product title must be non-empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DrapeError::validation(
                "product price must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Photograph reference for `view`.
    ///
    /// Only the Front view falls back to the first gallery image.
    pub fn view_image(&self, view: View) -> Option<&str> {
        self.views.get(view).or_else(|| match view {
            View::Front => self
                .images
                .first()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty()),
            _ => None,
        })
    }

    /// Catalog colors that parse, in display order; the rest are skipped with a warning.
    pub fn palette(&self) -> Vec<Color> {
        self.colors
            .iter()
            .filter_map(|raw| match Color::from_css(raw) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(
                        product = %self.id,
                        color = %raw,
                        error = %e,
                        "skipping unparseable catalog color"
                    );
                    None
                }
            })
            .collect()
    }

    /// Initial product tint: the first catalog color that parses, else white.
    pub fn default_color(&self) -> Color {
        self.colors
            .iter()
            .find_map(|raw| Color::from_css(raw).ok())
            .unwrap_or(Color::WHITE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/product.rs"]
mod tests;
