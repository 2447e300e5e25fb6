use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use resvg::tiny_skia;

use crate::foundation::error::{DrapeError, DrapeResult};
use crate::scene::object::TextStyle;

/// Lazily built font database shared by every text rasterization of a session.
#[derive(Debug)]
pub(crate) struct FontBook {
    load_system_fonts: bool,
    font_dirs: Vec<PathBuf>,
    db: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl FontBook {
    pub(crate) fn new(load_system_fonts: bool, font_dirs: Vec<PathBuf>) -> Self {
        Self {
            load_system_fonts,
            font_dirs,
            db: OnceLock::new(),
        }
    }

    pub(crate) fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(self.db.get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            if self.load_system_fonts {
                db.load_system_fonts();
            }
            for dir in &self.font_dirs {
                load_fonts_from_dir(&mut db, dir);
            }
            tracing::debug!(faces = db.len(), "font database ready");
            Arc::new(db)
        }))
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Local text box used to rasterize a text object: `(width, height)` of the SVG document whose
/// center is the text anchor.
fn text_box(content: &str, style: &TextStyle) -> (f64, f64) {
    let glyphs = content.chars().count().max(1) as f64;
    let spacing = (style.letter_spacing / 1000.0 * style.font_size).max(0.0);
    let w = glyphs * (style.font_size + spacing) * 2.0 + style.font_size * 2.0;
    let h = style.font_size * 3.0;
    (w, h)
}

pub(crate) fn text_svg(content: &str, style: &TextStyle, opacity: f64) -> (String, f64, f64) {
    let (w, h) = text_box(content, style);
    let fill = style.fill;
    let letter_spacing = style.letter_spacing / 1000.0 * style.font_size;
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" "#,
            r#"font-family="{family}" font-size="{size}" font-weight="{weight}" font-style="{fstyle}" "#,
            r#"letter-spacing="{spacing}" fill="{fill}" fill-opacity="{fill_alpha}" opacity="{opacity}">"#,
            "{content}</text></svg>"
        ),
        w = w,
        h = h,
        cx = w / 2.0,
        cy = h / 2.0,
        family = escape_xml(&style.font_family),
        size = style.font_size,
        weight = escape_xml(&style.font_weight),
        fstyle = style.font_style.as_css(),
        spacing = letter_spacing,
        fill = fill.to_hex().get(..7).unwrap_or("#000000"),
        fill_alpha = f64::from(fill.a) / 255.0,
        opacity = opacity.clamp(0.0, 1.0),
        content = escape_xml(content),
    );
    (svg, w, h)
}

/// Draw `content` centered on the local origin of `transform`.
pub(crate) fn draw_text(
    pixmap: &mut tiny_skia::Pixmap,
    fonts: &FontBook,
    content: &str,
    style: &TextStyle,
    opacity: f64,
    transform: tiny_skia::Transform,
) -> DrapeResult<()> {
    if content.trim().is_empty() {
        return Ok(());
    }
    let (svg, w, h) = text_svg(content, style, opacity);
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        tracing::debug!(font_size = style.font_size, "skipping degenerate text box");
        return Ok(());
    }
    let opts = usvg::Options {
        fontdb: fonts.database(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| DrapeError::render(format!("build text tree: {e}")))?;

    let xform = transform.pre_translate((-w / 2.0) as f32, (-h / 2.0) as f32);
    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(())
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
