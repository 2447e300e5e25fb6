use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{DrapeError, DrapeResult};
use crate::render::raster::Raster;
use crate::scene::view::View;

/// Configuration provided to an [`ArchiveSink`] before the first view is pushed.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveConfig {
    /// Product the views belong to.
    pub product_id: String,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Resolution multiplier the rasters were rendered at.
    pub multiplier: f64,
}

/// Sink contract for a multi-view export.
///
/// Ordering contract: `push_view` is called at most once per view, in the fixed view order.
pub trait ArchiveSink {
    /// Called once before any view is pushed.
    fn begin(&mut self, cfg: ArchiveConfig) -> DrapeResult<()>;
    /// Store the raster of one view.
    fn push_view(&mut self, view: View, raster: &Raster) -> DrapeResult<()>;
    /// Called once after the last view is pushed.
    fn end(&mut self) -> DrapeResult<()>;
    /// Called instead of `end` when the export fails part-way; the archive is incomplete.
    fn abort(&mut self) {}
}

/// Archive member name of a view's PNG (`front.png`, `left_sleeve.png`, ...).
pub fn entry_name(view: View) -> String {
    format!("{}.png", view.file_stem())
}

/// In-memory archive for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    cfg: Option<ArchiveConfig>,
    entries: Vec<(View, Raster)>,
}

impl InMemoryArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&ArchiveConfig> {
        self.cfg.as_ref()
    }

    /// Captured rasters in push order.
    pub fn entries(&self) -> &[(View, Raster)] {
        &self.entries
    }

    /// Views in push order.
    pub fn views(&self) -> Vec<View> {
        self.entries.iter().map(|(v, _)| *v).collect()
    }

    /// Raster of `view`.
    pub fn get(&self, view: View) -> Option<&Raster> {
        self.entries
            .iter()
            .find_map(|(v, r)| (*v == view).then_some(r))
    }

    /// Encode the captured rasters as a zip of PNGs.
    pub fn to_zip_bytes(&self) -> DrapeResult<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (view, raster) in &self.entries {
            write_png_entry(&mut zip, *view, raster)?;
        }
        let cursor = zip
            .finish()
            .context("finish zip archive")
            .map_err(|e| DrapeError::render(format!("{e:#}")))?;
        Ok(cursor.into_inner())
    }
}

impl ArchiveSink for InMemoryArchive {
    fn begin(&mut self, cfg: ArchiveConfig) -> DrapeResult<()> {
        self.cfg = Some(cfg);
        self.entries.clear();
        Ok(())
    }

    fn push_view(&mut self, view: View, raster: &Raster) -> DrapeResult<()> {
        self.entries.push((view, raster.clone()));
        Ok(())
    }

    fn end(&mut self) -> DrapeResult<()> {
        Ok(())
    }
}

/// Writes each view as a PNG member of a zip file on disk.
pub struct ZipArchiveSink {
    path: PathBuf,
    writer: Option<zip::ZipWriter<BufWriter<File>>>,
    written: usize,
}

impl ZipArchiveSink {
    /// Sink writing to `path` (created or truncated in `begin`).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            written: 0,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of members written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl std::fmt::Debug for ZipArchiveSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipArchiveSink")
            .field("path", &self.path)
            .field("open", &self.writer.is_some())
            .field("written", &self.written)
            .finish()
    }
}

impl ArchiveSink for ZipArchiveSink {
    fn begin(&mut self, _cfg: ArchiveConfig) -> DrapeResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("create archive '{}'", self.path.display()))?;
        self.writer = Some(zip::ZipWriter::new(BufWriter::new(file)));
        self.written = 0;
        Ok(())
    }

    fn push_view(&mut self, view: View, raster: &Raster) -> DrapeResult<()> {
        let zip = self
            .writer
            .as_mut()
            .ok_or_else(|| DrapeError::render("zip archive used before begin"))?;
        write_png_entry(zip, view, raster)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> DrapeResult<()> {
        let zip = self
            .writer
            .take()
            .ok_or_else(|| DrapeError::render("zip archive ended before begin"))?;
        let mut out = zip
            .finish()
            .context("finish zip archive")
            .map_err(|e| DrapeError::render(format!("{e:#}")))?;
        out.flush()
            .with_context(|| format!("flush archive '{}'", self.path.display()))?;
        tracing::info!(path = %self.path.display(), views = self.written, "archive written");
        Ok(())
    }

    fn abort(&mut self) {
        // Dropping the writer finalizes a partial archive, so the file is removed afterwards.
        if self.writer.take().is_none() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::warn!(path = %self.path.display(), "removed incomplete archive"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "could not remove incomplete archive"
            ),
        }
        self.written = 0;
    }
}

fn write_png_entry<W: Write + Seek>(
    zip: &mut zip::ZipWriter<W>,
    view: View,
    raster: &Raster,
) -> DrapeResult<()> {
    let png = raster.to_png()?;
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    let name = entry_name(view);
    zip.start_file(name.as_str(), options)
        .with_context(|| format!("start zip member '{name}'"))
        .map_err(|e| DrapeError::render(format!("{e:#}")))?;
    zip.write_all(&png)
        .with_context(|| format!("write zip member '{name}'"))
        .map_err(|e| DrapeError::render(format!("{e:#}")))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/archive.rs"]
mod tests;
