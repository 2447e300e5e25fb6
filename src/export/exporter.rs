//! Single-view and batch raster export.
//!
//! A batch export drives the view controller through every view in the fixed order, waits for
//! each switch to reach idle (bounded by a timeout), rasterizes the canvas and hands the raster
//! to an [`ArchiveSink`]. The view active when the export started is restored afterwards, also
//! when the export fails part-way.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::export::archive::{ArchiveConfig, ArchiveSink};
use crate::foundation::error::{DrapeError, DrapeResult};
use crate::render::raster::Raster;
use crate::scene::view::View;
use crate::session::design::DesignSession;

/// Options for [`DesignSession::export_all_views`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOpts {
    /// Resolution multiplier applied to the viewport.
    pub multiplier: f64,
    /// Leave out views with no photograph and no objects.
    pub skip_empty: bool,
    /// Upper bound on each view switch.
    pub timeout: Duration,
}

impl ExportOpts {
    /// Options taken from the engine settings.
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            multiplier: cfg.export_multiplier,
            skip_empty: cfg.skip_empty_views,
            timeout: cfg.load_timeout(),
        }
    }
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Batch export statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Views in the fixed view list.
    pub views_total: usize,
    /// Rasters handed to the sink.
    pub views_written: usize,
    /// Empty views left out because of `skip_empty`.
    pub views_skipped: usize,
    /// Written views whose background is a placeholder.
    pub placeholders: usize,
}

impl DesignSession {
    /// Rasterize the active view (backgrounds and objects) at `multiplier`.
    #[tracing::instrument(level = "debug", skip(self), fields(view = ?self.active_view()))]
    pub fn export_current_view(&self, multiplier: f64) -> DrapeResult<Raster> {
        self.ensure_idle("export_current_view")?;
        self.render(multiplier)
    }

    /// Rasterize every view in the fixed order into `sink`, then restore the starting view.
    ///
    /// A view that fails to load in time aborts the export with [`DrapeError::Timeout`] after
    /// the starting view has been restored. On any failure after `begin` the sink is aborted
    /// rather than ended, so no partial archive is left behind.
    #[tracing::instrument(level = "info", skip(self, sink), fields(product = %self.product().id))]
    pub fn export_all_views(
        &mut self,
        opts: &ExportOpts,
        sink: &mut dyn ArchiveSink,
    ) -> DrapeResult<ExportStats> {
        let original = self.wait_idle(opts.timeout)?;
        let (width, height) = self.config().viewport.scaled_px(opts.multiplier)?;

        sink.begin(ArchiveConfig {
            product_id: self.product().id.clone(),
            width,
            height,
            multiplier: opts.multiplier,
        })?;

        let result = self.export_views_into(opts, sink);
        let restored = self.return_to(original, opts.timeout);

        let finished = result.and_then(|stats| {
            restored?;
            sink.end()?;
            Ok(stats)
        });
        let stats = match finished {
            Ok(stats) => stats,
            Err(e) => {
                sink.abort();
                return Err(e);
            }
        };
        tracing::info!(
            written = stats.views_written,
            skipped = stats.views_skipped,
            placeholders = stats.placeholders,
            "exported all views"
        );
        Ok(stats)
    }

    fn export_views_into(
        &mut self,
        opts: &ExportOpts,
        sink: &mut dyn ArchiveSink,
    ) -> DrapeResult<ExportStats> {
        let mut stats = ExportStats {
            views_total: View::ALL.len(),
            ..ExportStats::default()
        };

        for view in View::ALL {
            self.request_view(view)?;
            self.wait_idle(opts.timeout)?;

            let placeholder = self.backgrounds().is_none_or(|b| b.is_placeholder());
            if opts.skip_empty && placeholder && self.get_object_list().is_empty() {
                tracing::debug!(%view, "skipping empty view");
                stats.views_skipped += 1;
                continue;
            }

            let raster = self.render(opts.multiplier)?;
            sink.push_view(view, &raster)?;
            stats.views_written += 1;
            if placeholder {
                stats.placeholders += 1;
            }
        }
        Ok(stats)
    }

    fn return_to(&mut self, view: View, timeout: Duration) -> DrapeResult<()> {
        self.request_view(view)?;
        match self.wait_idle(timeout) {
            Ok(_) => Ok(()),
            Err(e @ DrapeError::Timeout { .. }) => {
                tracing::warn!(%view, error = %e, "starting view restored on a placeholder");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
