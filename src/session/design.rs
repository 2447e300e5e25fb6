use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::assets::color::Color;
use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::source::{AssetRef, AssetSource};
use crate::catalog::product::Product;
use crate::config::EngineConfig;
use crate::foundation::error::{DrapeError, DrapeResult};
use crate::render::compositor::{PhotoOutcome, build_backgrounds};
use crate::render::draw::{ImageCache, StageRenderer};
use crate::render::raster::Raster;
use crate::render::text::FontBook;
use crate::scene::background::BackgroundStack;
use crate::scene::object::{DesignObject, ObjectId, ObjectKind};
use crate::scene::stage::{Selection, Stage};
use crate::scene::store::{DesignDocument, SceneStore, restore_records};
use crate::scene::view::View;
use crate::session::controller::{BackgroundLoad, ControllerState, ViewController};

/// One product customization session: the live canvas of the active view, the saved state of
/// every other view and the session-global product tint.
///
/// The session is the single owner of the canvas; every mutating call takes `&mut self`.
/// Background photographs load on worker threads, and their completions are applied by
/// [`DesignSession::poll`] or [`DesignSession::wait_idle`] on the caller's thread.
#[derive(Debug)]
pub struct DesignSession {
    pub(super) product: Product,
    pub(super) config: EngineConfig,
    pub(super) source: Arc<dyn AssetSource>,
    pub(super) controller: ViewController,
    pub(super) stage: Stage,
    pub(super) store: SceneStore,
    pub(super) color: Color,
    /// Decoded product photographs keyed by resolved reference.
    photos: HashMap<String, Arc<PreparedImage>>,
    /// Decoded object images keyed by the source stored on the object.
    pub(super) images: ImageCache,
    fonts: FontBook,
    pub(super) next_id: u64,
}

impl DesignSession {
    /// Start a session on `product` and begin loading the default view.
    ///
    /// The first view becomes editable once its load completes (see [`DesignSession::wait_idle`]).
    pub fn new(
        product: Product,
        source: Arc<dyn AssetSource>,
        config: EngineConfig,
    ) -> DrapeResult<Self> {
        product.validate()?;
        config.validate()?;

        let color = product.default_color();
        let fonts = FontBook::new(config.load_system_fonts, config.font_dirs.clone());
        let load_timeout = config.load_timeout();
        let mut session = Self {
            product,
            config,
            source,
            controller: ViewController::new(View::DEFAULT, load_timeout),
            stage: Stage::default(),
            store: SceneStore::new(),
            color,
            photos: HashMap::new(),
            images: ImageCache::new(),
            fonts,
            next_id: 1,
        };
        let token = session.controller.begin(View::DEFAULT);
        session.start_load(View::DEFAULT, token);
        Ok(session)
    }

    /// [`DesignSession::new`] and wait for the default view to become idle.
    ///
    /// A load that times out leaves the view on a placeholder background; the session is still
    /// returned.
    pub fn open(
        product: Product,
        source: Arc<dyn AssetSource>,
        config: EngineConfig,
    ) -> DrapeResult<Self> {
        let mut session = Self::new(product, source, config)?;
        let timeout = session.config.load_timeout();
        match session.wait_idle(timeout) {
            Ok(_) => {}
            Err(e @ DrapeError::Timeout { .. }) => {
                tracing::warn!(error = %e, "opening on a placeholder background");
            }
            Err(e) => return Err(e),
        }
        Ok(session)
    }

    /// Switch the canvas to `view`.
    ///
    /// Requesting the view that is already active and idle does nothing. Otherwise the active
    /// view's objects and a preview are saved, the canvas is cleared and the new view's
    /// background starts loading; a newer request supersedes this one.
    pub fn request_view(&mut self, view: View) -> DrapeResult<()> {
        let current = self.controller.state();
        if current == ControllerState::Idle(view) {
            tracing::debug!(%view, "view already active");
            return Ok(());
        }
        if let ControllerState::Idle(active) = current {
            let preview = self.capture_preview();
            self.store.snapshot(active, &self.stage.objects, preview)?;
        }

        self.stage.clear();
        let token = self.controller.begin(view);
        self.start_load(view, token);
        Ok(())
    }

    /// [`DesignSession::request_view`] with a UI view name (`"Front"`, `"Left sleeve"`, ...).
    pub fn request_view_named(&mut self, name: &str) -> DrapeResult<()> {
        self.request_view(name.parse()?)
    }

    /// Apply any finished background loads without blocking; returns `true` when idle.
    ///
    /// A transition whose load has outlived [`EngineConfig::load_timeout_ms`] is settled here on
    /// a placeholder background whose status reads
    /// [`BackgroundStatus::TimedOut`](crate::BackgroundStatus::TimedOut).
    pub fn poll(&mut self) -> bool {
        // Expiry is logged by `expire` and stays visible on the background status.
        let _ = self.pump();
        self.is_idle()
    }

    /// Block until the current transition reaches idle, for at most `timeout`.
    ///
    /// On timeout the pending view is completed on a placeholder background (its saved objects
    /// are restored and it stays editable), a late photograph is discarded, and
    /// [`DrapeError::Timeout`] is returned. The session's own load timeout applies as well,
    /// whichever expires first.
    pub fn wait_idle(&mut self, timeout: Duration) -> DrapeResult<View> {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump()?;
            let (view, token) = match self.controller.state() {
                ControllerState::Idle(v) => return Ok(v),
                ControllerState::Transitioning { to, token, .. } => (to, token),
            };

            let now = Instant::now();
            if now >= deadline {
                return Err(self.expire(view, token, timeout));
            }
            let wake = self
                .controller
                .deadline()
                .map_or(deadline, |d| d.min(deadline));
            if let Some(load) = self
                .controller
                .recv_timeout(wake.saturating_duration_since(now))
            {
                self.apply_load(load);
            }
        }
    }

    /// Drain finished loads, then settle the transition if its deadline has passed.
    fn pump(&mut self) -> DrapeResult<()> {
        while let Some(load) = self.controller.try_recv() {
            self.apply_load(load);
        }
        match self.controller.expired(Instant::now()) {
            Some((view, token)) => {
                let waited = self.controller.load_timeout();
                Err(self.expire(view, token, waited))
            }
            None => Ok(()),
        }
    }

    fn expire(&mut self, view: View, token: u64, waited: Duration) -> DrapeError {
        let waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX);
        tracing::warn!(%view, waited_ms, "background load timed out");
        self.apply_load(BackgroundLoad {
            token,
            view,
            source_key: None,
            photo: PhotoOutcome::TimedOut,
        });
        DrapeError::Timeout {
            view: view.key().to_string(),
            waited_ms,
        }
    }

    /// Change the session-global product tint.
    ///
    /// The built color mask of the active view is retinted in place; other views pick the color
    /// up when they are rebuilt. Photographs and object fills are untouched.
    pub fn set_global_color(&mut self, color: Color) {
        self.color = color;
        if let Some(stack) = self.stage.backgrounds.as_mut() {
            stack.set_mask_fill(color);
        }
        tracing::debug!(%color, "global color set");
    }

    /// [`DesignSession::set_global_color`] from a `#rrggbb` string.
    pub fn set_global_color_hex(&mut self, hex: &str) -> DrapeResult<()> {
        self.set_global_color(Color::from_hex(hex)?);
        Ok(())
    }

    /// Current product tint.
    pub fn global_color(&self) -> Color {
        self.color
    }

    /// View-controller state.
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Active view when idle.
    pub fn active_view(&self) -> Option<View> {
        self.controller.state().idle_view()
    }

    /// Return `true` when the active view is built and editable.
    pub fn is_idle(&self) -> bool {
        self.active_view().is_some()
    }

    /// Selected objects of the active view.
    pub fn get_active_selection(&self) -> &Selection {
        self.stage.selection()
    }

    /// Design objects of the active view, bottom-most first; backgrounds are never included.
    pub fn get_object_list(&self) -> &[DesignObject] {
        &self.stage.objects
    }

    /// Object with `id` on the active view.
    pub fn object(&self, id: ObjectId) -> Option<&DesignObject> {
        self.stage.get(id)
    }

    /// Background layers of the active view (absent while transitioning).
    pub fn backgrounds(&self) -> Option<&BackgroundStack> {
        self.stage.backgrounds.as_ref()
    }

    /// Product being customized.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Saved state of every view visited so far.
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Stored PNG thumbnail of `view`, captured when the view was last left.
    pub fn preview(&self, view: View) -> Option<&[u8]> {
        self.store.preview(view)
    }

    /// Rasterize the live canvas at `multiplier` times the viewport size.
    pub fn render(&self, multiplier: f64) -> DrapeResult<Raster> {
        StageRenderer {
            viewport: self.config.viewport,
            images: &self.images,
            fonts: &self.fonts,
        }
        .render(self.stage.backgrounds.as_ref(), &self.stage.objects, multiplier)
    }

    /// Saved design of every view, including the live canvas.
    pub fn export_design(&self) -> DrapeResult<DesignDocument> {
        let mut views = self.store.records_by_view();
        if let Some(active) = self.active_view() {
            views.remove(&active);
            if !self.stage.objects.is_empty() {
                let records = self
                    .stage
                    .objects
                    .iter()
                    .map(crate::scene::store::ObjectRecord::from_object)
                    .collect::<DrapeResult<Vec<_>>>()?;
                views.insert(active, records);
            }
        }
        Ok(DesignDocument {
            product_id: self.product.id.clone(),
            color: self.color,
            views,
        })
    }

    /// Load a saved design: tint, and the objects of every view it lists.
    ///
    /// Views not listed in the document are emptied. Records that fail to reconstruct are
    /// skipped; images that fail to load draw as placeholders. Returns the number of skipped
    /// records.
    ///
    /// Stored preview thumbnails show the replaced design, so they are dropped;
    /// [`DesignSession::preview`] returns `None` for a view until it is left again.
    pub fn import_design(&mut self, doc: &DesignDocument) -> DrapeResult<usize> {
        if doc.product_id != self.product.id {
            return Err(DrapeError::validation(format!(
                "design is for product '{}', session is for '{}'",
                doc.product_id, self.product.id
            )));
        }

        self.set_global_color(doc.color);
        // Previews of the replaced design go with it.
        self.store.clear();

        let mut skipped = 0;
        for (view, records) in &doc.views {
            let restored = restore_records(*view, records);
            skipped += restored.skipped;
            for obj in &restored.objects {
                self.bump_ids_past(obj.id);
                if let ObjectKind::Image { source, .. } = &obj.kind {
                    self.preload_image(source);
                }
            }
            self.store.set_records(*view, records.clone());
        }

        if let Some(active) = self.active_view() {
            let restored = self.store.restore(active);
            self.stage.clear_selection();
            self.stage.objects = restored.objects;
        }
        tracing::debug!(views = doc.views.len(), skipped, "design imported");
        Ok(skipped)
    }

    pub(super) fn issue_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn bump_ids_past(&mut self, id: ObjectId) {
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    pub(crate) fn ensure_idle(&self, op: &str) -> DrapeResult<View> {
        self.active_view().ok_or_else(|| {
            DrapeError::busy(format!(
                "{op} rejected while switching to {}",
                self.controller.state().target()
            ))
        })
    }

    /// Fetch and decode an object image into the cache.
    pub(super) fn load_image(&mut self, source: &str) -> DrapeResult<Arc<PreparedImage>> {
        if let Some(img) = self.images.get(source) {
            return Ok(Arc::clone(img));
        }
        let asset = AssetRef::resolve(source, &self.config.asset_base_url);
        let bytes = self.source.fetch(&asset)?;
        let img = Arc::new(decode_image(&bytes)?);
        self.images.insert(source.to_string(), Arc::clone(&img));
        Ok(img)
    }

    fn preload_image(&mut self, source: &str) {
        if let Err(e) = self.load_image(source) {
            tracing::warn!(source, error = %e, "image unavailable; drawing placeholder");
        }
    }

    fn start_load(&mut self, view: View, token: u64) {
        let Some(raw) = self.product.view_image(view) else {
            self.controller
                .complete_now(token, view, None, PhotoOutcome::Missing);
            return;
        };
        let asset = AssetRef::resolve(raw, &self.config.asset_base_url);
        if let Some(photo) = self.photos.get(asset.resolved()) {
            let key = asset.resolved().to_string();
            self.controller.complete_now(
                token,
                view,
                Some(key),
                PhotoOutcome::Loaded(Arc::clone(photo)),
            );
            return;
        }

        let source = Arc::clone(&self.source);
        let key = asset.resolved().to_string();
        self.controller
            .spawn_load(token, view, key, move || fetch_photo(source.as_ref(), &asset));
    }

    fn apply_load(&mut self, load: BackgroundLoad) {
        if let (Some(key), PhotoOutcome::Loaded(photo)) = (&load.source_key, &load.photo) {
            self.photos
                .entry(key.clone())
                .or_insert_with(|| Arc::clone(photo));
        }
        if !self.controller.accepts(&load) {
            tracing::debug!(view = %load.view, token = load.token, "discarding stale background load");
            return;
        }

        let view = load.view;
        if let PhotoOutcome::Failed(msg) = &load.photo {
            tracing::warn!(%view, error = %msg, "background photo unavailable; using placeholder");
        }
        let ctx = self.config.composite_context(self.color);
        self.stage.backgrounds = Some(build_backgrounds(view, &load.photo, &ctx));

        let restored = self.store.restore(view);
        for obj in &restored.objects {
            self.bump_ids_past(obj.id);
        }
        self.stage.objects = restored.objects;
        self.stage.clear_selection();
        self.controller.finish(view);
    }

    fn capture_preview(&self) -> Option<Vec<u8>> {
        match self
            .render(self.config.preview_multiplier)
            .and_then(|r| r.to_png())
        {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::warn!(error = %e, "could not capture view preview");
                None
            }
        }
    }
}

fn fetch_photo(source: &dyn AssetSource, asset: &AssetRef) -> PhotoOutcome {
    match source.fetch(asset).and_then(|bytes| decode_image(&bytes)) {
        Ok(img) => PhotoOutcome::Loaded(Arc::new(img)),
        Err(e) => PhotoOutcome::Failed(e.to_string()),
    }
}
