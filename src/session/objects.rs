//! Object manager: creation, editing, selection and z-order of design objects on the active
//! view.
//!
//! Every operation requires the view controller to be idle and fails with
//! [`DrapeError::Busy`] otherwise, leaving the canvas untouched. Operations on an empty
//! selection succeed and change nothing.

use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::core::Point;
use crate::foundation::error::{DrapeError, DrapeResult};
use crate::scene::object::{
    DesignObject, Geometry, ObjectId, ObjectKind, PropertyUpdate, ShapeKind, TextConfig,
};
use crate::session::design::DesignSession;

impl DesignSession {
    /// Add a text object centered on the canvas and select it.
    pub fn add_text(&mut self, config: TextConfig) -> DrapeResult<ObjectId> {
        self.ensure_idle("add_text")?;
        let kind = config.into_kind()?;
        Ok(self.insert_centered(kind, None))
    }

    /// Add an image (clipart) object, scaled to the configured clipart width, and select it.
    ///
    /// An image that cannot be fetched or decoded is still added and draws as a placeholder.
    pub fn add_image(&mut self, source: &str) -> DrapeResult<ObjectId> {
        self.ensure_idle("add_image")?;
        if source.trim().is_empty() {
            return Err(DrapeError::validation("image source must be non-empty"));
        }
        let width = self.config.clipart_width;
        let loaded = self.load_image(source);
        Ok(self.insert_image(source.to_string(), loaded, width))
    }

    /// Add an uploaded image from encoded bytes, scaled to the configured upload width.
    ///
    /// The pixels are registered under `upload:<name>`.
    pub fn add_image_bytes(&mut self, name: &str, bytes: &[u8]) -> DrapeResult<ObjectId> {
        self.ensure_idle("add_image_bytes")?;
        let source = format!("upload:{}", name.trim());
        let loaded = decode_image(bytes).map(|img| {
            let img = Arc::new(img);
            self.images.insert(source.clone(), Arc::clone(&img));
            img
        });
        let width = self.config.upload_width;
        Ok(self.insert_image(source, loaded, width))
    }

    /// Add a basic shape with the stock fill and size, and select it.
    pub fn add_shape(&mut self, shape: ShapeKind) -> DrapeResult<ObjectId> {
        self.ensure_idle("add_shape")?;
        Ok(self.insert_centered(shape.default_kind(), None))
    }

    /// Clone every selected object, offset by the configured delta, above the originals.
    ///
    /// The clones become the selection. Returns their ids in z-order.
    pub fn duplicate_selected(&mut self) -> DrapeResult<Vec<ObjectId>> {
        self.ensure_idle("duplicate_selected")?;
        let sources: Vec<DesignObject> = self.stage.selected().cloned().collect();
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let offset = self.config.duplicate_offset;
        let mut ids = Vec::with_capacity(sources.len());
        for mut obj in sources {
            obj.id = self.issue_id();
            obj.geometry.position += offset;
            ids.push(obj.id);
            self.stage.push_top(obj);
        }
        self.stage.select(&ids);
        tracing::debug!(count = ids.len(), "duplicated selection");
        Ok(ids)
    }

    /// Remove every selected object and clear the selection; returns how many were removed.
    pub fn delete_selected(&mut self) -> DrapeResult<usize> {
        self.ensure_idle("delete_selected")?;
        let ids = self.stage.selection().ids().to_vec();
        let removed = self.stage.remove(&ids);
        self.stage.clear_selection();
        Ok(removed)
    }

    /// Remove a single object regardless of selection (layers panel).
    pub fn remove_object(&mut self, id: ObjectId) -> DrapeResult<bool> {
        self.ensure_idle("remove_object")?;
        Ok(self.stage.remove(&[id]) == 1)
    }

    /// Apply `update` to every selected object that has the property; returns how many changed.
    pub fn update_property(&mut self, update: PropertyUpdate) -> DrapeResult<usize> {
        self.ensure_idle("update_property")?;
        update.validate()?;
        let ids = self.stage.selection().ids().to_vec();
        let mut changed = 0;
        for obj in self.stage.objects.iter_mut().filter(|o| ids.contains(&o.id)) {
            if update.apply(obj) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// [`DesignSession::update_property`] with a UI property name and JSON value.
    pub fn update_named_property(
        &mut self,
        name: &str,
        value: &serde_json::Value,
    ) -> DrapeResult<usize> {
        self.update_property(PropertyUpdate::from_name_value(name, value)?)
    }

    /// Make `id` the sole selection.
    pub fn select_object(&mut self, id: ObjectId) -> DrapeResult<()> {
        self.select_objects(&[id])
    }

    /// Select exactly the given objects of the active view.
    pub fn select_objects(&mut self, ids: &[ObjectId]) -> DrapeResult<()> {
        self.ensure_idle("select_objects")?;
        if let Some(missing) = ids.iter().find(|id| self.stage.get(**id).is_none()) {
            return Err(DrapeError::validation(format!(
                "{missing} is not on the active view"
            )));
        }
        self.stage.select(ids);
        Ok(())
    }

    /// Select every object of the active view.
    pub fn select_all(&mut self) -> DrapeResult<()> {
        self.ensure_idle("select_all")?;
        let ids: Vec<ObjectId> = self.stage.objects.iter().map(|o| o.id).collect();
        self.stage.select(&ids);
        Ok(())
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) -> DrapeResult<()> {
        self.ensure_idle("clear_selection")?;
        self.stage.clear_selection();
        Ok(())
    }

    /// Topmost object under `point` (viewport units), if any.
    pub fn object_at(&self, point: Point) -> Option<ObjectId> {
        self.stage
            .objects
            .iter()
            .rev()
            .find(|o| o.contains(point))
            .map(|o| o.id)
    }

    /// Move each selected object one step up in z-order.
    pub fn bring_forward(&mut self) -> DrapeResult<()> {
        self.ensure_idle("bring_forward")?;
        let sel = self.stage.selection().ids().to_vec();
        let objects = &mut self.stage.objects;
        for i in (0..objects.len().saturating_sub(1)).rev() {
            if sel.contains(&objects[i].id) && !sel.contains(&objects[i + 1].id) {
                objects.swap(i, i + 1);
            }
        }
        Ok(())
    }

    /// Move each selected object one step down in z-order.
    pub fn send_backward(&mut self) -> DrapeResult<()> {
        self.ensure_idle("send_backward")?;
        let sel = self.stage.selection().ids().to_vec();
        let objects = &mut self.stage.objects;
        for i in 1..objects.len() {
            if sel.contains(&objects[i].id) && !sel.contains(&objects[i - 1].id) {
                objects.swap(i, i - 1);
            }
        }
        Ok(())
    }

    /// Move the selection above every other object, keeping its relative order.
    pub fn bring_to_front(&mut self) -> DrapeResult<()> {
        self.ensure_idle("bring_to_front")?;
        let sel = self.stage.selection().ids().to_vec();
        let (picked, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.stage.objects)
            .into_iter()
            .partition(|o| sel.contains(&o.id));
        self.stage.objects = rest.into_iter().chain(picked).collect();
        Ok(())
    }

    /// Move the selection below every other object, keeping its relative order.
    pub fn send_to_back(&mut self) -> DrapeResult<()> {
        self.ensure_idle("send_to_back")?;
        let sel = self.stage.selection().ids().to_vec();
        let (picked, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.stage.objects)
            .into_iter()
            .partition(|o| sel.contains(&o.id));
        self.stage.objects = picked.into_iter().chain(rest).collect();
        Ok(())
    }

    fn insert_centered(&mut self, kind: ObjectKind, width: Option<f64>) -> ObjectId {
        let id = self.issue_id();
        let mut obj = DesignObject {
            id,
            kind,
            geometry: Geometry::at(self.config.viewport.center()),
        };
        if let Some(w) = width {
            obj.scale_to_width(w);
        }
        tracing::debug!(%id, kind = obj.type_name(), "object added");
        self.stage.push_top(obj);
        self.stage.select(&[id]);
        id
    }

    fn insert_image(
        &mut self,
        source: String,
        loaded: DrapeResult<Arc<PreparedImage>>,
        width: f64,
    ) -> ObjectId {
        let (natural_width, natural_height) = match loaded {
            Ok(img) => (img.width, img.height),
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "image unavailable; adding placeholder");
                let side = width.round().max(1.0) as u32;
                (side, side)
            }
        };
        let kind = ObjectKind::Image {
            source,
            natural_width,
            natural_height,
        };
        self.insert_centered(kind, Some(width))
    }
}
