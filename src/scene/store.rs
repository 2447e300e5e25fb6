//! Per-session storage of each view's design objects.
//!
//! Objects are kept in serialized form so a snapshot is independent of the live stage, and a
//! restore rebuilds fresh, editable instances. Background layers never reach the store: they
//! live in a separate container of the stage and are rebuilt from the product on every visit.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::error::DrapeResult;
use crate::scene::object::DesignObject;
use crate::scene::view::View;

/// One serialized design object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRecord(pub serde_json::Value);

impl ObjectRecord {
    /// Serialize `obj` with all of its attributes.
    pub fn from_object(obj: &DesignObject) -> DrapeResult<Self> {
        Ok(Self(serde_json::to_value(obj)?))
    }

    /// Rebuild a live object from the record; records that would not draw are rejected.
    pub fn to_object(&self) -> DrapeResult<DesignObject> {
        let obj = DesignObject::deserialize(&self.0)?;
        obj.validate()?;
        Ok(obj)
    }
}

/// Saved state of one view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Serialized objects, bottom-most first.
    pub objects: Vec<ObjectRecord>,
    /// PNG thumbnail of the fully composited view at the time of the snapshot.
    pub preview: Option<Vec<u8>>,
}

/// Objects rebuilt from a [`ViewState`].
#[derive(Debug, Default)]
pub struct Restored {
    /// Reconstructed objects in their saved order.
    pub objects: Vec<DesignObject>,
    /// Records that failed to reconstruct and were left out.
    pub skipped: usize,
}

/// Mapping from view to its saved state, scoped to one editing session.
///
/// A view without an entry was never visited or edited.
#[derive(Clone, Debug, Default)]
pub struct SceneStore {
    states: HashMap<View, ViewState>,
}

impl SceneStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `objects` (in z-order) and an optional preview for `view`, replacing any previous
    /// state.
    pub fn snapshot(
        &mut self,
        view: View,
        objects: &[DesignObject],
        preview: Option<Vec<u8>>,
    ) -> DrapeResult<()> {
        let objects = objects
            .iter()
            .map(ObjectRecord::from_object)
            .collect::<DrapeResult<Vec<_>>>()?;
        tracing::debug!(%view, objects = objects.len(), "snapshot view");
        self.states.insert(view, ViewState { objects, preview });
        Ok(())
    }

    /// Replace the saved records of `view`, keeping its preview.
    pub fn set_records(&mut self, view: View, objects: Vec<ObjectRecord>) {
        self.states.entry(view).or_default().objects = objects;
    }

    /// Rebuild the saved objects of `view`.
    ///
    /// Best effort: a record that fails to reconstruct is logged and skipped, the rest still
    /// restore. A view that was never saved restores to nothing.
    pub fn restore(&self, view: View) -> Restored {
        match self.states.get(&view) {
            Some(state) => restore_records(view, &state.objects),
            None => Restored::default(),
        }
    }

    /// Saved state of `view`.
    pub fn get(&self, view: View) -> Option<&ViewState> {
        self.states.get(&view)
    }

    /// Preview thumbnail of `view`, if one was captured.
    pub fn preview(&self, view: View) -> Option<&[u8]> {
        self.states.get(&view)?.preview.as_deref()
    }

    /// Number of saved objects for `view`.
    pub fn object_count(&self, view: View) -> usize {
        self.states.get(&view).map_or(0, |s| s.objects.len())
    }

    /// Return `true` when no view has been saved.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop every saved view.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Saved object records of every view with at least one object, in view order.
    pub fn records_by_view(&self) -> BTreeMap<View, Vec<ObjectRecord>> {
        View::ALL
            .iter()
            .filter_map(|v| {
                let state = self.states.get(v)?;
                (!state.objects.is_empty()).then(|| (*v, state.objects.clone()))
            })
            .collect()
    }
}

pub(crate) fn restore_records(view: View, records: &[ObjectRecord]) -> Restored {
    let mut out = Restored::default();
    for (idx, record) in records.iter().enumerate() {
        match record.to_object() {
            Ok(obj) => out.objects.push(obj),
            Err(e) => {
                tracing::warn!(%view, record = idx, error = %e, "skipping unrestorable object");
                out.skipped += 1;
            }
        }
    }
    out
}

/// A saved design: the product, its tint and the objects of every edited view.
///
/// This is the only form in which a design outlives its session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    /// Product the design was made for.
    pub product_id: String,
    /// Product tint.
    pub color: Color,
    /// Object records per view.
    #[serde(default)]
    pub views: BTreeMap<View, Vec<ObjectRecord>>,
}

impl DesignDocument {
    /// Parse a design document from JSON.
    pub fn from_json(s: &str) -> DrapeResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> DrapeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
