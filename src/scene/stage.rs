use crate::scene::background::BackgroundStack;
use crate::scene::object::{DesignObject, ObjectId};

/// Zero or more selected objects of the active view, in z-order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ObjectId>,
}

impl Selection {
    /// Selected ids, bottom-most first.
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    /// Return `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected objects.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Return `true` when `id` is selected.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }
}

/// The single live canvas: background layers and design objects in separate containers.
///
/// Backgrounds always render below every object; objects render in list order (last is
/// topmost).
#[derive(Debug, Default)]
pub(crate) struct Stage {
    pub(crate) backgrounds: Option<BackgroundStack>,
    pub(crate) objects: Vec<DesignObject>,
    selection: Selection,
}

impl Stage {
    pub(crate) fn clear(&mut self) {
        self.backgrounds = None;
        self.objects.clear();
        self.selection.ids.clear();
    }

    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn get(&self, id: ObjectId) -> Option<&DesignObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub(crate) fn push_top(&mut self, obj: DesignObject) {
        self.objects.push(obj);
    }

    /// Replace the selection with the given ids (unknown ids are dropped), keeping z-order.
    pub(crate) fn select(&mut self, ids: &[ObjectId]) {
        self.selection.ids = self
            .objects
            .iter()
            .map(|o| o.id)
            .filter(|id| ids.contains(id))
            .collect();
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.ids.clear();
    }

    /// Selected objects in z-order.
    pub(crate) fn selected(&self) -> impl Iterator<Item = &DesignObject> {
        self.objects
            .iter()
            .filter(|o| self.selection.contains(o.id))
    }

    /// Remove the given objects; returns how many were removed.
    pub(crate) fn remove(&mut self, ids: &[ObjectId]) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| !ids.contains(&o.id));
        self.selection.ids.retain(|id| !ids.contains(id));
        before - self.objects.len()
    }
}
