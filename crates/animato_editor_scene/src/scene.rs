// SPDX-License-Identifier: MIT OR Apache-2.0
//! The scene: an ordered item collection plus stage parameters.

use crate::item::{ItemId, SceneItem};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural change notification.
///
/// Scene mutations queue these; the timeline drains them once per frame to
/// keep its track list in sync without holding a reference to the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// An item was inserted
    ItemAdded(ItemId),
    /// An item was removed
    ItemRemoved(ItemId),
    /// A base property of an item changed (position, size, opacity,
    /// or a vector attribute)
    PropertyChanged(ItemId),
}

/// The scene graph: stage parameters and the item collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Stage width in pixels
    pub width: u32,
    /// Stage height in pixels
    pub height: u32,
    /// Frames per second used by playback and export
    pub fps: u32,
    /// Items in paint order
    items: IndexMap<ItemId, SceneItem>,
    /// Pending structural notifications
    #[serde(skip)]
    pending_events: Vec<SceneEvent>,
}

impl Scene {
    /// Create an empty scene with the given stage size and frame rate
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            items: IndexMap::new(),
            pending_events: Vec::new(),
        }
    }

    /// Insert an item, keeping paint order
    pub fn add_item(&mut self, item: SceneItem) -> ItemId {
        let id = item.id;
        self.items.insert(id, item);
        self.pending_events.push(SceneEvent::ItemAdded(id));
        id
    }

    /// Remove an item, returning it for undo
    pub fn remove_item(&mut self, id: ItemId) -> Option<SceneItem> {
        let removed = self.items.shift_remove(&id);
        if removed.is_some() {
            self.pending_events.push(SceneEvent::ItemRemoved(id));
        }
        removed
    }

    /// Paint-order position of an item
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.get_index_of(&id)
    }

    /// Re-insert an item at a paint-order position (undo of a removal)
    pub fn insert_item(&mut self, index: usize, item: SceneItem) -> ItemId {
        let id = item.id;
        let index = index.min(self.items.len());
        self.items.shift_insert(index, id, item);
        self.pending_events.push(SceneEvent::ItemAdded(id));
        id
    }

    /// Get an item
    pub fn item(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.get(&id)
    }

    /// Get a mutable item.
    ///
    /// Callers mutating properties directly should follow up with
    /// [`Scene::notify_property_changed`] so observers repaint.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        self.items.get_mut(&id)
    }

    /// Set an animatable property and queue the change notification
    pub fn set_item_property(&mut self, id: ItemId, name: &str, value: f64) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        if item.set_property(name, value) {
            self.pending_events.push(SceneEvent::PropertyChanged(id));
            true
        } else {
            false
        }
    }

    /// Queue a property-changed notification for an item
    pub fn notify_property_changed(&mut self, id: ItemId) {
        self.pending_events.push(SceneEvent::PropertyChanged(id));
    }

    /// Items in paint order
    pub fn items(&self) -> impl Iterator<Item = &SceneItem> {
        self.items.values()
    }

    /// Item count
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the scene has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drain pending structural notifications
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for Scene {
    fn default() -> Self {
        // Stage defaults for a 720p presentation at 25 fps
        Self::new(1200, 720, 25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;

    fn rect(name: &str) -> SceneItem {
        SceneItem::new(name, ItemKind::Rectangle { fill: [255, 127, 42, 255] }, 0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_add_remove_round_trip() {
        let mut scene = Scene::default();
        let id = scene.add_item(rect("A"));
        assert_eq!(scene.len(), 1);

        let removed = scene.remove_item(id).unwrap();
        assert_eq!(removed.name, "A");
        assert!(scene.is_empty());
        assert!(scene.remove_item(id).is_none());
    }

    #[test]
    fn test_events_are_drained_once() {
        let mut scene = Scene::default();
        let id = scene.add_item(rect("A"));
        scene.set_item_property(id, "left", 5.0);

        let events = scene.take_events();
        assert_eq!(
            events,
            vec![SceneEvent::ItemAdded(id), SceneEvent::PropertyChanged(id)]
        );
        assert!(scene.take_events().is_empty());
    }

    #[test]
    fn test_paint_order_is_insertion_order() {
        let mut scene = Scene::default();
        scene.add_item(rect("A"));
        scene.add_item(rect("B"));
        let names: Vec<_> = scene.items().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
