// SPDX-License-Identifier: MIT OR Apache-2.0
//! The document: scene plus timeline, the unit of persistence and of
//! command application.

use crate::event::EditRequest;
use crate::keyframe::{Easing, Keyframe, KeyframeId, PropertyValue, TimeMs};
use crate::track::PropertyTrack;
use crate::timeline::Timeline;
use animato_editor_scene::{ItemId, Scene, SceneItem};
use serde::{Deserialize, Serialize};

/// An item pulled out of the document by a delete (or an undone add),
/// carrying everything needed to reattach it exactly.
#[derive(Debug, Clone)]
pub struct DetachedItem {
    /// The removed item
    pub item: SceneItem,
    /// Its former paint-order position
    pub index: usize,
    /// Its property tracks with all keyframes
    pub tracks: Vec<PropertyTrack>,
}

/// Scene plus timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// The scene graph
    pub scene: Scene,
    /// All property tracks
    pub timeline: Timeline,
}

impl Document {
    /// Create an empty document with default stage parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item and its master row
    pub fn attach_item(&mut self, item: SceneItem) -> ItemId {
        let id = self.scene.add_item(item);
        self.timeline.ensure_master(id);
        id
    }

    /// Remove an item together with its tracks, for later reattachment
    pub fn detach_item(&mut self, id: ItemId) -> Option<DetachedItem> {
        let index = self.scene.index_of(id)?;
        let item = self.scene.remove_item(id)?;
        let tracks = self.timeline.remove_item_tracks(id);
        Some(DetachedItem { item, index, tracks })
    }

    /// Reattach a previously detached item at its old position
    pub fn reattach_item(&mut self, detached: DetachedItem) {
        self.scene.insert_item(detached.index, detached.item);
        self.timeline.restore_tracks(detached.tracks);
    }

    /// Record a keyframe for an item property, creating the track on
    /// first use. This is the entry point behind "set a value at the
    /// playhead".
    pub fn add_keyframe(
        &mut self,
        item: ItemId,
        property: &str,
        time: TimeMs,
        value: PropertyValue,
        easing: Option<Easing>,
    ) -> Option<KeyframeId> {
        if self.scene.item(item).is_none() {
            tracing::warn!(?item, property, "keyframe for unknown item ignored");
            return None;
        }
        let track_id = self.timeline.ensure_track(item, property);
        let track = self.timeline.track_mut(track_id)?;
        let mut keyframe = Keyframe::new(time, value);
        if let Some(easing) = easing {
            keyframe = keyframe.with_easing(easing);
        }
        track.insert_keyframe(keyframe)
    }

    /// Delete a keyframe (and the transition anchored at it, if any)
    pub fn remove_keyframe(&mut self, item: ItemId, property: &str, key: KeyframeId) -> bool {
        self.timeline
            .track_for_mut(item, property)
            .and_then(|track| track.remove_keyframe(key))
            .is_some()
    }

    /// Assign an easing to the span starting at a keyframe
    pub fn add_transition(&mut self, item: ItemId, property: &str, key: KeyframeId, easing: Easing) -> bool {
        self.timeline
            .track_for_mut(item, property)
            .is_some_and(|track| track.set_easing(key, Some(easing)))
    }

    /// Clear the easing anchored at a keyframe
    pub fn remove_transition(&mut self, item: ItemId, property: &str, key: KeyframeId) -> bool {
        self.timeline
            .track_for_mut(item, property)
            .is_some_and(|track| track.set_easing(key, None))
    }

    /// Apply a structural edit request queued by track interaction
    pub fn apply_request(&mut self, request: EditRequest) {
        match request {
            EditRequest::DeleteKeyframe { item, property, key } => {
                self.remove_keyframe(item, &property, key);
            }
            EditRequest::AddTransition { item, property, key, easing } => {
                self.add_transition(item, &property, key, easing);
            }
            EditRequest::RemoveTransition { item, property, key } => {
                self.remove_transition(item, &property, key);
            }
        }
    }

    /// Drain scene notifications into the timeline. Call once per frame.
    pub fn pump_events(&mut self) {
        for event in self.scene.take_events() {
            self.timeline.handle_scene_event(&event);
        }
    }

    /// The value an item property has at a time: the animated value when
    /// the property is keyed, the base value otherwise.
    pub fn value_at(&self, item: ItemId, property: &str, time: TimeMs) -> Option<f64> {
        if let Some(value) = self.timeline.evaluate(item, property, time) {
            return Some(value.as_f64());
        }
        self.scene.item(item)?.property(property)
    }

    /// Restore derived state after deserialization
    pub fn after_load(&mut self) {
        self.timeline.rebuild_all_views();
        for item in self.scene.items().map(|i| i.id).collect::<Vec<_>>() {
            self.timeline.ensure_master(item);
        }
        self.scene.take_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animato_editor_scene::ItemKind;

    fn rect_item() -> SceneItem {
        SceneItem::new("Box", ItemKind::Rectangle { fill: [255, 127, 42, 255] }, 10.0, 10.0, 50.0, 50.0)
    }

    #[test]
    fn test_value_at_prefers_animation() {
        let mut document = Document::new();
        let id = document.attach_item(rect_item());

        // unkeyed: base value
        assert_eq!(document.value_at(id, "left", 0), Some(10.0));

        document.add_keyframe(id, "left", 0, PropertyValue::Float(0.0), Some(Easing::Linear));
        document.add_keyframe(id, "left", 100, PropertyValue::Float(100.0), None);
        assert_eq!(document.value_at(id, "left", 50), Some(50.0));
        // other properties still read through to the base
        assert_eq!(document.value_at(id, "top", 50), Some(10.0));
    }

    #[test]
    fn test_requests_apply_structural_edits() {
        let mut document = Document::new();
        let id = document.attach_item(rect_item());
        let a = document.add_keyframe(id, "left", 0, PropertyValue::Float(0.0), None).unwrap();
        document.add_keyframe(id, "left", 100, PropertyValue::Float(1.0), None);

        document.apply_request(EditRequest::AddTransition {
            item: id,
            property: "left".into(),
            key: a,
            easing: Easing::OutCubic,
        });
        let track = document.timeline.track_for(id, "left").unwrap();
        assert_eq!(track.keyframe(a).unwrap().easing, Some(Easing::OutCubic));
        assert!(track.view(a).unwrap().is_transition());

        document.apply_request(EditRequest::RemoveTransition {
            item: id,
            property: "left".into(),
            key: a,
        });
        let track = document.timeline.track_for(id, "left").unwrap();
        assert_eq!(track.keyframe(a).unwrap().easing, None);

        document.apply_request(EditRequest::DeleteKeyframe {
            item: id,
            property: "left".into(),
            key: a,
        });
        assert_eq!(document.timeline.track_for(id, "left").unwrap().keyframe_count(), 1);
    }

    #[test]
    fn test_keyframe_for_unknown_item_ignored() {
        let mut document = Document::new();
        assert!(document
            .add_keyframe(ItemId::new(), "left", 0, PropertyValue::Int(0), None)
            .is_none());
    }

    #[test]
    fn test_pump_creates_master_for_directly_added_items() {
        let mut document = Document::new();
        let id = document.scene.add_item(rect_item());
        assert!(document.timeline.track_for(id, "").is_none());
        document.pump_events();
        assert!(document.timeline.track_for(id, "").is_some());
    }
}
