// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undoable edit commands.
//!
//! Commands carry absolute before/after state, so repeated undo/redo
//! toggling is exact. Validation happens before a command is constructed
//! (in the track's proposal functions); execution assumes preconditions
//! hold and cannot fail.

use crate::document::{DetachedItem, Document};
use crate::keyframe::{KeyframeId, TimeMs};
use crate::track::TrackId;
use animato_editor_scene::{ItemId, SceneItem};

/// A single reversible edit applied to the document
#[derive(Debug, Clone)]
pub enum EditCommand {
    /// Set a keyframe's time
    MoveKeyframe {
        /// Track owning the keyframe
        track: TrackId,
        /// Keyframe being moved
        key: KeyframeId,
        /// Time before the move
        from: TimeMs,
        /// Time after the move
        to: TimeMs,
    },
    /// Shift a transition (anchor and successor move together)
    MoveTransition {
        /// Track owning the transition's anchor
        track: TrackId,
        /// Anchor keyframe
        key: KeyframeId,
        /// Anchor time before the move
        from: TimeMs,
        /// Anchor time after the move
        to: TimeMs,
    },
    /// Insert an item into the scene
    AddItem {
        /// The item to insert
        item: SceneItem,
        /// Detached state captured by undo, reattached on redo
        detached: Option<DetachedItem>,
    },
    /// Remove an item from the scene
    DeleteItem {
        /// The item to remove
        id: ItemId,
        /// Detached state captured by redo, reattached on undo
        detached: Option<DetachedItem>,
    },
}

impl EditCommand {
    /// Construct an add-item command
    pub fn add_item(item: SceneItem) -> Self {
        Self::AddItem { item, detached: None }
    }

    /// Construct a delete-item command
    pub fn delete_item(id: ItemId) -> Self {
        Self::DeleteItem { id, detached: None }
    }

    /// Human-readable label for undo/redo menu entries
    pub fn description(&self) -> &'static str {
        match self {
            Self::MoveKeyframe { .. } => "Move Keyframe",
            Self::MoveTransition { .. } => "Move Transition",
            Self::AddItem { .. } => "Add Item",
            Self::DeleteItem { .. } => "Delete Item",
        }
    }

    /// Apply the edit
    pub fn redo(&mut self, document: &mut Document) {
        match self {
            Self::MoveKeyframe { track, key, to, .. } => {
                if let Some(track) = document.timeline.track_mut(*track) {
                    track.apply_keyframe_time(*key, *to);
                }
            }
            Self::MoveTransition { track, key, to, .. } => {
                if let Some(track) = document.timeline.track_mut(*track) {
                    track.apply_transition_time(*key, *to);
                }
            }
            Self::AddItem { item, detached } => match detached.take() {
                Some(state) => document.reattach_item(state),
                None => {
                    document.attach_item(item.clone());
                }
            },
            Self::DeleteItem { id, detached } => {
                *detached = document.detach_item(*id);
            }
        }
    }

    /// Revert the edit, restoring the prior state exactly
    pub fn undo(&mut self, document: &mut Document) {
        match self {
            Self::MoveKeyframe { track, key, from, .. } => {
                if let Some(track) = document.timeline.track_mut(*track) {
                    track.apply_keyframe_time(*key, *from);
                }
            }
            Self::MoveTransition { track, key, from, .. } => {
                if let Some(track) = document.timeline.track_mut(*track) {
                    track.apply_transition_time(*key, *from);
                }
            }
            Self::AddItem { item, detached } => {
                *detached = document.detach_item(item.id);
            }
            Self::DeleteItem { detached, .. } => {
                if let Some(state) = detached.take() {
                    document.reattach_item(state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::{Easing, PropertyValue};
    use animato_editor_scene::ItemKind;

    fn document_with_keyframes(times: &[TimeMs]) -> (Document, ItemId, Vec<KeyframeId>) {
        let mut document = Document::default();
        let item = SceneItem::new("Box", ItemKind::Rectangle { fill: [255, 127, 42, 255] }, 0.0, 0.0, 10.0, 10.0);
        let id = item.id;
        document.attach_item(item);
        let keys = times
            .iter()
            .map(|&t| {
                document
                    .add_keyframe(id, "left", t, PropertyValue::Float(t as f64), None)
                    .unwrap()
            })
            .collect();
        (document, id, keys)
    }

    #[test]
    fn test_move_keyframe_round_trip() {
        let (mut document, item, keys) = document_with_keyframes(&[0, 100, 200]);
        let track_id = document.timeline.track_for(item, "left").unwrap().id;

        let mut command = EditCommand::MoveKeyframe {
            track: track_id,
            key: keys[1],
            from: 100,
            to: 150,
        };

        command.redo(&mut document);
        let time = |document: &Document| {
            document
                .timeline
                .track(track_id)
                .unwrap()
                .keyframe(keys[1])
                .unwrap()
                .time
        };
        assert_eq!(time(&document), 150);

        command.undo(&mut document);
        assert_eq!(time(&document), 100);

        command.redo(&mut document);
        assert_eq!(time(&document), 150);
    }

    #[test]
    fn test_reject_then_undo_scenario() {
        // keyframes at 0/100/200: move 100 -> 150 accepted, 150 -> 200
        // rejected with no state change, undo restores 100
        let (mut document, item, keys) = document_with_keyframes(&[0, 100, 200]);
        let track_id = document.timeline.track_for(item, "left").unwrap().id;
        let mut stack = crate::history::UndoStack::new();

        let accepted = document
            .timeline
            .track(track_id)
            .unwrap()
            .propose_move_keyframe(keys[1], 150)
            .unwrap();
        stack.push(accepted, &mut document);
        let track = document.timeline.track(track_id).unwrap();
        assert_eq!(track.keyframe(keys[1]).unwrap().time, 150);

        assert!(track.propose_move_keyframe(keys[1], 200).is_none());
        assert_eq!(
            document.timeline.track(track_id).unwrap().keyframe(keys[1]).unwrap().time,
            150
        );

        stack.undo(&mut document).unwrap();
        assert_eq!(
            document.timeline.track(track_id).unwrap().keyframe(keys[1]).unwrap().time,
            100
        );
    }

    #[test]
    fn test_move_transition_round_trip_preserves_span() {
        let (mut document, item, keys) = document_with_keyframes(&[0, 100, 400]);
        let track_id = document.timeline.track_for(item, "left").unwrap().id;
        document
            .timeline
            .track_mut(track_id)
            .unwrap()
            .set_easing(keys[0], Some(Easing::Linear));

        let mut command = document
            .timeline
            .track(track_id)
            .unwrap()
            .propose_move_transition(keys[0], 50)
            .unwrap();

        let span = |document: &Document| {
            let track = document.timeline.track(track_id).unwrap();
            track.keyframe(keys[1]).unwrap().time - track.keyframe(keys[0]).unwrap().time
        };
        let before = span(&document);

        command.redo(&mut document);
        assert_eq!(span(&document), before);
        assert_eq!(document.timeline.track(track_id).unwrap().keyframe(keys[0]).unwrap().time, 50);

        command.undo(&mut document);
        assert_eq!(span(&document), before);
        assert_eq!(document.timeline.track(track_id).unwrap().keyframe(keys[0]).unwrap().time, 0);
    }

    #[test]
    fn test_delete_item_restores_tracks_on_undo() {
        let (mut document, item, keys) = document_with_keyframes(&[0, 100]);
        assert_eq!(document.scene.len(), 1);

        let mut command = EditCommand::delete_item(item);
        command.redo(&mut document);
        assert!(document.scene.is_empty());
        assert!(document.timeline.track_for(item, "left").is_none());

        command.undo(&mut document);
        assert_eq!(document.scene.len(), 1);
        let track = document.timeline.track_for(item, "left").unwrap();
        assert_eq!(track.keyframe_count(), 2);
        assert!(track.keyframe(keys[0]).is_some());
    }

    #[test]
    fn test_add_item_round_trip() {
        let mut document = Document::default();
        let item = SceneItem::new("Box", ItemKind::Ellipse { fill: [0, 0, 0, 255] }, 0.0, 0.0, 5.0, 5.0);
        let id = item.id;

        let mut command = EditCommand::add_item(item);
        command.redo(&mut document);
        assert_eq!(document.scene.len(), 1);
        assert!(document.timeline.track_for(id, "").is_some());

        command.undo(&mut document);
        assert!(document.scene.is_empty());
        assert!(document.timeline.track_for(id, "").is_none());

        command.redo(&mut document);
        assert_eq!(document.scene.len(), 1);
    }
}
