// SPDX-License-Identifier: MIT OR Apache-2.0
//! The undo stack.
//!
//! One global stack per document serializes all structural edits.
//! Pushing executes the command immediately (its first redo), then records
//! it for later undo/redo toggling.

use crate::command::EditCommand;
use crate::document::Document;
use std::collections::VecDeque;
use thiserror::Error;

/// Maximum undo history depth
const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Undo/redo stack over edit commands
#[derive(Debug, Default)]
pub struct UndoStack {
    /// Commands that can be undone, oldest first
    undo_stack: VecDeque<EditCommand>,
    /// Commands that can be redone, oldest first
    redo_stack: VecDeque<EditCommand>,
    /// Maximum history depth
    max_depth: usize,
}

impl UndoStack {
    /// Create a stack with the default depth
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create a stack with a custom depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth,
        }
    }

    /// Execute a command and record it.
    ///
    /// Clears the redo stack: a fresh edit invalidates the redone future.
    pub fn push(&mut self, mut command: EditCommand, document: &mut Document) {
        command.redo(document);
        tracing::debug!(command = command.description(), "edit applied");

        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the most recent command, returning its description
    pub fn undo(&mut self, document: &mut Document) -> Result<&'static str> {
        let mut command = self.undo_stack.pop_back().ok_or(HistoryError::NothingToUndo)?;
        command.undo(document);
        let description = command.description();
        self.redo_stack.push_back(command);
        Ok(description)
    }

    /// Redo the most recently undone command, returning its description
    pub fn redo(&mut self, document: &mut Document) -> Result<&'static str> {
        let mut command = self.redo_stack.pop_back().ok_or(HistoryError::NothingToRedo)?;
        command.redo(document);
        let description = command.description();
        self.undo_stack.push_back(command);
        Ok(description)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the next undo, for the Edit menu
    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.back().map(EditCommand::description)
    }

    /// Description of the next redo, for the Edit menu
    pub fn redo_description(&self) -> Option<&'static str> {
        self.redo_stack.back().map(EditCommand::description)
    }

    /// Drop all history (new/loaded document)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::PropertyValue;
    use animato_editor_scene::{ItemKind, SceneItem};

    fn seeded() -> (Document, UndoStack, crate::track::TrackId, crate::keyframe::KeyframeId) {
        let mut document = Document::new();
        let item = SceneItem::new("Box", ItemKind::Rectangle { fill: [0, 0, 0, 255] }, 0.0, 0.0, 1.0, 1.0);
        let id = document.attach_item(item);
        let key = document
            .add_keyframe(id, "left", 100, PropertyValue::Float(0.0), None)
            .unwrap();
        document.add_keyframe(id, "left", 400, PropertyValue::Float(1.0), None);
        let track = document.timeline.track_for(id, "left").unwrap().id;
        (document, UndoStack::new(), track, key)
    }

    #[test]
    fn test_push_executes_immediately() {
        let (mut document, mut stack, track, key) = seeded();
        let command = document.timeline.track(track).unwrap().propose_move_keyframe(key, 200).unwrap();
        stack.push(command, &mut document);
        assert_eq!(document.timeline.track(track).unwrap().keyframe(key).unwrap().time, 200);
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_redo_toggle_is_exact() {
        let (mut document, mut stack, track, key) = seeded();
        let command = document.timeline.track(track).unwrap().propose_move_keyframe(key, 250).unwrap();
        stack.push(command, &mut document);

        assert_eq!(stack.undo(&mut document).unwrap(), "Move Keyframe");
        assert_eq!(document.timeline.track(track).unwrap().keyframe(key).unwrap().time, 100);

        assert_eq!(stack.redo(&mut document).unwrap(), "Move Keyframe");
        assert_eq!(document.timeline.track(track).unwrap().keyframe(key).unwrap().time, 250);
    }

    #[test]
    fn test_fresh_push_clears_redo() {
        let (mut document, mut stack, track, key) = seeded();
        let first = document.timeline.track(track).unwrap().propose_move_keyframe(key, 150).unwrap();
        stack.push(first, &mut document);
        stack.undo(&mut document).unwrap();
        assert!(stack.can_redo());

        let second = document.timeline.track(track).unwrap().propose_move_keyframe(key, 300).unwrap();
        stack.push(second, &mut document);
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_depth_is_bounded() {
        let (mut document, _, track, key) = seeded();
        let mut stack = UndoStack::with_max_depth(2);
        for time in [150, 160, 170] {
            let command = document.timeline.track(track).unwrap().propose_move_keyframe(key, time).unwrap();
            stack.push(command, &mut document);
        }
        stack.undo(&mut document).unwrap();
        stack.undo(&mut document).unwrap();
        assert!(matches!(stack.undo(&mut document), Err(HistoryError::NothingToUndo)));
        // the oldest move fell off the stack: time rewound to the first
        // *retained* before-state, not all the way to 100
        assert_eq!(document.timeline.track(track).unwrap().keyframe(key).unwrap().time, 150);
    }

    #[test]
    fn test_empty_stack_errors() {
        let (mut document, mut stack, ..) = seeded();
        assert!(matches!(stack.undo(&mut document), Err(HistoryError::NothingToUndo)));
        assert!(matches!(stack.redo(&mut document), Err(HistoryError::NothingToRedo)));
    }
}
