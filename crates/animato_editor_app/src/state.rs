// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state: the open document, selection, undo history, playback.

use animato_editor_scene::ItemId;
use animato_editor_timeline::{Document, EditCommand, PlaybackController, UndoStack};
use std::path::PathBuf;

/// Everything the panels operate on.
pub struct EditorState {
    /// The open document
    pub document: Document,
    /// The document's undo stack
    pub undo: UndoStack,
    /// Cooperative playback driver
    pub playback: PlaybackController,
    /// Currently selected item
    pub selection: Option<ItemId>,
    /// Path of the open document, if saved before
    pub path: Option<PathBuf>,
    /// Unsaved changes flag
    pub dirty: bool,
    /// Status bar message
    pub status: String,
}

impl EditorState {
    /// Fresh state with an empty document
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            undo: UndoStack::new(),
            playback: PlaybackController::new(),
            selection: None,
            path: None,
            dirty: false,
            status: "Ready".to_string(),
        }
    }

    /// Execute an undoable edit
    pub fn push_edit(&mut self, command: EditCommand) {
        self.undo.push(command, &mut self.document);
        self.dirty = true;
    }

    /// Undo the last edit, updating the status line
    pub fn undo_edit(&mut self) {
        match self.undo.undo(&mut self.document) {
            Ok(description) => {
                self.dirty = true;
                self.status = format!("Undid: {description}");
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Redo the last undone edit, updating the status line
    pub fn redo_edit(&mut self) {
        match self.undo.redo(&mut self.document) {
            Ok(description) => {
                self.dirty = true;
                self.status = format!("Redid: {description}");
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Replace the document (new/open), dropping history and selection
    pub fn replace_document(&mut self, document: Document, path: Option<PathBuf>) {
        self.document = document;
        self.undo.clear();
        self.playback.stop();
        self.document.timeline.set_playhead(0);
        self.selection = None;
        self.path = path;
        self.dirty = false;
    }

    /// True when closing would lose work
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Drop the selection if its item disappeared (undo of an add)
    pub fn validate_selection(&mut self) {
        if let Some(id) = self.selection {
            if self.document.scene.item(id).is_none() {
                self.selection = None;
            }
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
