// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edit requests emitted by track interaction.
//!
//! Structural edits (deleting a keyframe, assigning or clearing an easing)
//! cross the model boundary: the track queues a request and the owner of
//! the document applies it. This replaces toolkit signal wiring with a
//! drained queue.

use crate::keyframe::{Easing, KeyframeId};
use animato_editor_scene::ItemId;

/// A structural edit requested from a handle or transition context action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    /// Delete a keyframe (and any transition anchored at it)
    DeleteKeyframe {
        /// Owning item
        item: ItemId,
        /// Property name
        property: String,
        /// Keyframe to delete
        key: KeyframeId,
    },
    /// Assign an easing to the span starting at a keyframe
    AddTransition {
        /// Owning item
        item: ItemId,
        /// Property name
        property: String,
        /// Anchor keyframe
        key: KeyframeId,
        /// Easing function for the new span
        easing: Easing,
    },
    /// Clear the easing anchored at a keyframe
    RemoveTransition {
        /// Owning item
        item: ItemId,
        /// Property name
        property: String,
        /// Anchor keyframe
        key: KeyframeId,
    },
}
