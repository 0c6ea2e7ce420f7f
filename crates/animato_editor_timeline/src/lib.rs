// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline/keyframe editing core for Animato Editor.
//!
//! This crate provides the model and interaction behind the timeline
//! panel:
//! - Keyframes with easing transitions, kept strictly time-ordered
//! - Property tracks with one interactive view (handle or transition
//!   span) per represented keyframe
//! - Edit validation against temporal neighbors, with rejection as a
//!   silent no-op
//! - An undoable command layer over a single per-document stack
//! - The timeline aggregate with shared playhead/scroll and cooperative
//!   playback
//!
//! ## Architecture
//!
//! Views are derived state, rebuilt transactionally from the keyframe
//! sequence. Drags move views optimistically; releasing produces a
//! proposal which the track validates before a command is constructed.
//! Structural edits (delete keyframe, add/remove transition) travel as
//! queued requests drained by the document owner.

pub mod command;
pub mod document;
pub mod event;
pub mod history;
pub mod keyframe;
pub mod timeline;
pub mod track;
pub mod ui;
pub mod view;

pub use command::EditCommand;
pub use document::{DetachedItem, Document};
pub use event::EditRequest;
pub use history::{HistoryError, UndoStack};
pub use keyframe::{Easing, Keyframe, KeyframeId, PropertyValue, TimeMs, ALL_EASINGS};
pub use timeline::{PlaybackController, PlaybackState, Timeline};
pub use track::{PropertyTrack, TrackId};
pub use ui::{track_row, TrackEdit};
pub use view::{TrackView, HANDLE_HALF_WIDTH, SCROLL_UNIT, TIME_SCALE, TRACK_ROW_HEIGHT};
