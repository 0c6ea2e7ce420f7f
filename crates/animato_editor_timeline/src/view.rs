// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive view objects: keyframe handles and transition spans.
//!
//! Views are derived from track state and rebuilt transactionally on every
//! structural change. During a drag the view moves optimistically; the
//! model is only touched when the release-time proposal validates.

use crate::keyframe::{KeyframeId, TimeMs};

/// Milliseconds represented by one horizontal pixel
pub const TIME_SCALE: TimeMs = 5;
/// Pixels scrolled per horizontal scroll step
pub const SCROLL_UNIT: i32 = 20;
/// Half the width of a keyframe handle, in pixels
pub const HANDLE_HALF_WIDTH: f32 = 6.0;
/// Height of a track row, in pixels
pub const TRACK_ROW_HEIGHT: f32 = 18.0;
/// Smallest visual width a transition span can be resized down to
pub const MIN_TRANSITION_WIDTH: f32 = 2.0 * HANDLE_HALF_WIDTH;

/// Screen x of a transition span's left edge for a given scroll offset
pub fn span_screen_x(time: TimeMs, scroll_value: i32) -> f32 {
    (time / TIME_SCALE) as f32 - (scroll_value * SCROLL_UNIT) as f32
}

/// Screen x of a handle (its left edge; the tip sits half a handle right)
pub fn handle_screen_x(time: TimeMs, scroll_value: i32) -> f32 {
    span_screen_x(time, scroll_value) - HANDLE_HALF_WIDTH
}

/// Inverse of [`span_screen_x`]: the time a span edge at `x` points at
pub fn x_to_time(x: f32, scroll_value: i32) -> TimeMs {
    ((x + (scroll_value * SCROLL_UNIT) as f32).round() as TimeMs) * TIME_SCALE
}

/// Draggable representation of a lone keyframe
#[derive(Debug, Clone, PartialEq)]
pub struct HandleView {
    /// The represented keyframe
    pub key: KeyframeId,
    /// Optimistic horizontal offset while a drag is in flight
    pub drag_offset: f32,
}

impl HandleView {
    fn new(key: KeyframeId) -> Self {
        Self { key, drag_offset: 0.0 }
    }
}

/// Draggable representation of an easing span between two keyframes
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionView {
    /// The anchor keyframe (owner of the easing)
    pub key: KeyframeId,
    /// Optimistic horizontal offset while a drag is in flight
    pub drag_offset: f32,
    /// Cosmetic width adjustment from right-edge resizing
    pub width_bias: f32,
}

impl TransitionView {
    fn new(key: KeyframeId) -> Self {
        Self {
            key,
            drag_offset: 0.0,
            width_bias: 0.0,
        }
    }
}

/// The single interactive representation of a keyframe on its track
#[derive(Debug, Clone, PartialEq)]
pub enum TrackView {
    /// Lone keyframe handle
    Handle(HandleView),
    /// Easing span anchored at the keyframe
    Transition(TransitionView),
}

impl TrackView {
    /// New handle view
    pub fn handle(key: KeyframeId) -> Self {
        Self::Handle(HandleView::new(key))
    }

    /// New transition view
    pub fn transition(key: KeyframeId) -> Self {
        Self::Transition(TransitionView::new(key))
    }

    /// The represented keyframe
    pub fn key(&self) -> KeyframeId {
        match self {
            Self::Handle(h) => h.key,
            Self::Transition(t) => t.key,
        }
    }

    /// True for transition views
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition(_))
    }

    /// Drop any in-flight drag offset (snap back)
    pub fn reset_drag(&mut self) {
        match self {
            Self::Handle(h) => h.drag_offset = 0.0,
            Self::Transition(t) => t.drag_offset = 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_round_trip() {
        for scroll in [0, 3, 17] {
            for time in [0, 500, 12_345].map(|t: TimeMs| t / TIME_SCALE * TIME_SCALE) {
                let x = span_screen_x(time, scroll);
                assert_eq!(x_to_time(x, scroll), time);
            }
        }
    }

    #[test]
    fn test_position_is_idempotent_in_scroll() {
        // Recomputing with the same offset must not drift
        let a = handle_screen_x(1000, 4);
        let b = handle_screen_x(1000, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_handle_is_centered_on_its_time() {
        let x = handle_screen_x(1000, 0);
        assert_eq!(x + HANDLE_HALF_WIDTH, span_screen_x(1000, 0));
    }
}
