// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tracks: the ordered keyframe sequence for one (item, property)
//! pair and its interactive view objects.
//!
//! Keyframes are kept in a time-sorted `Vec`; temporal neighbors are
//! index−1/index+1, so deletion can never leave a dangling reference. The
//! view map is rebuilt transactionally on every structural change and is
//! the only source of handles/transitions the UI draws.

use crate::command::EditCommand;
use crate::event::EditRequest;
use crate::keyframe::{Easing, Keyframe, KeyframeId, PropertyValue, TimeMs};
use crate::view::TrackView;
use animato_editor_scene::ItemId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// The keyframe/transition sequence for one property of one item.
///
/// An empty property name denotes the item's master row: a ruler with no
/// keyframes of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTrack {
    /// Unique track ID
    pub id: TrackId,
    /// Owning item
    pub item: ItemId,
    /// Property name; empty for the master row
    pub property: String,
    /// Keyframes sorted by time, strictly increasing
    keyframes: Vec<Keyframe>,
    /// One view per represented keyframe
    #[serde(skip)]
    views: IndexMap<KeyframeId, TrackView>,
    /// Shared horizontal scroll value
    #[serde(skip)]
    pub scroll_value: i32,
    /// Shared playhead position
    #[serde(skip)]
    pub playhead: TimeMs,
    /// Pending structural edit requests
    #[serde(skip)]
    requests: Vec<EditRequest>,
}

impl PropertyTrack {
    /// Create a track for an item property
    pub fn new(item: ItemId, property: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            item,
            property: property.into(),
            keyframes: Vec::new(),
            views: IndexMap::new(),
            scroll_value: 0,
            playhead: 0,
            requests: Vec::new(),
        }
    }

    /// Create an item's master row
    pub fn master(item: ItemId) -> Self {
        Self::new(item, "")
    }

    /// True for the master row (ruler only, no keyframes)
    pub fn is_master(&self) -> bool {
        self.property.is_empty()
    }

    /// Keyframes in time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Index of a keyframe in the sorted sequence
    pub fn index_of(&self, key: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == key)
    }

    /// Get a keyframe by ID
    pub fn keyframe(&self, key: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == key)
    }

    /// Temporal predecessor of a keyframe
    pub fn prev_of(&self, key: KeyframeId) -> Option<&Keyframe> {
        let index = self.index_of(key)?;
        index.checked_sub(1).map(|i| &self.keyframes[i])
    }

    /// Temporal successor of a keyframe
    pub fn next_of(&self, key: KeyframeId) -> Option<&Keyframe> {
        let index = self.index_of(key)?;
        self.keyframes.get(index + 1)
    }

    /// Insert a keyframe, keeping the sequence strictly ordered.
    ///
    /// A keyframe at an already-occupied time updates that keyframe's
    /// value in place instead of inserting a duplicate. Master rows hold
    /// no keyframes. Returns the ID of the inserted or updated keyframe.
    pub fn insert_keyframe(&mut self, keyframe: Keyframe) -> Option<KeyframeId> {
        if self.is_master() {
            debug_assert!(false, "keyframe inserted on a master row");
            return None;
        }

        if let Some(existing) = self.keyframes.iter_mut().find(|k| k.time == keyframe.time) {
            existing.value = keyframe.value;
            return Some(existing.id);
        }

        let id = keyframe.id;
        let index = self
            .keyframes
            .iter()
            .position(|k| k.time > keyframe.time)
            .unwrap_or(self.keyframes.len());
        self.keyframes.insert(index, keyframe);
        self.rebuild_views();
        Some(id)
    }

    /// Remove a keyframe, returning it.
    ///
    /// Any transition anchored at the keyframe disappears with it; the
    /// neighbors' views are re-derived so nothing orphaned survives.
    pub fn remove_keyframe(&mut self, key: KeyframeId) -> Option<Keyframe> {
        let index = self.index_of(key)?;
        let removed = self.keyframes.remove(index);
        // an easing on the (new) last keyframe has nothing left to span
        if let Some(last) = self.keyframes.last_mut() {
            last.easing = None;
        }
        self.rebuild_views();
        Some(removed)
    }

    /// Assign or clear the easing anchored at a keyframe.
    ///
    /// Assigning requires a following keyframe for the span to cover;
    /// a dangling assignment is rejected.
    pub fn set_easing(&mut self, key: KeyframeId, easing: Option<Easing>) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        if easing.is_some() && index + 1 >= self.keyframes.len() {
            tracing::warn!(property = %self.property, "easing assignment without a following keyframe rejected");
            return false;
        }
        self.keyframes[index].easing = easing;
        self.rebuild_views();
        true
    }

    /// Views in keyframe order
    pub fn views(&self) -> impl Iterator<Item = &TrackView> {
        self.views.values()
    }

    /// Mutable views in keyframe order
    pub fn views_mut(&mut self) -> impl Iterator<Item = &mut TrackView> {
        self.views.values_mut()
    }

    /// The view representing a keyframe, if it has one
    pub fn view(&self, key: KeyframeId) -> Option<&TrackView> {
        self.views.get(&key)
    }

    /// Mutable access to a keyframe's view (drag state updates)
    pub fn view_mut(&mut self, key: KeyframeId) -> Option<&mut TrackView> {
        self.views.get_mut(&key)
    }

    /// Recompute the view map from keyframe state.
    ///
    /// Rules, per keyframe in time order:
    /// - easing set and a successor exists: a transition anchored here
    ///   (the span [time, next.time]); no handle.
    /// - predecessor carries an easing: no view of its own — the span's
    ///   right edge stands in for it.
    /// - easing set but no successor: no view (nothing to span).
    /// - otherwise: a handle.
    ///
    /// In-flight drag state survives for keyframes whose representation
    /// kind is unchanged.
    pub fn rebuild_views(&mut self) {
        let old = std::mem::take(&mut self.views);
        let mut views = IndexMap::with_capacity(self.keyframes.len());

        for (index, keyframe) in self.keyframes.iter().enumerate() {
            let has_next = index + 1 < self.keyframes.len();
            let covered_by_prev = index
                .checked_sub(1)
                .is_some_and(|i| self.keyframes[i].easing.is_some());

            let view = if keyframe.easing.is_some() && has_next {
                Some(TrackView::transition(keyframe.id))
            } else if covered_by_prev || keyframe.easing.is_some() {
                None
            } else {
                Some(TrackView::handle(keyframe.id))
            };

            if let Some(mut view) = view {
                if let Some(previous) = old.get(&keyframe.id) {
                    if std::mem::discriminant(previous) == std::mem::discriminant(&view) {
                        view = previous.clone();
                    }
                }
                views.insert(keyframe.id, view);
            }
        }

        self.views = views;
    }

    /// Update the shared horizontal scroll value; view positions are a
    /// pure function of time and scroll, so this repositions everything.
    pub fn set_scroll_value(&mut self, value: i32) {
        self.scroll_value = value;
    }

    /// Update the shared playhead position
    pub fn set_playhead(&mut self, playhead: TimeMs) {
        self.playhead = playhead;
    }

    /// Validate a proposed keyframe move against its temporal neighbors.
    ///
    /// Accepts iff the time is non-negative and stays strictly between
    /// the neighbors. Returns the command to push on acceptance with an
    /// actual change; the command performs the mutation, never this
    /// function. Rejection is a silent no-op.
    pub fn propose_move_keyframe(&self, key: KeyframeId, time: TimeMs) -> Option<EditCommand> {
        let index = self.index_of(key)?;
        let current = self.keyframes[index].time;

        if time < 0 {
            return None;
        }
        if let Some(next) = self.keyframes.get(index + 1) {
            if next.time <= time {
                return None;
            }
        }
        if let Some(prev) = index.checked_sub(1).map(|i| &self.keyframes[i]) {
            if prev.time >= time {
                return None;
            }
        }
        if time == current {
            return None;
        }

        Some(EditCommand::MoveKeyframe {
            track: self.id,
            key,
            from: current,
            to: time,
        })
    }

    /// Validate a proposed transition move (anchor keyframe dragged,
    /// span duration preserved).
    ///
    /// The shifted right edge must stay strictly below the keyframe after
    /// the span; the left edge strictly above the predecessor. A
    /// transition without a following keyframe cannot exist; that case is
    /// an invariant violation and is rejected outright.
    pub fn propose_move_transition(&self, key: KeyframeId, time: TimeMs) -> Option<EditCommand> {
        let index = self.index_of(key)?;
        let anchor = &self.keyframes[index];

        let Some(next) = self.keyframes.get(index + 1) else {
            debug_assert!(false, "transition anchored at a keyframe without successor");
            tracing::warn!(property = %self.property, "transition without successor; move rejected");
            return None;
        };
        let span = next.time - anchor.time;

        if time < 0 {
            return None;
        }
        if let Some(next_next) = self.keyframes.get(index + 2) {
            if next_next.time <= span + time {
                return None;
            }
        }
        if let Some(prev) = index.checked_sub(1).map(|i| &self.keyframes[i]) {
            if prev.time >= time {
                return None;
            }
        }
        if time == anchor.time {
            return None;
        }

        Some(EditCommand::MoveTransition {
            track: self.id,
            key,
            from: anchor.time,
            to: time,
        })
    }

    /// Set a keyframe's time. Command-layer entry point: preconditions
    /// were validated before the command was constructed.
    pub(crate) fn apply_keyframe_time(&mut self, key: KeyframeId, time: TimeMs) {
        if let Some(index) = self.index_of(key) {
            self.keyframes[index].time = time;
            self.keyframes.sort_by_key(|k| k.time);
        }
    }

    /// Shift a transition's anchor and successor together, preserving the
    /// span duration. Command-layer entry point.
    pub(crate) fn apply_transition_time(&mut self, key: KeyframeId, time: TimeMs) {
        let Some(index) = self.index_of(key) else {
            return;
        };
        let delta = time - self.keyframes[index].time;
        self.keyframes[index].time = time;
        if let Some(next) = self.keyframes.get_mut(index + 1) {
            next.time += delta;
        }
        self.keyframes.sort_by_key(|k| k.time);
    }

    /// Queue a structural edit request for the document owner
    pub fn push_request(&mut self, request: EditRequest) {
        self.requests.push(request);
    }

    /// Drain pending edit requests
    pub fn take_requests(&mut self) -> Vec<EditRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Time of the last keyframe
    pub fn content_duration(&self) -> TimeMs {
        self.keyframes.last().map_or(0, |k| k.time)
    }

    /// Evaluate the track at a time.
    ///
    /// Outside the keyed range the boundary value holds. A segment with
    /// easing interpolates through its curve; a segment without easing
    /// holds its left value until the next keyframe.
    pub fn evaluate(&self, time: TimeMs) -> Option<PropertyValue> {
        let first = self.keyframes.first()?;
        if time <= first.time {
            return Some(first.value);
        }
        let last = self.keyframes.last()?;
        if time >= last.time {
            return Some(last.value);
        }

        let next_index = self.keyframes.iter().position(|k| k.time > time)?;
        let a = &self.keyframes[next_index - 1];
        let b = &self.keyframes[next_index];

        match a.easing {
            None => Some(a.value),
            Some(easing) => {
                let fraction = (time - a.time) as f64 / (b.time - a.time) as f64;
                Some(a.value.interpolate(&b.value, easing.apply(fraction)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(times: &[TimeMs]) -> (PropertyTrack, Vec<KeyframeId>) {
        let mut track = PropertyTrack::new(ItemId::new(), "left");
        let ids = times
            .iter()
            .map(|&t| {
                track
                    .insert_keyframe(Keyframe::new(t, PropertyValue::Float(t as f64)))
                    .unwrap()
            })
            .collect();
        (track, ids)
    }

    #[test]
    fn test_insert_keeps_time_order() {
        let (track, _) = track_with(&[200, 0, 100]);
        let times: Vec<_> = track.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0, 100, 200]);
    }

    #[test]
    fn test_insert_at_occupied_time_updates_value() {
        let (mut track, ids) = track_with(&[0, 100]);
        let updated = track
            .insert_keyframe(Keyframe::new(100, PropertyValue::Float(7.0)))
            .unwrap();
        assert_eq!(updated, ids[1]);
        assert_eq!(track.keyframe_count(), 2);
        assert_eq!(track.keyframe(ids[1]).unwrap().value, PropertyValue::Float(7.0));
    }

    #[test]
    fn test_master_row_rejects_keyframes() {
        let mut master = PropertyTrack::master(ItemId::new());
        // debug_assert fires under cfg(test); verify the release-path guard
        if !cfg!(debug_assertions) {
            assert!(master.insert_keyframe(Keyframe::new(0, PropertyValue::Int(0))).is_none());
            assert_eq!(master.keyframe_count(), 0);
        }
        assert!(master.is_master());
    }

    #[test]
    fn test_move_between_neighbors_accepted() {
        let (track, ids) = track_with(&[0, 100, 200]);
        for time in [1, 50, 150, 199] {
            assert!(track.propose_move_keyframe(ids[1], time).is_some(), "time {time}");
        }
    }

    #[test]
    fn test_move_onto_or_past_neighbors_rejected() {
        let (track, ids) = track_with(&[0, 100, 200]);
        for time in [0, -5, 200, 250] {
            assert!(track.propose_move_keyframe(ids[1], time).is_none(), "time {time}");
        }
        // first keyframe may move to 0 only from elsewhere; negative never
        assert!(track.propose_move_keyframe(ids[0], -1).is_none());
    }

    #[test]
    fn test_move_to_same_time_produces_no_command() {
        let (track, ids) = track_with(&[0, 100, 200]);
        assert!(track.propose_move_keyframe(ids[1], 100).is_none());
    }

    #[test]
    fn test_endpoints_unbounded_on_open_side() {
        let (track, ids) = track_with(&[0, 100]);
        assert!(track.propose_move_keyframe(ids[1], 5_000).is_some());
        assert!(track.propose_move_keyframe(ids[0], 99).is_some());
    }

    #[test]
    fn test_lone_handles_by_default() {
        let (track, ids) = track_with(&[0, 100, 200]);
        assert_eq!(track.views().count(), 3);
        for id in &ids {
            assert!(!track.view(*id).unwrap().is_transition());
        }
    }

    #[test]
    fn test_transition_replaces_both_endpoint_handles() {
        let (mut track, ids) = track_with(&[0, 100, 200]);
        assert!(track.set_easing(ids[0], Some(Easing::Linear)));

        let transition = track.view(ids[0]).unwrap();
        assert!(transition.is_transition());
        // covered successor loses its lone handle; the last keyframe keeps its own
        assert!(track.view(ids[1]).is_none());
        assert!(track.view(ids[2]).is_some());
        assert_eq!(track.views().count(), 2);
    }

    #[test]
    fn test_easing_without_successor_rejected() {
        let (mut track, ids) = track_with(&[0, 100]);
        assert!(!track.set_easing(ids[1], Some(Easing::OutQuad)));
        assert!(track.keyframe(ids[1]).unwrap().easing.is_none());
    }

    #[test]
    fn test_clearing_easing_restores_handles() {
        let (mut track, ids) = track_with(&[0, 100]);
        track.set_easing(ids[0], Some(Easing::Linear));
        assert!(track.view(ids[1]).is_none());

        track.set_easing(ids[0], None);
        assert!(track.view(ids[0]).is_some());
        assert!(track.view(ids[1]).is_some());
        assert_eq!(track.views().count(), 2);
    }

    #[test]
    fn test_deleting_anchor_removes_transition_view() {
        let (mut track, ids) = track_with(&[0, 100, 200]);
        track.set_easing(ids[0], Some(Easing::Linear));
        assert!(track.view(ids[0]).unwrap().is_transition());

        track.remove_keyframe(ids[0]);
        // no orphaned view referencing the deleted keyframe
        assert!(track.view(ids[0]).is_none());
        assert!(track.view(ids[1]).is_some());
        assert!(!track.view(ids[1]).unwrap().is_transition());
    }

    #[test]
    fn test_transition_move_preserves_span() {
        let (mut track, ids) = track_with(&[0, 100, 400]);
        track.set_easing(ids[0], Some(Easing::Linear));

        let command = track.propose_move_transition(ids[0], 50).unwrap();
        assert!(matches!(command, EditCommand::MoveTransition { from: 0, to: 50, .. }));

        track.apply_transition_time(ids[0], 50);
        let times: Vec<_> = track.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![50, 150, 400]);
    }

    #[test]
    fn test_transition_move_bounded_by_next_next() {
        let (mut track, ids) = track_with(&[0, 100, 200]);
        track.set_easing(ids[0], Some(Easing::Linear));
        // span 100: right edge at proposed+100 must stay below 200
        assert!(track.propose_move_transition(ids[0], 99).is_some());
        assert!(track.propose_move_transition(ids[0], 100).is_none());
        assert!(track.propose_move_transition(ids[0], -1).is_none());
    }

    #[test]
    fn test_transition_move_bounded_by_prev() {
        let (mut track, ids) = track_with(&[0, 100, 200, 600]);
        track.set_easing(ids[1], Some(Easing::Linear));
        assert!(track.propose_move_transition(ids[1], 0).is_none());
        assert!(track.propose_move_transition(ids[1], 1).is_some());
    }

    #[test]
    fn test_evaluate_holds_without_easing() {
        let (track, _) = track_with(&[0, 100]);
        assert_eq!(track.evaluate(50), Some(PropertyValue::Float(0.0)));
        assert_eq!(track.evaluate(100), Some(PropertyValue::Float(100.0)));
        assert_eq!(track.evaluate(500), Some(PropertyValue::Float(100.0)));
    }

    #[test]
    fn test_evaluate_eases_across_span() {
        let (mut track, ids) = track_with(&[0, 100]);
        track.set_easing(ids[0], Some(Easing::Linear));
        assert_eq!(track.evaluate(50), Some(PropertyValue::Float(50.0)));
        let eased = track.evaluate(25).unwrap().as_f64();
        assert!((eased - 25.0).abs() < 1e-9);
    }
}
