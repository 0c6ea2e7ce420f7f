// SPDX-License-Identifier: MIT OR Apache-2.0
//! The timeline aggregate: every property track of every item, the shared
//! playhead and horizontal scroll, and playback control.

use crate::event::EditRequest;
use crate::keyframe::{PropertyValue, TimeMs};
use crate::track::{PropertyTrack, TrackId};
use animato_editor_scene::{ItemId, SceneEvent};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All property tracks of a document plus shared view state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    /// Tracks in creation order (an item's master row precedes its
    /// property rows)
    tracks: IndexMap<TrackId, PropertyTrack>,
    /// Playhead position shared by every track
    #[serde(skip)]
    pub playhead: TimeMs,
    /// Horizontal scroll value shared by every track
    #[serde(skip)]
    pub scroll_value: i32,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a track by ID
    pub fn track(&self, id: TrackId) -> Option<&PropertyTrack> {
        self.tracks.get(&id)
    }

    /// Get a mutable track by ID
    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut PropertyTrack> {
        self.tracks.get_mut(&id)
    }

    /// Find the track of an (item, property) pair
    pub fn track_for(&self, item: ItemId, property: &str) -> Option<&PropertyTrack> {
        self.tracks
            .values()
            .find(|t| t.item == item && t.property == property)
    }

    /// Find the mutable track of an (item, property) pair
    pub fn track_for_mut(&mut self, item: ItemId, property: &str) -> Option<&mut PropertyTrack> {
        self.tracks
            .values_mut()
            .find(|t| t.item == item && t.property == property)
    }

    /// Ensure an item's master row exists
    pub fn ensure_master(&mut self, item: ItemId) -> TrackId {
        if let Some(track) = self.track_for(item, "") {
            return track.id;
        }
        self.add_track(PropertyTrack::master(item))
    }

    /// Ensure the track of an (item, property) pair exists
    pub fn ensure_track(&mut self, item: ItemId, property: &str) -> TrackId {
        if let Some(track) = self.track_for(item, property) {
            return track.id;
        }
        self.ensure_master(item);
        self.add_track(PropertyTrack::new(item, property))
    }

    /// Insert a track, propagating the shared view state into it
    pub fn add_track(&mut self, mut track: PropertyTrack) -> TrackId {
        track.set_playhead(self.playhead);
        track.set_scroll_value(self.scroll_value);
        track.rebuild_views();
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    /// Tracks of one item in creation order, master row first
    pub fn tracks_for_item(&self, item: ItemId) -> impl Iterator<Item = &PropertyTrack> {
        self.tracks.values().filter(move |t| t.item == item)
    }

    /// All tracks in creation order
    pub fn tracks(&self) -> impl Iterator<Item = &PropertyTrack> {
        self.tracks.values()
    }

    /// Mutable tracks of one item
    pub fn tracks_for_item_mut(&mut self, item: ItemId) -> impl Iterator<Item = &mut PropertyTrack> {
        self.tracks.values_mut().filter(move |t| t.item == item)
    }

    /// Detach every track of an item (delete-item command; the detached
    /// tracks ride on the command for undo)
    pub fn remove_item_tracks(&mut self, item: ItemId) -> Vec<PropertyTrack> {
        let ids: Vec<TrackId> = self
            .tracks
            .values()
            .filter(|t| t.item == item)
            .map(|t| t.id)
            .collect();
        ids.iter()
            .filter_map(|id| self.tracks.shift_remove(id))
            .collect()
    }

    /// Reattach previously detached tracks (undo of delete-item)
    pub fn restore_tracks(&mut self, tracks: Vec<PropertyTrack>) {
        for track in tracks {
            self.add_track(track);
        }
    }

    /// Move the playhead and broadcast it to every track
    pub fn set_playhead(&mut self, playhead: TimeMs) {
        self.playhead = playhead.max(0);
        for track in self.tracks.values_mut() {
            track.set_playhead(self.playhead);
        }
    }

    /// Set the shared horizontal scroll value and broadcast it
    pub fn set_scroll_value(&mut self, value: i32) {
        self.scroll_value = value.max(0);
        for track in self.tracks.values_mut() {
            track.set_scroll_value(self.scroll_value);
        }
    }

    /// Forward a structural scene notification
    pub fn handle_scene_event(&mut self, event: &SceneEvent) {
        match event {
            SceneEvent::ItemAdded(id) => {
                self.ensure_master(*id);
            }
            SceneEvent::ItemRemoved(id) => {
                // usually already detached by the delete-item command
                self.remove_item_tracks(*id);
            }
            SceneEvent::PropertyChanged(_) => {}
        }
    }

    /// Drain edit requests queued by track interaction
    pub fn take_requests(&mut self) -> Vec<EditRequest> {
        let mut requests = Vec::new();
        for track in self.tracks.values_mut() {
            requests.append(&mut track.take_requests());
        }
        requests
    }

    /// Evaluate an animated property at a time
    pub fn evaluate(&self, item: ItemId, property: &str, time: TimeMs) -> Option<PropertyValue> {
        self.track_for(item, property)?.evaluate(time)
    }

    /// Time of the last keyframe across all tracks
    pub fn content_duration(&self) -> TimeMs {
        self.tracks
            .values()
            .map(PropertyTrack::content_duration)
            .max()
            .unwrap_or(0)
    }

    /// Rebuild every track's views (after deserialization)
    pub fn rebuild_all_views(&mut self) {
        for track in self.tracks.values_mut() {
            track.rebuild_views();
        }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped at the start
    #[default]
    Stopped,
    /// Advancing the playhead
    Playing,
    /// Holding the playhead
    Paused,
}

/// Cooperative playback: advanced once per frame from the event loop,
/// never from a background thread.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    /// Playback state
    pub state: PlaybackState,
    /// Playback speed multiplier
    pub speed: f32,
    /// Playhead position with sub-millisecond remainder
    time: f64,
}

impl PlaybackController {
    /// Create a stopped controller
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Stopped,
            speed: 1.0,
            time: 0.0,
        }
    }

    /// Advance by a frame delta and return the new playhead position.
    ///
    /// Playback stops at `duration`.
    pub fn update(&mut self, delta_seconds: f32, duration: TimeMs) -> TimeMs {
        if self.state == PlaybackState::Playing {
            self.time += f64::from(delta_seconds) * f64::from(self.speed) * 1000.0;
            if self.time >= duration as f64 {
                self.time = duration as f64;
                self.state = PlaybackState::Paused;
            }
        }
        self.position()
    }

    /// Current playhead position in milliseconds
    pub fn position(&self) -> TimeMs {
        self.time as TimeMs
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Hold the playhead
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
    }

    /// Toggle play/pause
    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Jump the playhead
    pub fn seek(&mut self, time: TimeMs) {
        self.time = time.max(0) as f64;
    }

    /// True while the playhead advances
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::{Keyframe, PropertyValue};

    #[test]
    fn test_shared_state_broadcast() {
        let mut timeline = Timeline::new();
        let item = ItemId::new();
        timeline.ensure_track(item, "left");
        timeline.set_playhead(500);
        timeline.set_scroll_value(3);

        for track in timeline.tracks_for_item(item) {
            assert_eq!(track.playhead, 500);
            assert_eq!(track.scroll_value, 3);
        }

        // late-added tracks pick the shared state up immediately
        let late = timeline.ensure_track(item, "top");
        let track = timeline.track(late).unwrap();
        assert_eq!(track.playhead, 500);
        assert_eq!(track.scroll_value, 3);
    }

    #[test]
    fn test_master_precedes_property_rows() {
        let mut timeline = Timeline::new();
        let item = ItemId::new();
        timeline.ensure_track(item, "opacity");
        let rows: Vec<&str> = timeline.tracks_for_item(item).map(|t| t.property.as_str()).collect();
        assert_eq!(rows, vec!["", "opacity"]);
    }

    #[test]
    fn test_detach_restore_round_trip() {
        let mut timeline = Timeline::new();
        let item = ItemId::new();
        let track_id = timeline.ensure_track(item, "left");
        timeline
            .track_mut(track_id)
            .unwrap()
            .insert_keyframe(Keyframe::new(100, PropertyValue::Int(1)));

        let detached = timeline.remove_item_tracks(item);
        assert_eq!(detached.len(), 2);
        assert!(timeline.track_for(item, "left").is_none());

        timeline.restore_tracks(detached);
        assert_eq!(timeline.track_for(item, "left").unwrap().keyframe_count(), 1);
        assert_eq!(timeline.content_duration(), 100);
    }

    #[test]
    fn test_playback_stops_at_duration() {
        let mut playback = PlaybackController::new();
        playback.play();
        let position = playback.update(0.5, 300);
        assert_eq!(position, 300);
        assert!(!playback.is_playing());
        assert_eq!(playback.state, PlaybackState::Paused);
    }

    #[test]
    fn test_playback_seek_clamps_to_zero() {
        let mut playback = PlaybackController::new();
        playback.seek(-50);
        assert_eq!(playback.position(), 0);
    }
}
