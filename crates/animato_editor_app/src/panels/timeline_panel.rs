// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline panel: transport controls plus the per-item track rows.

use crate::state::EditorState;
use animato_editor_timeline::{track_row, TimeMs, TrackEdit, TrackId, SCROLL_UNIT, TIME_SCALE};

/// Width of the row label column
const LABEL_WIDTH: f32 = 140.0;

/// Timeline panel
pub struct TimelinePanel;

impl TimelinePanel {
    /// Create the timeline panel
    pub fn new() -> Self {
        Self
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        self.transport_bar(ui, state);
        ui.separator();
        self.track_rows(ui, state);

        // structural edits queued by handle/transition context actions
        let requests = state.document.timeline.take_requests();
        if !requests.is_empty() {
            for request in requests {
                state.document.apply_request(request);
            }
            state.dirty = true;
        }
        state.document.pump_events();
    }

    fn transport_bar(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        ui.horizontal(|ui| {
            if ui.button("\u{23ee}").on_hover_text("Go to start").clicked() {
                state.playback.seek(0);
                state.document.timeline.set_playhead(0);
            }
            let play_icon = if state.playback.is_playing() { "\u{23f8}" } else { "\u{25b6}" };
            if ui.button(play_icon).on_hover_text("Play/Pause (Space)").clicked() {
                state.playback.toggle();
            }
            if ui.button("\u{23f9}").on_hover_text("Stop").clicked() {
                state.playback.stop();
                state.document.timeline.set_playhead(0);
            }

            ui.separator();

            let playhead = state.document.timeline.playhead;
            let fps = state.document.scene.fps.max(1);
            let frames = (playhead % 1000) * i64::from(fps) / 1000;
            ui.monospace(format!("{:02}:{:02}:{:02}", playhead / 60_000, playhead / 1000 % 60, frames));

            ui.separator();

            ui.label("Speed:");
            ui.add(
                egui::DragValue::new(&mut state.playback.speed)
                    .range(0.1..=4.0)
                    .speed(0.1)
                    .suffix("x"),
            );

            ui.separator();

            // shared horizontal scroll across every row
            let duration = state.document.timeline.content_duration();
            let max_scroll =
                ((duration / TIME_SCALE) as i32 / SCROLL_UNIT + 2).max(1);
            let mut scroll = state.document.timeline.scroll_value;
            ui.label("Scroll:");
            if ui.add(egui::Slider::new(&mut scroll, 0..=max_scroll)).changed() {
                state.document.timeline.set_scroll_value(scroll);
            }
        });
    }

    fn track_rows(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        let items: Vec<_> = state
            .document
            .scene
            .items()
            .map(|i| (i.id, i.name.clone()))
            .collect();

        let mut edits: Vec<(TrackId, TrackEdit)> = Vec::new();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (item, item_name) in items {
                let track_ids: Vec<TrackId> =
                    state.document.timeline.tracks_for_item(item).map(|t| t.id).collect();

                for track_id in track_ids {
                    let Some(track) = state.document.timeline.track_mut(track_id) else {
                        continue;
                    };
                    let label = if track.is_master() {
                        item_name.clone()
                    } else {
                        format!("  {}", track.property)
                    };
                    let is_master = track.is_master();

                    ui.horizontal(|ui| {
                        let selected = state.selection == Some(item);
                        let response = ui.add_sized(
                            [LABEL_WIDTH, animato_editor_timeline::TRACK_ROW_HEIGHT],
                            egui::SelectableLabel::new(selected && is_master, label),
                        );
                        if response.clicked() {
                            state.selection = Some(item);
                        }

                        let Some(track) = state.document.timeline.track_mut(track_id) else {
                            return;
                        };
                        for edit in track_row(ui, track) {
                            edits.push((track_id, edit));
                        }
                    });
                }
                ui.add_space(2.0);
            }
        });

        for (track_id, edit) in edits {
            self.apply_edit(state, track_id, edit, ui.ctx());
        }
    }

    fn apply_edit(&self, state: &mut EditorState, track_id: TrackId, edit: TrackEdit, ctx: &egui::Context) {
        match edit {
            TrackEdit::SetPlayhead(time) => {
                self.seek(state, time);
            }
            TrackEdit::MoveKeyframe { key, time } => {
                let command = state
                    .document
                    .timeline
                    .track(track_id)
                    .and_then(|t| t.propose_move_keyframe(key, time));
                // rejected moves are silent no-ops; the view snaps back
                if let Some(command) = command {
                    state.push_edit(command);
                }
            }
            TrackEdit::MoveTransition { key, time } => {
                let command = state
                    .document
                    .timeline
                    .track(track_id)
                    .and_then(|t| t.propose_move_transition(key, time));
                if let Some(command) = command {
                    state.push_edit(command);
                }
            }
            TrackEdit::TransitionResized => {
                ctx.request_repaint();
            }
        }
    }

    fn seek(&self, state: &mut EditorState, time: TimeMs) {
        state.playback.seek(time);
        state.document.timeline.set_playhead(time);
    }
}

impl Default for TimelinePanel {
    fn default() -> Self {
        Self::new()
    }
}
