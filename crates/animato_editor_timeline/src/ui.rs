// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track row rendering and interaction.
//!
//! Each row paints its background, gridlines and playhead, then its view
//! objects. Drags move the view optimistically; the release position is
//! reported as a proposal and the model only changes if the track's
//! validator accepts it — otherwise the view snaps back.

use crate::event::EditRequest;
use crate::keyframe::{KeyframeId, TimeMs, ALL_EASINGS};
use crate::track::PropertyTrack;
use crate::view::{
    handle_screen_x, span_screen_x, x_to_time, TrackView, HANDLE_HALF_WIDTH, MIN_TRANSITION_WIDTH,
    SCROLL_UNIT, TIME_SCALE, TRACK_ROW_HEIGHT,
};
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

/// Master row fill
const MASTER_ROW_COLOR: Color32 = Color32::from_rgb(76, 78, 80);
/// Property row fill
const PROPERTY_ROW_COLOR: Color32 = Color32::from_rgb(64, 66, 68);
/// Gridline color
const GRIDLINE_COLOR: Color32 = Color32::from_rgb(41, 41, 41);
/// Handle/transition fill (orange at ~60% opacity, premultiplied)
const ORANGE: Color32 = Color32::from_rgba_premultiplied(150, 75, 25, 150);
/// Handle/transition fill while hovered or dragged
const ORANGE_ACTIVE: Color32 = Color32::from_rgb(255, 127, 42);
/// Gridline spacing in pixels (one second at the fixed time scale)
const GRID_SPACING: i32 = 200;
/// Width of the transition resize grip
const GRIP_WIDTH: f32 = 5.0;

/// Edits reported by a track row for the caller to validate and apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEdit {
    /// A handle was released at a proposed time
    MoveKeyframe {
        /// Dragged keyframe
        key: KeyframeId,
        /// Proposed new time
        time: TimeMs,
    },
    /// A transition body was released at a proposed anchor time
    MoveTransition {
        /// Anchor keyframe
        key: KeyframeId,
        /// Proposed new anchor time
        time: TimeMs,
    },
    /// The master row was clicked or dragged to a playhead position
    SetPlayhead(TimeMs),
    /// A transition's visual width changed; repaint only
    TransitionResized,
}

struct ViewSnapshot {
    key: KeyframeId,
    /// Track-local x of the view's left edge, drag offset included
    x: f32,
    width: f32,
    transition: bool,
    /// Unbiased span width in pixels (transitions only)
    span_px: f32,
    /// Width floor/ceiling for resize clamping (transitions only)
    min_width: f32,
    max_width: f32,
    has_next: bool,
}

/// Show one track row; returns the edits to validate and apply.
pub fn track_row(ui: &mut egui::Ui, track: &mut PropertyTrack) -> Vec<TrackEdit> {
    let mut edits = Vec::new();

    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), TRACK_ROW_HEIGHT),
        Sense::hover(),
    );
    if !ui.is_rect_visible(rect) {
        return edits;
    }

    paint_row_chrome(ui, rect, track);

    if track.is_master() {
        // the master row doubles as the playhead ruler
        let response = ui.interact(rect, ui.id().with((track.id, "ruler")), Sense::click_and_drag());
        if response.clicked() || response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let time = x_to_time(pos.x - rect.min.x, track.scroll_value).max(0);
                edits.push(TrackEdit::SetPlayhead(time));
            }
        }
        return edits;
    }

    for snapshot in snapshot_views(track) {
        if snapshot.x + snapshot.width < 0.0 || snapshot.x > rect.width() {
            continue;
        }
        if snapshot.transition {
            transition_interaction(ui, rect, track, &snapshot, &mut edits);
        } else {
            handle_interaction(ui, rect, track, &snapshot, &mut edits);
        }
    }

    edits
}

fn paint_row_chrome(ui: &egui::Ui, rect: Rect, track: &PropertyTrack) {
    let painter = ui.painter_at(rect);
    let fill = if track.is_master() {
        MASTER_ROW_COLOR
    } else {
        PROPERTY_ROW_COLOR
    };
    painter.rect_filled(rect, 0.0, fill);

    // gridlines every second, shifted by the shared scroll value
    let offset = track.scroll_value * SCROLL_UNIT;
    let mut k = (GRID_SPACING - 1) - offset % GRID_SPACING;
    let mut grid_time = (offset / GRID_SPACING + 1) as i64;
    while (k as f32) < rect.width() {
        if k >= 0 {
            let x = rect.min.x + k as f32;
            painter.line_segment(
                [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
                Stroke::new(1.0, GRIDLINE_COLOR),
            );
            if track.is_master() {
                painter.text(
                    Pos2::new(x + 3.0, rect.min.y + 2.0),
                    egui::Align2::LEFT_TOP,
                    format!("{grid_time}s"),
                    egui::FontId::monospace(9.0),
                    Color32::from_gray(160),
                );
            }
        }
        k += GRID_SPACING;
        grid_time += 1;
    }

    let playhead_x = (track.playhead / TIME_SCALE) as f32 - 1.0 - offset as f32;
    if playhead_x >= 0.0 && playhead_x <= rect.width() {
        let x = rect.min.x + playhead_x;
        painter.line_segment(
            [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
            Stroke::new(1.0, Color32::RED),
        );
    }
}

fn snapshot_views(track: &PropertyTrack) -> Vec<ViewSnapshot> {
    let keyframes = track.keyframes();
    let mut snapshots = Vec::new();

    for view in track.views() {
        let key = view.key();
        let Some(index) = track.index_of(key) else {
            continue;
        };
        let keyframe = &keyframes[index];

        match view {
            TrackView::Handle(handle) => {
                snapshots.push(ViewSnapshot {
                    key,
                    x: handle_screen_x(keyframe.time, track.scroll_value) + handle.drag_offset,
                    width: 2.0 * HANDLE_HALF_WIDTH,
                    transition: false,
                    span_px: 0.0,
                    min_width: 0.0,
                    max_width: 0.0,
                    has_next: index + 1 < keyframes.len(),
                });
            }
            TrackView::Transition(transition) => {
                let Some(next) = keyframes.get(index + 1) else {
                    continue;
                };
                let span_px = ((next.time - keyframe.time) / TIME_SCALE) as f32;
                // the right edge may not cross the keyframe after the span
                let max_width = keyframes
                    .get(index + 2)
                    .map_or(f32::INFINITY, |after| {
                        span_screen_x(after.time, track.scroll_value)
                            - span_screen_x(keyframe.time, track.scroll_value)
                            - 1.0
                    });
                let width = (span_px + transition.width_bias)
                    .clamp(MIN_TRANSITION_WIDTH, max_width.max(MIN_TRANSITION_WIDTH));
                snapshots.push(ViewSnapshot {
                    key,
                    x: span_screen_x(keyframe.time, track.scroll_value) + transition.drag_offset,
                    width,
                    transition: true,
                    span_px,
                    min_width: MIN_TRANSITION_WIDTH,
                    max_width,
                    has_next: true,
                });
            }
        }
    }

    snapshots
}

fn handle_interaction(
    ui: &mut egui::Ui,
    rect: Rect,
    track: &mut PropertyTrack,
    snapshot: &ViewSnapshot,
    edits: &mut Vec<TrackEdit>,
) {
    let handle_rect = Rect::from_min_size(
        Pos2::new(rect.min.x + snapshot.x, rect.min.y + 2.0),
        Vec2::new(2.0 * HANDLE_HALF_WIDTH, TRACK_ROW_HEIGHT - 4.0),
    );
    let response = ui.interact(
        handle_rect,
        ui.id().with((track.id, snapshot.key, "handle")),
        Sense::click_and_drag(),
    );

    let mut x = snapshot.x;
    if response.dragged() {
        if let Some(TrackView::Handle(handle)) = track.view_mut(snapshot.key) {
            handle.drag_offset += response.drag_delta().x;
        }
        x = snapshot.x + response.drag_delta().x;
    }
    if response.drag_stopped() {
        let time = x_to_time(x + HANDLE_HALF_WIDTH, track.scroll_value);
        edits.push(TrackEdit::MoveKeyframe { key: snapshot.key, time });
        if let Some(view) = track.view_mut(snapshot.key) {
            view.reset_drag();
        }
    }

    response.context_menu(|ui| {
        ui.add_enabled_ui(snapshot.has_next, |ui| {
            ui.menu_button("Add Transition", |ui| {
                for easing in ALL_EASINGS {
                    if ui.button(easing.name()).clicked() {
                        track.push_request(EditRequest::AddTransition {
                            item: track.item,
                            property: track.property.clone(),
                            key: snapshot.key,
                            easing,
                        });
                        ui.close_menu();
                    }
                }
            });
        });
        if ui.button("Delete Keyframe").clicked() {
            track.push_request(EditRequest::DeleteKeyframe {
                item: track.item,
                property: track.property.clone(),
                key: snapshot.key,
            });
            ui.close_menu();
        }
    });

    // diamond centered on the keyframe time
    let center = Pos2::new(rect.min.x + x + HANDLE_HALF_WIDTH, rect.center().y);
    let color = if response.hovered() || response.dragged() {
        ORANGE_ACTIVE
    } else {
        ORANGE
    };
    let diamond = vec![
        Pos2::new(center.x, center.y - HANDLE_HALF_WIDTH),
        Pos2::new(center.x + HANDLE_HALF_WIDTH, center.y),
        Pos2::new(center.x, center.y + HANDLE_HALF_WIDTH),
        Pos2::new(center.x - HANDLE_HALF_WIDTH, center.y),
    ];
    ui.painter_at(rect).add(egui::Shape::convex_polygon(
        diamond,
        color,
        Stroke::new(1.0, Color32::from_gray(40)),
    ));
}

fn transition_interaction(
    ui: &mut egui::Ui,
    rect: Rect,
    track: &mut PropertyTrack,
    snapshot: &ViewSnapshot,
    edits: &mut Vec<TrackEdit>,
) {
    let span_rect = Rect::from_min_size(
        Pos2::new(rect.min.x + snapshot.x, rect.min.y + 1.0),
        Vec2::new(snapshot.width, TRACK_ROW_HEIGHT - 2.0),
    );
    let grip_rect = Rect::from_min_max(
        Pos2::new(span_rect.max.x - GRIP_WIDTH, span_rect.min.y),
        span_rect.max,
    );
    let body_rect = Rect::from_min_max(span_rect.min, Pos2::new(grip_rect.min.x, span_rect.max.y));

    // right-edge grip: cosmetic width only, the anchor time never moves
    let grip_response = ui.interact(
        grip_rect,
        ui.id().with((track.id, snapshot.key, "grip")),
        Sense::drag(),
    );
    if grip_response.dragged() {
        if let Some(TrackView::Transition(transition)) = track.view_mut(snapshot.key) {
            transition.width_bias = (transition.width_bias + grip_response.drag_delta().x)
                .clamp(snapshot.min_width - snapshot.span_px, snapshot.max_width - snapshot.span_px);
            edits.push(TrackEdit::TransitionResized);
        }
    }

    let body_response = ui.interact(
        body_rect,
        ui.id().with((track.id, snapshot.key, "body")),
        Sense::click_and_drag(),
    );
    let mut x = snapshot.x;
    if body_response.dragged() {
        if let Some(TrackView::Transition(transition)) = track.view_mut(snapshot.key) {
            transition.drag_offset += body_response.drag_delta().x;
            x = snapshot.x + body_response.drag_delta().x;
        }
    }
    if body_response.drag_stopped() {
        let time = x_to_time(x, track.scroll_value);
        edits.push(TrackEdit::MoveTransition { key: snapshot.key, time });
        if let Some(view) = track.view_mut(snapshot.key) {
            view.reset_drag();
        }
    }

    body_response.context_menu(|ui| {
        ui.menu_button("Easing", |ui| {
            for easing in ALL_EASINGS {
                if ui.button(easing.name()).clicked() {
                    track.push_request(EditRequest::AddTransition {
                        item: track.item,
                        property: track.property.clone(),
                        key: snapshot.key,
                        easing,
                    });
                    ui.close_menu();
                }
            }
        });
        if ui.button("Remove Transition").clicked() {
            track.push_request(EditRequest::RemoveTransition {
                item: track.item,
                property: track.property.clone(),
                key: snapshot.key,
            });
            ui.close_menu();
        }
    });

    let active = body_response.hovered()
        || body_response.dragged()
        || grip_response.hovered()
        || grip_response.dragged();
    let color = if active { ORANGE_ACTIVE } else { ORANGE };
    let painter = ui.painter_at(rect);
    let painted = Rect::from_min_size(
        Pos2::new(rect.min.x + x, span_rect.min.y),
        span_rect.size(),
    );
    painter.rect_filled(painted, 3.0, color);
    painter.line_segment(
        [
            Pos2::new(painted.max.x - GRIP_WIDTH + 1.0, painted.min.y + 3.0),
            Pos2::new(painted.max.x - GRIP_WIDTH + 1.0, painted.max.y - 3.0),
        ],
        Stroke::new(1.0, Color32::from_gray(60)),
    );
}
