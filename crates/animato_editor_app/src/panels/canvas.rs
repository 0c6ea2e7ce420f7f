// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas panel: paints the scene at the playhead.

use crate::state::EditorState;
use animato_editor_scene::{ItemId, ItemKind};
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

/// Scene canvas panel
pub struct CanvasPanel {
    /// Surround color behind the stage
    surround: Color32,
}

struct PaintedItem {
    id: ItemId,
    rect: Rect,
}

impl CanvasPanel {
    /// Create the canvas panel
    pub fn new() -> Self {
        Self {
            surround: Color32::from_gray(25),
        }
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        let available = ui.available_rect_before_wrap();
        let response = ui.interact(available, ui.id().with("canvas"), Sense::click());
        let painter = ui.painter_at(available);
        painter.rect_filled(available, 0.0, self.surround);

        let scene = &state.document.scene;
        let stage_size = Vec2::new(scene.width as f32, scene.height as f32);
        let scale = (available.width() / stage_size.x)
            .min(available.height() / stage_size.y)
            .min(1.0)
            .max(0.05);
        let stage_rect = Rect::from_center_size(available.center(), stage_size * scale);
        painter.rect_filled(stage_rect, 0.0, Color32::WHITE);

        let playhead = state.document.timeline.playhead;
        let mut painted = Vec::new();

        for item in state.document.scene.items() {
            let value = |property: &str| {
                state
                    .document
                    .value_at(item.id, property, playhead)
                    .unwrap_or_default()
            };
            let left = value("left");
            let top = value("top");
            let width = value("width").max(0.0);
            let height = value("height").max(0.0);
            let opacity = (value("opacity").clamp(0.0, 100.0) / 100.0 * 255.0) as u8;

            let item_rect = Rect::from_min_size(
                Pos2::new(
                    stage_rect.min.x + left as f32 * scale,
                    stage_rect.min.y + top as f32 * scale,
                ),
                Vec2::new(width as f32 * scale, height as f32 * scale),
            );
            painted.push(PaintedItem { id: item.id, rect: item_rect });

            match &item.kind {
                ItemKind::Rectangle { fill } => {
                    painter.rect_filled(item_rect, 0.0, with_opacity(*fill, opacity));
                }
                ItemKind::Ellipse { fill } => {
                    painter.add(egui::Shape::convex_polygon(
                        ellipse_points(item_rect),
                        with_opacity(*fill, opacity),
                        Stroke::NONE,
                    ));
                }
                ItemKind::Text { text, color } => {
                    painter.text(
                        item_rect.left_center(),
                        egui::Align2::LEFT_CENTER,
                        text,
                        egui::FontId::proportional((item_rect.height() * 0.8).max(8.0)),
                        with_opacity(*color, opacity),
                    );
                }
                ItemKind::Vector { .. } => {
                    painter.rect_filled(item_rect, 2.0, with_opacity([120, 144, 156, 255], opacity));
                    painter.text(
                        item_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        &item.name,
                        egui::FontId::proportional(10.0),
                        Color32::WHITE,
                    );
                }
            }
        }

        // selection outline
        if let Some(selected) = state.selection {
            if let Some(item) = painted.iter().find(|p| p.id == selected) {
                painter.rect_stroke(item.rect.expand(1.0), 0.0, Stroke::new(1.5, Color32::LIGHT_BLUE));
            }
        }

        // click selects the topmost item under the cursor
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                state.selection = painted.iter().rev().find(|p| p.rect.contains(pos)).map(|p| p.id);
            }
        }
    }
}

impl Default for CanvasPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn with_opacity(color: [u8; 4], opacity: u8) -> Color32 {
    let alpha = (u16::from(color[3]) * u16::from(opacity) / 255) as u8;
    Color32::from_rgba_unmultiplied(color[0], color[1], color[2], alpha)
}

fn ellipse_points(rect: Rect) -> Vec<Pos2> {
    let center = rect.center();
    let radius = rect.size() / 2.0;
    (0..32)
        .map(|i| {
            let angle = i as f32 / 32.0 * std::f32::consts::TAU;
            Pos2::new(
                center.x + angle.cos() * radius.x,
                center.y + angle.sin() * radius.y,
            )
        })
        .collect()
}
