// SPDX-License-Identifier: MIT OR Apache-2.0
//! Properties panel: edit the selected item and record keyframes.

use crate::state::EditorState;
use animato_editor_scene::{ItemId, ItemKind, PROPERTY_OPACITY};
use animato_editor_timeline::PropertyValue;

/// Properties/inspector panel
pub struct PropertiesPanel {
    new_attribute_name: String,
    new_attribute_value: f64,
}

impl PropertiesPanel {
    /// Create the properties panel
    pub fn new() -> Self {
        Self {
            new_attribute_name: String::new(),
            new_attribute_value: 0.0,
        }
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        let Some(id) = state.selection else {
            ui.weak("No item selected");
            return;
        };
        let Some(item) = state.document.scene.item(id) else {
            ui.weak("No item selected");
            return;
        };

        // snapshot; mutations go through the scene entry points below
        let mut name = item.name.clone();
        let properties = item.animatable_properties();
        let text_content = match &item.kind {
            ItemKind::Text { text, .. } => Some(text.clone()),
            _ => None,
        };
        let is_vector = matches!(item.kind, ItemKind::Vector { .. });

        ui.horizontal(|ui| {
            ui.label("Name:");
            if ui.text_edit_singleline(&mut name).changed() {
                if let Some(item) = state.document.scene.item_mut(id) {
                    item.name = name.clone();
                    state.dirty = true;
                }
            }
        });

        if let Some(mut text) = text_content {
            ui.horizontal(|ui| {
                ui.label("Text:");
                if ui.text_edit_singleline(&mut text).changed() {
                    if let Some(item) = state.document.scene.item_mut(id) {
                        if let ItemKind::Text { text: content, .. } = &mut item.kind {
                            *content = text.clone();
                        }
                    }
                    state.document.scene.notify_property_changed(id);
                    state.dirty = true;
                }
            });
        }

        ui.separator();

        egui::Grid::new("item_properties").num_columns(3).show(ui, |ui| {
            for property in &properties {
                let Some(mut value) = state.document.scene.item(id).and_then(|i| i.property(property)) else {
                    continue;
                };
                ui.label(property);
                if ui.add(egui::DragValue::new(&mut value).speed(1.0)).changed() {
                    state.document.scene.set_item_property(id, property, value);
                    state.dirty = true;
                }
                let record = ui
                    .button("\u{23fa}")
                    .on_hover_text("Insert a keyframe at the playhead");
                if record.clicked() {
                    self.record_keyframe(state, id, property, value);
                }
                ui.end_row();
            }
        });

        if is_vector {
            ui.separator();
            ui.label("Vector attributes");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.new_attribute_name);
                ui.add(egui::DragValue::new(&mut self.new_attribute_value).speed(1.0));
                let valid = !self.new_attribute_name.trim().is_empty();
                if ui.add_enabled(valid, egui::Button::new("Add")).clicked() {
                    let attribute = self.new_attribute_name.trim().to_string();
                    if let Some(item) = state.document.scene.item_mut(id) {
                        item.set_attribute(attribute, self.new_attribute_value);
                    }
                    state.document.scene.notify_property_changed(id);
                    state.dirty = true;
                    self.new_attribute_name.clear();
                }
            });
        }
    }

    fn record_keyframe(&self, state: &mut EditorState, id: ItemId, property: &str, value: f64) {
        let playhead = state.document.timeline.playhead;
        // opacity and vector attributes are integer-valued, geometry floats
        let keyed = if property == PROPERTY_OPACITY || !is_geometry(property) {
            PropertyValue::Int(value.round() as i64)
        } else {
            PropertyValue::Float(value)
        };
        if state.document.add_keyframe(id, property, playhead, keyed, None).is_some() {
            state.dirty = true;
            state.status = format!("Keyframe recorded: {property} @ {playhead} ms");
        }
    }
}

fn is_geometry(property: &str) -> bool {
    matches!(property, "left" | "top" | "width" | "height")
}

impl Default for PropertiesPanel {
    fn default() -> Self {
        Self::new()
    }
}
