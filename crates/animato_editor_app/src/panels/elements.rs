// SPDX-License-Identifier: MIT OR Apache-2.0
//! Elements panel: the item tree and item creation.

use crate::state::EditorState;
use animato_editor_scene::{ItemKind, SceneItem};
use animato_editor_timeline::EditCommand;
use indexmap::IndexMap;

/// Item tree panel
pub struct ElementsPanel;

impl ElementsPanel {
    /// Create the elements panel
    pub fn new() -> Self {
        Self
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        ui.horizontal(|ui| {
            ui.menu_button("\u{2795} Add", |ui| {
                if ui.button("Rectangle").clicked() {
                    self.add_item(state, ItemKind::Rectangle { fill: [255, 127, 42, 255] });
                    ui.close_menu();
                }
                if ui.button("Ellipse").clicked() {
                    self.add_item(state, ItemKind::Ellipse { fill: [100, 150, 255, 255] });
                    ui.close_menu();
                }
                if ui.button("Text").clicked() {
                    self.add_item(
                        state,
                        ItemKind::Text {
                            text: "Text".to_string(),
                            color: [40, 40, 40, 255],
                        },
                    );
                    ui.close_menu();
                }
                if ui.button("Vector\u{2026}").clicked() {
                    self.add_vector_item(state);
                    ui.close_menu();
                }
            });

            let has_selection = state.selection.is_some();
            if ui.add_enabled(has_selection, egui::Button::new("\u{1f5d1} Delete")).clicked() {
                if let Some(id) = state.selection.take() {
                    state.push_edit(EditCommand::delete_item(id));
                }
            }
        });

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            let items: Vec<_> = state
                .document
                .scene
                .items()
                .map(|i| (i.id, i.name.clone(), i.kind.name()))
                .collect();

            for (id, name, kind) in items {
                let selected = state.selection == Some(id);
                if ui.selectable_label(selected, format!("{name}  ({kind})")).clicked() {
                    state.selection = Some(id);
                }
            }
        });
    }

    fn add_item(&self, state: &mut EditorState, kind: ItemKind) {
        let count = state.document.scene.len() + 1;
        let name = format!("{} {count}", kind.name());
        let item = SceneItem::new(name, kind, 50.0, 150.0, 100.0, 200.0);
        let id = item.id;
        state.push_edit(EditCommand::add_item(item));
        state.selection = Some(id);
    }

    fn add_vector_item(&self, state: &mut EditorState) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG images", &["svg"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read(&path) {
            Ok(data) => {
                let name = path
                    .file_stem()
                    .map_or_else(|| "Vector".to_string(), |s| s.to_string_lossy().to_string());
                let kind = ItemKind::Vector {
                    data,
                    attributes: IndexMap::new(),
                };
                let item = SceneItem::new(name, kind, 50.0, 150.0, 100.0, 100.0);
                let id = item.id;
                state.push_edit(EditCommand::add_item(item));
                state.selection = Some(id);
            }
            Err(e) => {
                tracing::error!("Failed to read vector file: {e}");
                state.status = format!("Failed to read {}: {e}", path.display());
            }
        }
    }
}

impl Default for ElementsPanel {
    fn default() -> Self {
        Self::new()
    }
}
