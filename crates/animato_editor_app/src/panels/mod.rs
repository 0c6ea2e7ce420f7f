// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dockable editor panels.

pub mod canvas;
pub mod elements;
pub mod properties;
pub mod timeline_panel;

pub use canvas::CanvasPanel;
pub use elements::ElementsPanel;
pub use properties::PropertiesPanel;
pub use timeline_panel::TimelinePanel;
