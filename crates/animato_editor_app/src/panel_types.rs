// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dockable panel identifiers.

/// The dockable panels of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Scene canvas at the playhead
    Canvas,
    /// Item tree
    Elements,
    /// Selected item properties
    Properties,
    /// Keyframe timeline
    Timeline,
}

impl PanelType {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Canvas => "Canvas",
            Self::Elements => "Elements",
            Self::Properties => "Properties",
            Self::Timeline => "Timeline",
        }
    }

    /// Tab icon glyph
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Canvas => "\u{1f3ac}",
            Self::Elements => "\u{1f4c1}",
            Self::Properties => "\u{2699}",
            Self::Timeline => "\u{23f1}",
        }
    }

    /// All panels, for the View menu
    pub fn all() -> [PanelType; 4] {
        [Self::Canvas, Self::Elements, Self::Properties, Self::Timeline]
    }
}
