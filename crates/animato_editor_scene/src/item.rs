// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene items and their animatable properties.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Create a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in animatable property names shared by every item kind.
pub const PROPERTY_LEFT: &str = "left";
/// Vertical position property name.
pub const PROPERTY_TOP: &str = "top";
/// Width property name.
pub const PROPERTY_WIDTH: &str = "width";
/// Height property name.
pub const PROPERTY_HEIGHT: &str = "height";
/// Opacity property name (0..100).
pub const PROPERTY_OPACITY: &str = "opacity";

/// RGBA color, straight alpha
pub type Rgba = [u8; 4];

/// The concrete shape of a scene item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemKind {
    /// Filled rectangle
    Rectangle {
        /// Fill color
        fill: Rgba,
    },
    /// Filled ellipse
    Ellipse {
        /// Fill color
        fill: Rgba,
    },
    /// Text label
    Text {
        /// Text content
        text: String,
        /// Text color
        color: Rgba,
    },
    /// Imported vector graphic (raw SVG bytes plus attribute overrides)
    Vector {
        /// Raw SVG document
        data: Vec<u8>,
        /// Animatable attribute overrides keyed by attribute name
        attributes: IndexMap<String, f64>,
    },
}

impl ItemKind {
    /// Display name for trees and menus
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "Rectangle",
            Self::Ellipse { .. } => "Ellipse",
            Self::Text { .. } => "Text",
            Self::Vector { .. } => "Vector",
        }
    }
}

/// An item placed on the scene.
///
/// Geometry and opacity are the base (unanimated) values; during playback
/// the timeline evaluates keyframes and overrides them per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneItem {
    /// Unique item ID
    pub id: ItemId,
    /// User-visible name
    pub name: String,
    /// Shape payload
    pub kind: ItemKind,
    /// Horizontal position on the stage
    pub left: f64,
    /// Vertical position on the stage
    pub top: f64,
    /// Width in stage units
    pub width: f64,
    /// Height in stage units
    pub height: f64,
    /// Opacity in percent (0..100)
    pub opacity: f64,
}

impl SceneItem {
    /// Create a new item with the given shape and geometry
    pub fn new(name: impl Into<String>, kind: ItemKind, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            left,
            top,
            width,
            height,
            opacity: 100.0,
        }
    }

    /// Names of the properties this item can animate, in display order.
    ///
    /// Vector items additionally expose their attribute overrides.
    pub fn animatable_properties(&self) -> Vec<String> {
        let mut names: Vec<String> = [
            PROPERTY_LEFT,
            PROPERTY_TOP,
            PROPERTY_WIDTH,
            PROPERTY_HEIGHT,
            PROPERTY_OPACITY,
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

        if let ItemKind::Vector { attributes, .. } = &self.kind {
            names.extend(attributes.keys().cloned());
        }

        names
    }

    /// Read an animatable property by name
    pub fn property(&self, name: &str) -> Option<f64> {
        match name {
            PROPERTY_LEFT => Some(self.left),
            PROPERTY_TOP => Some(self.top),
            PROPERTY_WIDTH => Some(self.width),
            PROPERTY_HEIGHT => Some(self.height),
            PROPERTY_OPACITY => Some(self.opacity),
            _ => match &self.kind {
                ItemKind::Vector { attributes, .. } => attributes.get(name).copied(),
                _ => None,
            },
        }
    }

    /// Write an animatable property by name.
    ///
    /// Returns false when the item has no such property.
    pub fn set_property(&mut self, name: &str, value: f64) -> bool {
        match name {
            PROPERTY_LEFT => self.left = value,
            PROPERTY_TOP => self.top = value,
            PROPERTY_WIDTH => self.width = value.max(0.0),
            PROPERTY_HEIGHT => self.height = value.max(0.0),
            PROPERTY_OPACITY => self.opacity = value.clamp(0.0, 100.0),
            _ => {
                let ItemKind::Vector { attributes, .. } = &mut self.kind else {
                    return false;
                };
                let Some(slot) = attributes.get_mut(name) else {
                    return false;
                };
                *slot = value;
            }
        }
        true
    }

    /// Add (or overwrite) a vector attribute override.
    ///
    /// No-op on non-vector items.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: f64) -> bool {
        if let ItemKind::Vector { attributes, .. } = &mut self.kind {
            attributes.insert(name.into(), value);
            true
        } else {
            false
        }
    }

    /// Remove a vector attribute override
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        if let ItemKind::Vector { attributes, .. } = &mut self.kind {
            attributes.shift_remove(name).is_some()
        } else {
            false
        }
    }

    /// Rename a vector attribute override, keeping its value and position
    pub fn rename_attribute(&mut self, old_name: &str, new_name: impl Into<String>) -> bool {
        let ItemKind::Vector { attributes, .. } = &mut self.kind else {
            return false;
        };
        let Some(index) = attributes.get_index_of(old_name) else {
            return false;
        };
        let value = attributes[index];
        attributes.shift_remove_index(index);
        attributes.shift_insert(index, new_name.into(), value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_property_roundtrip() {
        let mut item = SceneItem::new("Box", ItemKind::Rectangle { fill: [200, 60, 60, 255] }, 10.0, 20.0, 100.0, 50.0);
        assert_eq!(item.property(PROPERTY_LEFT), Some(10.0));
        assert!(item.set_property(PROPERTY_TOP, 42.0));
        assert_eq!(item.property(PROPERTY_TOP), Some(42.0));
        assert!(!item.set_property("bogus", 1.0));
        assert_eq!(item.property("bogus"), None);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut item = SceneItem::new("Box", ItemKind::Rectangle { fill: [0, 0, 0, 255] }, 0.0, 0.0, 1.0, 1.0);
        item.set_property(PROPERTY_OPACITY, 250.0);
        assert_eq!(item.property(PROPERTY_OPACITY), Some(100.0));
        item.set_property(PROPERTY_OPACITY, -5.0);
        assert_eq!(item.property(PROPERTY_OPACITY), Some(0.0));
    }

    #[test]
    fn test_vector_attributes() {
        let mut item = SceneItem::new(
            "Logo",
            ItemKind::Vector {
                data: b"<svg/>".to_vec(),
                attributes: IndexMap::new(),
            },
            0.0,
            0.0,
            64.0,
            64.0,
        );
        assert!(item.set_attribute("rotation", 45.0));
        assert_eq!(item.property("rotation"), Some(45.0));
        assert!(item.set_property("rotation", 90.0));
        assert!(item.rename_attribute("rotation", "angle"));
        assert_eq!(item.property("rotation"), None);
        assert_eq!(item.property("angle"), Some(90.0));
        assert!(item.remove_attribute("angle"));
        assert!(!item.remove_attribute("angle"));
    }

    #[test]
    fn test_attributes_rejected_on_shapes() {
        let mut item = SceneItem::new("Box", ItemKind::Rectangle { fill: [0, 0, 0, 255] }, 0.0, 0.0, 1.0, 1.0);
        assert!(!item.set_attribute("rotation", 1.0));
        assert!(item.animatable_properties().iter().all(|p| p != "rotation"));
    }
}
