// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene data model for Animato Editor.
//!
//! A scene is an ordered collection of items (rectangles, ellipses, text,
//! imported vector graphics) with a fixed stage size and frame rate. Items
//! expose their animatable properties through a uniform name/value
//! interface; the timeline crate drives those properties from keyframes.
//!
//! Structural changes are reported through a drained event queue rather
//! than callbacks, so consumers (the timeline, the panels) stay decoupled
//! from the widget toolkit.

pub mod item;
pub mod scene;

pub use item::{ItemId, ItemKind, SceneItem, PROPERTY_HEIGHT, PROPERTY_LEFT, PROPERTY_OPACITY, PROPERTY_TOP, PROPERTY_WIDTH};
pub use scene::{Scene, SceneEvent};
