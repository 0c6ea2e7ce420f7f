// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame export: rasterize the animated scene into a numbered PNG
//! sequence at the document frame rate.

use animato_editor_scene::{ItemKind, SceneItem};
use animato_editor_timeline::{Document, TimeMs};
use image::{Rgba, RgbaImage};
use std::path::Path;
use thiserror::Error;

/// Stage background color
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Tint used for vector item silhouettes
const VECTOR_TINT: [u8; 4] = [120, 144, 156, 255];

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// There is nothing keyed to export
    #[error("The timeline has no keyframes")]
    EmptyTimeline,
}

/// Number of frames a duration spans at a frame rate (inclusive of the
/// final frame)
pub fn frame_count(duration: TimeMs, fps: u32) -> u32 {
    (duration as u64 * u64::from(fps) / 1000) as u32 + 1
}

/// Render every frame into `dir` as `frame_0000.png`, `frame_0001.png`, …
///
/// Returns the number of frames written.
pub fn export_frames(document: &Document, dir: &Path) -> Result<usize, ExportError> {
    let duration = document.timeline.content_duration();
    if duration == 0 {
        return Err(ExportError::EmptyTimeline);
    }
    let fps = document.scene.fps.max(1);
    std::fs::create_dir_all(dir)?;

    let frames = frame_count(duration, fps);
    for frame in 0..frames {
        let time = (i64::from(frame) * 1000) / i64::from(fps);
        let img = render_frame(document, time);
        img.save(dir.join(format!("frame_{frame:04}.png")))?;
    }

    tracing::info!(frames, dir = %dir.display(), "frame export finished");
    Ok(frames as usize)
}

/// Rasterize the scene at a point in time.
///
/// Rectangles and ellipses render as true fills; text and vector items
/// render as flat silhouettes (glyph and SVG rasterization live in the
/// GUI layer, not here).
pub fn render_frame(document: &Document, time: TimeMs) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(document.scene.width, document.scene.height, BACKGROUND);

    for item in document.scene.items() {
        let left = animated(document, item, "left", time);
        let top = animated(document, item, "top", time);
        let width = animated(document, item, "width", time).max(0.0);
        let height = animated(document, item, "height", time).max(0.0);
        let opacity = animated(document, item, "opacity", time).clamp(0.0, 100.0) / 100.0;

        let mut color = match &item.kind {
            ItemKind::Rectangle { fill } | ItemKind::Ellipse { fill } => *fill,
            ItemKind::Text { color, .. } => *color,
            ItemKind::Vector { .. } => VECTOR_TINT,
        };
        color[3] = (f64::from(color[3]) * opacity).round() as u8;
        if color[3] == 0 {
            continue;
        }

        let elliptic = matches!(item.kind, ItemKind::Ellipse { .. });
        fill_region(&mut img, left, top, width, height, color, elliptic);
    }

    img
}

fn animated(document: &Document, item: &SceneItem, property: &str, time: TimeMs) -> f64 {
    document
        .value_at(item.id, property, time)
        .unwrap_or_default()
}

fn fill_region(img: &mut RgbaImage, left: f64, top: f64, width: f64, height: f64, color: [u8; 4], elliptic: bool) {
    let x0 = left.floor().max(0.0) as u32;
    let y0 = top.floor().max(0.0) as u32;
    let x1 = ((left + width).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((top + height).ceil().max(0.0) as u32).min(img.height());

    let cx = left + width / 2.0;
    let cy = top + height / 2.0;
    let rx = (width / 2.0).max(f64::EPSILON);
    let ry = (height / 2.0).max(f64::EPSILON);

    for y in y0..y1 {
        for x in x0..x1 {
            if elliptic {
                let dx = (f64::from(x) + 0.5 - cx) / rx;
                let dy = (f64::from(y) + 0.5 - cy) / ry;
                if dx * dx + dy * dy > 1.0 {
                    continue;
                }
            }
            blend_pixel(img.get_pixel_mut(x, y), color);
        }
    }
}

fn blend_pixel(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let alpha = f64::from(src[3]) / 255.0;
    for channel in 0..3 {
        let blended = f64::from(src[channel]) * alpha + f64::from(dst[channel]) * (1.0 - alpha);
        dst[channel] = blended.round() as u8;
    }
    dst[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use animato_editor_timeline::{Easing, PropertyValue};

    #[test]
    fn test_frame_count_covers_final_frame() {
        assert_eq!(frame_count(1000, 25), 26);
        assert_eq!(frame_count(40, 25), 2);
        assert_eq!(frame_count(999, 25), 25);
    }

    #[test]
    fn test_rectangle_renders_at_animated_position() {
        let mut document = Document::new();
        let item = SceneItem::new("Box", ItemKind::Rectangle { fill: [255, 0, 0, 255] }, 0.0, 0.0, 10.0, 10.0);
        let id = document.attach_item(item);
        let key = document
            .add_keyframe(id, "left", 0, PropertyValue::Float(0.0), None)
            .unwrap();
        document.add_keyframe(id, "left", 1000, PropertyValue::Float(100.0), None);
        document
            .timeline
            .track_for_mut(id, "left")
            .unwrap()
            .set_easing(key, Some(Easing::Linear));

        let img = render_frame(&document, 500);
        // rect sits at x=50 halfway through the move
        assert_eq!(*img.get_pixel(55, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(5, 5), BACKGROUND);
    }

    #[test]
    fn test_opacity_blends_against_background() {
        let mut document = Document::new();
        let mut item = SceneItem::new("Box", ItemKind::Rectangle { fill: [0, 0, 0, 255] }, 0.0, 0.0, 10.0, 10.0);
        item.opacity = 50.0;
        document.attach_item(item);

        let img = render_frame(&document, 0);
        let pixel = img.get_pixel(5, 5);
        assert!(pixel[0] > 100 && pixel[0] < 160, "expected ~50% gray, got {pixel:?}");
    }

    #[test]
    fn test_ellipse_leaves_corners_clear() {
        let mut document = Document::new();
        let item = SceneItem::new("Dot", ItemKind::Ellipse { fill: [0, 0, 255, 255] }, 0.0, 0.0, 20.0, 20.0);
        document.attach_item(item);

        let img = render_frame(&document, 0);
        assert_eq!(*img.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_empty_timeline_is_an_error() {
        let document = Document::new();
        let err = export_frames(&document, Path::new("/nonexistent-dir-not-created")).unwrap_err();
        assert!(matches!(err, ExportError::EmptyTimeline));
    }
}
