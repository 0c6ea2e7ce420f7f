// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document persistence.
//!
//! The project file is binary: a fixed magic number, a monotonically
//! increasing format version, then the bincode-encoded document. Loading
//! validates the header before touching the payload, so a failed load
//! leaves the open document untouched.

use animato_editor_timeline::Document;
use std::path::Path;
use thiserror::Error;

/// File format magic number
pub const MAGIC: u32 = 0xA0B0_C0D0;
/// Version written by this build
pub const CURRENT_VERSION: u32 = 1;
/// Oldest version this build can read
pub const MIN_SUPPORTED_VERSION: u32 = 1;
/// Project file extension
pub const FILE_EXTENSION: &str = "anim";

/// Document persistence errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File too short to hold the header
    #[error("File is truncated")]
    Truncated,

    /// Not a project file
    #[error("Bad file format (wrong magic number)")]
    BadMagic,

    /// Written by a build too old to read
    #[error("File version {0} is too old (oldest supported is {MIN_SUPPORTED_VERSION})")]
    VersionTooOld(u32),

    /// Written by a newer build
    #[error("File version {0} is too new (newest supported is {CURRENT_VERSION})")]
    VersionTooNew(u32),

    /// Payload encoding/decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Encode a document with the file header
pub fn encode_document(document: &Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC.to_be_bytes());
    bytes.extend_from_slice(&CURRENT_VERSION.to_be_bytes());
    bincode::serialize_into(&mut bytes, document)?;
    Ok(bytes)
}

/// Decode a document, validating the header first
pub fn decode_document(bytes: &[u8]) -> Result<Document> {
    if bytes.len() < 8 {
        return Err(DocumentError::Truncated);
    }
    let magic = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != MAGIC {
        return Err(DocumentError::BadMagic);
    }
    let version = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version < MIN_SUPPORTED_VERSION {
        return Err(DocumentError::VersionTooOld(version));
    }
    if version > CURRENT_VERSION {
        return Err(DocumentError::VersionTooNew(version));
    }

    let mut document: Document = bincode::deserialize(&bytes[8..])?;
    document.after_load();
    Ok(document)
}

/// Save a document to disk
pub fn save_document(path: &Path, document: &Document) -> Result<()> {
    let bytes = encode_document(document)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), "document saved");
    Ok(())
}

/// Load a document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path)?;
    let document = decode_document(&bytes)?;
    tracing::info!(path = %path.display(), "document loaded");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use animato_editor_scene::{ItemKind, SceneItem};
    use animato_editor_timeline::{Easing, PropertyValue};

    fn sample_document() -> Document {
        let mut document = Document::new();
        let item = SceneItem::new("Box", ItemKind::Rectangle { fill: [255, 127, 42, 255] }, 5.0, 5.0, 40.0, 30.0);
        let id = document.attach_item(item);
        let key = document
            .add_keyframe(id, "left", 0, PropertyValue::Float(5.0), None)
            .unwrap();
        document.add_keyframe(id, "left", 1000, PropertyValue::Float(200.0), None);
        document
            .timeline
            .track_for_mut(id, "left")
            .unwrap()
            .set_easing(key, Some(Easing::InOutQuad));
        document
    }

    #[test]
    fn test_round_trip_preserves_keyframes_and_views() {
        let document = sample_document();
        let bytes = encode_document(&document).unwrap();
        let loaded = decode_document(&bytes).unwrap();

        let item = loaded.scene.items().next().unwrap().id;
        let track = loaded.timeline.track_for(item, "left").unwrap();
        assert_eq!(track.keyframe_count(), 2);
        assert_eq!(track.keyframes()[0].easing, Some(Easing::InOutQuad));
        // views are derived state and must be rebuilt by the load path
        assert!(track.views().next().unwrap().is_transition());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = encode_document(&sample_document()).unwrap();
        bytes[0] = 0x00;
        assert!(matches!(decode_document(&bytes), Err(DocumentError::BadMagic)));
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut bytes = encode_document(&sample_document()).unwrap();
        bytes[4..8].copy_from_slice(&(CURRENT_VERSION + 1).to_be_bytes());
        assert!(matches!(
            decode_document(&bytes),
            Err(DocumentError::VersionTooNew(v)) if v == CURRENT_VERSION + 1
        ));
    }

    #[test]
    fn test_older_version_rejected() {
        let mut bytes = encode_document(&sample_document()).unwrap();
        bytes[4..8].copy_from_slice(&0u32.to_be_bytes());
        assert!(matches!(decode_document(&bytes), Err(DocumentError::VersionTooOld(0))));
    }

    #[test]
    fn test_truncated_rejected() {
        assert!(matches!(decode_document(&[0xA0, 0xB0]), Err(DocumentError::Truncated)));
    }
}
