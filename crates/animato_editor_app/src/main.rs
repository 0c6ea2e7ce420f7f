// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animato Editor - timeline-based authoring of presentation videos.
//!
//! A desktop editor for placing shapes and vector graphics on a scene,
//! keyframing their properties with easing transitions, and exporting the
//! result as rendered frames:
//! - Canvas with the animated scene at the playhead
//! - Elements and Properties panels
//! - Timeline with draggable keyframe handles and transitions
//! - Full undo/redo support
//!
//! ## Architecture
//!
//! The shell is a winit application painting egui through wgpu, with
//! `egui_dock` for panel docking. All editing logic lives in the
//! `animato_editor_timeline` and `animato_editor_scene` crates.

mod app;
mod export;
mod panel_types;
mod panels;
mod project;
mod settings;
mod state;

use app::EditorApp;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("animato_editor_app=debug".parse().expect("static directive"))
        .add_directive("wgpu=warn".parse().expect("static directive"))
        .add_directive("naga=warn".parse().expect("static directive"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Animato Editor v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = EditorApp::run() {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
