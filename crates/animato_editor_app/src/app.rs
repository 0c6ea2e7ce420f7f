// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use crate::export;
use crate::panel_types::PanelType;
use crate::panels::{CanvasPanel, ElementsPanel, PropertiesPanel, TimelinePanel};
use crate::project;
use crate::settings::EditorSettings;
use crate::state::EditorState;
use animato_editor_timeline::EditCommand;
use egui_dock::{DockArea, DockState, NodeIndex, Style, TabViewer};
use egui_wgpu::wgpu;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Tab viewer implementation for `egui_dock`
struct EditorTabViewer<'a> {
    state: &'a mut EditorState,
    canvas: &'a mut CanvasPanel,
    elements: &'a mut ElementsPanel,
    properties: &'a mut PropertiesPanel,
    timeline: &'a mut TimelinePanel,
}

impl TabViewer for EditorTabViewer<'_> {
    type Tab = PanelType;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        format!("{} {}", tab.icon(), tab.name()).into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        match tab {
            PanelType::Canvas => self.canvas.ui(ui, self.state),
            PanelType::Elements => self.elements.ui(ui, self.state),
            PanelType::Properties => self.properties.ui(ui, self.state),
            PanelType::Timeline => self.timeline.ui(ui, self.state),
        }
    }

    fn closeable(&mut self, _tab: &mut Self::Tab) -> bool {
        true
    }
}

struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("Failed to find suitable GPU adapter");

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Animato Editor Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Editor Encoder"),
            });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Editor Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    editor: EditorInner,
}

/// Action deferred behind the unsaved-changes dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    NewDocument,
    OpenDocument,
    Exit,
}

/// Inner editor state and panels
struct EditorInner {
    state: EditorState,
    dock_state: DockState<PanelType>,
    canvas: CanvasPanel,
    elements: ElementsPanel,
    properties: PropertiesPanel,
    timeline: TimelinePanel,
    settings: EditorSettings,
    show_about: bool,
    show_unsaved_warning: bool,
    pending_action: Option<PendingAction>,
    request_exit: bool,
}

impl EditorInner {
    fn new() -> Self {
        Self {
            state: EditorState::new(),
            dock_state: Self::create_default_layout(),
            canvas: CanvasPanel::new(),
            elements: ElementsPanel::new(),
            properties: PropertiesPanel::new(),
            timeline: TimelinePanel::new(),
            settings: EditorSettings::load(),
            show_about: false,
            show_unsaved_warning: false,
            pending_action: None,
            request_exit: false,
        }
    }

    fn create_default_layout() -> DockState<PanelType> {
        let mut dock_state = DockState::new(vec![PanelType::Canvas]);
        let surface = dock_state.main_surface_mut();

        let [_center, _left] = surface.split_left(NodeIndex::root(), 0.2, vec![PanelType::Elements]);
        let [center, _right] = surface.split_right(NodeIndex::root(), 0.78, vec![PanelType::Properties]);
        let [_top, _bottom] = surface.split_below(center, 0.68, vec![PanelType::Timeline]);

        dock_state
    }

    fn update(&mut self, ctx: &egui::Context) {
        // cooperative playback: advance once per frame on the UI thread
        if self.state.playback.is_playing() {
            let delta = ctx.input(|i| i.stable_dt);
            let duration = self.state.document.timeline.content_duration();
            let position = self.state.playback.update(delta, duration);
            self.state.document.timeline.set_playhead(position);
            ctx.request_repaint();
        }

        self.state.document.pump_events();
        self.state.validate_selection();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                self.file_menu(ui);
                self.edit_menu(ui);
                self.view_menu(ui);
                self.help_menu(ui);
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.dirty {
                        ui.label(egui::RichText::new("(modified)").color(egui::Color32::YELLOW));
                    }
                    if let Some(path) = &self.state.path {
                        ui.label(path.display().to_string());
                    }
                });
            });
        });

        let mut tab_viewer = EditorTabViewer {
            state: &mut self.state,
            canvas: &mut self.canvas,
            elements: &mut self.elements,
            properties: &mut self.properties,
            timeline: &mut self.timeline,
        };

        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(ctx, &mut tab_viewer);

        self.show_unsaved_warning_dialog(ctx);
        self.show_about_dialog(ctx);
        self.handle_shortcuts(ctx);
    }

    fn file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            if ui.button("New").clicked() {
                self.request_new_document();
                ui.close_menu();
            }
            if ui.button("Open\u{2026}").clicked() {
                self.request_open_document();
                ui.close_menu();
            }

            let recent = self.settings.recent_files.clone();
            ui.add_enabled_ui(!recent.is_empty(), |ui| {
                ui.menu_button("Open Recent", |ui| {
                    for path in recent {
                        if ui.button(path.display().to_string()).clicked() {
                            self.open_path(path);
                            ui.close_menu();
                        }
                    }
                });
            });

            ui.separator();

            if ui.button("Save").clicked() {
                self.save_document(false);
                ui.close_menu();
            }
            if ui.button("Save As\u{2026}").clicked() {
                self.save_document(true);
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Export Frames\u{2026}").clicked() {
                self.export_frames();
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Quit").clicked() {
                self.confirm_or_run(PendingAction::Exit);
                ui.close_menu();
            }
        });
    }

    fn edit_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Edit", |ui| {
            let undo_label = self
                .state
                .undo
                .undo_description()
                .map_or_else(|| "Undo".to_string(), |d| format!("Undo {d}"));
            if ui
                .add_enabled(self.state.undo.can_undo(), egui::Button::new(undo_label))
                .clicked()
            {
                self.state.undo_edit();
                ui.close_menu();
            }

            let redo_label = self
                .state
                .undo
                .redo_description()
                .map_or_else(|| "Redo".to_string(), |d| format!("Redo {d}"));
            if ui
                .add_enabled(self.state.undo.can_redo(), egui::Button::new(redo_label))
                .clicked()
            {
                self.state.redo_edit();
                ui.close_menu();
            }

            ui.separator();

            if ui
                .add_enabled(self.state.selection.is_some(), egui::Button::new("Delete Item"))
                .clicked()
            {
                if let Some(id) = self.state.selection.take() {
                    self.state.push_edit(EditCommand::delete_item(id));
                }
                ui.close_menu();
            }
        });
    }

    fn view_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            for panel in PanelType::all() {
                if ui.button(format!("{} {}", panel.icon(), panel.name())).clicked() {
                    if self.dock_state.find_tab(&panel).is_none() {
                        self.dock_state.push_to_focused_leaf(panel);
                    }
                    ui.close_menu();
                }
            }
        });
    }

    fn help_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Help", |ui| {
            if ui.button("About").clicked() {
                self.show_about = true;
                ui.close_menu();
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, KeyboardShortcut, Modifiers};

        let undo = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
        let redo = KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z);
        let save = KeyboardShortcut::new(Modifiers::COMMAND, Key::S);
        let open = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
        let new = KeyboardShortcut::new(Modifiers::COMMAND, Key::N);

        // redo first: it shares the primary key with undo
        if ctx.input_mut(|i| i.consume_shortcut(&redo)) {
            self.state.redo_edit();
        } else if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.state.undo_edit();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&save)) {
            self.save_document(false);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&open)) {
            self.request_open_document();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&new)) {
            self.request_new_document();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) && !ctx.wants_keyboard_input() {
            self.state.playback.toggle();
        }
    }

    fn confirm_or_run(&mut self, action: PendingAction) {
        if self.state.has_unsaved_changes() {
            self.show_unsaved_warning = true;
            self.pending_action = Some(action);
        } else {
            self.run_pending(action);
        }
    }

    fn run_pending(&mut self, action: PendingAction) {
        match action {
            PendingAction::NewDocument => {
                self.state.replace_document(animato_editor_timeline::Document::new(), None);
                self.state.status = "New document".to_string();
            }
            PendingAction::OpenDocument => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Animato projects", &[project::FILE_EXTENSION])
                    .pick_file();
                if let Some(path) = picked {
                    self.open_path(path);
                }
            }
            PendingAction::Exit => {
                self.request_exit = true;
            }
        }
    }

    fn request_new_document(&mut self) {
        self.confirm_or_run(PendingAction::NewDocument);
    }

    fn request_open_document(&mut self) {
        self.confirm_or_run(PendingAction::OpenDocument);
    }

    /// Load a project file; a failed load leaves the open document
    /// untouched and reports the error in the status line.
    fn open_path(&mut self, path: PathBuf) {
        match project::load_document(&path) {
            Ok(document) => {
                self.state.replace_document(document, Some(path.clone()));
                self.settings.add_recent(&path);
                self.state.status = format!("Opened {}", path.display());
            }
            Err(e) => {
                tracing::error!("Failed to open {}: {e}", path.display());
                self.state.status = format!("Open failed: {e}");
            }
        }
    }

    fn save_document(&mut self, force_dialog: bool) {
        let path = if force_dialog || self.state.path.is_none() {
            rfd::FileDialog::new()
                .add_filter("Animato projects", &[project::FILE_EXTENSION])
                .set_file_name(format!("untitled.{}", project::FILE_EXTENSION))
                .save_file()
        } else {
            self.state.path.clone()
        };
        let Some(path) = path else {
            return;
        };

        match project::save_document(&path, &self.state.document) {
            Ok(()) => {
                self.settings.add_recent(&path);
                self.state.path = Some(path.clone());
                self.state.dirty = false;
                self.state.status = format!("Saved {}", path.display());
            }
            Err(e) => {
                tracing::error!("Failed to save {}: {e}", path.display());
                self.state.status = format!("Save failed: {e}");
            }
        }
    }

    fn export_frames(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match export::export_frames(&self.state.document, &dir) {
            Ok(frames) => {
                self.state.status = format!("Exported {frames} frames to {}", dir.display());
            }
            Err(e) => {
                tracing::error!("Export failed: {e}");
                self.state.status = format!("Export failed: {e}");
            }
        }
    }

    fn show_unsaved_warning_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_unsaved_warning {
            return;
        }

        egui::Window::new("Unsaved Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("The document has unsaved changes.");
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.save_document(false);
                        self.show_unsaved_warning = false;
                        if let Some(action) = self.pending_action.take() {
                            if !self.state.dirty {
                                self.run_pending(action);
                            }
                        }
                    }
                    if ui.button("Discard").clicked() {
                        self.show_unsaved_warning = false;
                        self.state.dirty = false;
                        if let Some(action) = self.pending_action.take() {
                            self.run_pending(action);
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        self.show_unsaved_warning = false;
                        self.pending_action = None;
                    }
                });
            });
    }

    fn show_about_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_about {
            return;
        }
        egui::Window::new("About Animato")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Animato Editor is a tool to create presentation videos.");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                if ui.button("Close").clicked() {
                    self.show_about = false;
                }
            });
    }
}

/// The editor application
pub struct EditorApp {
    running: Option<EditorRunning>,
}

impl EditorApp {
    /// Create a new editor application
    pub fn new() -> Self {
        Self { running: None }
    }

    /// Run the editor application
    pub fn run() -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = EditorApp::new();
        event_loop.run_app(&mut app)?;

        Ok(())
    }
}

impl Default for EditorApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        tracing::info!("Creating editor window...");

        let editor = EditorInner::new();
        let window_attrs = Window::default_attributes()
            .with_title("Animato Editor")
            .with_inner_size(winit::dpi::LogicalSize::new(
                editor.settings.window_width,
                editor.settings.window_height,
            ))
            .with_min_inner_size(winit::dpi::LogicalSize::new(800, 600));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        tracing::info!("Editor initialized");

        self.running = Some(EditorRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            editor,
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if running.editor.state.has_unsaved_changes() {
                    running.editor.show_unsaved_warning = true;
                    running.editor.pending_action = Some(PendingAction::Exit);
                    running.window.request_redraw();
                } else {
                    running.editor.persist_settings(&running.window);
                    tracing::info!("Close requested, exiting...");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.editor.update(ctx);
                });

                if running.editor.request_exit {
                    running.editor.persist_settings(&running.window);
                    event_loop.exit();
                    return;
                }

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

impl EditorInner {
    fn persist_settings(&mut self, window: &Window) {
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            self.settings.window_width = size.width;
            self.settings.window_height = size.height;
        }
        if let Err(e) = self.settings.save() {
            tracing::warn!("Failed to save settings: {e}");
        }
    }
}
