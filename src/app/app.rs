use crate::animation::AnimationPlayer;
use crate::asset::{LoadResult, LoadedAsset, Source, spawn_load};
use crate::error::ViewerError;
use crate::renderer::Renderer;
use crate::scene::ModelRoot;
use crate::settings::Settings;
use crate::ui::{PanelView, Ui, UiEvents};
use crate::viewer::normalize::normalize;
use crate::viewer::{PanelGesture, TransformBindings};
use egui_wgpu::ScreenDescriptor;
use egui_winit::State;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Instant;
use winit::window::{Fullscreen, Window};

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

/// The viewer session. Owns every controller for the lifetime of the window;
/// all shared state flows through here, never through globals.
pub struct App {
    pub window: Arc<Window>,
    renderer: Renderer,
    ui: Ui,
    settings: Settings,
    model: Option<ModelRoot>,
    player: AnimationPlayer,
    bindings: Option<TransformBindings>,
    controls_enabled: bool,
    gesture: PanelGesture,
    panel: PanelView,
    egui_state: State,
    load_tx: Sender<LoadResult>,
    load_rx: Receiver<LoadResult>,
    load_progress: Option<f32>,
    load_error: Option<String>,
    asset_name: Option<String>,
    last_frame: Option<Instant>,
    /// Idle spin of the placeholder cube, x/y Euler radians.
    placeholder_angles: (f32, f32),
    /// Last pointer position in logical points.
    cursor_pos: Option<(f32, f32)>,
}

impl App {
    pub async fn new(window: Arc<Window>, controls_enabled: bool) -> Result<Self, ViewerError> {
        let renderer = Renderer::new(&window).await?;

        let egui_ctx = renderer.egui_context();
        egui_ctx.options_mut(|options| {
            options.max_passes = std::num::NonZero::new(2).unwrap();
        });

        let egui_state = State::new(
            egui_ctx.clone(),
            egui::viewport::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let settings = Settings::load();
        let panel = PanelView::new(settings.ui.show_controls_panel);
        let (load_tx, load_rx) = channel();

        let mut app = Self {
            window,
            renderer,
            ui: Ui::new(),
            settings,
            model: None,
            player: AnimationPlayer::new(Vec::new()),
            bindings: None,
            controls_enabled,
            gesture: PanelGesture::new(),
            panel,
            egui_state,
            load_tx,
            load_rx,
            load_progress: None,
            load_error: None,
            asset_name: None,
            last_frame: None,
            placeholder_angles: (0.0, 0.0),
            cursor_pos: None,
        };
        app.renderer.update_colors(&app.settings);
        Ok(app)
    }

    /// Start the background load. Completion lands in the frame loop via
    /// the result channel.
    pub fn begin_load(&mut self, handle: &tokio::runtime::Handle, raw_source: &str) {
        let source = Source::parse(raw_source);
        log::info!("loading asset: {source}");
        spawn_load(handle, source, self.load_tx.clone());
    }

    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> EventResponse {
        // Let egui see the event first
        let egui_response = self.egui_state.on_window_event(&self.window, event);
        let egui_wants_input = egui_response.consumed;

        match event {
            winit::event::WindowEvent::CloseRequested => {
                return EventResponse {
                    repaint: false,
                    exit: true,
                };
            }
            winit::event::WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input {
                    return EventResponse {
                        repaint: egui_response.repaint,
                        exit: false,
                    };
                }
                if event.logical_key
                    == winit::keyboard::Key::Named(winit::keyboard::NamedKey::Escape)
                {
                    return EventResponse {
                        repaint: false,
                        exit: true,
                    };
                }
            }
            winit::event::WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
            }
            winit::event::WindowEvent::MouseInput { state, button, .. } => {
                // The panel edge gesture tracks the raw pointer even though
                // the panel itself is a UI surface.
                if *button == winit::event::MouseButton::Left {
                    match state {
                        winit::event::ElementState::Pressed => {
                            if let (Some(pos), Some(rect)) =
                                (self.cursor_pos, self.panel.gesture_rect())
                            {
                                self.gesture.begin(pos, &rect, self.panel.scale);
                            }
                        }
                        winit::event::ElementState::Released => {
                            self.gesture.end();
                        }
                    }
                }
            }
            winit::event::WindowEvent::CursorMoved { position, .. } => {
                let scale_factor = self.window.scale_factor();
                let pos = (
                    (position.x / scale_factor) as f32,
                    (position.y / scale_factor) as f32,
                );
                self.cursor_pos = Some(pos);
                if let Some(scale) = self.gesture.update(pos) {
                    self.panel.scale = scale;
                }
            }
            _ => {}
        }

        EventResponse {
            repaint: egui_response.repaint,
            exit: false,
        }
    }

    /// One frame: delta, loader drain, UI, control application, animation
    /// advance, render. The order keeps the rendered pose current for the
    /// frame it is drawn in.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        self.drain_loader();

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.renderer.egui_context();

        let fullscreen = self.window.fullscreen().is_some();
        let status = self.status_line();
        let mut events = UiEvents::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            events = self.ui.show(
                ctx,
                self.bindings.as_ref(),
                &mut self.panel,
                fullscreen,
                self.gesture.is_active(),
                &status,
            );
        });

        self.apply_ui_events(events);

        // Advance the animation clock before rendering; spin the placeholder
        // only while nothing is loaded.
        if let Some(model) = &mut self.model {
            self.player.update(delta, model);
        } else {
            self.placeholder_angles.0 += delta * 0.5;
            self.placeholder_angles.1 += delta * 0.7;
        }

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [
                self.window.inner_size().width,
                self.window.inner_size().height,
            ],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        self.renderer.render(
            self.model.as_ref(),
            self.placeholder_angles,
            paint_jobs,
            full_output.textures_delta,
            screen_descriptor,
        )
    }

    fn drain_loader(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            match result {
                LoadResult::Progress(fraction) => {
                    self.load_progress = Some(fraction);
                    log::debug!("asset {:.0}% loaded", fraction * 100.0);
                }
                LoadResult::Success(asset) => self.on_asset_loaded(*asset),
                LoadResult::Error(error) => {
                    // No retry; the placeholder stays up.
                    log::error!("failed to load asset: {error}");
                    self.load_error = Some(error);
                    self.load_progress = None;
                }
            }
        }
    }

    fn on_asset_loaded(&mut self, asset: LoadedAsset) {
        log::info!(
            "{} loaded: {} nodes, {} vertices, {} triangles, {} clips",
            asset.name,
            asset.nodes.len(),
            asset.vertex_count(),
            asset.triangle_count(),
            asset.clips.len()
        );

        self.renderer.upload_asset(&asset);
        let mut root = ModelRoot::from_asset(&asset);
        let applied_scale = normalize(&mut root);
        log::info!("normalized {} to scale {applied_scale:.3}", asset.name);

        let LoadedAsset { name, clips, .. } = asset;
        self.player = AnimationPlayer::new(clips);

        if self.controls_enabled {
            let bindings = TransformBindings::seed(&root);
            self.player.set_time_scale(bindings.time_scale());
            self.bindings = Some(bindings);
        } else {
            // Graceful degradation: no controls, asset still renders.
            log::warn!("controls disabled, skipping transform bindings");
        }

        self.asset_name = Some(name);
        self.model = Some(root);
        self.load_progress = None;
        self.load_error = None;
    }

    fn apply_ui_events(&mut self, events: UiEvents) {
        if events.toggle_fullscreen {
            self.toggle_fullscreen();
        }
        if events.panel_toggled {
            self.settings.ui.show_controls_panel = self.panel.visible;
            self.settings.ui.save();
        }

        let (Some(bindings), Some(model)) = (&mut self.bindings, &mut self.model) else {
            return;
        };
        if events.toggle_power {
            bindings.toggle_power();
        }
        if let Some(v) = events.speed {
            bindings.apply_speed(v);
        }
        if let Some(v) = events.direction {
            bindings.apply_direction(model, v);
        }
        if let Some(v) = events.height {
            bindings.apply_height(model, v);
        }
        if let Some(v) = events.scale {
            bindings.apply_scale(model, v);
        }
        if let Some(v) = events.tilt {
            bindings.apply_tilt(model, v);
        }
        if events.reset {
            bindings.reset(model);
        }
        self.player.set_time_scale(bindings.time_scale());
    }

    fn toggle_fullscreen(&self) {
        if self.window.fullscreen().is_some() {
            self.window.set_fullscreen(None);
        } else {
            self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }

    fn status_line(&self) -> String {
        if let Some(error) = &self.load_error {
            return format!("load failed: {error}");
        }
        if self.model.is_none() {
            return match self.load_progress {
                Some(fraction) => format!("loading… {:.0}%", fraction * 100.0),
                None => "loading…".to_string(),
            };
        }
        self.asset_name.clone().unwrap_or_default()
    }
}
