use crate::viewer::TransformBindings;
use crate::viewer::gesture::{PanelGesture, PanelRect};
use crate::viewer::params::RangeParam;

/// Live view state of the control panel.
pub struct PanelView {
    pub visible: bool,
    /// Visual scale factor driven by the edge-drag gesture.
    pub scale: f32,
    /// Panel rectangle from the last shown frame, egui points.
    pub rect: Option<egui::Rect>,
}

impl PanelView {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            scale: 1.0,
            rect: None,
        }
    }

    pub fn gesture_rect(&self) -> Option<PanelRect> {
        self.rect
            .map(|r| PanelRect::new(r.left(), r.top(), r.right(), r.bottom()))
    }
}

/// What the user did this frame. The app applies these through the binding
/// controller; the UI never touches the scene itself.
#[derive(Debug, Default)]
pub struct UiEvents {
    pub toggle_power: bool,
    pub speed: Option<f32>,
    pub direction: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
    pub tilt: Option<f32>,
    pub reset: bool,
    pub toggle_fullscreen: bool,
    pub panel_toggled: bool,
}

pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        bindings: Option<&TransformBindings>,
        panel: &mut PanelView,
        fullscreen: bool,
        gesture_active: bool,
        status: &str,
    ) -> UiEvents {
        let mut events = UiEvents::default();

        // Always-visible corner bar: panel toggle and fullscreen toggle.
        egui::Area::new(egui::Id::new("corner_bar"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if bindings.is_some() {
                        let (label, hover) = if panel.visible {
                            ("✕", "Hide Controls")
                        } else {
                            ("☰", "Show Controls")
                        };
                        if ui.button(label).on_hover_text(hover).clicked() {
                            panel.visible = !panel.visible;
                            events.panel_toggled = true;
                        }
                    }
                    let (fs_label, fs_hover) = if fullscreen {
                        ("🗗", "Exit Fullscreen")
                    } else {
                        ("⛶", "Enter Fullscreen")
                    };
                    if ui.button(fs_label).on_hover_text(fs_hover).clicked() {
                        events.toggle_fullscreen = true;
                    }
                });
                if !status.is_empty() {
                    ui.label(egui::RichText::new(status).small().weak());
                }
            });

        let Some(bindings) = bindings else {
            return events;
        };

        if panel.visible {
            let response = egui::Window::new("🎛 Controls")
                .default_width(260.0 * panel.scale)
                .resizable(false)
                .show(ctx, |ui| {
                    // Edge-drag gesture scale, applied to the widget metrics
                    ui.spacing_mut().slider_width = 160.0 * panel.scale;
                    ui.spacing_mut().item_spacing = egui::vec2(8.0, 6.0 * panel.scale);

                    ui.horizontal(|ui| {
                        let power_label = if bindings.playback.powered {
                            "⏻ On"
                        } else {
                            "⭘ Off"
                        };
                        if ui.button(power_label).clicked() {
                            events.toggle_power = true;
                        }
                        if ui.button("↺ Reset").clicked() {
                            events.reset = true;
                        }
                    });

                    ui.separator();

                    events.speed = slider(ui, &bindings.speed, "Speed");
                    events.direction = slider(ui, &bindings.direction, "Direction");
                    events.height = slider(ui, &bindings.height, "Height");
                    events.scale = slider(ui, &bindings.scale, "Scale");
                    events.tilt = slider(ui, &bindings.tilt, "Tilt");
                });
            panel.rect = response.map(|r| r.response.rect);
        } else {
            panel.rect = None;
        }

        // Resize affordance while hovering the panel border.
        if let (Some(pos), Some(rect)) = (ctx.pointer_latest_pos(), panel.gesture_rect()) {
            if gesture_active || PanelGesture::near_edge((pos.x, pos.y), &rect) {
                ctx.output_mut(|o| o.cursor_icon = egui::CursorIcon::ResizeNwSe);
            }
        }

        events
    }
}

fn slider(ui: &mut egui::Ui, param: &RangeParam, label: &str) -> Option<f32> {
    let mut v = param.value();
    let changed = ui
        .add(
            egui::Slider::new(&mut v, param.min..=param.max)
                .step_by(f64::from(param.step))
                .text(label),
        )
        .changed();
    changed.then_some(v)
}
