use crate::app::app::App;
use crate::error::ViewerError;
use std::sync::Arc;
use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

pub struct AppHandler {
    pub app: Option<App>,
    pub asset_source: String,
    pub controls_enabled: bool,
    pub runtime: Runtime,
}

impl AppHandler {
    pub fn new(asset_source: String, controls_enabled: bool) -> Result<Self, ViewerError> {
        Ok(Self {
            app: None,
            asset_source,
            controls_enabled,
            runtime: Runtime::new()?,
        })
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("FanVis-RS - glTF Asset Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 800.0));

            let window = match event_loop.create_window(window_attrs) {
                Ok(window) => window,
                Err(e) => {
                    log::error!("failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let mut app = match self
                .runtime
                .block_on(App::new(Arc::new(window), self.controls_enabled))
            {
                Ok(app) => app,
                Err(e) => {
                    log::error!("failed to initialize viewer: {e}");
                    event_loop.exit();
                    return;
                }
            };

            app.begin_load(self.runtime.handle(), &self.asset_source);
            self.app = Some(app);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.repaint {
                app.window.request_redraw();
            }
            if response.exit {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &mut self.app {
            if let Err(e) = app.render() {
                log::error!("render error: {e:?}");
            }
            app.window.request_redraw();
        }
    }
}
