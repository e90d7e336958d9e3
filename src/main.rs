use winit::event_loop::{ControlFlow, EventLoop};

mod animation;
mod app;
mod asset;
mod error;
mod renderer;
mod scene;
mod settings;
mod ui;
mod viewer;

pub const CONFY_APP_NAME: &str = "fanvis-rs";

/// Asset shown when no path or URL is given on the command line.
const DEFAULT_ASSET: &str = "models/scene.gltf";

fn main() -> Result<(), error::ViewerError> {
    env_logger::init();

    let mut asset_source = DEFAULT_ASSET.to_string();
    let mut controls_enabled = true;
    for arg in std::env::args().skip(1) {
        if arg == "--no-controls" {
            controls_enabled = false;
        } else {
            asset_source = arg;
        }
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = app::AppHandler::new(asset_source, controls_enabled)?;
    event_loop.run_app(&mut handler)?;

    Ok(())
}
