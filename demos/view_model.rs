//! # Model Viewer Example
//!
//! Opens a window, loads an OBJ model and frames it with the orbit camera.
//!
//! ## Usage:
//! ```bash
//! cargo run --example view_model -- path/to/model.obj
//! cargo run --example view_model -- --config viewer.toml
//! ```
//!
//! ## Controls:
//! - Left drag rotates, right (or shift + left) drag pans
//! - Mouse wheel or middle drag zooms
//! - Escape closes the window
//!
//! Set `RUST_LOG=info` (or `debug`) to follow loading and framing.

use model_renderer::{RendererOptions, ViewerApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let app = match args.next().as_deref() {
        Some("--config") => {
            let path = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
            ViewerApp::from_config_file(path)?
        }
        Some(model) => ViewerApp::new(RendererOptions::new("#viewer").with_model(model))?,
        None => {
            log::warn!("No model given; pass a path to an .obj file");
            ViewerApp::new(RendererOptions::new("#viewer"))?
        }
    };

    app.with_title("Model Viewer").run()
}
