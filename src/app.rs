use std::{path::Path, sync::Arc};

use futures::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::{RendererConfig, RendererOptions},
    gfx::camera::{ControlInput, PointerButton},
    loader::PendingLoad,
    platform::WinitPlatform,
    renderer::{HostEvent, ModelRenderer},
};

/// Desktop viewer: one window, one [`ModelRenderer`] mounted into it.
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: RendererConfig,
    title: String,
    window: Option<Arc<Window>>,
    renderer: Option<ModelRenderer<WinitPlatform>>,
    pending: Option<PendingLoad>,
    /// Last cursor position in logical pixels.
    cursor: (f64, f64),
    shift: bool,
}

impl ViewerApp {
    /// Validates `options` and creates the event loop.
    pub fn new(options: RendererOptions) -> anyhow::Result<Self> {
        let config = RendererConfig::try_from(options)?;
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                title: "Model Viewer".to_string(),
                window: None,
                renderer: None,
                pending: None,
                cursor: (0.0, 0.0),
                shift: false,
            },
        })
    }

    /// Reads options from a TOML file, see [`RendererOptions::load`].
    pub fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::new(RendererOptions::load(path.as_ref())?)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.app_state.title = title.into();
        self
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    fn send(&mut self, event: HostEvent) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.handle_event(&event);
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.dispose();
        }
        event_loop.exit();
    }

    fn poll_pending_load(&mut self) {
        let Some(result) = self.pending.as_mut().and_then(|pending| pending.now_or_never()) else {
            return;
        };
        self.pending = None;

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        match result {
            Ok(object) => {
                if let Err(e) = renderer.display_model(object) {
                    log::error!("Could not display model: {e}");
                }
            }
            Err(e) => log::error!("Model load failed: {e}"),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(1200, 800));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let mut platform = WinitPlatform::new();
        platform.register(self.config.container(), window);

        let mut renderer = ModelRenderer::with_config(self.config.clone(), platform);
        if let Err(e) = renderer.init() {
            log::error!("Failed to initialize renderer: {e}");
            event_loop.exit();
            return;
        }

        if self.config.model().is_some() {
            self.pending = Some(renderer.load_model(None));
        } else {
            log::info!("No model configured; showing an empty scene");
        }
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.send(HostEvent::WindowResized);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f64>(scale);
                self.cursor = (logical.x, logical.y);
                self.send(HostEvent::MouseMoved {
                    client_x: logical.x,
                    client_y: logical.y,
                });
                self.send(HostEvent::Control(ControlInput::PointerMove {
                    x: logical.x as f32,
                    y: logical.y as f32,
                }));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let input = match state {
                    ElementState::Released => ControlInput::PointerUp,
                    ElementState::Pressed => {
                        let button = match button {
                            MouseButton::Left => PointerButton::Primary,
                            MouseButton::Right => PointerButton::Secondary,
                            MouseButton::Middle => PointerButton::Middle,
                            _ => return,
                        };
                        ControlInput::PointerDown {
                            button,
                            x: self.cursor.0 as f32,
                            y: self.cursor.1 as f32,
                            shift: self.shift,
                        }
                    }
                };
                self.send(HostEvent::Control(input));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.send(HostEvent::Control(ControlInput::Wheel { delta_y }));
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                if let Err(e) = renderer.animate() {
                    log::error!("Render failed: {e}");
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.poll_pending_load();

        let running = self.renderer.as_ref().is_some_and(|r| r.frame_loop_running());
        if let (true, Some(window)) = (running, self.window.as_ref()) {
            window.request_redraw();
        }
    }
}
