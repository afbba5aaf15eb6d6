//! The model renderer façade.
//!
//! [`ModelRenderer`] validates its options once, mounts a render target into
//! the configured container on [`init`](ModelRenderer::init), loads models
//! through a [`ModelLoader`] and frames whatever it is asked to display.
//!
//! ```no_run
//! use model_renderer::{ModelRenderer, RendererOptions, WinitPlatform};
//!
//! # fn run(platform: WinitPlatform) -> anyhow::Result<()> {
//! let options = RendererOptions::new("#viewer").with_model("assets/teapot.obj");
//! let mut renderer = ModelRenderer::new(options, platform)?;
//! renderer.init()?;
//! let object = pollster::block_on(renderer.load_model(None))?;
//! renderer.display_model(object)?;
//! # Ok(())
//! # }
//! ```

use std::{f32::consts::FRAC_PI_4, sync::Arc};

use cgmath::{Rad, Vector3};

use crate::{
    config::{RendererConfig, RendererOptions},
    error::RendererError,
    frame_loop::{FrameLoop, FrameLoopHandle},
    gfx::{
        camera::{fit_distance, ControlInput, FrameFit, OrbitControls, PerspectiveCamera},
        resources::{Color, LambertMaterial, MeshMaterial},
        scene::{FogExp2, GridHelper, HemisphereLight, ModelObject, Scene, SceneNode},
    },
    loader::{load_with, ModelLoader, ObjLoader, PendingLoad},
    platform::{Platform, RenderTarget, SurfaceSettings},
};

/// Camera set up by [`ModelRenderer::init`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDefaults {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance along +z.
    pub distance: f32,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 1.0,
            far: 10_000_000.0,
            distance: 250.0,
        }
    }
}

const CONTROLS_DAMPING: f32 = 0.25;
const DISPLAY_ZOOM: f32 = 2.5;

const FOG_COLOR: u32 = 0xE7E8EB;
const FOG_DENSITY: f32 = 0.015;

const GRID_DIVISIONS: u32 = 100;

const SKY_COLOR: u32 = 0xeeeeee;
const GROUND_COLOR: u32 = 0x888888;
const LIGHT_INTENSITY: f32 = 0.5;
const LIGHT_HEIGHT: f32 = 20.0;

/// Mouse offset from the viewport center, halved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    pub x: f64,
    pub y: f64,
}

/// Host input the renderer listens to once initialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    WindowResized,
    MouseMoved { client_x: f64, client_y: f64 },
    /// Pointer input for the orbit controls.
    Control(ControlInput),
}

struct RendererState<T> {
    camera: PerspectiveCamera,
    scene: Scene,
    target: T,
    controls: OrbitControls,
    frame_loop: FrameLoop,
}

pub struct ModelRenderer<P: Platform> {
    config: RendererConfig,
    platform: P,
    loader: Arc<dyn ModelLoader>,
    camera_defaults: CameraDefaults,
    window_half: (f64, f64),
    mouse: MouseState,
    frame_fit: Option<FrameFit>,
    state: Option<RendererState<P::Target>>,
}

impl<P: Platform> ModelRenderer<P> {
    /// Validates `options` and captures the viewport's half size.
    ///
    /// Nothing is mounted until [`init`](Self::init).
    ///
    /// # Errors
    /// [`RendererError::Config`] when no container selector is given.
    pub fn new(options: RendererOptions, platform: P) -> Result<Self, RendererError> {
        let config = RendererConfig::try_from(options)?;
        Ok(Self::with_config(config, platform))
    }

    pub fn with_config(config: RendererConfig, platform: P) -> Self {
        let (width, height) = platform.viewport_size();
        log::debug!(
            "Renderer configured for '{}' (viewport {}x{})",
            config.container(),
            width,
            height
        );
        Self {
            config,
            platform,
            loader: Arc::new(ObjLoader::new()),
            camera_defaults: CameraDefaults::default(),
            window_half: (width / 2.0, height / 2.0),
            mouse: MouseState::default(),
            frame_fit: None,
            state: None,
        }
    }

    /// Replaces the loader used by [`load_model`](Self::load_model).
    pub fn with_loader(mut self, loader: Arc<dyn ModelLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Creates camera, scene, render target and controls, starts listening to
    /// host events and starts the frame loop.
    ///
    /// Calling it again replaces all of that and stops the previous loop.
    ///
    /// # Errors
    /// [`RendererError::ContainerNotFound`] if the selector matches nothing;
    /// any error the platform reports while mounting.
    pub fn init(&mut self) -> Result<(), RendererError> {
        let selector = self.config.container();
        let size = self
            .platform
            .container_size(selector)
            .ok_or_else(|| RendererError::ContainerNotFound(selector.to_string()))?;

        if let Some(previous) = self.state.take() {
            log::warn!("Renderer for '{}' initialized again; replacing previous state", selector);
            previous.frame_loop.stop();
        }

        let defaults = self.camera_defaults;
        let mut camera = PerspectiveCamera::new(defaults.fov, size.aspect(), defaults.near, defaults.far);
        camera.position.z = defaults.distance;

        let settings = SurfaceSettings::new(self.platform.device_pixel_ratio(selector));
        let mut target = self.platform.mount(selector, &settings)?;
        target.set_size(size.width, size.height);

        let mut controls = OrbitControls::new(size.height);
        controls.enable_damping = true;
        controls.damping_factor = CONTROLS_DAMPING;
        controls.enable_zoom = true;

        let frame_loop = FrameLoop::new();
        frame_loop.start();

        log::info!(
            "Renderer initialized in '{}' at {}x{} (aspect {:.3})",
            selector,
            size.width,
            size.height,
            camera.aspect
        );

        self.state = Some(RendererState {
            camera,
            scene: Scene::new(),
            target,
            controls,
            frame_loop,
        });
        Ok(())
    }

    /// Produces one frame: steps the controls, then renders.
    ///
    /// Returns `Ok(false)` without rendering once the frame loop was stopped.
    pub fn animate(&mut self) -> Result<bool, RendererError> {
        let state = self.state.as_mut().ok_or(RendererError::NotInitialized)?;
        if !state.frame_loop.begin_frame() {
            return Ok(false);
        }
        state.controls.update(&mut state.camera);
        state.target.render(&state.scene, &state.camera)?;
        Ok(true)
    }

    /// Matches camera aspect and drawing buffer to the container's current size.
    pub fn on_window_resize(&mut self) {
        let selector = self.config.container();
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(size) = self.platform.container_size(selector) else {
            log::warn!("Container '{}' disappeared; ignoring resize", selector);
            return;
        };

        state.camera.aspect = size.aspect();
        state.camera.update_projection_matrix();
        state.target.set_size(size.width, size.height);
        state.controls.set_element_height(size.height);
        log::debug!("Resized to {}x{}", size.width, size.height);
    }

    /// Records the pointer offset relative to the viewport half size captured
    /// at construction.
    pub fn on_document_mouse_move(&mut self, client_x: f64, client_y: f64) {
        let (half_x, half_y) = self.window_half;
        self.mouse = MouseState {
            x: (client_x - half_x) / 2.0,
            y: (client_y - half_y) / 2.0,
        };
    }

    /// Dispatches a host event. Events arriving before [`init`](Self::init)
    /// are dropped.
    pub fn handle_event(&mut self, event: &HostEvent) {
        if self.state.is_none() {
            log::debug!("Ignoring {:?} before init", event);
            return;
        }
        match *event {
            HostEvent::WindowResized => self.on_window_resize(),
            HostEvent::MouseMoved { client_x, client_y } => self.on_document_mouse_move(client_x, client_y),
            HostEvent::Control(input) => {
                if let Some(state) = self.state.as_mut() {
                    state.controls.handle_input(&input, &state.camera);
                }
            }
        }
    }

    /// Starts loading `url`, or the configured default model when `None`.
    ///
    /// The result settles once; without any url it fails with
    /// [`LoadError::MissingUrl`](crate::LoadError::MissingUrl) and the loader
    /// is never called.
    pub fn load_model(&self, url: Option<&str>) -> PendingLoad {
        load_with(&*self.loader, url.or(self.config.model()))
    }

    /// Puts `object` into a fresh scene and frames it.
    ///
    /// Every direct child mesh gets the display material, the object is
    /// centered on the origin, the camera is moved so the larger of the
    /// scene's width and height fills the field of view, and a grid and a
    /// hemisphere light are added below and above it.
    pub fn display_model(&mut self, mut object: ModelObject) -> Result<(), RendererError> {
        let state = self.state.as_mut().ok_or(RendererError::NotInitialized)?;

        let material = LambertMaterial::display();
        for mesh in &mut object.children {
            mesh.material = MeshMaterial::Lambert(material);
        }

        let mut scene = Scene::new();
        scene.add(SceneNode::Camera);
        scene.fog = Some(FogExp2::new(Color::from_hex(FOG_COLOR), FOG_DENSITY));

        let object_box = object.bounding_box();
        if object_box.is_empty() {
            log::warn!("Model '{}' has no vertices; nothing to frame", object.name);
        } else {
            object.position -= object_box.center();
        }
        let name = object.name.clone();
        scene.add(SceneNode::Model(object));

        let scene_box = scene.bounding_box();
        let camera = &mut state.camera;
        let (height, distance) = if scene_box.is_empty() {
            (0.0, 0.0)
        } else {
            let size = scene_box.size();
            let height = size.x.max(size.y);
            let distance = fit_distance(height, camera.fov_radians());
            camera.position = Vector3::new(0.0, 0.0, distance + height / 2.0);
            (height, distance)
        };
        camera.zoom = DISPLAY_ZOOM;
        camera.update_projection_matrix();

        let mut grid = GridHelper::new(height, GRID_DIVISIONS);
        grid.position.y = -height / 2.0;
        grid.rotation_y = Rad(FRAC_PI_4);
        scene.add(SceneNode::Grid(grid));

        let mut light = HemisphereLight::new(
            Color::from_hex(SKY_COLOR),
            Color::from_hex(GROUND_COLOR),
            LIGHT_INTENSITY,
        );
        light.position = Vector3::new(0.0, LIGHT_HEIGHT, 0.0);
        scene.add(SceneNode::HemisphereLight(light));

        let stats = scene.statistics();
        log::info!(
            "Displaying '{}' ({} meshes, {} triangles): height {:.3}, camera distance {:.3}",
            name,
            stats.mesh_count,
            stats.total_triangles,
            height,
            distance
        );

        self.frame_fit = Some(FrameFit {
            height,
            distance,
            camera_position: camera.position,
        });
        state.scene = scene;
        Ok(())
    }

    /// Stops the frame loop and releases camera, scene and render target.
    pub fn dispose(&mut self) {
        if let Some(state) = self.state.take() {
            state.frame_loop.stop();
            log::info!(
                "Renderer for '{}' disposed after {} frames",
                self.config.container(),
                state.frame_loop.frames()
            );
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.state.as_ref().map(|s| &s.camera)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.state.as_ref().map(|s| &s.scene)
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.state.as_ref().map(|s| &s.controls)
    }

    pub fn controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.state.as_mut().map(|s| &mut s.controls)
    }

    pub fn target(&self) -> Option<&P::Target> {
        self.state.as_ref().map(|s| &s.target)
    }

    pub fn mouse(&self) -> MouseState {
        self.mouse
    }

    /// Framing computed by the last [`display_model`](Self::display_model).
    pub fn frame_fit(&self) -> Option<FrameFit> {
        self.frame_fit
    }

    pub fn frame_loop(&self) -> Option<FrameLoopHandle> {
        self.state.as_ref().map(|s| s.frame_loop.handle())
    }

    pub fn frame_loop_running(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.frame_loop.is_running())
    }
}
