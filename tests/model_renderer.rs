//! Drives `ModelRenderer` end to end through a headless platform.

use std::{
    cell::RefCell,
    collections::HashMap,
    f32::consts::FRAC_PI_4,
    rc::Rc,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use cgmath::{Deg, InnerSpace, Rad, Vector3};
use model_renderer::{
    gfx::{
        camera::{ControlInput, PerspectiveCamera},
        resources::{Color, LambertMaterial, MeshMaterial},
        scene::{Mesh, ModelObject, Scene},
    },
    loader::{OnError, OnLoad, OnProgress},
    ConfigError, ContainerSize, HostEvent, LoadError, ModelLoader, ModelRenderer, Platform,
    RenderTarget, RendererError, RendererOptions, SurfaceSettings,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    scene_id: u64,
    nodes: usize,
    camera_position: Vector3<f32>,
}

#[derive(Debug, Default)]
struct Recording {
    mounts: Vec<(String, SurfaceSettings)>,
    sizes: Vec<ContainerSize>,
    frames: Vec<Frame>,
}

type Shared<T> = Rc<RefCell<T>>;

struct HeadlessPlatform {
    containers: Shared<HashMap<String, ContainerSize>>,
    recording: Shared<Recording>,
    viewport: (f64, f64),
    pixel_ratio: f64,
}

struct HeadlessTarget {
    size: ContainerSize,
    recording: Shared<Recording>,
}

impl RenderTarget for HeadlessTarget {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = ContainerSize::new(width, height);
        self.recording.borrow_mut().sizes.push(self.size);
    }

    fn size(&self) -> ContainerSize {
        self.size
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RendererError> {
        self.recording.borrow_mut().frames.push(Frame {
            scene_id: scene.id(),
            nodes: scene.nodes.len(),
            camera_position: camera.position,
        });
        Ok(())
    }
}

impl Platform for HeadlessPlatform {
    type Target = HeadlessTarget;

    fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    fn device_pixel_ratio(&self, _selector: &str) -> f64 {
        self.pixel_ratio
    }

    fn container_size(&self, selector: &str) -> Option<ContainerSize> {
        self.containers.borrow().get(selector).copied()
    }

    fn mount(&mut self, selector: &str, settings: &SurfaceSettings) -> Result<HeadlessTarget, RendererError> {
        self.recording
            .borrow_mut()
            .mounts
            .push((selector.to_string(), *settings));
        Ok(HeadlessTarget {
            size: ContainerSize::new(0, 0),
            recording: self.recording.clone(),
        })
    }
}

struct Harness {
    containers: Shared<HashMap<String, ContainerSize>>,
    recording: Shared<Recording>,
}

impl Harness {
    fn new() -> Self {
        let mut containers = HashMap::new();
        containers.insert("#viewer".to_string(), ContainerSize::new(800, 400));
        Self {
            containers: Rc::new(RefCell::new(containers)),
            recording: Rc::new(RefCell::new(Recording::default())),
        }
    }

    fn platform(&self) -> HeadlessPlatform {
        HeadlessPlatform {
            containers: self.containers.clone(),
            recording: self.recording.clone(),
            viewport: (1200.0, 800.0),
            pixel_ratio: 2.0,
        }
    }

    fn renderer(&self, options: RendererOptions) -> ModelRenderer<HeadlessPlatform> {
        ModelRenderer::new(options, self.platform()).unwrap()
    }

    fn resize(&self, width: u32, height: u32) {
        self.containers
            .borrow_mut()
            .insert("#viewer".to_string(), ContainerSize::new(width, height));
    }

    fn mounts(&self) -> usize {
        self.recording.borrow().mounts.len()
    }

    fn frames(&self) -> Vec<Frame> {
        self.recording.borrow().frames.clone()
    }
}

/// Loader that records urls and answers with a canned outcome.
struct StubLoader {
    urls: Mutex<Vec<String>>,
    calls: AtomicUsize,
    outcome: Box<dyn Fn(OnLoad, OnError) + Send + Sync>,
}

impl StubLoader {
    fn new(outcome: impl Fn(OnLoad, OnError) + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            urls: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            outcome: Box::new(outcome),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelLoader for StubLoader {
    fn load(&self, url: &str, on_load: OnLoad, on_progress: Option<OnProgress>, on_error: OnError) {
        assert!(on_progress.is_none(), "progress is never observed");
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        (self.outcome)(on_load, on_error);
    }
}

/// Axis-aligned box mesh spanning `min..max`.
fn box_mesh(name: &str, min: [f32; 3], max: [f32; 3]) -> Mesh {
    let mut positions = Vec::new();
    for &x in &[min[0], max[0]] {
        for &y in &[min[1], max[1]] {
            for &z in &[min[2], max[2]] {
                positions.extend_from_slice(&[x, y, z]);
            }
        }
    }
    let indices = vec![
        0, 1, 3, 0, 3, 2, // -x
        4, 6, 7, 4, 7, 5, // +x
        0, 4, 5, 0, 5, 1, // -y
        2, 3, 7, 2, 7, 6, // +y
        0, 2, 6, 0, 6, 4, // -z
        1, 5, 7, 1, 7, 3, // +z
    ];
    Mesh::new(name, &positions, &[], indices)
}

fn imported(name: &str, hex: u32) -> MeshMaterial {
    MeshMaterial::Imported {
        name: name.to_string(),
        diffuse: Color::from_hex(hex),
    }
}

/// A model 40 wide and 100 tall, placed away from the origin.
fn tall_model() -> ModelObject {
    let mut body = box_mesh("body", [10.0, 20.0, 30.0], [50.0, 100.0, 40.0]);
    body.material = imported("red", 0xff0000);
    let mut head = box_mesh("head", [20.0, 100.0, 32.0], [40.0, 120.0, 38.0]);
    head.material = imported("blue", 0x0000ff);
    ModelObject::new("tall", vec![body, head])
}

fn initialized(harness: &Harness) -> ModelRenderer<HeadlessPlatform> {
    let mut renderer = harness.renderer(RendererOptions::new("#viewer"));
    renderer.init().unwrap();
    renderer
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3 * b.abs().max(1.0)
}

#[test]
fn construction_without_container_fails_without_mounting() {
    let harness = Harness::new();

    let result = ModelRenderer::new(RendererOptions::default(), harness.platform());
    assert!(matches!(
        result,
        Err(RendererError::Config(ConfigError::MissingContainer))
    ));

    let mut blank = RendererOptions::new("   ");
    blank.model = Some("model.obj".to_string());
    let result = ModelRenderer::new(blank, harness.platform());
    assert!(matches!(
        result,
        Err(RendererError::Config(ConfigError::MissingContainer))
    ));

    assert_eq!(harness.mounts(), 0);
    assert!(harness.recording.borrow().sizes.is_empty());
}

#[test]
fn init_matches_camera_and_target_to_container() {
    let harness = Harness::new();
    let renderer = initialized(&harness);

    let camera = renderer.camera().unwrap();
    assert_eq!(camera.aspect, 2.0);
    assert_eq!(camera.fov, 50.0);
    assert_eq!(camera.near, 1.0);
    assert_eq!(camera.far, 10_000_000.0);
    assert_eq!(camera.position, Vector3::new(0.0, 0.0, 250.0));

    assert_eq!(renderer.target().unwrap().size(), ContainerSize::new(800, 400));

    let recording = harness.recording.borrow();
    assert_eq!(recording.mounts.len(), 1);
    let (selector, settings) = &recording.mounts[0];
    assert_eq!(selector, "#viewer");
    assert_eq!(settings.clear_color, Color::WHITE);
    assert_eq!(settings.pixel_ratio, 2.0);
    assert!(settings.shadows_enabled);

    let controls = renderer.controls().unwrap();
    assert!(controls.enable_damping);
    assert_eq!(controls.damping_factor, 0.25);
    assert!(controls.enable_zoom);

    assert!(renderer.frame_loop_running());
    assert!(renderer.scene().unwrap().nodes.is_empty());
}

#[test]
fn init_with_unknown_container_fails() {
    let harness = Harness::new();
    let mut renderer = harness.renderer(RendererOptions::new("#missing"));

    let err = renderer.init().unwrap_err();
    assert!(matches!(&err, RendererError::ContainerNotFound(s) if s == "#missing"));
    assert!(err.to_string().contains("#missing"));
    assert!(!renderer.is_initialized());
    assert_eq!(harness.mounts(), 0);
}

#[test]
fn display_before_init_is_rejected() {
    let harness = Harness::new();
    let mut renderer = harness.renderer(RendererOptions::new("#viewer"));

    assert!(matches!(
        renderer.display_model(tall_model()),
        Err(RendererError::NotInitialized)
    ));
    assert!(matches!(renderer.animate(), Err(RendererError::NotInitialized)));
}

#[test]
fn load_without_any_url_never_calls_loader() {
    let harness = Harness::new();
    let loader = StubLoader::new(|_, _| panic!("loader must not be called"));
    let renderer = harness
        .renderer(RendererOptions::new("#viewer"))
        .with_loader(loader.clone());

    let result = pollster::block_on(renderer.load_model(None));
    assert!(matches!(result, Err(LoadError::MissingUrl)));
    assert_eq!(result.unwrap_err().to_string(), "No model url is specified");
    assert_eq!(loader.calls(), 0);
}

#[test]
fn load_falls_back_to_configured_model() {
    let harness = Harness::new();
    let loader = StubLoader::new(|on_load, _| on_load(ModelObject::new("default", Vec::new())));
    let renderer = harness
        .renderer(RendererOptions::new("#viewer").with_model("assets/default.obj"))
        .with_loader(loader.clone());

    pollster::block_on(renderer.load_model(None)).unwrap();
    pollster::block_on(renderer.load_model(Some("other.obj"))).unwrap();

    assert_eq!(
        *loader.urls.lock().unwrap(),
        vec!["assets/default.obj".to_string(), "other.obj".to_string()]
    );
}

#[test]
fn load_resolves_with_exactly_the_loaded_object() {
    let harness = Harness::new();
    let loader = StubLoader::new(|on_load, _| on_load(tall_model()));
    let renderer = harness
        .renderer(RendererOptions::new("#viewer"))
        .with_loader(loader.clone());

    let object = pollster::block_on(renderer.load_model(Some("tall.obj"))).unwrap();
    assert_eq!(object, tall_model());
    assert_eq!(loader.calls(), 1);
}

#[test]
fn load_rejects_with_loader_error() {
    let harness = Harness::new();
    let loader = StubLoader::new(|_, on_error| on_error(LoadError::Loader("404".to_string())));
    let renderer = harness
        .renderer(RendererOptions::new("#viewer"))
        .with_loader(loader);

    let err = pollster::block_on(renderer.load_model(Some("model.obj"))).unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[test]
fn load_settles_once_when_loader_reports_twice() {
    let harness = Harness::new();
    let loader = StubLoader::new(|on_load, on_error| {
        on_load(ModelObject::new("first", Vec::new()));
        on_error(LoadError::Loader("late".to_string()));
    });
    let renderer = harness
        .renderer(RendererOptions::new("#viewer"))
        .with_loader(loader);

    let object = pollster::block_on(renderer.load_model(Some("model.obj"))).unwrap();
    assert_eq!(object.name, "first");
}

#[test]
fn display_replaces_every_child_material() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    renderer.display_model(tall_model()).unwrap();

    let scene = renderer.scene().unwrap();
    let model = scene.models().next().unwrap();
    assert_eq!(model.children.len(), 2);
    for mesh in &model.children {
        assert_eq!(mesh.material, MeshMaterial::Lambert(LambertMaterial::display()));
    }
}

#[test]
fn display_builds_scene_with_model_grid_light_and_camera() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);
    let before = renderer.scene().unwrap().id();

    renderer.display_model(tall_model()).unwrap();

    let scene = renderer.scene().unwrap();
    assert_ne!(scene.id(), before);
    assert!(scene.has_camera());
    assert_eq!(scene.models().count(), 1);
    assert_eq!(scene.grids().count(), 1);
    assert!(scene.hemisphere_light().is_some());

    let fog = scene.fog.unwrap();
    assert_eq!(fog.color.to_hex(), 0xE7E8EB);
    assert_eq!(fog.density, 0.015);

    let light = scene.hemisphere_light().unwrap();
    assert_eq!(light.sky.to_hex(), 0xeeeeee);
    assert_eq!(light.ground.to_hex(), 0x888888);
    assert_eq!(light.intensity, 0.5);
    assert_eq!(light.position, Vector3::new(0.0, 20.0, 0.0));
}

#[test]
fn display_centers_model_and_fits_camera() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    renderer.display_model(tall_model()).unwrap();

    let scene = renderer.scene().unwrap();
    let center = scene.bounding_box().center();
    assert!(center.magnitude() < 1e-4, "model not centered: {center:?}");

    // 40 wide, 100 tall
    let size = scene.bounding_box().size();
    let height = size.x.max(size.y);
    assert!(approx(height, 100.0));

    let fit = renderer.frame_fit().unwrap();
    let fov: Rad<f32> = Deg(50.0).into();
    assert!(approx(fit.height, height));
    assert!(approx(fit.distance, height / (fov.0 / 2.0).sin()));
    assert!((fit.distance - 236.6).abs() < 0.05, "{}", fit.distance);

    let camera = renderer.camera().unwrap();
    assert_eq!(camera.zoom, 2.5);
    assert_eq!(camera.position, fit.camera_position);
    assert!(approx(camera.position.z, fit.distance + height / 2.0));
    assert_eq!(camera.position.x, 0.0);
    assert_eq!(camera.position.y, 0.0);

    let grid = scene.grids().next().unwrap();
    assert!(approx(grid.size, height));
    assert_eq!(grid.divisions, 100);
    assert!(approx(grid.position.y, -height / 2.0));
    assert_eq!(grid.rotation_y, Rad(FRAC_PI_4));
    assert_eq!(grid.center_line_color.to_hex(), 0x444444);
    assert_eq!(grid.grid_color.to_hex(), 0x888888);
}

#[test]
fn wide_model_frames_on_width() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    let wide = ModelObject::new("wide", vec![box_mesh("slab", [-150.0, -5.0, -1.0], [150.0, 5.0, 1.0])]);
    renderer.display_model(wide).unwrap();

    let fit = renderer.frame_fit().unwrap();
    assert!(approx(fit.height, 300.0));
}

#[test]
fn display_replaces_previous_scene() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    renderer.display_model(tall_model()).unwrap();
    let first = renderer.scene().unwrap().id();
    renderer.display_model(tall_model()).unwrap();

    let scene = renderer.scene().unwrap();
    assert_ne!(scene.id(), first);
    assert_eq!(scene.models().count(), 1);
    assert_eq!(scene.grids().count(), 1);
}

#[test]
fn empty_model_keeps_camera_position() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    renderer.display_model(ModelObject::new("empty", Vec::new())).unwrap();

    let camera = renderer.camera().unwrap();
    assert_eq!(camera.position, Vector3::new(0.0, 0.0, 250.0));
    assert_eq!(camera.zoom, 2.5);

    let scene = renderer.scene().unwrap();
    assert_eq!(scene.grids().next().unwrap().size, 0.0);
    assert!(scene.hemisphere_light().is_some());
    assert_eq!(renderer.frame_fit().unwrap().distance, 0.0);
}

#[test]
fn resize_updates_aspect_and_target() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    harness.resize(900, 300);
    renderer.handle_event(&HostEvent::WindowResized);

    assert_eq!(renderer.camera().unwrap().aspect, 3.0);
    assert_eq!(renderer.target().unwrap().size(), ContainerSize::new(900, 300));
}

#[test]
fn events_before_init_are_ignored() {
    let harness = Harness::new();
    let mut renderer = harness.renderer(RendererOptions::new("#viewer"));

    renderer.handle_event(&HostEvent::WindowResized);
    renderer.handle_event(&HostEvent::MouseMoved {
        client_x: 0.0,
        client_y: 0.0,
    });

    assert_eq!(renderer.mouse(), Default::default());
    assert!(harness.recording.borrow().sizes.is_empty());
}

#[test]
fn mouse_offset_is_relative_to_half_viewport_at_construction() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    // Viewport is 1200x800 when constructed; later resizes do not move the center.
    harness.resize(400, 400);
    renderer.handle_event(&HostEvent::WindowResized);
    renderer.handle_event(&HostEvent::MouseMoved {
        client_x: 700.0,
        client_y: 300.0,
    });

    let mouse = renderer.mouse();
    assert_eq!(mouse.x, 50.0);
    assert_eq!(mouse.y, -50.0);
}

#[test]
fn animate_renders_until_loop_is_stopped() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);
    renderer.display_model(tall_model()).unwrap();

    assert!(renderer.animate().unwrap());
    assert!(renderer.animate().unwrap());

    let frames = harness.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].scene_id, renderer.scene().unwrap().id());
    assert_eq!(frames[0].nodes, 4);

    let handle = renderer.frame_loop().unwrap();
    assert_eq!(handle.frames(), 2);
    handle.stop();

    assert!(!renderer.animate().unwrap());
    assert!(!renderer.frame_loop_running());
    assert_eq!(harness.frames().len(), 2);
}

#[test]
fn wheel_input_zooms_camera_on_next_frame() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);

    renderer.handle_event(&HostEvent::Control(ControlInput::Wheel { delta_y: -1.0 }));
    renderer.animate().unwrap();

    let distance = renderer.camera().unwrap().position.magnitude();
    assert!(distance < 250.0, "{distance}");
}

#[test]
fn reinit_stops_previous_loop() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);
    let first = renderer.frame_loop().unwrap();

    renderer.init().unwrap();

    assert!(!first.is_running());
    assert!(renderer.frame_loop_running());
    assert_eq!(harness.mounts(), 2);
}

#[test]
fn dispose_stops_loop_and_releases_state() {
    let harness = Harness::new();
    let mut renderer = initialized(&harness);
    let handle = renderer.frame_loop().unwrap();

    renderer.dispose();

    assert!(!handle.is_running());
    assert!(!renderer.is_initialized());
    assert!(matches!(renderer.animate(), Err(RendererError::NotInitialized)));
}

#[test]
fn dropping_renderer_stops_loop() {
    let harness = Harness::new();
    let renderer = initialized(&harness);
    let handle = renderer.frame_loop().unwrap();

    drop(renderer);

    assert!(!handle.is_running());
}

#[test]
fn obj_file_loads_and_displays() {
    let path = std::env::temp_dir().join(format!("model_renderer_quad_{}.obj", std::process::id()));
    std::fs::write(
        &path,
        "o quad\nv -1 0 0\nv 1 0 0\nv 1 4 0\nv -1 4 0\nf 1 2 3 4\n",
    )
    .unwrap();

    let harness = Harness::new();
    let mut renderer = harness.renderer(RendererOptions::new("#viewer").with_model(path.to_string_lossy()));
    renderer.init().unwrap();

    let object = pollster::block_on(renderer.load_model(None)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(object.children.len(), 1);
    assert_eq!(object.triangle_count(), 2);

    renderer.display_model(object).unwrap();
    assert!(approx(renderer.frame_fit().unwrap().height, 4.0));
}

#[test]
fn missing_obj_file_rejects_with_io_error() {
    let harness = Harness::new();
    let renderer = harness.renderer(RendererOptions::new("#viewer"));

    let result = pollster::block_on(renderer.load_model(Some("file:///no/such/model.obj")));
    assert!(matches!(result, Err(LoadError::Io { .. })));
}
