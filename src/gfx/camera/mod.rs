pub mod camera_utils;
pub mod framing;
pub mod orbit_controls;
pub mod perspective;

// Re-export main types
pub use camera_utils::{Camera, CameraUniform};
pub use framing::{fit_distance, FrameFit};
pub use orbit_controls::{ControlInput, OrbitControls, PointerButton};
pub use perspective::PerspectiveCamera;
