//! Damped orbit controls for a [`PerspectiveCamera`].
//!
//! Input only accumulates deltas; [`OrbitControls::update`] applies them to
//! the camera once per frame. With damping enabled each update applies a
//! `damping_factor` share of the pending rotation and pan, then decays what
//! is left by `1 - damping_factor`, so motion eases out over several frames.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3, Zero};

use super::perspective::PerspectiveCamera;

const EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer input in container pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    PointerDown {
        button: PointerButton,
        x: f32,
        y: f32,
        shift: bool,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp,
    /// Browser wheel convention: positive `delta_y` zooms out.
    Wheel {
        delta_y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    None,
    Rotate,
    Pan,
    Zoom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SphericalDelta {
    theta: f32,
    phi: f32,
}

pub struct OrbitControls {
    pub target: Vector3<f32>,

    pub enable_damping: bool,
    pub damping_factor: f32,

    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub enable_pan: bool,
    pub pan_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits, measured from the up axis.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    element_height: f32,
    spherical_delta: SphericalDelta,
    scale: f32,
    pan_offset: Vector3<f32>,
    state: DragState,
    last_pointer: Option<(f32, f32)>,
    last_position: Vector3<f32>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vector3::zero(),
            enable_damping: false,
            damping_factor: 0.05,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_rotate: true,
            rotate_speed: 1.0,
            enable_pan: true,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            element_height: 1.0,
            spherical_delta: SphericalDelta::default(),
            scale: 1.0,
            pan_offset: Vector3::zero(),
            state: DragState::None,
            last_pointer: None,
            last_position: Vector3::zero(),
        }
    }
}

impl OrbitControls {
    /// Controls orbiting the origin, bound to an element `height` pixels tall.
    pub fn new(element_height: u32) -> Self {
        let mut controls = Self::default();
        controls.set_element_height(element_height);
        controls
    }

    /// Height of the element receiving input; drag distances are relative to it.
    pub fn set_element_height(&mut self, height: u32) {
        self.element_height = height.max(1) as f32;
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::None
    }

    pub fn handle_input(&mut self, input: &ControlInput, camera: &PerspectiveCamera) {
        match *input {
            ControlInput::PointerDown { button, x, y, shift } => {
                self.state = match button {
                    PointerButton::Primary if shift && self.enable_pan => DragState::Pan,
                    PointerButton::Primary if !shift && self.enable_rotate => DragState::Rotate,
                    PointerButton::Secondary if self.enable_pan => DragState::Pan,
                    PointerButton::Middle if self.enable_zoom => DragState::Zoom,
                    _ => DragState::None,
                };
                self.last_pointer = Some((x, y));
            }
            ControlInput::PointerMove { x, y } => {
                let Some((last_x, last_y)) = self.last_pointer else {
                    return;
                };
                if self.state == DragState::None {
                    return;
                }
                let (dx, dy) = (x - last_x, y - last_y);
                self.last_pointer = Some((x, y));

                match self.state {
                    DragState::Rotate => {
                        let h = self.element_height;
                        self.rotate_left(2.0 * PI * dx / h * self.rotate_speed);
                        self.rotate_up(2.0 * PI * dy / h * self.rotate_speed);
                    }
                    DragState::Pan => self.pan(dx * self.pan_speed, dy * self.pan_speed, camera),
                    DragState::Zoom => {
                        if dy > 0.0 {
                            self.zoom_out(self.zoom_scale());
                        } else if dy < 0.0 {
                            self.zoom_in(self.zoom_scale());
                        }
                    }
                    DragState::None => {}
                }
            }
            ControlInput::PointerUp => {
                self.state = DragState::None;
                self.last_pointer = None;
            }
            ControlInput::Wheel { delta_y } => {
                if !self.enable_zoom || self.is_dragging() {
                    return;
                }
                if delta_y < 0.0 {
                    self.zoom_in(self.zoom_scale());
                } else if delta_y > 0.0 {
                    self.zoom_out(self.zoom_scale());
                }
            }
        }
    }

    /// Applies pending motion to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;

        let mut radius = offset.magnitude();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, 0.0)
        };

        if self.enable_damping {
            theta += self.spherical_delta.theta * self.damping_factor;
            phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            theta += self.spherical_delta.theta;
            phi += self.spherical_delta.phi;
        }

        phi = phi
            .max(self.min_polar_angle)
            .min(self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        radius = (radius * self.scale).max(self.min_distance).min(self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        camera.position = self.target + offset;
        camera.target = self.target;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= keep;
            self.spherical_delta.phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.spherical_delta = SphericalDelta::default();
            self.pan_offset = Vector3::zero();
        }

        let zoom_changed = self.scale != 1.0;
        self.scale = 1.0;

        let moved = (camera.position - self.last_position).magnitude2() > EPS;
        self.last_position = camera.position;
        zoom_changed || moved
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn zoom_in(&mut self, factor: f32) {
        self.scale *= factor;
    }

    fn zoom_out(&mut self, factor: f32) {
        self.scale /= factor;
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Screen-space pan scaled so the point under the cursor follows it.
    fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        let forward = -offset;
        if forward.magnitude2() < EPS {
            return;
        }
        let target_distance = offset.magnitude() * (camera.fov_radians().0 / 2.0).tan();

        let forward = forward.normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward).normalize();

        let h = self.element_height;
        self.pan_offset += right * (-2.0 * dx * target_distance / h);
        self.pan_offset += up * (2.0 * dy * target_distance / h);
    }
}
