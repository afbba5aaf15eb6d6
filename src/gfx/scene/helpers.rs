//! Scene helpers added around a displayed model: the reference grid, the
//! hemisphere light and exponential fog.

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::resources::material::Color;

use super::vertex::LineVertex;

/// Flat square grid in the XZ plane, drawn as lines.
#[derive(Debug, Clone, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_line_color: Color,
    pub grid_color: Color,
    pub position: Vector3<f32>,
    /// Rotation about the vertical axis.
    pub rotation_y: Rad<f32>,
}

impl GridHelper {
    pub fn new(size: f32, divisions: u32) -> Self {
        Self {
            size,
            divisions,
            center_line_color: Color::from_hex(0x444444),
            grid_color: Color::from_hex(0x888888),
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation_y: Rad(0.0),
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from_angle_y(self.rotation_y)
    }

    /// Line-list vertices in local space: `divisions + 1` lines along each axis.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let divisions = self.divisions.max(1);
        let center = divisions / 2;
        let step = self.size / divisions as f32;
        let half = self.size / 2.0;

        let mut vertices = Vec::with_capacity((divisions as usize + 1) * 4);
        for i in 0..=divisions {
            let k = -half + i as f32 * step;
            let color = if i == center {
                self.center_line_color
            } else {
                self.grid_color
            };
            let color = [color.r, color.g, color.b];

            for position in [[-half, 0.0, k], [half, 0.0, k], [k, 0.0, -half], [k, 0.0, half]] {
                vertices.push(LineVertex { position, color });
            }
        }
        vertices
    }
}

/// Two-color ambient light: `sky` from above, `ground` from below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl HemisphereLight {
    pub fn new(sky: Color, ground: Color, intensity: f32) -> Self {
        Self {
            sky,
            ground,
            intensity,
            position: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Exponential squared fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogExp2 {
    pub color: Color,
    pub density: f32,
}

impl FogExp2 {
    pub fn new(color: Color, density: f32) -> Self {
        Self { color, density }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_vertex_count() {
        let grid = GridHelper::new(10.0, 100);
        assert_eq!(grid.line_vertices().len(), 101 * 4);
    }

    #[test]
    fn test_grid_spans_size() {
        let grid = GridHelper::new(8.0, 4);
        let vertices = grid.line_vertices();
        let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_z = vertices.iter().map(|v| v.position[2]).fold(f32::MAX, f32::min);
        assert_eq!(max_x, 4.0);
        assert_eq!(min_z, -4.0);
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn test_grid_center_line_color() {
        let grid = GridHelper::new(4.0, 4);
        let vertices = grid.line_vertices();
        let center = grid.center_line_color;
        let center = [center.r, center.g, center.b];
        // Line index 2 of 0..=4 is the center line.
        assert!(vertices[8..12].iter().all(|v| v.color == center));
        assert!(vertices[0..4].iter().all(|v| v.color != center));
    }
}
