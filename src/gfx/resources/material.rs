//! Mesh materials
//!
//! Meshes either keep what their model file asked for ([`MeshMaterial::Imported`])
//! or carry a [`LambertMaterial`]. Displaying a model replaces every child
//! material with [`LambertMaterial::display`].

/// Linear RGB color built from a `0xRRGGBB` hex value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| ((c.clamp(0.0, 1.0) * 255.0).round() as u32) & 0xFF;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// RGB plus an extra fourth component, the layout shader uniforms use.
    pub fn to_array4(self, w: f32) -> [f32; 4] {
        [self.r, self.g, self.b, w]
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Which faces of a triangle get rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    Flat,
    Smooth,
}

/// Diffuse material lit by the scene lights, plus a constant emissive term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertMaterial {
    pub color: Color,
    pub emissive: Color,
    pub shading: Shading,
    pub side: Side,
    pub polygon_offset: bool,
    pub polygon_offset_factor: f32,
    pub polygon_offset_units: i32,
    /// Whether scene fog affects this material.
    pub fog: bool,
}

impl Default for LambertMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::new(0.0, 0.0, 0.0),
            shading: Shading::Smooth,
            side: Side::Front,
            polygon_offset: false,
            polygon_offset_factor: 0.0,
            polygon_offset_units: 0,
            fog: true,
        }
    }
}

impl LambertMaterial {
    /// The flat gray material every displayed mesh is drawn with.
    pub fn display() -> Self {
        Self {
            color: Color::from_hex(0xADADAD),
            emissive: Color::from_hex(0x737373),
            shading: Shading::Flat,
            side: Side::Double,
            polygon_offset: true,
            polygon_offset_factor: 1.0,
            polygon_offset_units: 1,
            fog: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeshMaterial {
    /// Material described by the model file (e.g. an MTL entry).
    Imported { name: String, diffuse: Color },
    Lambert(LambertMaterial),
}

impl Default for MeshMaterial {
    fn default() -> Self {
        MeshMaterial::Imported {
            name: "default".to_string(),
            diffuse: Color::new(0.8, 0.8, 0.8),
        }
    }
}

impl MeshMaterial {
    /// Resolves to the Lambert parameters the renderer draws with.
    pub fn as_lambert(&self) -> LambertMaterial {
        match self {
            MeshMaterial::Lambert(material) => *material,
            MeshMaterial::Imported { diffuse, .. } => LambertMaterial {
                color: *diffuse,
                ..Default::default()
            },
        }
    }
}
