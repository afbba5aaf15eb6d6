//! Axis-aligned bounding boxes.

use cgmath::Vector3;

/// Minimal axis-aligned box enclosing a set of points.
///
/// An empty box has `min > max` on every axis, so unioning with it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_by_point(Vector3::new(p[0], p[1], p[2]));
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn expand_by_point(&mut self, p: Vector3<f32>) {
        self.min = Vector3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Vector3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let mut out = *self;
        out.expand_by_point(other.min);
        out.expand_by_point(other.max);
        out
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb::new(self.min + offset, self.max + offset)
    }

    /// Center of the box; the origin for an empty box.
    pub fn center(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::new(0.0, 0.0, 0.0);
        }
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis; zero for an empty box.
    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::new(0.0, 0.0, 0.0);
        }
        self.max - self.min
    }
}
