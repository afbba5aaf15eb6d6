//! Camera distance needed to fit an extent in the field of view.

use cgmath::{Rad, Vector3};

/// Result of framing a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFit {
    /// Larger of the framed box's width and height.
    pub height: f32,
    /// Distance at which `height` fills the vertical field of view.
    pub distance: f32,
    pub camera_position: Vector3<f32>,
}

/// `|height / sin(fov / 2)|`
pub fn fit_distance(height: f32, fov: Rad<f32>) -> f32 {
    (height / (fov.0 / 2.0).sin()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn test_fit_distance_for_fifty_degrees() {
        let distance = fit_distance(100.0, Deg(50.0).into());
        assert!((distance - 236.6).abs() < 0.05, "{distance}");
    }

    #[test]
    fn test_fit_distance_is_never_negative() {
        assert!(fit_distance(-10.0, Deg(50.0).into()) > 0.0);
        assert_eq!(fit_distance(0.0, Deg(50.0).into()), 0.0);
    }
}
