use nalgebra::{Point3, Vector3};

/// A point light with quadratic distance attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: Point3<f32>,
    /// RGB color with channels in [0, 1].
    pub color: Vector3<f32>,
    /// Quadratic attenuation coefficient k >= 0, applied as
    /// 1 / (1 + k * distance^2).
    pub attenuation: f32,
}

impl PointLight {
    pub fn new(position: Point3<f32>, color: Vector3<f32>, attenuation: f32) -> Self {
        Self {
            position,
            color,
            attenuation,
        }
    }
}
