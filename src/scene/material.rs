use nalgebra::Vector3;

/// Phong reflectance of a surface: ambient/diffuse/specular RGB triples in
/// [0, 1] plus the shininess exponent (>= 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(0.8, 0.8, 0.8),
            specular: Vector3::new(1.0, 1.0, 1.0),
            shininess: 32.0,
        }
    }
}
