use crate::core::pipeline::Shader;
use crate::pipeline::lighting::illuminate;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};

/// Per-vertex lighting: the reflection model runs once per vertex and the
/// rasterizer interpolates the resulting colors across the triangle.
pub struct GouraudShader<'a> {
    lights: &'a [PointLight],
    material: &'a Material,
    eye: Point3<f32>,
}

impl<'a> GouraudShader<'a> {
    pub fn new(lights: &'a [PointLight], material: &'a Material, eye: Point3<f32>) -> Self {
        Self {
            lights,
            material,
            eye,
        }
    }
}

impl Shader for GouraudShader<'_> {
    type Varying = Vector3<f32>;

    fn vertex(&self, world: &Point3<f32>, normal: &Vector3<f32>) -> Self::Varying {
        illuminate(world, normal, self.material, self.lights, &self.eye)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector3<f32> {
        varying
    }
}
