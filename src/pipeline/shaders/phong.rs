use crate::core::pipeline::{Interpolatable, Shader};
use crate::pipeline::lighting::illuminate;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};
use std::ops::{Add, Mul};

/// Surface data interpolated across the triangle for per-pixel lighting.
/// The position is carried as a plain vector so the barycentric linear
/// combination stays a componentwise multiply-add.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceVarying {
    /// Position in world space.
    pub world: Vector3<f32>,
    /// Normal in world space; renormalized per fragment after
    /// interpolation.
    pub normal: Vector3<f32>,
}

impl Add for SurfaceVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            world: self.world + other.world,
            normal: self.normal + other.normal,
        }
    }
}

impl Mul<f32> for SurfaceVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            world: self.world * scalar,
            normal: self.normal * scalar,
        }
    }
}

impl Interpolatable for SurfaceVarying {}

/// Per-pixel lighting: world position and normal are interpolated across
/// the triangle and the reflection model runs for every covered pixel.
pub struct PhongShader<'a> {
    lights: &'a [PointLight],
    material: &'a Material,
    eye: Point3<f32>,
}

impl<'a> PhongShader<'a> {
    pub fn new(lights: &'a [PointLight], material: &'a Material, eye: Point3<f32>) -> Self {
        Self {
            lights,
            material,
            eye,
        }
    }
}

impl Shader for PhongShader<'_> {
    type Varying = SurfaceVarying;

    fn vertex(&self, world: &Point3<f32>, normal: &Vector3<f32>) -> Self::Varying {
        SurfaceVarying {
            world: world.coords,
            normal: *normal,
        }
    }

    fn fragment(&self, varying: Self::Varying) -> Vector3<f32> {
        let normal = varying.normal.normalize();
        illuminate(
            &Point3::from(varying.world),
            &normal,
            self.material,
            self.lights,
            &self.eye,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_matches_direct_lighting_at_a_vertex() {
        // With weights (1, 0, 0) the interpolated varying equals the vertex
        // varying, so per-pixel shading must agree with shading the vertex
        // directly.
        let lights = [PointLight::new(
            Point3::new(0.0, 0.0, 5.0),
            Vector3::new(1.0, 1.0, 1.0),
            0.0,
        )];
        let material = Material::default();
        let eye = Point3::new(0.0, 0.0, 10.0);
        let shader = PhongShader::new(&lights, &material, eye);

        let world = Point3::new(0.2, -0.1, 0.0);
        let normal = Vector3::z();
        let varying = shader.vertex(&world, &normal);
        let expected = illuminate(&world, &normal, &material, &lights, &eye);
        assert_eq!(shader.fragment(varying), expected);
    }

    #[test]
    fn interpolated_normals_are_renormalized() {
        // Averaging two unit normals shortens the result; the fragment
        // stage must shade with a unit vector again, so two symmetric
        // tilted normals average to exactly the straight-up answer.
        let lights = [PointLight::new(
            Point3::new(0.0, 0.0, 5.0),
            Vector3::new(1.0, 1.0, 1.0),
            0.0,
        )];
        let material = Material::default();
        let eye = Point3::new(0.0, 0.0, 10.0);
        let shader = PhongShader::new(&lights, &material, eye);

        let world = Point3::origin();
        let tilt_left = Vector3::new(-0.6, 0.0, 0.8);
        let tilt_right = Vector3::new(0.6, 0.0, 0.8);
        let blended = shader.vertex(&world, &tilt_left) * 0.5
            + shader.vertex(&world, &tilt_right) * 0.5;

        let straight_up = illuminate(&world, &Vector3::z(), &material, &lights, &eye);
        assert!((shader.fragment(blended) - straight_up).norm() < 1e-5);
    }
}
