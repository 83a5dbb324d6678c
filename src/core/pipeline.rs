use nalgebra::{Point3, Vector3};
use std::ops::{Add, Mul};

/// Trait for per-vertex data that can be linearly combined with barycentric
/// weights across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage.
/// - Add + Mul<f32>: support the linear combination `a*w0 + b*w1 + c*w2`.
/// - Send + Sync: safe to use from multiple threads during rasterization.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl Interpolatable for Vector3<f32> {}

/// The programmable stages of a render pass.
///
/// Implementations must be thread-safe (Send + Sync) because fragments are
/// shaded concurrently.
///
/// The vertex stage runs after the transform pipeline has produced
/// world-space positions and unit normals for the whole object; the
/// rasterizer interpolates the resulting varyings and hands each covered
/// pixel to the fragment stage.
pub trait Shader: Send + Sync {
    /// Per-vertex output to be interpolated and provided to `fragment`.
    type Varying: Interpolatable;

    /// Per-vertex stage: derives the varying from a world-space position
    /// and its (unit) world-space normal.
    fn vertex(&self, world: &Point3<f32>, normal: &Vector3<f32>) -> Self::Varying;

    /// Per-fragment stage: final linear RGB color in [0, 1] for a covered
    /// pixel, given the interpolated varying.
    fn fragment(&self, varying: Self::Varying) -> Vector3<f32>;
}
