use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating transformation matrices.
/// Manually implemented to keep full control over the coordinate system
/// (right-handed, camera looking down -Z in camera space).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a translation matrix.
    pub fn translation(t: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, t.x,
            0.0, 1.0, 0.0, t.y,
            0.0, 0.0, 1.0, t.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a (possibly non-uniform) scaling matrix.
    pub fn scaling(s: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            s.x, 0.0, 0.0, 0.0,
            0.0, s.y, 0.0, 0.0,
            0.0, 0.0, s.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix about an arbitrary axis through the origin
    /// using Rodrigues' rotation formula.
    ///
    /// The axis is normalized internally. A zero-length axis is a
    /// precondition violation; `Transform::rotation` and `Camera::new`
    /// validate it before any matrix is built.
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let axis_unit = axis.normalize();
        let x = axis_unit.x;
        let y = axis_unit.y;
        let z = axis_unit.z;
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;

        Matrix4::new(
            t * x * x + c,     t * x * y - z * s, t * x * z + y * s, 0.0,
            t * x * y + z * s, t * y * y + c,     t * y * z - x * s, 0.0,
            t * x * z - y * s, t * y * z + x * s, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        )
    }

    /// Creates the off-axis perspective projection matrix for a frustum
    /// bounded by the six scalars. Maps the view volume to NDC [-1, 1]^3.
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
        let rl = right - left;
        let tb = top - bottom;
        let fn_ = far - near;

        Matrix4::new(
            2.0 * near / rl, 0.0,             (right + left) / rl, 0.0,
            0.0,             2.0 * near / tb, (top + bottom) / tb, 0.0,
            0.0,             0.0,             -(far + near) / fn_, -2.0 * far * near / fn_,
            0.0,             0.0,             -1.0,                0.0,
        )
    }
}

//=================================
// Geometric transform stacks
//=================================

/// Smallest axis norm accepted for a rotation.
pub const MIN_AXIS_NORM: f32 = 1e-6;

/// One entry of an object's (or the camera pose's) geometric transform
/// stack. Stacks are ordered: the first entry is applied to a point first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translation(Vector3<f32>),
    Scaling(Vector3<f32>),
    Rotation { axis: Vector3<f32>, angle_rad: f32 },
}

impl Transform {
    /// Creates a rotation entry, rejecting a zero-length axis.
    pub fn rotation(axis: Vector3<f32>, angle_rad: f32) -> Result<Self, String> {
        if axis.norm() < MIN_AXIS_NORM {
            return Err(format!(
                "rotation axis must be nonzero, got ({}, {}, {})",
                axis.x, axis.y, axis.z
            ));
        }
        Ok(Self::Rotation { axis, angle_rad })
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        match self {
            Self::Translation(t) => TransformFactory::translation(t),
            Self::Scaling(s) => TransformFactory::scaling(s),
            Self::Rotation { axis, angle_rad } => TransformFactory::rotation(axis, *angle_rad),
        }
    }
}

/// Composes an ordered transform list `[T1, T2, ..., Tn]` ("apply T1 first,
/// then T2, ...") into the single matrix `Tn * ... * T2 * T1`, so that
/// `M * p` applies T1 first. Reversing this fold produces geometrically
/// wrong output without any crash, so the ordering is pinned by tests.
pub fn compose(transforms: &[Transform]) -> Matrix4<f32> {
    transforms
        .iter()
        .fold(Matrix4::identity(), |acc, t| t.matrix() * acc)
}

//=================================
// Core transformation functions
//=================================

/// Applies a homogeneous transform to a point and divides by w.
///
/// A point on the camera plane has w == 0 after projection; the division
/// then yields non-finite coordinates, which the rasterizer rejects.
#[inline]
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    let v: Vector4<f32> = m * p.to_homogeneous();
    Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
}

/// Converts NDC (x, y) in [-1, 1] to screen coordinates in a
/// `width` x `height` pixel grid. Y keeps the math convention (+y up); the
/// vertical flip happens exactly once, at image emission.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (ndc_y + 1.0) * 0.5 * height)
}
