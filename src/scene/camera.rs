use crate::core::math::transform::{MIN_AXIS_NORM, TransformFactory};
use nalgebra::{Matrix4, Point3, Vector3};

/// Off-axis perspective view volume, bounded by six scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Camera pose and projection parameters.
///
/// The orientation is kept as axis + angle (the source of truth); the view
/// and projection matrices are composed from it on construction and cached.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub axis: Vector3<f32>,
    pub angle_rad: f32,
    pub frustum: Frustum,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    /// Builds a camera, rejecting a zero-length orientation axis.
    pub fn new(
        position: Point3<f32>,
        axis: Vector3<f32>,
        angle_rad: f32,
        frustum: Frustum,
    ) -> Result<Self, String> {
        if axis.norm() < MIN_AXIS_NORM {
            return Err(format!(
                "camera orientation axis must be nonzero, got ({}, {}, {})",
                axis.x, axis.y, axis.z
            ));
        }
        let mut camera = Self {
            position,
            axis,
            angle_rad,
            frustum,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        camera.update_matrices();
        Ok(camera)
    }

    /// Recomputes the cached matrices from the current pose and frustum.
    ///
    /// The pose is Translation(position) * Rotation(axis, angle) — the
    /// camera is rotated first, then moved into place. The world → camera
    /// matrix is the closed-form inverse: un-translate, then un-rotate.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::rotation(&self.axis, -self.angle_rad)
            * TransformFactory::translation(&-self.position.coords);

        let f = &self.frustum;
        self.projection_matrix =
            TransformFactory::frustum(f.left, f.right, f.bottom, f.top, f.near, f.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_frustum() -> Frustum {
        Frustum {
            near: 1.0,
            far: 20.0,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
        }
    }

    #[test]
    fn view_matrix_inverts_the_pose() {
        let camera = Camera::new(
            Point3::new(1.0, -2.0, 3.0),
            Vector3::new(0.3, 1.0, -0.2),
            0.8,
            unit_frustum(),
        )
        .unwrap();

        let pose = TransformFactory::translation(&camera.position.coords)
            * TransformFactory::rotation(&camera.axis, camera.angle_rad);
        let should_be_identity = camera.view_matrix() * pose;
        assert!((should_be_identity - Matrix4::identity()).norm() < 1e-5);
    }

    #[test]
    fn unrotated_camera_translates_world_points() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 10.0), Vector3::y(), 0.0, unit_frustum())
            .unwrap();
        let origin_in_camera = camera.view_matrix() * Point3::origin().to_homogeneous();
        assert!((origin_in_camera.z - -10.0).abs() < 1e-5);
    }

    #[test]
    fn zero_orientation_axis_is_rejected() {
        assert!(Camera::new(Point3::origin(), Vector3::zeros(), 0.0, unit_frustum()).is_err());
    }
}
