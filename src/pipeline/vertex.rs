use crate::core::math::transform::{compose, transform_point};
use crate::scene::camera::Camera;
use crate::scene::object::Object;
use nalgebra::{Point3, Vector3};

/// Per-object output of the transform pipeline: buffers parallel to the
/// object's vertex and normal buffers, each expressed in exactly one space.
pub struct ProcessedGeometry {
    /// Positions after the object's composed geometric transform.
    pub world_positions: Vec<Point3<f32>>,
    /// Positions after world → camera and perspective projection, divided
    /// by w.
    pub ndc_positions: Vec<Point3<f32>>,
    /// Unit normals after the inverse-transpose of the geometric transform.
    pub normals: Vec<Vector3<f32>>,
}

/// Runs the full per-object transform chain.
///
/// Positions go through the geometric stack, then the camera's view and
/// projection matrices (homogeneous divide included at each step that needs
/// it). Normals are transformed by the inverse-transpose of the geometric
/// matrix and renormalized; using the geometric matrix itself would skew
/// normals under non-uniform scaling.
pub fn process_object(object: &Object, camera: &Camera) -> Result<ProcessedGeometry, String> {
    let geometric = compose(&object.transforms);

    let world_positions: Vec<Point3<f32>> = object
        .vertices
        .iter()
        .map(|v| transform_point(&geometric, v))
        .collect();

    let normal_matrix = geometric
        .try_inverse()
        .ok_or_else(|| "geometric transform is singular; normals cannot be transformed".to_string())?
        .transpose();
    let linear = normal_matrix.fixed_view::<3, 3>(0, 0);
    let normals: Vec<Vector3<f32>> = object
        .normals
        .iter()
        .map(|n| (linear * n).normalize())
        .collect();

    let view_projection = camera.projection_matrix() * camera.view_matrix();
    let ndc_positions: Vec<Point3<f32>> = world_positions
        .iter()
        .map(|p| transform_point(&view_projection, p))
        .collect();

    Ok(ProcessedGeometry {
        world_positions,
        ndc_positions,
        normals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Face;
    use crate::core::math::transform::Transform;
    use crate::scene::camera::Frustum;

    fn test_camera() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 10.0),
            Vector3::y(),
            0.0,
            Frustum {
                near: 1.0,
                far: 20.0,
                left: -1.0,
                right: 1.0,
                top: 1.0,
                bottom: -1.0,
            },
        )
        .unwrap()
    }

    fn flat_patch() -> Object {
        // A single triangle lying in the x = 0 plane, normal along +x.
        Object::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![Vector3::x()],
            vec![Face::new([0, 1, 2], [0, 0, 0])],
        )
        .unwrap()
    }

    #[test]
    fn nonuniform_scaling_keeps_normal_direction_and_length() {
        // Scaling by (2,1,1) along the normal's own axis must not rotate
        // the normal; the inverse-transpose plus renormalization keeps it
        // exactly (1,0,0) at unit length.
        let mut object = flat_patch();
        object.transforms = vec![Transform::Scaling(Vector3::new(2.0, 1.0, 1.0))];

        let processed = process_object(&object, &test_camera()).unwrap();
        let n = processed.normals[0];
        assert!((n.norm() - 1.0).abs() < 1e-5);
        assert!((n - Vector3::x()).norm() < 1e-5);
    }

    #[test]
    fn nonuniform_scaling_corrects_oblique_normals() {
        // A 45-degree normal on a surface scaled (2,1,1) must tilt toward
        // the unscaled axis; the naive transform would tilt it the other
        // way.
        let mut object = flat_patch();
        object.normals = vec![Vector3::new(1.0, 1.0, 0.0).normalize()];
        object.transforms = vec![Transform::Scaling(Vector3::new(2.0, 1.0, 1.0))];

        let processed = process_object(&object, &test_camera()).unwrap();
        let n = processed.normals[0];
        assert!((n.norm() - 1.0).abs() < 1e-5);
        // Inverse-transpose divides the x component by 2: y now dominates.
        assert!(n.y > n.x && n.x > 0.0);
    }

    #[test]
    fn transform_stack_applies_in_order() {
        let mut object = flat_patch();
        object.transforms = vec![
            Transform::Translation(Vector3::new(1.0, 0.0, 0.0)),
            Transform::Scaling(Vector3::new(2.0, 2.0, 2.0)),
        ];
        let processed = process_object(&object, &test_camera()).unwrap();
        assert!((processed.world_positions[0] - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn centered_point_projects_to_ndc_center() {
        let object = flat_patch();
        let processed = process_object(&object, &test_camera()).unwrap();
        // The origin sits 10 units down the view axis; it lands on the NDC
        // z-axis with x = y = 0.
        let ndc = processed.ndc_positions[0];
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z.abs() <= 1.0);
    }

    #[test]
    fn singular_geometric_transform_is_an_error() {
        let mut object = flat_patch();
        object.transforms = vec![Transform::Scaling(Vector3::new(0.0, 1.0, 1.0))];
        assert!(process_object(&object, &test_camera()).is_err());
    }
}
