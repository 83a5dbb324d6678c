use crate::core::geometry::Face;
use crate::core::math::transform::Transform;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};

/// A renderable object: vertex and normal buffers (0-based), triangular
/// faces indexing into them, one material, and an ordered stack of
/// geometric transforms (applied first-to-last).
///
/// The source format's 1-based indices are renumbered to 0-based at load
/// time; no sentinel slot exists anywhere.
#[derive(Debug, Clone)]
pub struct Object {
    pub vertices: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub faces: Vec<Face>,
    pub material: Material,
    pub transforms: Vec<Transform>,
}

impl Object {
    /// Builds an object with a default material and empty transform stack,
    /// rejecting faces that index out of bounds.
    pub fn new(
        vertices: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        faces: Vec<Face>,
    ) -> Result<Self, String> {
        for (i, face) in faces.iter().enumerate() {
            if face.vertices.iter().any(|&v| v >= vertices.len()) {
                return Err(format!(
                    "face {} references a vertex outside the buffer (len {})",
                    i,
                    vertices.len()
                ));
            }
            if face.normals.iter().any(|&n| n >= normals.len()) {
                return Err(format!(
                    "face {} references a normal outside the buffer (len {})",
                    i,
                    normals.len()
                ));
            }
        }
        Ok(Self {
            vertices,
            normals,
            faces,
            material: Material::default(),
            transforms: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_face_indices_are_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let normals = vec![Vector3::z()];

        let ok = Object::new(
            vertices.clone(),
            normals.clone(),
            vec![Face::new([0, 1, 2], [0, 0, 0])],
        );
        assert!(ok.is_ok());

        let bad_vertex = Object::new(
            vertices.clone(),
            normals.clone(),
            vec![Face::new([0, 1, 3], [0, 0, 0])],
        );
        assert!(bad_vertex.is_err());

        let bad_normal = Object::new(vertices, normals, vec![Face::new([0, 1, 2], [0, 0, 1])]);
        assert!(bad_normal.is_err());
    }
}
