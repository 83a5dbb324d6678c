use crate::core::geometry::Face;
use crate::core::math::transform::Transform;
use crate::scene::Scene;
use crate::scene::camera::{Camera, Frustum};
use crate::scene::light::PointLight;
use crate::scene::object::Object;
use log::info;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Loads a scene description file and the meshes it references.
///
/// Format, one directive per line:
///
/// ```text
/// camera:
/// position x y z
/// orientation ax ay az angle       (angle in radians)
/// near n / far f / left l / right r / top t / bottom b
/// light px py pz , r g b , k       (zero or more)
/// objects:
/// label file.obj                   (mesh declarations)
/// label                            (starts an instance block)
/// t tx ty tz | r ax ay az angle | s sx sy sz
/// ambient r g b / diffuse r g b / specular r g b / shininess s
/// ```
///
/// Mesh paths are resolved relative to the scene file's directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read scene file '{}': {}", path.display(), e))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&text, base_dir)
}

/// Parses scene text; `base_dir` anchors relative mesh paths.
pub fn parse_scene(text: &str, base_dir: &Path) -> Result<Scene, String> {
    let mut parser = SceneParser::new(base_dir);
    for (number, line) in text.lines().enumerate() {
        parser
            .consume(line)
            .map_err(|e| format!("line {}: {}", number + 1, e))?;
    }
    parser.finish()
}

#[derive(PartialEq)]
enum Section {
    Camera,
    Objects,
}

struct SceneParser<'a> {
    base_dir: &'a Path,
    section: Section,

    position: Option<Point3<f32>>,
    orientation: Option<(Vector3<f32>, f32)>,
    near: Option<f32>,
    far: Option<f32>,
    left: Option<f32>,
    right: Option<f32>,
    top: Option<f32>,
    bottom: Option<f32>,
    lights: Vec<PointLight>,

    prototypes: HashMap<String, Object>,
    instances: Vec<Object>,
}

impl<'a> SceneParser<'a> {
    fn new(base_dir: &'a Path) -> Self {
        Self {
            base_dir,
            section: Section::Camera,
            position: None,
            orientation: None,
            near: None,
            far: None,
            left: None,
            right: None,
            top: None,
            bottom: None,
            lights: Vec::new(),
            prototypes: HashMap::new(),
            instances: Vec::new(),
        }
    }

    fn consume(&mut self, line: &str) -> Result<(), String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(());
        }
        match self.section {
            Section::Camera => self.consume_camera_line(&tokens),
            Section::Objects => self.consume_object_line(&tokens),
        }
    }

    fn consume_camera_line(&mut self, tokens: &[&str]) -> Result<(), String> {
        match tokens[0] {
            "camera" | "camera:" => Ok(()),
            "position" => {
                let v = parse_floats(&tokens[1..], 3, "position")?;
                self.position = Some(Point3::new(v[0], v[1], v[2]));
                Ok(())
            }
            "orientation" => {
                let v = parse_floats(&tokens[1..], 4, "orientation")?;
                self.orientation = Some((Vector3::new(v[0], v[1], v[2]), v[3]));
                Ok(())
            }
            "near" => {
                self.near = Some(parse_floats(&tokens[1..], 1, "near")?[0]);
                Ok(())
            }
            "far" => {
                self.far = Some(parse_floats(&tokens[1..], 1, "far")?[0]);
                Ok(())
            }
            "left" => {
                self.left = Some(parse_floats(&tokens[1..], 1, "left")?[0]);
                Ok(())
            }
            "right" => {
                self.right = Some(parse_floats(&tokens[1..], 1, "right")?[0]);
                Ok(())
            }
            "top" => {
                self.top = Some(parse_floats(&tokens[1..], 1, "top")?[0]);
                Ok(())
            }
            "bottom" => {
                self.bottom = Some(parse_floats(&tokens[1..], 1, "bottom")?[0]);
                Ok(())
            }
            "light" => {
                // The separators between position, color, and attenuation
                // are plain "," tokens.
                let values: Vec<&str> = tokens[1..].iter().copied().filter(|t| *t != ",").collect();
                let v = parse_floats(&values, 7, "light")?;
                if v[6] < 0.0 {
                    return Err(format!("light attenuation must be >= 0, got {}", v[6]));
                }
                self.lights.push(PointLight::new(
                    Point3::new(v[0], v[1], v[2]),
                    Vector3::new(v[3], v[4], v[5]),
                    v[6],
                ));
                Ok(())
            }
            "objects:" => {
                self.section = Section::Objects;
                Ok(())
            }
            other => Err(format!("unrecognized camera directive '{}'", other)),
        }
    }

    fn consume_object_line(&mut self, tokens: &[&str]) -> Result<(), String> {
        match tokens[0] {
            "t" => {
                let v = parse_floats(&tokens[1..], 3, "translation")?;
                self.current_instance("t")?
                    .transforms
                    .push(Transform::Translation(Vector3::new(v[0], v[1], v[2])));
                Ok(())
            }
            "s" => {
                let v = parse_floats(&tokens[1..], 3, "scaling")?;
                self.current_instance("s")?
                    .transforms
                    .push(Transform::Scaling(Vector3::new(v[0], v[1], v[2])));
                Ok(())
            }
            "r" => {
                let v = parse_floats(&tokens[1..], 4, "rotation")?;
                let rotation = Transform::rotation(Vector3::new(v[0], v[1], v[2]), v[3])?;
                self.current_instance("r")?.transforms.push(rotation);
                Ok(())
            }
            "ambient" => {
                let v = parse_floats(&tokens[1..], 3, "ambient")?;
                self.current_instance("ambient")?.material.ambient = Vector3::new(v[0], v[1], v[2]);
                Ok(())
            }
            "diffuse" => {
                let v = parse_floats(&tokens[1..], 3, "diffuse")?;
                self.current_instance("diffuse")?.material.diffuse = Vector3::new(v[0], v[1], v[2]);
                Ok(())
            }
            "specular" => {
                let v = parse_floats(&tokens[1..], 3, "specular")?;
                self.current_instance("specular")?.material.specular =
                    Vector3::new(v[0], v[1], v[2]);
                Ok(())
            }
            "shininess" => {
                let v = parse_floats(&tokens[1..], 1, "shininess")?;
                if v[0] < 0.0 {
                    return Err(format!("shininess must be >= 0, got {}", v[0]));
                }
                self.current_instance("shininess")?.material.shininess = v[0];
                Ok(())
            }
            label if tokens.len() == 2 => {
                // Mesh declaration: "label file.obj".
                let mesh_path = self.base_dir.join(tokens[1]);
                let object = load_mesh(&mesh_path)?;
                self.prototypes.insert(label.to_string(), object);
                Ok(())
            }
            label if tokens.len() == 1 => {
                // Instance block: a bare label copies the declared mesh.
                let prototype = self
                    .prototypes
                    .get(label)
                    .ok_or_else(|| format!("instance of undeclared object '{}'", label))?;
                self.instances.push(prototype.clone());
                Ok(())
            }
            other => Err(format!("unrecognized object directive '{}'", other)),
        }
    }

    fn current_instance(&mut self, directive: &str) -> Result<&mut Object, String> {
        self.instances
            .last_mut()
            .ok_or_else(|| format!("'{}' directive before any object instance", directive))
    }

    fn finish(self) -> Result<Scene, String> {
        let position = self.position.ok_or("scene is missing 'position'")?;
        let (axis, angle_rad) = self.orientation.ok_or("scene is missing 'orientation'")?;
        let frustum = Frustum {
            near: self.near.ok_or("scene is missing 'near'")?,
            far: self.far.ok_or("scene is missing 'far'")?,
            left: self.left.ok_or("scene is missing 'left'")?,
            right: self.right.ok_or("scene is missing 'right'")?,
            top: self.top.ok_or("scene is missing 'top'")?,
            bottom: self.bottom.ok_or("scene is missing 'bottom'")?,
        };
        let camera = Camera::new(position, axis, angle_rad, frustum)?;

        info!(
            "Scene parsed: {} object instance(s), {} light(s)",
            self.instances.len(),
            self.lights.len()
        );
        Ok(Scene::new(camera, self.lights, self.instances))
    }
}

fn parse_floats(tokens: &[&str], expected: usize, what: &str) -> Result<Vec<f32>, String> {
    if tokens.len() != expected {
        return Err(format!(
            "'{}' expects {} value(s), got {}",
            what,
            expected,
            tokens.len()
        ));
    }
    tokens
        .iter()
        .map(|t| {
            t.parse::<f32>()
                .map_err(|_| format!("'{}': invalid number '{}'", what, t))
        })
        .collect()
}

/// Loads a mesh file, preserving face-relative normal indices as parallel
/// index triples.
fn load_mesh(path: &Path) -> Result<Object, String> {
    info!("Loading mesh: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        // Keep vertex and normal index arrays separate: the same vertex may
        // use a different normal on another face.
        single_index: false,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &load_options)
        .map_err(|e| format!("failed to load mesh '{}': {}", path.display(), e))?;

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut faces = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        if mesh.normals.is_empty() || mesh.normal_indices.len() != mesh.indices.len() {
            return Err(format!(
                "mesh '{}' ('{}') has no per-face vertex normals; lighting requires them",
                path.display(),
                model.name
            ));
        }

        let vertex_offset = vertices.len();
        let normal_offset = normals.len();
        for p in mesh.positions.chunks_exact(3) {
            vertices.push(Point3::new(p[0], p[1], p[2]));
        }
        for n in mesh.normals.chunks_exact(3) {
            normals.push(Vector3::new(n[0], n[1], n[2]));
        }

        for (tri, tri_n) in mesh
            .indices
            .chunks_exact(3)
            .zip(mesh.normal_indices.chunks_exact(3))
        {
            faces.push(Face::new(
                [
                    vertex_offset + tri[0] as usize,
                    vertex_offset + tri[1] as usize,
                    vertex_offset + tri[2] as usize,
                ],
                [
                    normal_offset + tri_n[0] as usize,
                    normal_offset + tri_n[1] as usize,
                    normal_offset + tri_n[2] as usize,
                ],
            ));
        }
    }

    Object::new(vertices, normals, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUAD_OBJ: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vn 0 0 1
f 1//1 2//1 3//1
f 1//1 3//1 4//1
";

    fn scene_text() -> String {
        "camera:
position 0 0 10
orientation 0 1 0 0
near 1
far 20
left -1
right 1
top 1
bottom -1
light 0 0 5 , 1 1 1 , 0.2
objects:
quad quad.obj
quad
t 0.5 0 0
r 0 1 0 0.3
s 2 2 2
ambient 0.2 0.1 0.1
diffuse 0.6 0.5 0.5
specular 0.3 0.3 0.3
shininess 8
"
        .to_string()
    }

    fn write_quad(dir: &Path) {
        let mut f = fs::File::create(dir.join("quad.obj")).unwrap();
        f.write_all(QUAD_OBJ.as_bytes()).unwrap();
    }

    #[test]
    fn parses_a_full_scene() {
        let dir = tempfile::tempdir().unwrap();
        write_quad(dir.path());

        let scene = parse_scene(&scene_text(), dir.path()).unwrap();
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.lights[0].attenuation, 0.2);
        assert_eq!(scene.objects.len(), 1);

        let object = &scene.objects[0];
        assert_eq!(object.vertices.len(), 4);
        assert_eq!(object.normals.len(), 1);
        assert_eq!(object.faces.len(), 2);
        assert_eq!(object.faces[0].vertices, [0, 1, 2]);
        assert_eq!(object.faces[0].normals, [0, 0, 0]);
        assert_eq!(object.transforms.len(), 3);
        assert_eq!(object.material.shininess, 8.0);

        assert_eq!(scene.camera.frustum.near, 1.0);
        assert_eq!(scene.camera.frustum.bottom, -1.0);
    }

    #[test]
    fn instances_of_one_mesh_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        write_quad(dir.path());

        let text = "camera:
position 0 0 10
orientation 0 1 0 0
near 1
far 20
left -1
right 1
top 1
bottom -1
objects:
quad quad.obj
quad
t 1 0 0
quad
s 3 3 3
";
        let scene = parse_scene(text, dir.path()).unwrap();
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.objects[0].transforms.len(), 1);
        assert_eq!(scene.objects[1].transforms.len(), 1);
        assert_ne!(scene.objects[0].transforms[0], scene.objects[1].transforms[0]);
    }

    #[test]
    fn missing_camera_parameter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let text = "camera:
position 0 0 10
orientation 0 1 0 0
near 1
far 20
left -1
right 1
top 1
objects:
";
        let err = parse_scene(text, dir.path()).unwrap_err();
        assert!(err.contains("bottom"), "{}", err);
    }

    #[test]
    fn undeclared_instance_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let text = "camera:
position 0 0 10
orientation 0 1 0 0
near 1
far 20
left -1
right 1
top 1
bottom -1
objects:
ghost
";
        let err = parse_scene(text, dir.path()).unwrap_err();
        assert!(err.contains("undeclared"), "{}", err);
    }

    #[test]
    fn zero_rotation_axis_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_quad(dir.path());
        let text = "camera:
position 0 0 10
orientation 0 1 0 0
near 1
far 20
left -1
right 1
top 1
bottom -1
objects:
quad quad.obj
quad
r 0 0 0 1.5
";
        let err = parse_scene(text, dir.path()).unwrap_err();
        assert!(err.contains("axis"), "{}", err);
    }

    #[test]
    fn transform_before_instance_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_quad(dir.path());
        let text = "camera:
position 0 0 10
orientation 0 1 0 0
near 1
far 20
left -1
right 1
top 1
bottom -1
objects:
quad quad.obj
t 1 0 0
";
        let err = parse_scene(text, dir.path()).unwrap_err();
        assert!(err.contains("before any object instance"), "{}", err);
    }
}
