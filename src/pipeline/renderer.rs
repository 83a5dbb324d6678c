use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::shaders::gouraud::GouraudShader;
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::vertex::{ProcessedGeometry, process_object};
use crate::scene::Scene;
use crate::scene::object::Object;
use log::debug;
use nalgebra::Vector3;

/// Which shading strategy a render pass uses. Selected once at the start of
/// the pass, never per triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ShadingMode {
    /// Lighting per vertex, colors interpolated across the triangle.
    Gouraud,
    /// Lighting per pixel from interpolated position and normal.
    Phong,
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Resets color and depth for a fresh render pass.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color);
    }

    /// Renders every object in the scene with the selected shading
    /// strategy. The transform pipeline runs to completion for an object
    /// before any of its faces rasterize.
    pub fn draw_scene(&mut self, scene: &Scene, mode: ShadingMode) -> Result<(), String> {
        for (index, object) in scene.objects.iter().enumerate() {
            let geometry = process_object(object, &scene.camera)
                .map_err(|e| format!("object {}: {}", index, e))?;
            debug!(
                "object {}: {} vertices, {} faces",
                index,
                object.vertices.len(),
                object.faces.len()
            );

            match mode {
                ShadingMode::Gouraud => {
                    let shader =
                        GouraudShader::new(&scene.lights, &object.material, scene.camera.position);
                    self.draw_object(object, &geometry, &shader);
                }
                ShadingMode::Phong => {
                    let shader =
                        PhongShader::new(&scene.lights, &object.material, scene.camera.position);
                    self.draw_object(object, &geometry, &shader);
                }
            }
        }
        Ok(())
    }

    fn draw_object<S: Shader>(&self, object: &Object, geometry: &ProcessedGeometry, shader: &S) {
        for face in &object.faces {
            let [v0, v1, v2] = face.vertices;
            let [n0, n1, n2] = face.normals;

            let ndc = [
                geometry.ndc_positions[v0],
                geometry.ndc_positions[v1],
                geometry.ndc_positions[v2],
            ];
            let varyings = [
                shader.vertex(&geometry.world_positions[v0], &geometry.normals[n0]),
                shader.vertex(&geometry.world_positions[v1], &geometry.normals[n1]),
                shader.vertex(&geometry.world_positions[v2], &geometry.normals[n2]),
            ];

            self.rasterizer
                .rasterize_triangle(&self.framebuffer, shader, &ndc, &varyings);
        }
    }
}
