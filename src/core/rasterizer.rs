use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{Barycentric, is_inside_triangle};
use crate::core::math::transform::ndc_to_screen;
use crate::core::pipeline::Shader;
use nalgebra::{Point2, Point3};
use rayon::prelude::*;

/// Draws triangles into the FrameBuffer: backface culling, screen mapping,
/// barycentric coverage, per-pixel clip-cube rejection, and depth testing.
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, clap::ValueEnum)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
        }
    }

    /// Rasterizes a single triangle given NDC coordinates and the
    /// corresponding per-vertex varyings.
    ///
    /// The per-pixel in-cube check below is the authoritative clipping
    /// mechanism; there is no polygon clipping stage. Triangles whose
    /// projection is degenerate (collinear screen points) are skipped, as
    /// are triangles carrying non-finite coordinates from a division by
    /// w == 0 upstream.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        ndc: &[Point3<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        if ndc
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return;
        }

        // 1. Backface culling in NDC space, from the winding of (C-B)x(A-B).
        let cross = (ndc[2] - ndc[1]).cross(&(ndc[0] - ndc[1]));
        match self.cull_mode {
            CullMode::Back if cross.z < 0.0 => return,
            CullMode::Front if cross.z > 0.0 => return,
            _ => {}
        }

        // 2. Screen mapping.
        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;
        let screen = [
            ndc_to_screen(ndc[0].x, ndc[0].y, width, height),
            ndc_to_screen(ndc[1].x, ndc[1].y, width, height),
            ndc_to_screen(ndc[2].x, ndc[2].y, width, height),
        ];

        let Some(bary) = Barycentric::new(screen[0], screen[1], screen[2]) else {
            // Zero-area projection: skip, no error surfaced.
            return;
        };

        // 3. Bounding box, clamped to the framebuffer (scissor).
        let (min_x, min_y, max_x, max_y) = bounding_box(&screen);
        if max_x < 0 || max_y < 0 || min_x >= framebuffer.width as i32 || min_y >= framebuffer.height as i32
        {
            return;
        }
        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.height as i32 - 1) as usize;

        // 4. Pixel loop. Rows run in parallel; the depth CAS plus striped
        // color locks in the framebuffer make the per-pixel
        // read-modify-write safe.
        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let weights = bary.weights(pixel_center);
                if !is_inside_triangle(&weights) {
                    continue;
                }

                // Interpolate the NDC position; reject pixels outside the
                // clip cube. Written as "keep iff all |c| <= 1" so that
                // non-finite values reject as well.
                let ndc_point = ndc[0].coords * weights.x
                    + ndc[1].coords * weights.y
                    + ndc[2].coords * weights.z;
                let in_cube = ndc_point.x.abs() <= 1.0
                    && ndc_point.y.abs() <= 1.0
                    && ndc_point.z.abs() <= 1.0;
                if !in_cube {
                    continue;
                }

                // 5. Depth test: smaller z is nearer.
                if framebuffer.depth_test_and_update(x, y, ndc_point.z) {
                    let varying = varyings[0] * weights.x
                        + varyings[1] * weights.y
                        + varyings[2] * weights.z;
                    framebuffer.set_pixel(x, y, shader.fragment(varying));
                }
            }
        });
    }
}

fn bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}
