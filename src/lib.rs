//! A software rasterization and shading pipeline.
//!
//! Scenes (camera, point lights, objects with transform stacks) are run
//! through an object-space → world → camera → NDC transform chain, lit with
//! the Phong reflection model, and rasterized with barycentric triangle
//! fill and a depth buffer. Shading is either per-vertex (Gouraud) or
//! per-pixel (Phong), selected once per render pass.

pub mod core;
pub mod io;
pub mod pipeline;
pub mod scene;
