use clap::Parser;
use log::info;
use nalgebra::Vector3;
use shaded::core::rasterizer::CullMode;
use shaded::io::image::save_image;
use shaded::io::scene_parser::load_scene;
use shaded::pipeline::renderer::{Renderer, ShadingMode};
use std::path::PathBuf;
use std::process::ExitCode;

/// Software rasterizer with Gouraud and per-pixel Phong shading.
#[derive(Parser)]
#[command(name = "shaded", version, about)]
struct Args {
    /// Scene description file.
    scene: PathBuf,

    /// Output width in pixels.
    xres: usize,

    /// Output height in pixels.
    yres: usize,

    /// Shading strategy for the render pass.
    #[arg(long, value_enum, default_value = "gouraud")]
    mode: ShadingMode,

    /// Face culling mode.
    #[arg(long, value_enum, default_value = "back")]
    cull: CullMode,

    /// Output image path (.ppm for the text format, anything else is PNG).
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    if args.xres == 0 || args.yres == 0 {
        return Err("resolution must be nonzero".to_string());
    }

    let scene = load_scene(&args.scene)?;
    info!(
        "Rendering {} object(s) with {} light(s) at {}x{} ({:?})",
        scene.objects.len(),
        scene.lights.len(),
        args.xres,
        args.yres,
        args.mode
    );

    let mut renderer = Renderer::new(args.xres, args.yres);
    renderer.rasterizer.cull_mode = args.cull;
    renderer.clear(Vector3::zeros());
    renderer.draw_scene(&scene, args.mode)?;

    save_image(&renderer.framebuffer, &args.output)
}
