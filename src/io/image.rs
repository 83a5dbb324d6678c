use crate::core::framebuffer::FrameBuffer;
use log::info;
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Converts a linear [0, 1] channel to its 0-255 byte.
///
/// The cast truncates the fractional part toward zero (the historical
/// behavior of this pipeline, kept deliberately) and saturates out-of-range
/// values, so negative channels from the lighting model become 0.
#[inline]
fn channel_to_byte(c: f32) -> u8 {
    (c * 255.0) as u8
}

fn pixel(fb: &FrameBuffer, x: usize, y: usize) -> Vector3<f32> {
    fb.get_pixel(x, y).unwrap_or_else(Vector3::zeros)
}

/// Writes the framebuffer as a plain-text PPM (P3).
///
/// This is where the single vertical flip happens: output row 0 is the top
/// of the image, i.e. the highest-y row of the internal buffer. No other
/// stage flips.
pub fn write_ppm<W: Write>(fb: &FrameBuffer, out: &mut W) -> Result<(), String> {
    let mut emit = || -> std::io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", fb.width, fb.height)?;
        writeln!(out, "255")?;
        for y in (0..fb.height).rev() {
            for x in 0..fb.width {
                let c = pixel(fb, x, y);
                writeln!(
                    out,
                    "{} {} {}",
                    channel_to_byte(c.x),
                    channel_to_byte(c.y),
                    channel_to_byte(c.z)
                )?;
            }
        }
        Ok(())
    };
    emit().map_err(|e| format!("failed to write PPM: {}", e))
}

/// Saves the framebuffer as a PNG, applying the same flip and channel
/// conversion as the PPM path.
pub fn save_png(fb: &FrameBuffer, path: &Path) -> Result<(), String> {
    let mut img_buf = image::ImageBuffer::new(fb.width as u32, fb.height as u32);
    for (x, y, out) in img_buf.enumerate_pixels_mut() {
        let src_y = fb.height - 1 - y as usize;
        let c = pixel(fb, x as usize, src_y);
        *out = image::Rgb([
            channel_to_byte(c.x),
            channel_to_byte(c.y),
            channel_to_byte(c.z),
        ]);
    }
    img_buf
        .save(path)
        .map_err(|e| format!("failed to save image to '{}': {}", path.display(), e))
}

/// Saves the framebuffer to `path`, picking the format from the extension:
/// `.ppm` gets the text format, everything else goes through the `image`
/// crate (PNG and friends).
pub fn save_image(fb: &FrameBuffer, path: &Path) -> Result<(), String> {
    let is_ppm = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)
            .map_err(|e| format!("failed to create '{}': {}", path.display(), e))?;
        let mut out = BufWriter::new(file);
        write_ppm(fb, &mut out)?;
    } else {
        save_png(fb, path)?;
    }
    info!("Render saved to {}", path.display());
    Ok(())
}
