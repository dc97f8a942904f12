//! Writing rendered images to disk.

use crate::renderer::{color_to_rgb, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a render.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Serialize the image as a plain-text `P3` PPM stream.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> Result<(), OutputError> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the image, choosing the encoder from the file extension.
///
/// `.ppm` is written as text; `.png`, `.jpg`/`.jpeg`, `.bmp` and `.tga` go
/// through the `image` crate.
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let nan_pixels = image.nan_count();
    if nan_pixels > 0 {
        log::warn!("{} pixels contained NaN and were written as black", nan_pixels);
    }

    match extension.as_str() {
        "ppm" => {
            let file = File::create(path)?;
            write_ppm(image, BufWriter::new(file))?;
        }
        "png" | "jpg" | "jpeg" | "bmp" | "tga" => {
            image::save_buffer(
                path,
                &image.to_rgb8(),
                image.width,
                image.height,
                image::ColorType::Rgb8,
            )?;
        }
        _ => return Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }

    log::info!("Wrote {}", path.display());
    Ok(())
}
