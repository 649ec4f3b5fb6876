//! PNG output and file path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image {width}x{height} scaled by {factor} exceeds the maximum image size")]
    TooLarge { width: u32, height: u32, factor: u32 },
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by an integer factor using nearest-neighbor sampling, so
/// every cell stays a crisp square block.
///
/// Fails with [`OutputError::TooLarge`] if a scaled side does not fit in
/// `u32`.
pub fn scale_image(image: RgbaImage, factor: u32) -> Result<RgbaImage, OutputError> {
    if factor <= 1 {
        return Ok(image);
    }
    let (width, height) = image.dimensions();
    let too_large = || OutputError::TooLarge { width, height, factor };
    let scaled_width = width.checked_mul(factor).ok_or_else(too_large)?;
    let scaled_height = height.checked_mul(factor).ok_or_else(too_large)?;
    Ok(image::imageops::resize(&image, scaled_width, scaled_height, FilterType::Nearest))
}

/// File name stem for one rendered expansion: `{color}_d{depth}`.
fn render_stem(color_name: &str, depth: usize) -> String {
    format!("{}_d{}", color_name, depth)
}

/// Generate the output path for a rendered expansion.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{input_stem}_{color}_d{depth}.png` next to the input |
/// | `-o out.png`, single render | `out.png` |
/// | `-o out.png`, several renders | `out_{color}_d{depth}.png` |
/// | `-o dir/` | `dir/{color}_d{depth}.png` |
pub fn generate_output_path(
    input: &Path,
    color_name: &str,
    depth: usize,
    output_arg: Option<&Path>,
    is_single: bool,
) -> PathBuf {
    let stem = render_stem(color_name, depth);

    let sibling = |base: &Path, prefix: &str| {
        let name = format!("{}_{}.png", prefix, stem);
        match base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
            _ => PathBuf::from(name),
        }
    };

    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(format!("{}.png", stem))
            } else if is_single {
                output.to_path_buf()
            } else {
                let prefix = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
                sibling(output, prefix)
            }
        }
        None => {
            let prefix = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
            sibling(input, prefix)
        }
    }
}
