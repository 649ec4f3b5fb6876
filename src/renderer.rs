//! Index grid rendering to image buffers

use image::RgbaImage;
use thiserror::Error;

use crate::grid::Grid;
use crate::palette::IndexPalette;

/// Error rendering a grid to an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Image sides are `u32`
    #[error("Grid {height}x{width} is too large for an image")]
    TooLarge { height: usize, width: usize },
}

/// Render an index grid to an RGBA image, one pixel per cell.
///
/// # Examples
///
/// ```
/// use fractgrid::grid::Grid;
/// use fractgrid::palette::IndexPalette;
/// use fractgrid::renderer::render_grid;
/// use image::Rgba;
///
/// let grid = Grid::from_rows(vec![vec![1, 0]]).unwrap();
/// let mut palette = IndexPalette::new();
/// palette.set(1, Rgba([255, 0, 0, 255]));
///
/// let image = render_grid(&grid, &palette).unwrap();
/// assert_eq!(image.dimensions(), (2, 1));
/// assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
/// assert_eq!(*image.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
/// ```
pub fn render_grid(grid: &Grid, palette: &IndexPalette) -> Result<RgbaImage, RenderError> {
    let too_large = || RenderError::TooLarge { height: grid.height(), width: grid.width() };
    let width = u32::try_from(grid.width()).map_err(|_| too_large())?;
    let height = u32::try_from(grid.height()).map_err(|_| too_large())?;

    let mut image = RgbaImage::new(width, height);
    for (pixel, &cell) in image.pixels_mut().zip(grid.cells()) {
        *pixel = palette.get(cell);
    }
    Ok(image)
}
