//! Terminal rendering for expanded grids
//!
//! Cells are drawn as two-column blocks with a 24-bit background color, or as
//! plain glyphs for terminals and pipes that do not handle ANSI escapes.

use image::Rgba;

use crate::color::to_hex;
use crate::grid::{ColorId, Grid, BACKGROUND};
use crate::palette::IndexPalette;
use crate::registry::PatternRegistry;

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// Glyph for background cells in plain output
pub const BACKGROUND_GLYPH: char = '.';

/// Convert RGBA color to ANSI 24-bit background escape sequence.
///
/// Transparent colors (alpha = 0) are rendered as a dark gray background
/// to visually distinguish them from opaque colors.
///
/// # Examples
///
/// ```
/// use fractgrid::terminal::color_to_ansi_bg;
/// use image::Rgba;
///
/// assert_eq!(color_to_ansi_bg(Rgba([255, 0, 0, 255])), "\x1b[48;2;255;0;0m");
/// assert_eq!(color_to_ansi_bg(Rgba([0, 0, 0, 0])), "\x1b[48;5;236m");
/// ```
pub fn color_to_ansi_bg(rgba: Rgba<u8>) -> String {
    if rgba[3] == 0 {
        "\x1b[48;5;236m".to_string()
    } else {
        format!("\x1b[48;2;{};{};{}m", rgba[0], rgba[1], rgba[2])
    }
}

/// Single-character glyph for a cell: the first character of the color's
/// name, its last id digit when unnamed, or [`BACKGROUND_GLYPH`].
pub fn cell_glyph(registry: &PatternRegistry, id: ColorId) -> char {
    if id == BACKGROUND {
        return BACKGROUND_GLYPH;
    }
    registry
        .name_of(id)
        .and_then(|name| name.chars().next())
        .or_else(|| char::from_digit(u32::from(id % 10), 10))
        .unwrap_or('?')
}

/// Render a grid with ANSI color backgrounds, one line per row.
pub fn render_ansi(grid: &Grid, palette: &IndexPalette) -> String {
    let mut output = String::with_capacity(grid.len() * 24);
    for row in grid.rows() {
        let mut current: Option<ColorId> = None;
        for &cell in row {
            // Only emit an escape when the color changes along the row
            if current != Some(cell) {
                output.push_str(&color_to_ansi_bg(palette.get(cell)));
                current = Some(cell);
            }
            output.push_str("  ");
        }
        output.push_str(ANSI_RESET);
        output.push('\n');
    }
    output
}

/// Render a grid as plain text, one glyph per cell.
///
/// # Examples
///
/// ```
/// use fractgrid::grid::Grid;
/// use fractgrid::terminal::render_plain;
///
/// let grid = Grid::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
/// let text = render_plain(&grid, |id| if id == 0 { '.' } else { '#' });
/// assert_eq!(text, "#.\n.#\n");
/// ```
pub fn render_plain(grid: &Grid, glyph: impl Fn(ColorId) -> char) -> String {
    let mut output = String::with_capacity(grid.len() + grid.height());
    for row in grid.rows() {
        output.extend(row.iter().map(|&cell| glyph(cell)));
        output.push('\n');
    }
    output
}

/// Legend mapping glyphs to color names and display colors for every color
/// present in `grid`.
pub fn render_legend(grid: &Grid, registry: &PatternRegistry, palette: &IndexPalette) -> String {
    let mut legend = String::from("Legend:\n");
    let mut ids = grid.distinct_colors();
    if grid.cells().contains(&BACKGROUND) {
        ids.insert(0, BACKGROUND);
    }
    for id in ids {
        let name = if id == BACKGROUND { "background".to_string() } else { registry.label(id) };
        legend.push_str(&format!(
            "  {} = {:16} ({})\n",
            cell_glyph(registry, id),
            name,
            to_hex(palette.get(id))
        ));
    }
    legend
}
