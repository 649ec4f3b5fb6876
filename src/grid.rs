//! Index grids: the values patterns are made of and expansions produce
//!
//! A [`Grid`] is a dense, row-major 2-D array of [`ColorId`] values. Patterns
//! are small grids; expansions at depth are large ones. The value
//! [`BACKGROUND`] is never substituted.

use std::collections::BTreeSet;
use thiserror::Error;

/// Identifier of a registered pattern ("color").
pub type ColorId = u8;

/// Reserved background / no-expand id.
pub const BACKGROUND: ColorId = 0;

/// Error constructing a grid from rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// No rows, or a first row with no cells
    #[error("grid has no cells")]
    Empty,
    /// A row whose length differs from the first row
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
}

/// A rectangular row-major array of color ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<ColorId>,
}

impl Grid {
    /// Create a `height` x `width` grid filled with [`BACKGROUND`].
    pub fn background(height: usize, width: usize) -> Self {
        Self { height, width, cells: vec![BACKGROUND; height * width] }
    }

    /// Build a grid from rows of ids.
    ///
    /// Every row must have the same, non-zero length.
    ///
    /// # Examples
    ///
    /// ```
    /// use fractgrid::grid::Grid;
    ///
    /// let grid = Grid::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
    /// assert_eq!(grid.shape(), (2, 2));
    /// assert_eq!(grid.get(1, 1), Some(1));
    /// ```
    pub fn from_rows<R: AsRef<[ColorId]>>(rows: impl IntoIterator<Item = R>) -> Result<Self, GridError> {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            match width {
                None => width = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(GridError::Ragged { row: index, expected, found: row.len() });
                }
                Some(_) => {}
            }
            cells.extend_from_slice(row);
            height += 1;
        }

        match width {
            Some(width) if width > 0 => Ok(Self { height, width, cells }),
            _ => Err(GridError::Empty),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<ColorId> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// The cells of one row.
    pub fn row(&self, row: usize) -> &[ColorId] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[ColorId]> + '_ {
        (0..self.height).map(move |r| self.row(r))
    }

    /// Raw row-major cell buffer.
    pub fn cells(&self) -> &[ColorId] {
        &self.cells
    }

    /// Distinct non-background ids appearing in the grid, ascending.
    pub fn distinct_colors(&self) -> Vec<ColorId> {
        self.cells
            .iter()
            .copied()
            .filter(|&c| c != BACKGROUND)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Copy `src` into this grid with its top-left corner at `(top, left)`.
    ///
    /// The caller guarantees that `src` fits.
    pub fn blit(&mut self, src: &Grid, top: usize, left: usize) {
        for (r, src_row) in src.rows().enumerate() {
            let start = (top + r) * self.width + left;
            self.cells[start..start + src.width].copy_from_slice(src_row);
        }
    }

    /// Copy out the `height` x `width` block starting at `(top, left)`.
    pub fn block(&self, top: usize, left: usize, height: usize, width: usize) -> Grid {
        let mut cells = Vec::with_capacity(height * width);
        for r in top..top + height {
            let start = r * self.width + left;
            cells.extend_from_slice(&self.cells[start..start + width]);
        }
        Grid { height, width, cells }
    }

    /// Rows as owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<ColorId>> {
        self.rows().map(|r| r.to_vec()).collect()
    }
}
