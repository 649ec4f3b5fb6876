//! Tiling of sub-expansions into one grid

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::grid::{ColorId, Grid, BACKGROUND};

/// Tile the sub-expansions of `basis` into a single grid.
///
/// Cell `(row, col)` of `basis` becomes the block of `heights[row]` rows by
/// `widths[col]` columns at the running offsets. Background cells, and cells
/// without an entry in `sub`, leave their block as background.
///
/// `widths` and `heights` must already be consistent with the shapes in
/// `sub`; see [`crate::expand::infer_dimensions`].
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use fractgrid::assemble::assemble;
/// use fractgrid::grid::Grid;
///
/// let basis = Grid::from_rows(vec![vec![1, 0]]).unwrap();
/// let sub = BTreeMap::from([(1, Arc::new(Grid::from_rows(vec![vec![1, 1]]).unwrap()))]);
///
/// let out = assemble(&basis, &sub, &[2, 2], &[1]);
/// assert_eq!(out.to_rows(), vec![vec![1, 1, 0, 0]]);
/// ```
pub fn assemble(basis: &Grid, sub: &BTreeMap<ColorId, Arc<Grid>>, widths: &[usize], heights: &[usize]) -> Grid {
    let mut output = Grid::background(heights.iter().sum(), widths.iter().sum());

    let mut top = 0;
    for (row, cells) in basis.rows().enumerate() {
        let mut left = 0;
        for (col, &cell) in cells.iter().enumerate() {
            if cell != BACKGROUND {
                if let Some(tile) = sub.get(&cell) {
                    output.blit(tile, top, left);
                }
            }
            left += widths[col];
        }
        top += heights[row];
    }

    output
}
