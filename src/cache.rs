//! Memo table of materialized expansions
//!
//! For each color the cache keeps a sequence of grids indexed by depth. The
//! sequence only grows, slots fill lazily, and a filled slot is never
//! overwritten. Depth 0 is never stored here; it is the registered pattern.

use std::sync::Arc;

use crate::grid::{ColorId, Grid};

/// Write-once store of grids keyed by `(color, depth)`.
#[derive(Debug, Clone, Default)]
pub struct ExpansionCache {
    /// `levels[color][depth]`
    levels: Vec<Vec<Option<Arc<Grid>>>>,
    entries: usize,
    cells: usize,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached grid for `(color, depth)`.
    pub fn get(&self, color: ColorId, depth: usize) -> Option<&Arc<Grid>> {
        self.levels.get(usize::from(color))?.get(depth)?.as_ref()
    }

    pub fn contains(&self, color: ColorId, depth: usize) -> bool {
        self.get(color, depth).is_some()
    }

    /// Store a grid for `(color, depth)` and return the cached value.
    ///
    /// If the slot is already filled the existing grid is kept and returned.
    pub fn insert(&mut self, color: ColorId, depth: usize, grid: Arc<Grid>) -> Arc<Grid> {
        let color_index = usize::from(color);
        if self.levels.len() <= color_index {
            self.levels.resize_with(color_index + 1, Vec::new);
        }
        let depths = &mut self.levels[color_index];
        if depths.len() <= depth {
            depths.resize(depth + 1, None);
        }

        if let Some(existing) = &depths[depth] {
            return Arc::clone(existing);
        }
        depths[depth] = Some(Arc::clone(&grid));
        self.entries += 1;
        self.cells += grid.len();
        grid
    }

    /// Deepest cached depth for `color`.
    pub fn max_depth(&self, color: ColorId) -> Option<usize> {
        self.levels.get(usize::from(color))?.iter().rposition(Option::is_some)
    }

    /// Number of cached grids.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Total cells held across all cached grids.
    pub fn cells(&self) -> usize {
        self.cells
    }
}
