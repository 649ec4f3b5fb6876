//! Recursive substitution engine
//!
//! The [`Expander`] owns a closed [`PatternRegistry`] and answers
//! `at_depth(color, n)`: the grid obtained by replacing every non-background
//! cell of `color`'s pattern with the depth `n - 1` expansion of that cell's
//! color.
//!
//! # How It Works
//!
//! Evaluation is bottom-up rather than recursive:
//!
//! 1. Plan: walk down from `(color, n)`, collecting at each depth the colors
//!    whose expansion is not cached yet; the walk ends at the first depth
//!    where everything needed is already known
//! 2. Check shapes for the whole plan (no grids are allocated), so any
//!    dimension error surfaces before work is done
//! 3. Fill the planned levels from the lowest up to `n`; each level only
//!    reads the level below, so colors within a level can be built in
//!    parallel
//! 4. Commit every new grid to the cache once the whole call succeeded
//!
//! Cyclic references between patterns (A uses B, B uses A) are the normal
//! case for fractals and need no special handling: a cycle only ever
//! points one depth lower.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::assemble::assemble;
use crate::cache::ExpansionCache;
use crate::error::{Axis, ExpandError};
use crate::grid::{ColorId, Grid, BACKGROUND};
use crate::registry::PatternRegistry;

/// Default limit on the number of cells in one materialized grid (64 Mi).
pub const DEFAULT_MAX_CELLS: usize = 1 << 26;

/// Tuning knobs for an [`Expander`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Largest grid `at_depth` will materialize, in cells
    pub max_cells: usize,
    /// Build independent colors of one depth level on the rayon pool
    pub parallel: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self { max_cells: DEFAULT_MAX_CELLS, parallel: true }
    }
}

/// Counters describing the work an [`Expander`] has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandStats {
    /// Grids assembled and stored in the cache
    pub expansions: u64,
    /// `at_depth` calls answered straight from the cache
    pub cache_hits: u64,
    /// Shapes computed by dimension inference
    pub shape_evaluations: u64,
    /// Depth levels that planning found work in
    pub planned_levels: u64,
}

/// Per-row heights and per-column widths of one expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub heights: Vec<usize>,
    pub widths: Vec<usize>,
}

impl Dimensions {
    /// Total `(height, width)`, or `None` if a sum overflows.
    pub fn extent(&self) -> Option<(usize, usize)> {
        Some((checked_sum(&self.heights)?, checked_sum(&self.widths)?))
    }
}

fn checked_sum(values: &[usize]) -> Option<usize> {
    values.iter().try_fold(0usize, |acc, &v| acc.checked_add(v))
}

/// Record `value` in an unset slot, or return the previously recorded value
/// if it differs.
fn settle(slot: &mut Option<usize>, value: usize) -> Result<(), usize> {
    match *slot {
        None => {
            *slot = Some(value);
            Ok(())
        }
        Some(expected) if expected != value => Err(expected),
        Some(_) => Ok(()),
    }
}

fn resolve(slots: Vec<Option<usize>>, color: ColorId, axis: Axis) -> Result<Vec<usize>, ExpandError> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(ExpandError::UnderspecifiedDimension { color, axis, index }))
        .collect()
}

/// Infer row heights and column widths for expanding `basis`.
///
/// `shape_of(k)` yields the `(height, width)` of color `k` at `child_depth`.
/// Cells are scanned row-major; background cells are skipped and never fix
/// a size. The first non-background cell of a column fixes its width and
/// every later one must agree (likewise for rows and heights).
///
/// # Errors
///
/// - [`ExpandError::DimensionConflict`] on the first disagreeing cell
/// - [`ExpandError::UnderspecifiedDimension`] for a column (checked first)
///   or row left without any non-background cell
/// - whatever `shape_of` returns
pub fn infer_dimensions<F>(
    color: ColorId,
    child_depth: usize,
    basis: &Grid,
    mut shape_of: F,
) -> Result<Dimensions, ExpandError>
where
    F: FnMut(ColorId) -> Result<(usize, usize), ExpandError>,
{
    let (rows, cols) = basis.shape();
    let mut heights = vec![None; rows];
    let mut widths = vec![None; cols];

    for (row, cells) in basis.rows().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell == BACKGROUND {
                continue;
            }
            let (h, w) = shape_of(cell)?;
            let conflict = |axis, expected, found| ExpandError::DimensionConflict {
                color,
                cell,
                row,
                col,
                axis,
                depth: child_depth,
                expected,
                found,
            };

            settle(&mut widths[col], w).map_err(|expected| conflict(Axis::Column, expected, w))?;
            settle(&mut heights[row], h).map_err(|expected| conflict(Axis::Row, expected, h))?;
        }
    }

    let widths = resolve(widths, color, Axis::Column)?;
    let heights = resolve(heights, color, Axis::Row)?;
    Ok(Dimensions { heights, widths })
}

/// `(depth, colors)` still to compute, lowest depth first.
type Plan = Vec<(usize, Vec<ColorId>)>;

/// Expansion engine over a closed set of patterns.
///
/// # Example
///
/// ```
/// use fractgrid::expand::Expander;
/// use fractgrid::grid::Grid;
/// use fractgrid::registry::PatternRegistry;
///
/// let mut registry = PatternRegistry::new();
/// let d = registry.register(Grid::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap()).unwrap();
///
/// let mut expander = Expander::new(registry);
/// let grid = expander.at_depth(d, 1).unwrap();
/// assert_eq!(grid.shape(), (4, 4));
/// assert_eq!(grid.row(0), &[1, 0, 0, 0]);
/// ```
#[derive(Debug)]
pub struct Expander {
    registry: PatternRegistry,
    cache: ExpansionCache,
    shapes: HashMap<(ColorId, usize), (usize, usize)>,
    options: ExpandOptions,
    stats: ExpandStats,
}

impl Expander {
    /// Create an expander with default options.
    ///
    /// The registry is moved in: patterns cannot change once expansion is
    /// possible.
    pub fn new(registry: PatternRegistry) -> Self {
        Self::with_options(registry, ExpandOptions::default())
    }

    pub fn with_options(registry: PatternRegistry, options: ExpandOptions) -> Self {
        Self {
            registry,
            cache: ExpansionCache::new(),
            shapes: HashMap::new(),
            options,
            stats: ExpandStats::default(),
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ExpansionCache {
        &self.cache
    }

    pub fn options(&self) -> ExpandOptions {
        self.options
    }

    pub fn stats(&self) -> ExpandStats {
        self.stats
    }

    /// Discard every cached expansion and hand the registry back.
    ///
    /// This is the only way to register more patterns after expanding.
    pub fn into_registry(self) -> PatternRegistry {
        self.registry
    }

    /// The grid of `color` expanded `depth` times.
    ///
    /// Depth 0 is the registered pattern itself. Id 0 yields a 1x1
    /// background grid at every depth.
    ///
    /// # Errors
    ///
    /// [`ExpandError::UnknownColor`], [`ExpandError::DimensionConflict`],
    /// [`ExpandError::UnderspecifiedDimension`] and
    /// [`ExpandError::TooLarge`]. A failed call stores nothing in the cache.
    pub fn at_depth(&mut self, color: ColorId, depth: usize) -> Result<Arc<Grid>, ExpandError> {
        let pattern = self.registry.lookup(color)?;
        if depth == 0 || color == BACKGROUND {
            return Ok(Arc::clone(pattern.grid()));
        }
        if let Some(grid) = self.cache.get(color, depth) {
            self.stats.cache_hits += 1;
            trace!(color, depth, "expansion cache hit");
            return Ok(Arc::clone(grid));
        }

        let (height, width) = self.shape_at(color, depth)?;
        let limit = self.options.max_cells;
        if height.checked_mul(width).map_or(true, |cells| cells > limit) {
            return Err(ExpandError::TooLarge { color, depth, height, width, limit });
        }

        let plan = self.plan(color, depth, |c, d| self.cache.contains(c, d))?;
        self.stats.planned_levels += plan.len() as u64;
        let mut staged: HashMap<(ColorId, usize), Arc<Grid>> = HashMap::new();

        for &(d, ref level) in &plan {
            let built: Vec<Result<(ColorId, Grid), ExpandError>> =
                if self.options.parallel && level.len() > 1 {
                    level.par_iter().map(|&c| self.expand_one(c, d, &staged).map(|g| (c, g))).collect()
                } else {
                    level.iter().map(|&c| self.expand_one(c, d, &staged).map(|g| (c, g))).collect()
                };
            for result in built {
                let (c, grid) = result?;
                staged.insert((c, d), Arc::new(grid));
            }
        }

        self.stats.expansions += staged.len() as u64;
        for ((c, d), grid) in staged {
            self.cache.insert(c, d, grid);
        }

        self.cache
            .get(color, depth)
            .cloned()
            .ok_or(ExpandError::MissingExpansion { color, depth })
    }

    /// The `(height, width)` that `at_depth(color, depth)` produces.
    ///
    /// Only shapes are computed, so this is cheap even where the grid itself
    /// would be far too large to build. Errors are the same as `at_depth`,
    /// except that the cell limit is not applied; arithmetic overflow is
    /// reported as [`ExpandError::TooLarge`].
    pub fn shape_at(&mut self, color: ColorId, depth: usize) -> Result<(usize, usize), ExpandError> {
        let pattern = self.registry.lookup(color)?;
        if depth == 0 || color == BACKGROUND {
            return Ok(pattern.shape());
        }
        if let Some(&shape) = self.shapes.get(&(color, depth)) {
            return Ok(shape);
        }

        let plan = self.plan(color, depth, |c, d| self.shape_known(c, d))?;
        self.stats.planned_levels += plan.len() as u64;
        let mut staged: HashMap<(ColorId, usize), (usize, usize)> = HashMap::new();

        for &(d, ref level) in &plan {
            for &c in level {
                let basis = self.registry.lookup(c)?.grid();
                let dims = infer_dimensions(c, d - 1, basis, |k| self.known_shape(k, d - 1, &staged))?;
                let shape = dims.extent().ok_or(ExpandError::TooLarge {
                    color: c,
                    depth: d,
                    height: checked_sum(&dims.heights).unwrap_or(usize::MAX),
                    width: checked_sum(&dims.widths).unwrap_or(usize::MAX),
                    limit: self.options.max_cells,
                })?;
                staged.insert((c, d), shape);
            }
        }

        self.stats.shape_evaluations += staged.len() as u64;
        self.shapes.extend(staged);

        self.shapes
            .get(&(color, depth))
            .copied()
            .ok_or(ExpandError::MissingExpansion { color, depth })
    }

    /// Walk down from `(color, depth)` and collect, per depth, the colors
    /// not yet covered by `done`. Children already done one depth lower are
    /// not followed, so the walk stops at the first fully known depth. Every
    /// referenced id is checked against the registry on the way.
    fn plan(
        &self,
        color: ColorId,
        depth: usize,
        done: impl Fn(ColorId, usize) -> bool,
    ) -> Result<Plan, ExpandError> {
        let mut levels: Plan = Vec::new();
        let mut frontier = BTreeSet::from([color]);
        let mut d = depth;

        while d > 0 && !frontier.is_empty() {
            let mut level = Vec::with_capacity(frontier.len());
            let mut next = BTreeSet::new();
            for c in frontier {
                if done(c, d) {
                    continue;
                }
                let pattern = self.registry.lookup(c)?;
                for &k in pattern.colors() {
                    if !self.registry.contains(k) {
                        return Err(ExpandError::UnknownColor { id: k, referenced_by: Some(c) });
                    }
                    if d > 1 && !done(k, d - 1) {
                        next.insert(k);
                    }
                }
                level.push(c);
            }
            if !level.is_empty() {
                levels.push((d, level));
            }
            frontier = next;
            d -= 1;
        }
        levels.reverse();

        debug!(
            color,
            depth,
            levels = levels.len(),
            pending = levels.iter().map(|(_, level)| level.len()).sum::<usize>(),
            "planned expansion"
        );
        Ok(levels)
    }

    fn shape_known(&self, color: ColorId, depth: usize) -> bool {
        self.shapes.contains_key(&(color, depth)) || self.cache.contains(color, depth)
    }

    fn known_shape(
        &self,
        color: ColorId,
        depth: usize,
        staged: &HashMap<(ColorId, usize), (usize, usize)>,
    ) -> Result<(usize, usize), ExpandError> {
        if depth == 0 {
            return Ok(self.registry.lookup(color)?.shape());
        }
        staged
            .get(&(color, depth))
            .or_else(|| self.shapes.get(&(color, depth)))
            .copied()
            .or_else(|| self.cache.get(color, depth).map(|g| g.shape()))
            .ok_or(ExpandError::MissingExpansion { color, depth })
    }

    fn materialized(
        &self,
        color: ColorId,
        depth: usize,
        staged: &HashMap<(ColorId, usize), Arc<Grid>>,
    ) -> Result<Arc<Grid>, ExpandError> {
        if depth == 0 {
            return Ok(Arc::clone(self.registry.lookup(color)?.grid()));
        }
        staged
            .get(&(color, depth))
            .or_else(|| self.cache.get(color, depth))
            .cloned()
            .ok_or(ExpandError::MissingExpansion { color, depth })
    }

    /// Assemble one `(color, depth)` from the level below.
    fn expand_one(
        &self,
        color: ColorId,
        depth: usize,
        staged: &HashMap<(ColorId, usize), Arc<Grid>>,
    ) -> Result<Grid, ExpandError> {
        let pattern = self.registry.lookup(color)?;

        let mut sub = BTreeMap::new();
        for &k in pattern.colors() {
            sub.insert(k, self.materialized(k, depth - 1, staged)?);
        }

        let dims = infer_dimensions(color, depth - 1, pattern.grid(), |k| {
            sub.get(&k)
                .map(|g| g.shape())
                .ok_or(ExpandError::UnknownColor { id: k, referenced_by: Some(color) })
        })?;

        let grid = assemble(pattern.grid(), &sub, &dims.widths, &dims.heights);
        debug!(color, depth, height = grid.height(), width = grid.width(), "expanded");
        Ok(grid)
    }
}
