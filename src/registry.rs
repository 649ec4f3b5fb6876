//! Pattern registry: assigns color ids and stores each color's base pattern
//!
//! Ids are handed out in registration order starting at 1; id 0 is the
//! reserved background. Patterns are immutable once registered. Names are
//! optional and only used by loaders and diagnostics.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use crate::error::ExpandError;
use crate::grid::{ColorId, Grid, BACKGROUND};

/// Error when registering a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Every id from 1 to 255 is already taken
    #[error("Cannot register more than {} colors", ColorId::MAX)]
    Exhausted,
    /// Name already bound to another color
    #[error("Color '{0}' is already registered")]
    DuplicateName(String),
}

/// A registered base pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    grid: Arc<Grid>,
    colors: Vec<ColorId>,
}

impl Pattern {
    pub fn new(grid: Grid) -> Self {
        let colors = grid.distinct_colors();
        Self { grid: Arc::new(grid), colors }
    }

    /// The pattern cells.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Distinct non-background ids the pattern references, ascending.
    pub fn colors(&self) -> &[ColorId] {
        &self.colors
    }

    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }
}

/// The 1x1 background pattern returned for id 0.
fn background_pattern() -> &'static Pattern {
    static BACKGROUND_PATTERN: OnceLock<Pattern> = OnceLock::new();
    BACKGROUND_PATTERN.get_or_init(|| Pattern::new(Grid::background(1, 1)))
}

/// Registry of color patterns.
///
/// # Example
///
/// ```
/// use fractgrid::grid::Grid;
/// use fractgrid::registry::PatternRegistry;
///
/// let mut registry = PatternRegistry::new();
/// let dot = registry.register(Grid::from_rows(vec![vec![1]]).unwrap()).unwrap();
/// assert_eq!(dot, 1);
/// assert_eq!(registry.lookup(dot).unwrap().shape(), (1, 1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    /// Index `i` holds the pattern of id `i + 1`
    patterns: Vec<Pattern>,
    names: HashMap<String, ColorId>,
    labels: HashMap<ColorId, String>,
}

impl PatternRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern under the next unused id.
    pub fn register(&mut self, pattern: Grid) -> Result<ColorId, RegistryError> {
        let id = self.next_id().ok_or(RegistryError::Exhausted)?;
        self.patterns.push(Pattern::new(pattern));
        Ok(id)
    }

    /// Register a pattern and bind `name` to its id.
    pub fn register_named(&mut self, name: impl Into<String>, pattern: Grid) -> Result<ColorId, RegistryError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        let id = self.register(pattern)?;
        self.labels.insert(id, name.clone());
        self.names.insert(name, id);
        Ok(id)
    }

    /// The id the next `register` call will assign.
    pub fn next_id(&self) -> Option<ColorId> {
        ColorId::try_from(self.patterns.len() + 1).ok()
    }

    /// Look up a pattern by id.
    ///
    /// Id 0 resolves to a 1x1 background pattern.
    pub fn lookup(&self, id: ColorId) -> Result<&Pattern, ExpandError> {
        if id == BACKGROUND {
            return Ok(background_pattern());
        }
        self.patterns
            .get(usize::from(id) - 1)
            .ok_or(ExpandError::UnknownColor { id, referenced_by: None })
    }

    /// Check whether `id` is background or registered.
    pub fn contains(&self, id: ColorId) -> bool {
        id == BACKGROUND || usize::from(id) <= self.patterns.len()
    }

    /// Id bound to `name`.
    pub fn id_of(&self, name: &str) -> Option<ColorId> {
        self.names.get(name).copied()
    }

    /// Name bound to `id`, if it was registered with one.
    pub fn name_of(&self, id: ColorId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Name for display: the bound name, or the numeric id.
    pub fn label(&self, id: ColorId) -> String {
        self.name_of(id).map(str::to_string).unwrap_or_else(|| id.to_string())
    }

    /// Number of registered colors.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ColorId> + '_ {
        (1..=self.patterns.len()).filter_map(|i| ColorId::try_from(i).ok())
    }

    /// Check that every pattern only references registered ids.
    ///
    /// Expansion finds the same problems lazily; loaders call this to report
    /// them before any expansion is requested.
    pub fn check_references(&self) -> Result<(), ExpandError> {
        for (id, pattern) in self.ids().zip(&self.patterns) {
            if let Some(&missing) = pattern.colors().iter().find(|&&c| !self.contains(c)) {
                return Err(ExpandError::UnknownColor { id: missing, referenced_by: Some(id) });
            }
        }
        Ok(())
    }
}
