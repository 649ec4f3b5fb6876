//! Building a pattern registry and palette from parsed pattern files
//!
//! Colors get ids in file order, starting at 1. Cell names are resolved only
//! after every color is known, so patterns may reference colors defined
//! later in the file (including themselves).

use std::collections::HashMap;

use thiserror::Error;

use crate::color::{parse_color, ColorError};
use crate::grid::{ColorId, Grid, GridError, BACKGROUND};
use crate::models::{ColorDef, FractalObject};
use crate::palette::IndexPalette;
use crate::registry::{PatternRegistry, RegistryError};
use crate::tokenizer::{tokenize, Warning};

/// Name reserved for background cells.
pub const BACKGROUND_NAME: &str = "_";

/// Error loading pattern definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("No colors defined")]
    NoColors,
    #[error("Color '{0}' is defined more than once")]
    DuplicateName(String),
    #[error("'_' is reserved for background cells and cannot name a color")]
    ReservedName,
    #[error("Color '{color}' row {row}: unknown color '{token}'")]
    UnknownToken { color: String, row: usize, token: String },
    /// A tokenizer warning, promoted to an error in strict mode
    #[error("Color '{color}' row {row}: {message}")]
    Strict { color: String, row: usize, message: String },
    #[error("Color '{color}': {source}")]
    Grid { color: String, source: GridError },
    #[error("Color '{color}': invalid rgb '{value}': {source}")]
    InvalidColor { color: String, value: String, source: ColorError },
    #[error("Background: invalid rgb '{value}': {source}")]
    InvalidBackground { value: String, source: ColorError },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A loaded set of patterns with their display colors.
#[derive(Debug, Clone)]
pub struct Library {
    registry: PatternRegistry,
    palette: IndexPalette,
}

impl Library {
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn palette(&self) -> &IndexPalette {
        &self.palette
    }

    /// Id of the color called `name`.
    pub fn id_of(&self, name: &str) -> Option<ColorId> {
        self.registry.id_of(name)
    }

    /// The first color defined, the default thing to render.
    pub fn first_color(&self) -> Option<ColorId> {
        self.registry.ids().next()
    }

    pub fn into_parts(self) -> (PatternRegistry, IndexPalette) {
        (self.registry, self.palette)
    }
}

/// Resolve one color's token rows to ids.
fn resolve_grid(
    def: &ColorDef,
    ids: &HashMap<&str, ColorId>,
    strict: bool,
    warnings: &mut Vec<Warning>,
) -> Result<Grid, LoadError> {
    let mut rows = Vec::with_capacity(def.grid.len());

    for (index, text) in def.grid.iter().enumerate() {
        let row = index + 1;
        let (names, row_warnings) = tokenize(text);

        if let Some(first) = row_warnings.first() {
            if strict {
                return Err(LoadError::Strict {
                    color: def.name.clone(),
                    row,
                    message: first.message.clone(),
                });
            }
        }
        warnings.extend(
            row_warnings
                .into_iter()
                .map(|w| Warning::new(format!("Color '{}' row {}: {}", def.name, row, w.message))),
        );

        let cells = names
            .into_iter()
            .map(|name| match name.as_str() {
                BACKGROUND_NAME => Ok(BACKGROUND),
                other => ids.get(other).copied().ok_or_else(|| LoadError::UnknownToken {
                    color: def.name.clone(),
                    row,
                    token: name.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    Grid::from_rows(rows).map_err(|source| LoadError::Grid { color: def.name.clone(), source })
}

/// Build a [`Library`] from parsed objects.
///
/// In strict mode stray characters in grid rows are errors; otherwise they
/// are skipped and reported as warnings.
///
/// # Examples
///
/// ```
/// use fractgrid::library::load_library;
/// use fractgrid::parser::parse_stream;
/// use std::io::Cursor;
///
/// let input = r#"{"type": "color", "name": "D", "grid": ["{D}{_}", "{_}{D}"]}"#;
/// let parsed = parse_stream(Cursor::new(input));
/// let (library, warnings) = load_library(&parsed.objects, false).unwrap();
///
/// assert!(warnings.is_empty());
/// assert_eq!(library.id_of("D"), Some(1));
/// ```
pub fn load_library(objects: &[FractalObject], strict: bool) -> Result<(Library, Vec<Warning>), LoadError> {
    let defs: Vec<&ColorDef> = objects
        .iter()
        .filter_map(|obj| match obj {
            FractalObject::Color(def) => Some(def),
            FractalObject::Background(_) => None,
        })
        .collect();
    if defs.is_empty() {
        return Err(LoadError::NoColors);
    }

    let mut ids: HashMap<&str, ColorId> = HashMap::new();
    for (index, def) in defs.iter().enumerate() {
        if def.name == BACKGROUND_NAME {
            return Err(LoadError::ReservedName);
        }
        let id = ColorId::try_from(index + 1).map_err(|_| RegistryError::Exhausted)?;
        if ids.insert(def.name.as_str(), id).is_some() {
            return Err(LoadError::DuplicateName(def.name.clone()));
        }
    }

    let mut warnings = Vec::new();
    let mut registry = PatternRegistry::new();
    let mut palette = IndexPalette::with_defaults(defs.len());

    for def in &defs {
        let grid = resolve_grid(def, &ids, strict, &mut warnings)?;
        let id = registry.register_named(def.name.clone(), grid)?;

        if let Some(value) = &def.rgb {
            let color = parse_color(value).map_err(|source| LoadError::InvalidColor {
                color: def.name.clone(),
                value: value.clone(),
                source,
            })?;
            palette.set(id, color);
        }
    }

    for obj in objects {
        if let FractalObject::Background(bg) = obj {
            let color = parse_color(&bg.rgb)
                .map_err(|source| LoadError::InvalidBackground { value: bg.rgb.clone(), source })?;
            palette.set_background(color);
        }
    }

    Ok((Library { registry, palette }, warnings))
}
