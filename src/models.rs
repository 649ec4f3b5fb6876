//! Data models for pattern files

use serde::{Deserialize, Serialize};

/// A color definition: its pattern grid and optional display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDef {
    pub name: String,
    /// CSS color used when rendering cells of this color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<String>,
    /// Pattern rows as token strings, e.g. `"{A}{_}{A}"`
    pub grid: Vec<String>,
}

/// Display color for background (id 0) cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundDef {
    pub rgb: String,
}

/// A parsed object from a pattern file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FractalObject {
    Color(ColorDef),
    Background(BackgroundDef),
}

/// A parse warning with the line it was found on.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}
