//! fractgrid - Self-similar pattern substitution on color grids
//!
//! Every color owns a small pattern grid. Expanding a color to depth `n`
//! replaces each cell of its pattern with that cell's color expanded to
//! depth `n - 1`, so repeated substitution produces fractals such as the
//! Sierpinski carpet.
//!
//! This library provides functionality to:
//! - Register patterns and expand them to any depth with memoization
//! - Check expansion shapes without building the grids
//! - Load patterns from JSONL / JSON5 files and render them to PNG

pub mod assemble;
pub mod cache;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod expand;
pub mod grid;
pub mod library;
pub mod models;
pub mod output;
pub mod palette;
pub mod parser;
pub mod registry;
pub mod renderer;
pub mod terminal;
pub mod tokenizer;

pub use error::{Axis, ExpandError};
pub use expand::{ExpandOptions, Expander};
pub use grid::{ColorId, Grid, BACKGROUND};
pub use registry::PatternRegistry;
