//! Configuration for the fgrid command-line tool
//!
//! Provides types and parsing for `fgrid.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
