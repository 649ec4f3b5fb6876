//! Info command implementation

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use crate::color::to_hex;
use crate::grid::{ColorId, BACKGROUND};
use crate::library::Library;

use super::{load_input, EXIT_ERROR};

/// Summary of one color for `fgrid info`.
#[derive(Debug, Serialize)]
pub struct ColorInfo {
    pub id: ColorId,
    pub name: String,
    pub height: usize,
    pub width: usize,
    pub rgb: String,
    /// Names of the colors the pattern uses, background excluded
    pub references: Vec<String>,
    /// Whether the pattern contains background cells
    pub background: bool,
}

#[derive(Debug, Serialize)]
pub struct LibraryInfo {
    pub background: String,
    pub colors: Vec<ColorInfo>,
}

pub(crate) fn describe(library: &Library) -> Result<LibraryInfo, crate::error::ExpandError> {
    let registry = library.registry();
    let palette = library.palette();

    let colors = registry
        .ids()
        .map(|id| {
            let pattern = registry.lookup(id)?;
            let (height, width) = pattern.shape();
            Ok(ColorInfo {
                id,
                name: registry.label(id),
                height,
                width,
                rgb: to_hex(palette.get(id)),
                references: pattern.colors().iter().map(|&c| registry.label(c)).collect(),
                background: pattern.grid().cells().contains(&BACKGROUND),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LibraryInfo { background: to_hex(palette.background()), colors })
}

/// Execute the info command
pub fn run_info(input: &Path, json: bool) -> Result<(), ExitCode> {
    let library = load_input(input, false)?;
    let info = describe(&library).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;

    if json {
        let text = serde_json::to_string_pretty(&info).map_err(|e| {
            eprintln!("Error: Failed to serialize info: {}", e);
            ExitCode::from(EXIT_ERROR)
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("Background: {}", info.background);
    println!("{:>4}  {:<16} {:>9}  {:<10} Uses", "Id", "Name", "Shape", "Color");
    for color in &info.colors {
        let mut uses = color.references.join(", ");
        if color.background {
            if !uses.is_empty() {
                uses.push_str(", ");
            }
            uses.push('_');
        }
        println!(
            "{:>4}  {:<16} {:>9}  {:<10} {}",
            color.id,
            color.name,
            format!("{}x{}", color.height, color.width),
            color.rgb,
            uses
        );
    }
    Ok(())
}
