//! Show command implementation (terminal display)

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::expand::Expander;
use crate::terminal::{cell_glyph, render_ansi, render_legend, render_plain};

use super::{load_input, load_settings, select_colors, EXIT_ERROR};

/// Execute the show command - print one expanded color to stdout
pub fn run_show(
    input: &Path,
    color: Option<&str>,
    depth: Option<usize>,
    plain: bool,
) -> Result<(), ExitCode> {
    let overrides = CliOverrides { depth, ..Default::default() };
    let settings = load_settings(false, &overrides)?;
    let depth = settings.render.depth;

    let library = load_input(input, false)?;
    let colors = select_colors(&library, color, false)?;
    let (registry, palette) = library.into_parts();
    let mut expander = Expander::with_options(registry, settings.engine.expand_options());

    for id in colors {
        let name = expander.registry().label(id);
        let grid = expander.at_depth(id, depth).map_err(|e| {
            eprintln!("Error: color '{}': {}", name, e);
            ExitCode::from(EXIT_ERROR)
        })?;

        println!("{} at depth {} ({}x{})", name, depth, grid.height(), grid.width());
        let registry = expander.registry();
        if plain {
            print!("{}", render_plain(&grid, |c| cell_glyph(registry, c)));
        } else {
            print!("{}", render_ansi(&grid, &palette));
        }
        println!();
        print!("{}", render_legend(&grid, registry, &palette));
    }
    Ok(())
}
