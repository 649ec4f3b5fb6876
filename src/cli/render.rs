//! Render command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::color::parse_color;
use crate::config::CliOverrides;
use crate::expand::Expander;
use crate::output::{generate_output_path, save_png, scale_image};
use crate::renderer::render_grid;

use super::{load_input, load_settings, select_colors, EXIT_ERROR};

/// Execute the render command
pub fn run_render(
    input: &Path,
    output: Option<&Path>,
    color: Option<&str>,
    all: bool,
    strict: bool,
    no_config: bool,
    overrides: &CliOverrides,
) -> Result<(), ExitCode> {
    let settings = load_settings(no_config, overrides)?;
    let library = load_input(input, strict)?;
    let colors = select_colors(&library, color, all)?;
    let depth = settings.render.depth;

    let (registry, mut palette) = library.into_parts();
    if let Some(background) = &settings.render.background {
        let rgba = parse_color(background).map_err(|e| {
            eprintln!("Error: Invalid background '{}': {}", background, e);
            ExitCode::from(EXIT_ERROR)
        })?;
        palette.set_background(rgba);
    }

    // A configured output directory applies only when -o is absent
    let output: Option<PathBuf> = match output {
        Some(path) => Some(path.to_path_buf()),
        None => settings.render.out.as_ref().map(|dir| dir.join("")),
    };

    let mut expander = Expander::with_options(registry, settings.engine.expand_options());
    let is_single = colors.len() == 1;

    for id in colors {
        let name = expander.registry().label(id);
        let grid = expander.at_depth(id, depth).map_err(|e| {
            eprintln!("Error: color '{}': {}", name, e);
            ExitCode::from(EXIT_ERROR)
        })?;

        let image = render_grid(&grid, &palette).map_err(|e| {
            eprintln!("Error: color '{}': {}", name, e);
            ExitCode::from(EXIT_ERROR)
        })?;
        let image = scale_image(image, settings.render.scale).map_err(|e| {
            eprintln!("Error: color '{}': {}", name, e);
            ExitCode::from(EXIT_ERROR)
        })?;

        let output_path = generate_output_path(input, &name, depth, output.as_deref(), is_single);
        save_png(&image, &output_path).map_err(|e| {
            eprintln!("Error: Failed to save '{}': {}", output_path.display(), e);
            ExitCode::from(EXIT_ERROR)
        })?;
        println!("Saved: {}", output_path.display());
    }

    let stats = expander.stats();
    tracing::debug!(
        expansions = stats.expansions,
        cache_hits = stats.cache_hits,
        planned_levels = stats.planned_levels,
        cached_cells = expander.cache().cells(),
        "render finished"
    );
    Ok(())
}
