//! Validate command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::expand::Expander;

use super::{load_input, load_settings, EXIT_ERROR};

/// Execute the validate command.
///
/// Every color is checked at every depth from 0 to `depth` using shapes
/// only, so even depths far too large to render can be validated.
pub fn run_validate(input: &Path, depth: Option<usize>, strict: bool) -> Result<(), ExitCode> {
    let overrides = CliOverrides { depth, ..Default::default() };
    let settings = load_settings(false, &overrides)?;
    let depth = settings.render.depth;

    let library = load_input(input, strict)?;
    let ids: Vec<_> = library.registry().ids().collect();
    let (registry, _) = library.into_parts();
    let mut expander = Expander::with_options(registry, settings.engine.expand_options());

    let mut failures = 0usize;
    for id in ids {
        let name = expander.registry().label(id);
        let mut last = None;
        for d in 0..=depth {
            match expander.shape_at(id, d) {
                Ok(shape) => last = Some(shape),
                Err(e) => {
                    eprintln!("Error: color '{}' at depth {}: {}", name, d, e);
                    failures += 1;
                    last = None;
                    break;
                }
            }
        }
        if let Some((height, width)) = last {
            println!("{}: {}x{} at depth {}", name, height, width, depth);
        }
    }

    if failures > 0 {
        eprintln!("{} color(s) failed validation", failures);
        return Err(ExitCode::from(EXIT_ERROR));
    }
    println!("All colors valid through depth {}", depth);
    Ok(())
}
