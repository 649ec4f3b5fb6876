//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod render;
mod show;
mod validate;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{load_config, merge_cli_overrides, CliOverrides, FgridConfig};
use crate::grid::ColorId;
use crate::library::{load_library, Library};
use crate::parser::parse_file;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FGRID_LOG";

/// fgrid - Expand self-similar color patterns into fractal grids
#[derive(Parser)]
#[command(name = "fgrid")]
#[command(about = "fgrid - Expand self-similar color patterns (.jsonl, .fgrid) and render to PNG")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); FGRID_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand colors to a depth and write PNG images
    Render {
        /// Pattern file (.jsonl or .fgrid)
        input: PathBuf,

        /// Output file or directory.
        /// If omitted: {input}_{color}_d{depth}.png
        /// If file (single color): output.png
        /// If file (multiple): output_{color}_d{depth}.png
        /// If directory (ends with /): dir/{color}_d{depth}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Color to expand (default: the first color in the file)
        #[arg(short, long, conflicts_with = "all")]
        color: Option<String>,

        /// Render every color in the file
        #[arg(long)]
        all: bool,

        /// Expansion depth (default: render.depth from fgrid.toml, else 3)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Scale output by integer factor (1-128)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=128))]
        scale: Option<u32>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Expand on the current thread only
        #[arg(long)]
        no_parallel: bool,

        /// Number of worker threads
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        jobs: Option<u64>,

        /// Ignore fgrid.toml
        #[arg(long)]
        no_config: bool,
    },
    /// Check that every color expands consistently up to a depth
    Validate {
        /// Pattern file (.jsonl or .fgrid)
        input: PathBuf,

        /// Deepest level to check (default: render.depth from fgrid.toml, else 3)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print an expanded grid to the terminal
    Show {
        /// Pattern file (.jsonl or .fgrid)
        input: PathBuf,

        /// Color to expand (default: the first color in the file)
        #[arg(short, long)]
        color: Option<String>,

        /// Expansion depth (default: render.depth from fgrid.toml, else 3)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Print glyphs instead of ANSI colors
        #[arg(long)]
        plain: bool,
    },
    /// List the colors defined in a pattern file
    Info {
        /// Pattern file (.jsonl or .fgrid)
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Install the tracing subscriber on stderr.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when embedded in tests
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Size the global rayon pool.
fn configure_jobs(jobs: Option<usize>) {
    if let Some(threads) = jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            tracing::warn!("could not size thread pool to {}: {}", threads, e);
        }
    }
}

/// Load fgrid.toml (unless disabled) and apply command-line overrides.
pub(crate) fn load_settings(
    no_config: bool,
    overrides: &CliOverrides,
) -> Result<FgridConfig, ExitCode> {
    let mut config = if no_config {
        FgridConfig::default()
    } else {
        load_config(None).map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        })?
    };
    merge_cli_overrides(&mut config, overrides);
    configure_jobs(config.engine.jobs);
    Ok(config)
}

/// Parse a pattern file and build its library, reporting warnings.
pub(crate) fn load_input(input: &Path, strict: bool) -> Result<Library, ExitCode> {
    let parsed = parse_file(input).map_err(|e| {
        eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;

    for warning in &parsed.warnings {
        let label = if strict { "Error" } else { "Warning" };
        eprintln!("{}: line {}: {}", label, warning.line, warning.message);
    }
    if strict && !parsed.warnings.is_empty() {
        return Err(ExitCode::from(EXIT_ERROR));
    }

    let (library, warnings) = load_library(&parsed.objects, strict).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    for warning in &warnings {
        eprintln!("Warning: {}", warning.message);
    }

    tracing::info!(
        path = %input.display(),
        colors = library.registry().len(),
        "loaded pattern file"
    );
    Ok(library)
}

/// Resolve the colors a command should work on.
pub(crate) fn select_colors(
    library: &Library,
    name: Option<&str>,
    all: bool,
) -> Result<Vec<ColorId>, ExitCode> {
    if all {
        return Ok(library.registry().ids().collect());
    }
    match name {
        Some(name) => match library.id_of(name) {
            Some(id) => Ok(vec![id]),
            None => {
                eprintln!("Error: No color named '{}' found in input", name);
                let names: Vec<String> =
                    library.registry().ids().map(|id| library.registry().label(id)).collect();
                eprintln!("Available colors: {}", names.join(", "));
                Err(ExitCode::from(EXIT_ERROR))
            }
        },
        None => library.first_color().map(|id| vec![id]).ok_or_else(|| {
            eprintln!("Error: No colors defined in input");
            ExitCode::from(EXIT_ERROR)
        }),
    }
}

/// Flatten a helper result into an exit code.
fn finish(result: Result<(), ExitCode>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => code,
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            color,
            all,
            depth,
            scale,
            strict,
            no_parallel,
            jobs,
            no_config,
        } => {
            let overrides = CliOverrides {
                depth,
                scale,
                out: None,
                parallel: no_parallel.then_some(false),
                jobs: jobs.and_then(|j| usize::try_from(j).ok()),
            };
            render::run_render(
                &input,
                output.as_deref(),
                color.as_deref(),
                all,
                strict,
                no_config,
                &overrides,
            )
        }
        Commands::Validate { input, depth, strict } => {
            validate::run_validate(&input, depth, strict)
        }
        Commands::Show { input, color, depth, plain } => {
            show::run_show(&input, color.as_deref(), depth, plain)
        }
        Commands::Info { input, json } => info::run_info(&input, json),
    };

    finish(result)
}
