//! fgrid - Command-line tool for expanding and rendering fractal color patterns

use std::process::ExitCode;

use fractgrid::cli;

fn main() -> ExitCode {
    cli::run()
}
