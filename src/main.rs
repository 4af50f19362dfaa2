//! fluxdash entry point
//!
//! Parses CLI flags and runs the server via cli::run. All wiring and
//! subsystem initialization happens behind that call; main only reports
//! failure and sets the exit code.

use fluxdash::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
