//! tokenrelay CLI entry point
//!
//! Parses arguments and runs the selected command through `cli::run`.
//! Errors are printed to stderr and the process exits with status 1.

use tokenrelay::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
