//! `wrlrgb` command-line entry point

use std::process::ExitCode;

fn main() -> ExitCode {
    match wrlrgb::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
