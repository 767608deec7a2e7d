//! `WrlRgb` CLI - extract, verify, replace and roll back VRML colors

pub mod commands;
pub mod progress;
pub mod report;

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use tracing::Level;

use crate::settings::{Settings, Verbosity};

#[derive(Parser)]
#[command(name = "wrlrgb")]
#[command(version, about = "WrlRgb: diffuseColor tools for VRML V2.0 files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output detail: brief, normal or verbose
    #[arg(long, global = true, value_name = "LEVEL")]
    verbosity: Option<Verbosity>,

    /// Settings file (default: <config dir>/wrlrgb/settings.toml)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Suppress progress display
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl Cli {
    fn resolve_settings(&self) -> crate::Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::discover()?,
        };
        if let Some(verbosity) = self.verbosity {
            settings.verbosity = verbosity;
        }
        Ok(settings)
    }
}

fn log_level(verbosity: Verbosity) -> Level {
    match verbosity {
        Verbosity::Brief => Level::WARN,
        Verbosity::Normal => Level::INFO,
        Verbosity::Verbose => Level::DEBUG,
    }
}

/// Run the `WrlRgb` CLI
///
/// Per-file failures are reported and do not make this fail; only argument
/// and settings errors do.
///
/// # Errors
/// Returns an error if the settings or arguments are unusable.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.resolve_settings()?;

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(log_level(settings.verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli.command.execute(settings, cli.quiet)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_aliases_and_globals() {
        let cli = Cli::try_parse_from(["wrlrgb", "roll", "scene.wrl", "--verbosity", "verbose", "-q"]).unwrap();
        assert!(matches!(cli.command, Commands::Rollback { .. }));
        assert_eq!(cli.verbosity, Some(Verbosity::Verbose));
        assert!(cli.quiet);

        let cli = Cli::try_parse_from(["wrlrgb", "e", "scene.wrl"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { config: None, .. }));

        assert!(Cli::try_parse_from(["wrlrgb", "v", "scene.wrl"]).is_err());
        assert!(Cli::try_parse_from(["wrlrgb", "r", "a.wrl", "b.txt", "--verbosity", "loud"]).is_err());
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(log_level(Verbosity::Brief), Level::WARN);
        assert_eq!(log_level(Verbosity::Verbose), Level::DEBUG);
    }
}
