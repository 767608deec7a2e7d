use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::batch::Operation;

pub mod execute;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract diffuseColor nodes into a config file
    #[command(visible_alias = "e")]
    Extract {
        /// VRML file, or directory of VRML files
        path: PathBuf,

        /// Output config (single file only; default: <file>_rgb_nodes.txt)
        config: Option<PathBuf>,
    },

    /// Check whether files carry the colors of a config
    #[command(visible_alias = "v")]
    Verify {
        /// VRML file, or directory of VRML files
        path: PathBuf,

        /// Config file to compare against
        config: PathBuf,
    },

    /// Replace colors in place with those of a config
    #[command(visible_alias = "r")]
    Replace {
        /// VRML file, or directory of VRML files
        path: PathBuf,

        /// Config file holding the new colors
        config: PathBuf,
    },

    /// Undo the most recent replace
    #[command(visible_alias = "roll")]
    Rollback {
        /// VRML file, or directory of VRML files
        path: PathBuf,
    },
}

impl Commands {
    /// The file or directory the command works on.
    pub fn target(&self) -> &Path {
        match self {
            Commands::Extract { path, .. }
            | Commands::Verify { path, .. }
            | Commands::Replace { path, .. }
            | Commands::Rollback { path } => path,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Commands::Extract { config, .. } => Operation::Extract {
                config: config.clone(),
            },
            Commands::Verify { config, .. } => Operation::Verify {
                config: config.clone(),
            },
            Commands::Replace { config, .. } => Operation::Replace {
                config: config.clone(),
            },
            Commands::Rollback { .. } => Operation::Rollback,
        }
    }
}
