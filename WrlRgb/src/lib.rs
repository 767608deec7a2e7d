#![allow(non_snake_case)]
//! # `WrlRgb`
//!
//! Extract, verify, replace and roll back the `diffuseColor` values of
//! VRML V2.0 utf8 (`.wrl`) documents.
//!
//! ## Operations
//!
//! - **Extract** - write each `DEF <name> Transform ... diffuseColor r g b`
//!   of a document to a companion config file
//! - **Verify** - compare a document's colors against a config
//! - **Replace** - rewrite a document's colors from a config, keeping the
//!   old colors as a snapshot block in the document
//! - **Rollback** - restore the colors of the newest snapshot block
//!
//! ## Quick Start
//!
//! ```no_run
//! use wrlrgb::prelude::*;
//!
//! let settings = Settings::default();
//!
//! // scene.wrl -> scene.wrl_rgb_nodes.txt
//! let config = Extractor::new(settings.clone()).extract("scene.wrl", None)?;
//!
//! // Swap in another palette, then undo it
//! Replacer::new(settings.clone()).replace("scene.wrl", "night.txt")?;
//! RollbackEngine::new(settings.clone()).rollback("scene.wrl")?;
//!
//! assert!(Extractor::new(settings).verify("scene.wrl", &config)?);
//! # Ok::<(), wrlrgb::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `wrlrgb` command-line binary

pub mod batch;
pub mod error;
pub mod extract;
pub mod fileio;
pub mod formats;
pub mod node;
pub mod replace;
pub mod rollback;
pub mod settings;

// Re-exports for convenience
pub use error::{Error, ErrorClass, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorClass, Result};
    pub use crate::node::{Channel, ColorNode};
    pub use crate::settings::{Settings, Verbosity};

    // Engines
    pub use crate::extract::Extractor;
    pub use crate::replace::Replacer;
    pub use crate::rollback::RollbackEngine;

    // Config blocks
    pub use crate::formats::config::{ConfigDocument, parse_config, read_config, write_config};

    // Batch processing
    pub use crate::batch::{Batch, BatchResult, FileOutcome, Operation, Outcome, collect_inputs};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
