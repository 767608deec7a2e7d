//! Text formats handled by `WrlRgb`
//!
//! - [`vrml`]: the narrow VRML V2.0 subset the engines walk through
//! - [`config`]: the `#START V001 ... #END` node config block

pub mod config;
pub mod vrml;

pub use config::{ConfigDocument, parse_config, read_config, serialize_config, write_config};
pub use vrml::{Boundary, WordScanner};
