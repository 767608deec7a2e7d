//! VRML V2.0 document subset
//!
//! Only the header, `DEF <name> Transform` and `diffuseColor <r> <g> <b>`
//! are recognized. Everything else is passed through untouched.

pub mod keywords;
mod number;
mod scanner;
mod substitution;

pub use number::{parse_float, parse_int};
pub use scanner::{Boundary, WordScanner};
pub use substitution::{Substitution, SubstitutionState};

use std::path::Path;

use crate::error::{Error, Result};

/// Check one header word against the literal expected at this position.
///
/// # Errors
/// Returns [`Error::NotAVrmlFile`] on mismatch.
pub fn expect_header_word(path: &Path, expected: &'static str, found: &str) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::NotAVrmlFile {
            path: path.to_path_buf(),
            expected,
            found: found.to_string(),
        })
    }
}
