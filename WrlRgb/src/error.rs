//! Error types for `WrlRgb`

use std::path::PathBuf;

use thiserror::Error;

use crate::node::Channel;

/// Broad family an [`Error`] belongs to.
///
/// Callers use this to decide how much detail to render for a failure
/// without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input does not follow the expected document or config grammar.
    Grammar,
    /// The input parsed but the requested operation makes no sense for it.
    Domain,
    /// A file could not be opened, written, renamed or removed.
    Io,
    /// A command-line argument or settings value is unusable.
    Argument,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Grammar => write!(f, "grammar"),
            ErrorClass::Domain => write!(f, "domain"),
            ErrorClass::Io => write!(f, "io"),
            ErrorClass::Argument => write!(f, "argument"),
        }
    }
}

/// The error type for `WrlRgb` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Grammar Errors ====================
    /// A required header token is missing or different.
    #[error("\"{path}\" is not a VRML V2.0 utf8 file: expected \"{expected}\", found \"{found}\"")]
    NotAVrmlFile {
        /// The file being read.
        path: PathBuf,
        /// The header token that was required.
        expected: &'static str,
        /// The token actually present (empty at end of file).
        found: String,
    },

    /// A config block does not follow the `#START V001 ... #END` grammar.
    #[error("config parse error: {message}")]
    ConfigParse {
        /// What went wrong.
        message: String,
    },

    /// The document parsed but contains no `diffuseColor` entries.
    #[error("no rgb nodes were extracted from \"{path}\"")]
    NoRgbValuesFound {
        /// The file that was scanned.
        path: PathBuf,
    },

    // ==================== Domain Errors ====================
    /// A color channel value is below 0.0.
    #[error("{channel} value {value} is below 0 and thus invalid; value not set")]
    ColorValueBelowZero {
        /// The channel being set.
        channel: Channel,
        /// The rejected value.
        value: f32,
    },

    /// A color channel value is above 1.0.
    #[error("{channel} value {value} is above 1 and thus invalid; value not set")]
    ColorValueAboveOne {
        /// The channel being set.
        channel: Channel,
        /// The rejected value.
        value: f32,
    },

    /// A color channel value is NaN.
    #[error("{channel} value is not a number; value not set")]
    ColorValueNotANumber {
        /// The channel being set.
        channel: Channel,
    },

    /// The document already carries exactly the requested colors.
    #[error("rgb nodes in \"{path}\" match the rgb nodes in \"{config}\"; nothing to do")]
    NodesAlreadyMatch {
        /// The document.
        path: PathBuf,
        /// The config the document was compared against.
        config: String,
    },

    /// The document has no injected config snapshot to restore.
    #[error("no previous config listings found in \"{path}\"; nothing to do")]
    NothingToRollback {
        /// The document.
        path: PathBuf,
    },

    // ==================== IO Errors ====================
    /// A session is already bound to a file.
    #[error("unable to open \"{requested}\": \"{open}\" has already been opened")]
    AlreadyOpen {
        /// The path that was requested.
        requested: PathBuf,
        /// The path currently open.
        open: PathBuf,
    },

    /// A read or close was attempted without an open session.
    #[error("no open file")]
    NotOpen,

    /// A write was attempted on a session opened without a scratch file.
    #[error("unable to write: scratch file was not created at open")]
    ScratchNotOpen,

    /// The source document could not be read.
    #[error("unable to open input file \"{path}\": {source}")]
    CannotOpenSource {
        /// The document.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The scratch file could not be created.
    #[error("unable to open scratch file \"{path}\": {source}")]
    CannotOpenScratch {
        /// The scratch path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Writing to or flushing the scratch file failed.
    #[error("unable to write scratch file \"{path}\": {source}")]
    CannotWriteScratch {
        /// The scratch path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A config file could not be opened for reading.
    #[error("unable to open node config \"{path}\" for reading: {source}")]
    CannotReadConfig {
        /// The config path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A config file could not be opened or truncated for writing.
    #[error("unable to write node config \"{path}\": {source}")]
    CannotWriteConfig {
        /// The config path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Commit step 1: moving the source aside failed.
    #[error("unable to rename \"{from}\" to \"{to}\": {source}")]
    CannotRenameSource {
        /// The source document.
        from: PathBuf,
        /// The backup path.
        to: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Commit step 2: moving the scratch into place failed.
    ///
    /// The original content is left at the backup path.
    #[error("unable to rename \"{from}\" to \"{to}\": {source}")]
    CannotRenameScratch {
        /// The scratch file.
        from: PathBuf,
        /// The source document path.
        to: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Commit step 3: removing the backup failed.
    #[error("unable to delete \"{path}\": {source}")]
    CannotDeleteBackup {
        /// The backup path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Argument Errors ====================
    /// An input path does not exist.
    #[error("{0} does not exist; check the path or filename")]
    PathNotFound(PathBuf),

    /// An input path is neither a regular file nor a directory.
    #[error("\"{0}\" is an unknown file type; check the path or filename")]
    UnknownFileType(PathBuf),

    /// A directory input expanded to nothing.
    #[error("no files found in \"{0}\"; nothing to do")]
    NoFilesFound(PathBuf),

    /// A config argument names a directory.
    #[error("\"{0}\" is a directory and cannot be used as a config file")]
    ConfigIsDirectory(PathBuf),

    /// A settings file could not be read or parsed.
    #[error("invalid settings \"{path}\": {message}")]
    InvalidSettings {
        /// The settings file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl Error {
    /// The family this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::NotAVrmlFile { .. } | Error::ConfigParse { .. } | Error::NoRgbValuesFound { .. } => {
                ErrorClass::Grammar
            }
            Error::ColorValueBelowZero { .. }
            | Error::ColorValueAboveOne { .. }
            | Error::ColorValueNotANumber { .. }
            | Error::NodesAlreadyMatch { .. }
            | Error::NothingToRollback { .. } => ErrorClass::Domain,
            Error::AlreadyOpen { .. }
            | Error::NotOpen
            | Error::ScratchNotOpen
            | Error::CannotOpenSource { .. }
            | Error::CannotOpenScratch { .. }
            | Error::CannotWriteScratch { .. }
            | Error::CannotReadConfig { .. }
            | Error::CannotWriteConfig { .. }
            | Error::CannotRenameSource { .. }
            | Error::CannotRenameScratch { .. }
            | Error::CannotDeleteBackup { .. }
            | Error::WalkDirError(_) => ErrorClass::Io,
            Error::PathNotFound(_)
            | Error::UnknownFileType(_)
            | Error::NoFilesFound(_)
            | Error::ConfigIsDirectory(_)
            | Error::InvalidSettings { .. } => ErrorClass::Argument,
        }
    }

    /// Whether this is one of the color-range failures.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Error::ColorValueBelowZero { .. }
                | Error::ColorValueAboveOne { .. }
                | Error::ColorValueNotANumber { .. }
        )
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `WrlRgb` operations.
pub type Result<T> = std::result::Result<T, Error>;
