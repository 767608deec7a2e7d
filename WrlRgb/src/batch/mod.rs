//! Batch processing over a file or a directory of files
//!
//! Every input is processed on its own: a failure is recorded against that
//! file and the batch moves on to the next one. Only argument problems,
//! found before any file is touched, stop a batch.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::replace::Replacer;
use crate::rollback::RollbackEngine;
use crate::settings::Settings;

/// Operation applied to each input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Write each document's nodes to a config; the explicit path applies
    /// only to a single-file input.
    Extract { config: Option<PathBuf> },
    /// Compare each document against a config.
    Verify { config: PathBuf },
    /// Replace each document's colors with a config's.
    Replace { config: PathBuf },
    /// Undo the most recent replace of each document.
    Rollback,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Extract { .. } => "Extract",
            Operation::Verify { .. } => "Verify",
            Operation::Replace { .. } => "Replace",
            Operation::Rollback => "Rollback",
        }
    }

    /// The config argument, if the operation takes one.
    pub fn config(&self) -> Option<&Path> {
        match self {
            Operation::Extract { config } => config.as_deref(),
            Operation::Verify { config } | Operation::Replace { config } => Some(config),
            Operation::Rollback => None,
        }
    }
}

/// What a successful operation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Config written to this path.
    Extracted { config: PathBuf },
    /// Whether the document matched the config.
    Verified { matched: bool },
    Replaced,
    RolledBack,
}

/// Result for one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Outcome>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a batch run
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of files processed without error
    pub success_count: usize,
    /// Number of files that failed
    pub fail_count: usize,
    /// Outcome of each file, in processing order
    pub outcomes: Vec<FileOutcome>,
}

/// Expand an input argument into the files to process.
///
/// A regular file is returned as is. A directory yields its regular files
/// (not recursive, sorted) whose extension is accepted by `settings`.
///
/// # Errors
/// Returns [`Error::PathNotFound`], [`Error::UnknownFileType`] or
/// [`Error::NoFilesFound`].
pub fn collect_inputs(path: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(Error::UnknownFileType(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        let file = entry.path();
        if file.is_file() && settings.accepts_extension(file) {
            files.push(file.to_path_buf());
        } else {
            tracing::debug!("Skipping {}", file.display());
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoFilesFound(path.to_path_buf()));
    }
    Ok(files)
}

/// A config argument that must name an existing regular file.
fn require_config_file(config: &Path) -> Result<()> {
    if !config.exists() {
        return Err(Error::PathNotFound(config.to_path_buf()));
    }
    if config.is_dir() {
        return Err(Error::ConfigIsDirectory(config.to_path_buf()));
    }
    if !config.is_file() {
        return Err(Error::UnknownFileType(config.to_path_buf()));
    }
    Ok(())
}

/// One operation over a validated set of inputs.
#[derive(Debug)]
pub struct Batch {
    settings: Settings,
    operation: Operation,
    inputs: Vec<PathBuf>,
}

impl Batch {
    /// Resolve `target` and check the operation's config argument.
    ///
    /// # Errors
    /// Returns an argument error; no file has been touched when it does.
    pub fn new(settings: Settings, target: &Path, operation: Operation) -> Result<Self> {
        let inputs = collect_inputs(target, &settings)?;

        if let Operation::Verify { config } | Operation::Replace { config } = &operation {
            require_config_file(config)?;
        }
        let operation = match operation {
            Operation::Extract { config: Some(config) } => {
                if config.is_dir() {
                    return Err(Error::ConfigIsDirectory(config));
                }
                if target.is_dir() {
                    tracing::warn!(
                        "Ignoring {} for directory input; each file gets its own config",
                        config.display()
                    );
                    Operation::Extract { config: None }
                } else {
                    Operation::Extract { config: Some(config) }
                }
            }
            other => other,
        };

        Ok(Self {
            settings,
            operation,
            inputs,
        })
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Run the operation on one file.
    ///
    /// # Errors
    /// Returns whatever the underlying engine returns.
    pub fn run_one(&self, path: &Path) -> Result<Outcome> {
        match &self.operation {
            Operation::Extract { config } => {
                let written = Extractor::new(self.settings.clone()).extract(path, config.as_deref())?;
                Ok(Outcome::Extracted { config: written })
            }
            Operation::Verify { config } => {
                let matched = Extractor::new(self.settings.clone()).verify(path, config)?;
                Ok(Outcome::Verified { matched })
            }
            Operation::Replace { config } => {
                Replacer::new(self.settings.clone()).replace(path, config)?;
                Ok(Outcome::Replaced)
            }
            Operation::Rollback => {
                RollbackEngine::new(self.settings.clone()).rollback(path)?;
                Ok(Outcome::RolledBack)
            }
        }
    }

    /// Run every input in order, reporting each outcome to `progress` as
    /// `(current, total, outcome)`.
    pub fn run<F>(&self, mut progress: F) -> BatchResult
    where
        F: FnMut(usize, usize, &FileOutcome),
    {
        let total = self.inputs.len();
        let mut result = BatchResult::default();

        for (index, path) in self.inputs.iter().enumerate() {
            let outcome = FileOutcome {
                path: path.clone(),
                result: self.run_one(path),
            };
            if let Err(err) = &outcome.result {
                tracing::debug!("{} failed for {}: {}", self.operation.name(), path.display(), err);
                result.fail_count += 1;
            } else {
                result.success_count += 1;
            }
            progress(index + 1, total, &outcome);
            result.outcomes.push(outcome);
        }
        result
    }
}
