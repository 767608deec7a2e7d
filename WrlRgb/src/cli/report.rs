//! Per-file console reporting for batch runs

use std::time::Instant;

use console::style;
use indicatif::ProgressBar;

use super::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step, simple_bar};
use crate::batch::{Batch, FileOutcome, Operation, Outcome};
use crate::settings::Verbosity;

/// Render one file's result as a single line.
///
/// `Extract : a.wrl a.wrl_rgb_nodes.txt - SUCCESS`, `Verify : a.wrl c.txt -
/// no match`, and so on. Failures carry the error message at normal
/// verbosity and also its class at verbose.
pub fn format_outcome(operation: &Operation, outcome: &FileOutcome, verbosity: Verbosity) -> String {
    let mut line = format!("{} : {}", operation.name(), outcome.path.display());

    let config = match &outcome.result {
        Ok(Outcome::Extracted { config }) => Some(config.as_path()),
        _ => operation.config(),
    };
    if let Some(config) = config {
        line.push(' ');
        line.push_str(&config.display().to_string());
    }

    let status = match (&outcome.result, operation) {
        (Ok(Outcome::Verified { matched: true }), _) => "MATCH",
        (Ok(Outcome::Verified { matched: false }), _) => "no match",
        (Ok(_), _) => "SUCCESS",
        (Err(_), Operation::Verify { .. }) => "error",
        (Err(_), _) => "failure",
    };
    line.push_str(" - ");
    line.push_str(status);

    if let Err(err) = &outcome.result {
        match verbosity {
            Verbosity::Brief => {}
            Verbosity::Normal => line.push_str(&format!(": {err}")),
            Verbosity::Verbose => line.push_str(&format!(": {err} [{}]", err.class())),
        }
    }
    line
}

fn print_line(line: &str, success: bool, bar: Option<&ProgressBar>) {
    let styled = if success {
        style(line).green()
    } else {
        style(line).red()
    };
    match bar {
        Some(pb) => pb.suspend(|| println!("{styled}")),
        None => println!("{styled}"),
    }
}

/// Run a batch, printing one line per file plus progress unless `quiet`.
pub fn run(batch: &Batch, verbosity: Verbosity, quiet: bool) {
    let operation = batch.operation();
    let total = batch.inputs().len();
    let started = Instant::now();

    if !quiet {
        print_step(1, 2, LOOKING_GLASS, &format!("Found {total} file(s)"));
        let emoji = match operation {
            Operation::Extract { .. } => DISK,
            _ => GEAR,
        };
        print_step(2, 2, emoji, &format!("{}...", operation.name()));
    }

    let bar = (!quiet && total > 1).then(|| simple_bar(total as u64, operation.name()));

    let result = batch.run(|_, _, outcome| {
        let verified_mismatch = matches!(outcome.result, Ok(Outcome::Verified { matched: false }));
        print_line(
            &format_outcome(operation, outcome, verbosity),
            outcome.is_success() && !verified_mismatch,
            bar.as_ref(),
        );
        if let Some(pb) = &bar {
            pb.inc(1);
        }
    });

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    if !quiet {
        println!(
            "{} succeeded, {} failed",
            style(result.success_count).green(),
            style(result.fail_count).red()
        );
        print_done(started.elapsed());
    }
}
