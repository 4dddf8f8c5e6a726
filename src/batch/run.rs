//! Parallel execution of resize jobs.

use rayon::prelude::*;

use crate::config::ResizeConfig;
use crate::error::Result;
use crate::pipeline::{Outcome, ResizeJob, Resizer};

use super::plan::{plan_jobs, prepare_output_dirs};
use super::progress_bar;

/// Counts of what happened across a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }

    fn record(outcome: &Result<Outcome>) -> Self {
        let mut report = Self::default();
        match outcome {
            Ok(Outcome::Written) => report.written = 1,
            Ok(Outcome::Skipped) => report.skipped = 1,
            Err(_) => report.failed = 1,
        }
        report
    }

    const fn merge(self, other: Self) -> Self {
        Self {
            written: self.written + other.written,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

/// Resize every job on the rayon pool.
///
/// A failing job is logged and counted; it never stops the rest of the batch.
#[must_use]
pub fn run_batch(resizer: &Resizer, jobs: &[ResizeJob]) -> BatchReport {
    let pb = progress_bar(jobs.len(), "Resizing");

    let report = jobs
        .par_iter()
        .map(|job| {
            let outcome = resizer.process(job);
            if let Err(err) = &outcome {
                tracing::warn!("{err}");
            }
            pb.inc(1);
            BatchReport::record(&outcome)
        })
        .reduce(BatchReport::default, BatchReport::merge);

    pb.finish_with_message("Resizing complete");
    report
}

/// Mirror the category tree, plan all jobs and resize them.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the directory tree
/// cannot be read or created. Per-image failures only show up in the report.
pub fn resize_dataset(config: &ResizeConfig) -> Result<BatchReport> {
    config.validate()?;
    let resizer = Resizer::new(config.pipeline_config())?;

    let input = config.input_path();
    let output = config.output_path();

    tracing::info!(
        "Resizing {} -> {} at {}x{} ({})",
        input.display(),
        output.display(),
        config.width,
        config.height,
        if config.crop { "crop" } else { "scale" }
    );

    prepare_output_dirs(&input, &output)?;
    let jobs = plan_jobs(&input, &output, config.png)?;
    let report = run_batch(&resizer, &jobs);

    tracing::info!(
        "Resized {} images: written={} skipped={} failed={}",
        report.total(),
        report.written,
        report.skipped,
        report.failed
    );
    Ok(report)
}
