//! Directory-level batch resizing: plan jobs, fan out on rayon, verify output.

mod plan;
mod run;
mod verify;

pub use plan::{list_categories, plan_jobs, prepare_output_dirs};
pub use run::{resize_dataset, run_batch, BatchReport};
pub use verify::{verify_output, VerifyReport};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar shared by the batch and dataset passes.
pub(crate) fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}
