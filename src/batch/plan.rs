//! Walk the input tree and build the list of resize jobs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ATTRIBUTIONS_FILE;
use crate::error::{Error, Result};
use crate::pipeline::ResizeJob;

/// Sorted entries of `dir`, excluding the attributions file.
pub(super) fn read_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::DirRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::DirRead {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_name() == ATTRIBUTIONS_FILE {
            continue;
        }
        paths.push(entry.path());
    }

    paths.sort();
    Ok(paths)
}

/// Category directories directly under `input`.
///
/// # Errors
///
/// Returns an error if `input` cannot be listed.
pub fn list_categories(input: &Path) -> Result<Vec<PathBuf>> {
    let mut categories = Vec::new();
    for path in read_entries(input)? {
        if path.is_dir() {
            categories.push(path);
        } else {
            tracing::warn!("Ignoring non-directory entry {}", path.display());
        }
    }
    Ok(categories)
}

/// Create `output` and one subdirectory per category found under `input`.
///
/// # Errors
///
/// Returns an error if `input` cannot be listed or a directory cannot be created.
pub fn prepare_output_dirs(input: &Path, output: &Path) -> Result<()> {
    fs::create_dir_all(output)?;

    for category in list_categories(input)? {
        if let Some(name) = category.file_name() {
            fs::create_dir_all(output.join(name))?;
        }
    }

    Ok(())
}

/// One job per file in each category. With `png` set, outputs get a `.png`
/// extension regardless of the source format.
///
/// Each output path is planned at most once. When two sources map to the same
/// output (`a.jpg` and `a.png` with `png` set), the first in sorted order wins
/// and the other is dropped with a warning.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed.
pub fn plan_jobs(input: &Path, output: &Path, png: bool) -> Result<Vec<ResizeJob>> {
    let mut jobs = Vec::new();
    let mut planned = HashSet::new();

    for category in list_categories(input)? {
        let Some(category_name) = category.file_name() else {
            continue;
        };
        let out_dir = output.join(category_name);

        for path in read_entries(&category)? {
            if !path.is_file() {
                tracing::debug!("Ignoring nested entry {}", path.display());
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };

            let mut out = out_dir.join(file_name);
            if png {
                out.set_extension("png");
            }

            if !planned.insert(out.clone()) {
                tracing::warn!(
                    "Skipping {}: {} is already planned from another source",
                    path.display(),
                    out.display()
                );
                continue;
            }

            jobs.push(ResizeJob {
                input: path,
                output: out,
            });
        }
    }

    tracing::debug!("Planned {} resize jobs", jobs.len());
    Ok(jobs)
}
