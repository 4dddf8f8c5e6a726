//! Post-run check that every output image has the target resolution.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::image;

use super::plan::{list_categories, read_entries};

/// Result of checking an output tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Files inspected.
    pub checked: usize,

    /// Files with the wrong size or an unreadable header, sorted.
    pub invalid: Vec<PathBuf>,
}

impl VerifyReport {
    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// One-line result printed after a run.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Found {} invalid images", self.invalid_count())
    }
}

/// Check every `output/<category>/<file>` against `width` x `height`.
///
/// # Errors
///
/// Returns an error if the output tree cannot be listed.
pub fn verify_output(output: &Path, width: u32, height: u32) -> Result<VerifyReport> {
    let mut files = Vec::new();
    for category in list_categories(output)? {
        files.extend(read_entries(&category)?.into_iter().filter(|p| p.is_file()));
    }

    let mut invalid: Vec<PathBuf> = files
        .par_iter()
        .filter(|path| match image::image_dimensions(path) {
            Ok(dims) if dims == (width, height) => false,
            Ok((w, h)) => {
                tracing::debug!("Invalid image {} ({w}x{h})", path.display());
                true
            }
            Err(err) => {
                tracing::warn!("{err}");
                true
            }
        })
        .cloned()
        .collect();
    invalid.sort();

    Ok(VerifyReport {
        checked: files.len(),
        invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ::image::RgbImage;

    #[test]
    fn test_counts_wrong_sizes_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let cats = dir.path().join("cats");
        std::fs::create_dir_all(&cats).unwrap();
        RgbImage::new(16, 8).save(cats.join("ok.png")).unwrap();
        RgbImage::new(8, 16).save(cats.join("rotated.png")).unwrap();
        std::fs::write(cats.join("junk.png"), b"junk").unwrap();

        let report = verify_output(dir.path(), 16, 8).unwrap();

        assert_eq!(report.checked, 3);
        assert_eq!(
            report.invalid,
            vec![cats.join("junk.png"), cats.join("rotated.png")]
        );
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "Found 2 invalid images");
    }

    #[test]
    fn test_missing_output_is_dir_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("resized");

        let err = verify_output(&missing, 16, 8).unwrap_err();
        assert!(matches!(err, Error::DirRead { ref path, .. } if *path == missing));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_category_names_its_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let cats = dir.path().join("cats");
        std::fs::create_dir_all(&cats).unwrap();
        RgbImage::new(16, 8).save(cats.join("ok.png")).unwrap();
        std::fs::set_permissions(&cats, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; only check when the listing is denied.
        let denied = std::fs::read_dir(&cats).is_err();
        let result = verify_output(dir.path(), 16, 8);
        std::fs::set_permissions(&cats, std::fs::Permissions::from_mode(0o755)).unwrap();

        if denied {
            assert!(matches!(result, Err(Error::DirRead { ref path, .. }) if *path == cats));
        } else {
            assert_eq!(result.unwrap().checked, 1);
        }
    }

    #[test]
    fn test_empty_tree_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let report = verify_output(dir.path(), 16, 8).unwrap();
        assert_eq!(report.checked, 0);
        assert!(report.is_clean());
        assert_eq!(report.summary(), "Found 0 invalid images");
    }
}
