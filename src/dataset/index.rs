//! Discovery of image files under a dataset root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions picked up when indexing a dataset directory.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["bmp", "gif", "jpeg", "jpg", "png"];

/// Whether `path` has one of [`IMAGE_EXTENSIONS`], ignoring case.
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Every image file below `root`, sorted.
///
/// Directories reached through symlinks are not entered; symlinked files are
/// kept.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed.
pub fn index_images(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| Error::DirRead {
            path: dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| Error::DirRead {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                pending.push(path);
            } else if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
                && is_image_file(&path)
            {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a/b.PNG")));
        assert!(is_image_file(Path::new("x.jpeg")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("png")));
    }

    #[test]
    fn test_index_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("top.jpg"), b"").unwrap();
        fs::write(nested.join("deep.gif"), b"").unwrap();
        fs::write(nested.join("attributions.json"), b"{}").unwrap();

        let found = index_images(dir.path()).unwrap();

        assert_eq!(found, vec![nested.join("deep.gif"), dir.path().join("top.jpg")]);
    }
}
