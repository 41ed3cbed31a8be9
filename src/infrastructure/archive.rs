use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::domain::error::{AppError, Result};

/// Extract every entry of `zip_path` into `dest`
pub fn extract_zip(zip_path: &Path, dest: &Path) -> Result<PathBuf> {
    let file = std::fs::File::open(zip_path).map_err(|e| {
        AppError::IoError(format!("Failed to open {}: {}", zip_path.display(), e))
    })?;
    let mut archive = ZipArchive::new(file)?;

    std::fs::create_dir_all(dest)?;
    archive.extract(dest)?;
    debug!(archive = %zip_path.display(), dest = %dest.display(), "Archive extracted");
    Ok(dest.to_path_buf())
}

fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// The single CSV file directly inside `dir`.
///
/// The export cannot be validated beyond its shape, so anything other than
/// exactly one CSV is rejected.
pub fn find_single_csv(dir: &Path) -> Result<PathBuf> {
    let mut csv_files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_csv(&path) {
            csv_files.push(path);
        }
    }

    if csv_files.len() != 1 {
        return Err(AppError::ValidationError(format!(
            "Expected 1 CSV file, but found {} files",
            csv_files.len()
        )));
    }
    Ok(csv_files.remove(0))
}

/// Extract `zip_path` into `dest` and return its only CSV file
pub fn extract_single_csv(zip_path: &Path, dest: &Path) -> Result<PathBuf> {
    let dir = extract_zip(zip_path, dest)?;
    find_single_csv(&dir)
}
