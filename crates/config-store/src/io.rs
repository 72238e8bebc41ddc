//! Atomic file I/O with advisory locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Create `path` as an empty file unless it already exists.
///
/// The parent directory must exist.
pub fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map(drop)
        .map_err(|e| Error::io(path, e))
}

/// Write content atomically to a file with locking.
///
/// Writes to a temporary sibling file under an exclusive lock, syncs it and
/// renames it over the target. The temporary file is removed on failure.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let result = write_locked(&mut temp_file, path, &temp_path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if result.is_err() {
        drop(temp_file);
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary file");
        }
    }
    result
}

fn write_locked(file: &mut File, path: &Path, temp_path: &Path, content: &[u8]) -> Result<()> {
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    file.write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    FileExt::unlock(&*file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })
}
