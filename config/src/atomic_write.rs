//! Atomic file write helper.
//!
//! Uses a temp file + rename pattern. On Windows, rename-over-existing fails, so we
//! use a backup-and-restore fallback to avoid data loss when overwriting.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `bytes` to `path` via a sibling temp file.
///
/// `unix_mode` is applied to the temp file before it is renamed into place.
pub fn atomic_write(path: &Path, bytes: &[u8], unix_mode: Option<u32>) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    #[cfg(unix)]
    if let Some(mode) = unix_mode {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = unix_mode;

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        // Windows fallback: backup and restore.
        let backup_path = path.with_extension("bak");
        let _ = fs::remove_file(&backup_path);
        fs::rename(path, &backup_path)?;
        if let Err(second) = err.file.persist(path) {
            let _ = fs::rename(&backup_path, path);
            return Err(second.error);
        }
        let _ = fs::remove_file(&backup_path);
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Atomic write complete");
    Ok(())
}
