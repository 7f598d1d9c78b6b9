use crate::Result;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S%.6f";

/// `<file>.tmp`, next to the destination so the rename stays on one filesystem
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `data` to `path` through a sibling temp file and a rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    write_atomic_with(path, data, |from, to| fs::rename(from, to))
}

/// [`write_atomic`] with the final rename step supplied by the caller.
///
/// Whatever happens after the temp file is created, either the rename
/// succeeds or the temp file is removed and the destination is untouched.
pub fn write_atomic_with<F>(path: &Path, data: &[u8], rename: F) -> Result<()>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let tmp = temp_path_for(path);
    if let Err(err) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    if let Err(err) = rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

/// Copy `path` to `<path>.backup.<timestamp>`. Returns `None` when there was
/// nothing to back up.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".backup.{}", Utc::now().format(BACKUP_TIMESTAMP_FORMAT)));
    let backup = PathBuf::from(name);
    fs::copy(path, &backup)?;
    Ok(Some(backup))
}
