//! Write-temp-then-rename replacement of the kube config.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{Error, Result};

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Replaces `path` with `content` so that readers see either the old file or
/// the new one, never a partial write.
///
/// Symlinks are followed: the file they point at is replaced and the link
/// stays. The temporary file lives next to that file so the final rename
/// stays on one filesystem. If the file already exists its permissions are
/// carried over. On any failure the temporary file is removed and the
/// original is left untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    replace(path, content, |_| Ok(()))
}

/// `before_commit` sees the fully written temporary file just before it is
/// renamed into place.
fn replace<F>(path: &Path, content: &[u8], before_commit: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = parent_dir(&target);

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| Error::write(path, e))?;
    temp.write_all(content).map_err(|e| Error::write(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::write(path, e))?;

    if let Ok(meta) = fs::metadata(&target) {
        fs::set_permissions(temp.path(), meta.permissions()).map_err(|e| Error::write(path, e))?;
    }

    before_commit(temp.path()).map_err(|e| Error::write(path, e))?;
    temp.persist(&target).map_err(|e| Error::write(path, e.error))?;

    Ok(())
}
