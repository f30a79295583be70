//! Whole-file read and write of patch targets.
//!
//! Artifacts are always read fully into memory and written back fully.  With
//! atomic writes enabled the new content goes to a temp file in the same
//! directory, is flushed to disk and then renamed over the target, so a crash
//! leaves either the old or the new file and never a truncated one.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{PatchError, Result};

/// How [`write_text`] replaces the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Temp file in the target's directory, then rename.
    Atomic,
    /// Truncate and rewrite the target in place.
    Direct,
}

impl WriteMode {
    pub fn from_atomic(atomic: bool) -> Self {
        if atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Direct
        }
    }
}

/// Read the artifact as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the artifact's full content with `content`.
pub fn write_text(path: &Path, content: &str, mode: WriteMode) -> Result<()> {
    let write_err = |source| PatchError::Write {
        path: path.to_path_buf(),
        source,
    };

    match mode {
        WriteMode::Direct => std::fs::write(path, content).map_err(write_err),
        WriteMode::Atomic => {
            let dir = parent_dir(path);
            let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
            tmp.write_all(content.as_bytes()).map_err(write_err)?;
            tmp.as_file().sync_all().map_err(write_err)?;
            tmp.persist(path).map_err(|e| write_err(e.error))?;
            Ok(())
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(&dir.path().join("nope.js")).unwrap_err();
        assert!(matches!(err, PatchError::Read { .. }));
    }

    #[test]
    fn test_atomic_write_replaces_content_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.js");
        std::fs::write(&path, "old").unwrap();

        write_text(&path, "新的内容", WriteMode::Atomic).unwrap();

        assert_eq!(read_text(&path).unwrap(), "新的内容");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_direct_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.json");
        std::fs::write(&path, "{}").unwrap();
        write_text(&path, "{\"a\": 1}", WriteMode::Direct).unwrap();
        assert_eq!(read_text(&path).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_parent_dir_of_bare_file_name_is_cwd() {
        assert_eq!(parent_dir(Path::new("mock.json")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("a/b.json")), PathBuf::from("a"));
    }

    #[test]
    fn test_write_mode_from_flag() {
        assert_eq!(WriteMode::from_atomic(true), WriteMode::Atomic);
        assert_eq!(WriteMode::from_atomic(false), WriteMode::Direct);
    }
}
