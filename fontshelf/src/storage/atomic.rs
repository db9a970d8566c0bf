// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Write-to-temp-then-rename helpers shared by the catalog document and the
//! asset directory.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_TEMP_ATTEMPTS: u32 = 100;

#[derive(Debug)]
pub struct AtomicWriteError {
    message: String,
}

impl AtomicWriteError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AtomicWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for AtomicWriteError {}

/// Replaces `path` with `content` in one rename. The previous file, if any,
/// stays intact when any step before the rename fails.
pub fn write_file_atomic(path: &Path, label: &str, content: &[u8]) -> Result<(), AtomicWriteError> {
    let parent = path.parent().ok_or_else(|| {
        AtomicWriteError::new(format!("{} file path has no parent directory", label))
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AtomicWriteError::new(format!("{} file path has no file name", label)))?;
    let (mut file, temp_path) = create_temp_file(parent, file_name, label)?;

    #[cfg(unix)]
    {
        if let Ok(metadata) = fs::metadata(path)
            && let Err(err) = fs::set_permissions(&temp_path, metadata.permissions())
        {
            let _ = fs::remove_file(&temp_path);
            return Err(AtomicWriteError::new(format!(
                "Failed to set temp {} file permissions: {}",
                label, err
            )));
        }
    }

    if let Err(err) = file.write_all(content) {
        let _ = fs::remove_file(&temp_path);
        return Err(AtomicWriteError::new(format!(
            "Failed to write {} temp file: {}",
            label, err
        )));
    }
    if let Err(err) = file.sync_all() {
        let _ = fs::remove_file(&temp_path);
        return Err(AtomicWriteError::new(format!(
            "Failed to sync {} temp file: {}",
            label, err
        )));
    }
    drop(file);

    publish(&temp_path, path, label)
}

/// Renames a fully written temp file onto its final name.
pub fn publish(temp_path: &Path, path: &Path, label: &str) -> Result<(), AtomicWriteError> {
    if let Err(err) = fs::rename(temp_path, path) {
        let _ = fs::remove_file(temp_path);
        return Err(AtomicWriteError::new(format!(
            "Failed to replace {} file: {}",
            label, err
        )));
    }

    #[cfg(unix)]
    {
        if let Some(parent) = path.parent()
            && let Err(err) = sync_parent_dir(parent)
        {
            log::warn!("{} directory sync failed: {}", label, err);
        }
    }

    Ok(())
}

fn create_temp_file(
    parent: &Path,
    file_name: &str,
    label: &str,
) -> Result<(fs::File, PathBuf), AtomicWriteError> {
    for attempt in 0..MAX_TEMP_ATTEMPTS {
        let temp_name = format!(".{}.tmp.{}.{}", file_name, std::process::id(), attempt);
        let temp_path = parent.join(temp_name);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path);
        match file {
            Ok(file) => return Ok((file, temp_path)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(AtomicWriteError::new(format!(
                    "Failed to create temp {} file: {}",
                    label, err
                )));
            }
        }
    }
    Err(AtomicWriteError::new(format!(
        "Failed to create temp {} file after multiple attempts",
        label
    )))
}

#[cfg(unix)]
fn sync_parent_dir(parent: &Path) -> Result<(), std::io::Error> {
    let dir = fs::File::open(parent)?;
    dir.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_content_without_leftovers() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("catalog.json");
        fs::write(&path, b"old").expect("seed");

        write_file_atomic(&path, "catalog", b"new").expect("atomic write");

        assert_eq!(fs::read(&path).expect("read"), b"new");
        let entries: Vec<_> = fs::read_dir(temp.path())
            .expect("read dir")
            .flatten()
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(entries.len(), 1, "temp file should be renamed away");
    }

    #[test]
    fn missing_parent_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("missing").join("catalog.json");
        assert!(write_file_atomic(&path, "catalog", b"{}").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_leaves_previous_file_untouched() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("catalog.json");
        fs::write(&path, b"original").expect("seed");

        let dir = temp.path();
        let original = fs::metadata(dir).expect("metadata").permissions().mode();
        fs::set_permissions(dir, fs::Permissions::from_mode(original & 0o555))
            .expect("read-only");

        let result = write_file_atomic(&path, "catalog", b"replacement");

        fs::set_permissions(dir, fs::Permissions::from_mode(original)).expect("restore");
        // Running as root bypasses directory permissions.
        if result.is_err() {
            assert_eq!(fs::read(&path).expect("read"), b"original");
        }
    }
}
