// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::util::is_temp_upload_name;
use log::warn;
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub const MAX_ASSET_NAME_BYTES: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCheckError {
    /// The file does not exist (or cannot be canonicalized).
    Missing,
    /// The root directory itself cannot be canonicalized.
    RootUnavailable,
    /// The canonical file path lies outside the root.
    OutsideRoot,
}

impl fmt::Display for PathCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCheckError::Missing => write!(f, "file does not exist"),
            PathCheckError::RootUnavailable => write!(f, "storage root is unavailable"),
            PathCheckError::OutsideRoot => write!(f, "path is outside the storage root"),
        }
    }
}

impl std::error::Error for PathCheckError {}

/// Validates that an existing file is within `root` after canonicalization.
/// Symlinks pointing out of the root are rejected.
pub fn canonical_path_checks(file_path: &Path, root: &Path) -> Result<PathBuf, PathCheckError> {
    let canonical_file_path = file_path
        .canonicalize()
        .map_err(|_| PathCheckError::Missing)?;
    let canonical_root = root
        .canonicalize()
        .map_err(|_| PathCheckError::RootUnavailable)?;

    match canonical_file_path.strip_prefix(&canonical_root) {
        Ok(remaining_path) => {
            let suspicious = remaining_path.as_os_str().is_empty()
                || remaining_path
                    .components()
                    .any(|component| !matches!(component, Component::Normal(_)));
            if suspicious {
                warn!(
                    "🚨 SECURITY: Suspicious remaining path after strip_prefix: {:?}",
                    remaining_path
                );
                return Err(PathCheckError::OutsideRoot);
            }
            Ok(canonical_file_path)
        }
        Err(_) => {
            warn!(
                "🚨 SECURITY: Path traversal attempt - file outside storage root: {:?} not in {:?}",
                canonical_file_path, canonical_root
            );
            Err(PathCheckError::OutsideRoot)
        }
    }
}

/// Validates a flat asset name: a single path component that cannot address
/// anything outside the directory it is joined to.
pub fn validate_asset_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Empty file name not allowed".to_string());
    }
    if name.len() > MAX_ASSET_NAME_BYTES {
        return Err(format!(
            "File name cannot exceed {} bytes",
            MAX_ASSET_NAME_BYTES
        ));
    }
    if !is_single_component(name) {
        return Err("Invalid file name: path separators or traversal detected".to_string());
    }

    if name.starts_with('.') {
        return Err("Hidden file names are not allowed".to_string());
    }
    if is_temp_upload_name(name) {
        return Err("File name is reserved for in-flight uploads".to_string());
    }
    Ok(())
}

// Backslash separates components on Windows; reject it everywhere.
fn is_single_component(name: &str) -> bool {
    if name.contains('\0') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

/// Builds the target path for a new asset without requiring it to exist.
pub fn validate_new_file_path(name: &str, root_canonical: &Path) -> Result<PathBuf, String> {
    validate_asset_name(name)?;
    let target_path = root_canonical.join(name);
    match target_path.strip_prefix(root_canonical) {
        Ok(rest) if rest.components().count() == 1 => Ok(target_path),
        _ => Err("Target path is outside storage root".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn accepts_plain_font_names() {
        assert!(validate_asset_name("Roboto.ttf").is_ok());
        assert!(validate_asset_name("Open Sans Bold.ttf").is_ok());
        assert!(validate_asset_name("Noto-Sans_JP.ttf").is_ok());
    }

    #[test]
    fn rejects_traversal_and_separators() {
        assert!(validate_asset_name("../outside.ttf").is_err());
        assert!(validate_asset_name("nested/inside.ttf").is_err());
        assert!(validate_asset_name("nested\\inside.ttf").is_err());
        assert!(validate_asset_name("/etc/passwd").is_err());
        assert!(validate_asset_name("..").is_err());
        assert!(validate_asset_name(".").is_err());
        assert!(validate_asset_name("font\0.ttf").is_err());
        assert!(validate_asset_name("inside.ttf/").is_err());
        assert!(validate_asset_name("").is_err());
    }

    #[test]
    fn accepts_dots_and_percent_signs_inside_a_single_component() {
        assert!(validate_asset_name("Font..Bold.ttf").is_ok());
        assert!(validate_asset_name("Fira Code v1.2..ttf").is_ok());
        assert!(validate_asset_name("100%.ttf").is_ok());
        assert!(validate_asset_name("Caf%E9.ttf").is_ok());
        assert!(validate_asset_name("Nunito%2Fx.ttf").is_ok());
    }

    #[test]
    fn rejects_hidden_and_temp_names() {
        assert!(validate_asset_name(".ttf").is_err());
        assert!(validate_asset_name(".fontshelf-upload-x.upload").is_err());
        assert!(validate_asset_name("font.ttf.upload").is_err());
    }

    #[test]
    fn rejects_overlong_names() {
        let name = format!("{}.ttf", "a".repeat(MAX_ASSET_NAME_BYTES));
        assert!(validate_asset_name(&name).is_err());
    }

    #[test]
    fn new_file_path_stays_in_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().canonicalize().expect("canonical root");
        let path = validate_new_file_path("Roboto.ttf", &root).expect("valid path");
        assert_eq!(path, root.join("Roboto.ttf"));
        assert!(validate_new_file_path("../Roboto.ttf", &root).is_err());
    }

    #[test]
    fn canonical_checks_allow_file_in_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file_path = temp.path().join("Roboto.ttf");
        fs::write(&file_path, b"font").expect("write");
        assert!(canonical_path_checks(&file_path, temp.path()).is_ok());
    }

    #[test]
    fn canonical_checks_reject_missing_and_outside_files() {
        let root = tempfile::tempdir().expect("root");
        let outside = tempfile::tempdir().expect("outside");
        let outside_file = outside.path().join("secret.ttf");
        fs::write(&outside_file, b"secret").expect("write");

        assert_eq!(
            canonical_path_checks(&root.path().join("missing.ttf"), root.path()),
            Err(PathCheckError::Missing)
        );
        assert_eq!(
            canonical_path_checks(&outside_file, root.path()),
            Err(PathCheckError::OutsideRoot)
        );
    }

    #[cfg(unix)]
    #[test]
    fn canonical_checks_reject_symlink_escape() {
        use std::os::unix::fs::symlink;

        let root = tempfile::tempdir().expect("root");
        let outside = tempfile::tempdir().expect("outside");
        let outside_file = outside.path().join("secret.ttf");
        fs::write(&outside_file, b"secret").expect("write");
        let link_path = root.path().join("linked.ttf");
        symlink(&outside_file, &link_path).expect("symlink");

        assert_eq!(
            canonical_path_checks(&link_path, root.path()),
            Err(PathCheckError::OutsideRoot)
        );
    }
}
