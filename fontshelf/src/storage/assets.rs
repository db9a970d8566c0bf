// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::security::{self, PathCheckError};
use crate::storage::atomic;
use crate::util::{is_temp_upload_name, temp_upload_name};
use log::{debug, warn};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    InvalidName(String),
    NotFound(String),
    Io(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::InvalidName(msg) => write!(f, "Invalid asset name: {}", msg),
            AssetError::NotFound(name) => write!(f, "Asset not found: {}", name),
            AssetError::Io(msg) => write!(f, "Asset storage error: {}", msg),
        }
    }
}

impl Error for AssetError {}

/// Flat directory of uploaded binaries, one file per asset name.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<PathBuf, AssetError> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|err| {
                AssetError::Io(format!(
                    "Failed to create asset directory '{}': {}",
                    self.root.display(),
                    err
                ))
            })?;
            debug!("Created asset directory {}", self.root.display());
        }
        self.root.canonicalize().map_err(|err| {
            AssetError::Io(format!(
                "Failed to canonicalize asset directory '{}': {}",
                self.root.display(),
                err
            ))
        })
    }

    fn target_path(&self, name: &str) -> Result<PathBuf, AssetError> {
        let root = self.ensure_root()?;
        security::validate_new_file_path(name, &root).map_err(AssetError::InvalidName)
    }

    /// Writes `bytes` to a temp file next to the final location. Nothing is
    /// visible under `name` until [`StagedAsset::publish`] runs.
    pub fn stage(&self, name: &str, bytes: &[u8]) -> Result<StagedAsset, AssetError> {
        let target = self.target_path(name)?;
        let root = target
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| AssetError::Io("Asset path has no parent directory".to_string()))?;
        let temp_path = root.join(temp_upload_name(name));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|err| AssetError::Io(format!("Failed to create temp upload file: {}", err)))?;
        let staged = StagedAsset {
            name: name.to_string(),
            temp_path: Some(temp_path),
            target,
        };
        file.write_all(bytes)
            .map_err(|err| AssetError::Io(format!("Failed to write temp upload file: {}", err)))?;
        file.sync_all()
            .map_err(|err| AssetError::Io(format!("Failed to sync temp upload file: {}", err)))?;
        Ok(staged)
    }

    pub fn put(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, AssetError> {
        self.stage(name, bytes)?.publish()
    }

    /// Deletes the asset. Returns `false` when there was nothing to delete.
    pub fn remove(&self, name: &str) -> Result<bool, AssetError> {
        let target = self.target_path(name)?;
        match fs::remove_file(&target) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(AssetError::Io(format!(
                "Failed to remove asset '{}': {}",
                name, err
            ))),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Maps `name` to a canonical file path inside the asset root.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        if let Err(reason) = security::validate_asset_name(name) {
            debug!("Refusing to resolve asset {:?}: {}", name, reason);
            return Err(AssetError::NotFound(name.to_string()));
        }
        let root = self.ensure_root()?;
        let canonical = match security::canonical_path_checks(&root.join(name), &root) {
            Ok(path) => path,
            Err(PathCheckError::RootUnavailable) => {
                return Err(AssetError::Io("Asset directory is unavailable".to_string()));
            }
            Err(_) => return Err(AssetError::NotFound(name.to_string())),
        };
        if !canonical.is_file() {
            return Err(AssetError::NotFound(name.to_string()));
        }
        Ok(canonical)
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(name)?;
        fs::read(&path).map_err(|err| AssetError::Io(format!("Failed to read asset: {}", err)))
    }

    /// Deletes temp files left behind by uploads that never published.
    pub fn sweep_stale_uploads(&self) -> Result<usize, AssetError> {
        let root = self.ensure_root()?;
        let entries = fs::read_dir(&root)
            .map_err(|err| AssetError::Io(format!("Failed to list asset directory: {}", err)))?;
        let mut removed = 0;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if !is_temp_upload_name(&name) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(err) => warn!("Failed to remove stale upload {}: {}", name, err),
            }
        }
        Ok(removed)
    }
}

/// An upload written to disk but not yet visible under its final name.
/// Dropping it without publishing discards the temp file.
#[derive(Debug)]
pub struct StagedAsset {
    name: String,
    temp_path: Option<PathBuf>,
    target: PathBuf,
}

impl StagedAsset {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publish(mut self) -> Result<PathBuf, AssetError> {
        let temp_path = self
            .temp_path
            .take()
            .ok_or_else(|| AssetError::Io("Upload was already published".to_string()))?;
        atomic::publish(&temp_path, &self.target, "asset")
            .map_err(|err| AssetError::Io(err.to_string()))?;
        Ok(self.target.clone())
    }
}

impl Drop for StagedAsset {
    fn drop(&mut self) {
        if let Some(temp_path) = self.temp_path.take()
            && let Err(err) = fs::remove_file(&temp_path)
        {
            warn!(
                "Failed to discard unpublished upload {}: {}",
                temp_path.display(),
                err
            );
        }
    }
}
