// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{CONFIG_FILE_NAME, ConfigError, ValidatedConfig};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub uploads_dir: PathBuf,
    pub catalog_file: PathBuf,
}

impl RuntimePaths {
    pub fn from_root(root: &Path, config: &ValidatedConfig) -> Result<Self, ConfigError> {
        let root_path = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root.to_path_buf()
        };

        if !root_path.exists() {
            fs::create_dir_all(&root_path).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Failed to create runtime root '{}': {}",
                    root_path.display(),
                    e
                ))
            })?;
        }

        let root_canonical = root_path.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize runtime root '{}': {}",
                root_path.display(),
                e
            ))
        })?;

        let config_file = root_canonical.join(CONFIG_FILE_NAME);

        let uploads_dir = root_canonical.join(&config.storage.uploads_dir);
        ensure_dir_exists(&uploads_dir)?;
        let uploads_dir = uploads_dir.canonicalize().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to canonicalize uploads directory '{}': {}",
                uploads_dir.display(),
                e
            ))
        })?;

        let catalog_file = root_canonical.join(&config.storage.catalog_file);
        if let Some(parent) = catalog_file.parent() {
            ensure_dir_exists(parent)?;
        }
        if catalog_file.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "Catalog file path is a directory: {}",
                catalog_file.display()
            )));
        }

        Ok(Self {
            root: root_canonical,
            config_file,
            uploads_dir,
            catalog_file,
        })
    }
}

fn ensure_dir_exists(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to create directory '{}': {}",
                path.display(),
                e
            ))
        })?;
    }

    ensure_dir_writable(path, "Directory must be writable")?;
    Ok(())
}

fn ensure_dir_writable(path: &Path, context: &str) -> Result<(), ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "{} (not a directory): {}",
            context,
            path.display()
        )));
    }

    let check_name = format!(".fontshelf-write-check-{}", Uuid::new_v4());
    let check_path = path.join(check_name);

    let check_result = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&check_path);

    match check_result {
        Ok(_) => {
            if let Err(err) = fs::remove_file(&check_path) {
                return Err(ConfigError::ValidationError(format!(
                    "{} (unable to clean write-check file {}): {}",
                    context,
                    check_path.display(),
                    err
                )));
            }
            Ok(())
        }
        Err(err) => Err(ConfigError::ValidationError(format!(
            "{} ({}): {}",
            context,
            path.display(),
            err
        ))),
    }
}
