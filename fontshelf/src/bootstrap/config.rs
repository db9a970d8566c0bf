// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_WORKERS: u16 = 4;
const DEFAULT_MAX_FILE_SIZE_MB: u64 = 20;

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml();

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (http port {}, upload limit {} MB)",
        DEFAULT_PORT, DEFAULT_MAX_FILE_SIZE_MB
    ));

    Ok(true)
}

pub(super) fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"127.0.0.1\"\n  port: {port}\n  workers: {workers}\n\nstorage:\n  uploads_dir: \"uploads\"\n  catalog_file: \"catalog.json\"\n\nupload:\n  max_file_size_mb: {max_mb}\n\nlogging:\n  level: \"info\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        max_mb = DEFAULT_MAX_FILE_SIZE_MB,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn default_config_contains_expected_port() {
        let yaml = default_config_yaml();
        assert!(yaml.contains("port: 5001"));
        assert!(yaml.contains("uploads_dir: \"uploads\""));
    }

    #[test]
    fn default_config_validates() {
        let config: Config = serde_yaml::from_str(&default_config_yaml()).expect("parse");
        let validated = config.validate().expect("valid");
        assert_eq!(validated.server.workers, 4);
        assert_eq!(validated.storage.catalog_file, "catalog.json");
    }

    #[test]
    fn rejects_root_that_is_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").expect("write");

        assert!(matches!(ensure_config(&file), Err(BootstrapError::Io(_))));
    }
}
