// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{Config, ConfigError, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;
use std::error::Error;
use std::fmt;
use std::path::Path;

pub mod config;
pub mod paths;

#[derive(Debug)]
pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub created_config: bool,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Io(std::io::Error),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::Io(err) => write!(f, "Bootstrap I/O error: {}", err),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Io(err)
    }
}

pub fn bootstrap_runtime(root: &Path) -> Result<BootstrapResult, BootstrapError> {
    let root_path = config::normalize_root(root)?;

    let created_config = config::ensure_config(&root_path)?;

    let validated_config = Config::load_and_validate(&root_path).map_err(BootstrapError::Config)?;

    let runtime_paths = paths::ensure_paths(&root_path, &validated_config)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        created_config,
    })
}

pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use std::fs;

    #[test]
    fn bootstrap_creates_defaults_when_missing() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-default").unwrap();
        let result = bootstrap_runtime(fixture.path()).expect("bootstrap should succeed");

        assert!(result.created_config);
        assert_eq!(result.validated_config.server.port, 5001);
        assert_eq!(result.validated_config.upload.max_file_size_mb, 20);
        assert!(fixture.path().join("config.yaml").is_file());
        assert!(result.runtime_paths.uploads_dir.is_dir());
        assert!(!result.runtime_paths.catalog_file.exists());
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-idempotent").unwrap();
        let first = bootstrap_runtime(fixture.path()).expect("bootstrap should succeed");
        assert!(first.created_config);

        let config_path = fixture.path().join("config.yaml");
        let config_before = fs::read_to_string(&config_path).unwrap();

        let second = bootstrap_runtime(fixture.path()).expect("bootstrap should succeed");
        assert!(!second.created_config);
        assert_eq!(config_before, fs::read_to_string(&config_path).unwrap());
        assert_eq!(first.runtime_paths.uploads_dir, second.runtime_paths.uploads_dir);
    }

    #[test]
    fn bootstrap_keeps_existing_config() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-existing").unwrap();
        fs::write(
            fixture.path().join("config.yaml"),
            "server:\n  port: 8080\nstorage:\n  uploads_dir: fonts\n",
        )
        .unwrap();

        let result = bootstrap_runtime(fixture.path()).expect("bootstrap should succeed");

        assert!(!result.created_config);
        assert_eq!(result.validated_config.server.port, 8080);
        assert!(fixture.path().join("fonts").is_dir());
    }

    #[test]
    fn bootstrap_reports_invalid_config() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-invalid").unwrap();
        fs::write(fixture.path().join("config.yaml"), "server:\n  workers: 0\n").unwrap();

        let err = bootstrap_runtime(fixture.path()).expect_err("invalid config");
        assert!(matches!(
            err,
            BootstrapError::Config(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn bootstrap_creates_missing_root() {
        let fixture = TestFixtureRoot::new_unique("bootstrap-root").unwrap();
        let root = fixture.path().join("nested").join("runtime");

        let result = bootstrap_runtime(&root).expect("bootstrap should succeed");

        assert!(result.created_config);
        assert!(root.join("config.yaml").is_file());
    }
}
