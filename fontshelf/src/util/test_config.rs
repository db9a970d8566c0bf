// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{LoggingConfig, ServerConfig, StorageConfig, UploadConfig, ValidatedConfig};

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                storage: StorageConfig::default(),
                upload: UploadConfig::default(),
                logging: LoggingConfig::default(),
            },
        }
    }

    pub fn with_uploads_dir(mut self, dir: &str) -> Self {
        self.config.storage.uploads_dir = dir.to_string();
        self
    }

    pub fn with_catalog_file(mut self, file: &str) -> Self {
        self.config.storage.catalog_file = file.to_string();
        self
    }

    pub fn with_max_file_size_mb(mut self, max_file_size_mb: u64) -> Self {
        self.config.upload.max_file_size_mb = max_file_size_mb;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}
