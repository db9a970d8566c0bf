// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::catalog::{CatalogRepository, FileCatalogStore, StoreError};
use crate::config::ValidatedConfig;
use crate::runtime_paths::RuntimePaths;
use crate::service::AssetService;
use crate::storage::AssetStore;

pub struct AppState {
    pub service: Arc<AssetService>,
    pub config: Arc<ValidatedConfig>,
}

impl AppState {
    pub fn new(service: Arc<AssetService>, config: Arc<ValidatedConfig>) -> Self {
        Self { service, config }
    }

    /// Wires the file-backed stores found under the runtime root.
    pub fn from_runtime(
        config: Arc<ValidatedConfig>,
        runtime_paths: &RuntimePaths,
    ) -> Result<Self, StoreError> {
        let assets = AssetStore::new(runtime_paths.uploads_dir.clone());
        let catalog_store = FileCatalogStore::new(runtime_paths.catalog_file.clone())?;
        let service = AssetService::new(assets, CatalogRepository::new(catalog_store));
        Ok(Self::new(Arc::new(service), config))
    }

    /// Request body limit for uploads, `None` when unlimited.
    pub fn upload_limit(&self) -> Option<usize> {
        self.config.upload.limit_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TestConfigBuilder;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn from_runtime_opens_stores_under_configured_paths() {
        let fixture = TestFixtureRoot::new_unique("app-state").expect("fixture root");
        let config = TestConfigBuilder::new()
            .with_uploads_dir("fonts")
            .with_catalog_file("state/catalog.json")
            .with_max_file_size_mb(2)
            .build();
        let runtime_paths = fixture.runtime_paths(&config).expect("runtime paths");

        let state = AppState::from_runtime(Arc::new(config), &runtime_paths).expect("app state");

        assert_eq!(state.service.assets().root(), runtime_paths.uploads_dir.as_path());
        assert!(runtime_paths.uploads_dir.ends_with("fonts"));
        assert_eq!(state.upload_limit(), Some(2 * 1024 * 1024));
        assert!(state.service.list_fonts().is_empty());
    }
}
