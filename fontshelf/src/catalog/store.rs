// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::document::Catalog;
use crate::storage::write_file_atomic;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Io(String),
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "Catalog I/O error: {}", msg),
            StoreError::Parse(msg) => write!(f, "Catalog parse error: {}", msg),
        }
    }
}

impl Error for StoreError {}

/// Persistence for the whole catalog document.
pub trait CatalogStore: Send + Sync {
    /// Returns `Ok(None)` when no document has been written yet.
    fn load(&self) -> Result<Option<Catalog>, StoreError>;
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;
}

pub struct FileCatalogStore {
    catalog_file: PathBuf,
}

impl FileCatalogStore {
    pub fn new(catalog_file: PathBuf) -> Result<Self, StoreError> {
        if catalog_file.as_os_str().is_empty() {
            return Err(StoreError::Io("Catalog file path is empty".to_string()));
        }
        Ok(Self { catalog_file })
    }

    pub fn path(&self) -> &Path {
        &self.catalog_file
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self) -> Result<Option<Catalog>, StoreError> {
        if !self.catalog_file.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.catalog_file)
            .map_err(|e| StoreError::Io(format!("Failed to read catalog file: {}", e)))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Parse(format!("Failed to parse catalog file: {}", e)))
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let mut content = serde_json::to_vec_pretty(catalog)
            .map_err(|e| StoreError::Parse(format!("Failed to serialize catalog: {}", e)))?;
        content.push(b'\n');
        write_file_atomic(&self.catalog_file, "catalog", &content)
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}

/// In-memory store for tests; `None` until the first save.
#[derive(Default, Clone)]
pub struct MemoryCatalogStore {
    catalog: Arc<RwLock<Option<Catalog>>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Some(catalog))),
        }
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<Option<Catalog>, StoreError> {
        match self.catalog.read() {
            Ok(guard) => Ok(guard.clone()),
            Err(poisoned) => {
                log::error!("MemoryCatalogStore lock poisoned on read; recovering");
                Ok(poisoned.into_inner().clone())
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        match self.catalog.write() {
            Ok(mut guard) => {
                *guard = Some(catalog.clone());
                Ok(())
            }
            Err(poisoned) => {
                log::error!("MemoryCatalogStore lock poisoned on write; recovering");
                let mut guard = poisoned.into_inner();
                *guard = Some(catalog.clone());
                Ok(())
            }
        }
    }
}
