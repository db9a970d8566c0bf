// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::document::Catalog;
use super::store::{CatalogStore, StoreError};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub enum RepositoryError<E> {
    /// The mutation refused to apply; nothing was written.
    Rejected(E),
    /// The mutation applied in memory but could not be persisted.
    Store(StoreError),
}

impl<E: fmt::Display> fmt::Display for RepositoryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Rejected(err) => write!(f, "{}", err),
            RepositoryError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl<E: Error + 'static> Error for RepositoryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RepositoryError::Rejected(err) => Some(err),
            RepositoryError::Store(err) => Some(err),
        }
    }
}

/// Owns the persisted catalog and serializes every load/modify/store cycle
/// behind one lock.
pub struct CatalogRepository {
    store: Box<dyn CatalogStore>,
    lock: Mutex<()>,
    recovered_loads: AtomicU64,
}

impl CatalogRepository {
    pub fn new(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            lock: Mutex::new(()),
            recovered_loads: AtomicU64::new(0),
        }
    }

    /// Loads the catalog, applies `mutate`, and writes the result back, all
    /// inside the critical section. A rejected mutation writes nothing.
    pub fn with_catalog<T, E, F>(&self, mutate: F) -> Result<T, RepositoryError<E>>
    where
        F: FnOnce(&mut Catalog) -> Result<T, E>,
    {
        self.with_catalog_committed(mutate, |_| {})
    }

    /// Like [`with_catalog`](Self::with_catalog), but runs `on_committed`
    /// after the document is stored and before the lock is released.
    pub fn with_catalog_committed<T, E, F, G>(
        &self,
        mutate: F,
        on_committed: G,
    ) -> Result<T, RepositoryError<E>>
    where
        F: FnOnce(&mut Catalog) -> Result<T, E>,
        G: FnOnce(&T),
    {
        self.with_catalog_hooks(mutate, on_committed, |_| {})
    }

    /// Like [`with_catalog`](Self::with_catalog), but runs `on_unsaved` when
    /// the mutation applied and the store then failed, still under the lock.
    pub fn with_catalog_unsaved<T, E, F, H>(
        &self,
        mutate: F,
        on_unsaved: H,
    ) -> Result<T, RepositoryError<E>>
    where
        F: FnOnce(&mut Catalog) -> Result<T, E>,
        H: FnOnce(&T),
    {
        self.with_catalog_hooks(mutate, |_| {}, on_unsaved)
    }

    fn with_catalog_hooks<T, E, F, G, H>(
        &self,
        mutate: F,
        on_committed: G,
        on_unsaved: H,
    ) -> Result<T, RepositoryError<E>>
    where
        F: FnOnce(&mut Catalog) -> Result<T, E>,
        G: FnOnce(&T),
        H: FnOnce(&T),
    {
        let _guard = self.lock();
        let mut catalog = self.load_recovering();
        let outcome = mutate(&mut catalog).map_err(RepositoryError::Rejected)?;
        if let Err(err) = self.store.save(&catalog) {
            on_unsaved(&outcome);
            return Err(RepositoryError::Store(err));
        }
        on_committed(&outcome);
        Ok(outcome)
    }

    pub fn snapshot(&self) -> Catalog {
        let _guard = self.lock();
        self.load_recovering()
    }

    /// Number of loads that fell back to an empty catalog because the stored
    /// document was unreadable or malformed.
    pub fn recovered_loads(&self) -> u64 {
        self.recovered_loads.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Catalog lock poisoned by a panicked writer; recovering");
                poisoned.into_inner()
            }
        }
    }

    // A broken document is treated as empty so the service keeps answering;
    // the next successful write replaces it.
    fn load_recovering(&self) -> Catalog {
        match self.store.load() {
            Ok(Some(catalog)) => catalog,
            Ok(None) => {
                debug!("No catalog document yet; starting empty");
                Catalog::new()
            }
            Err(err) => {
                let count = self.recovered_loads.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    "Catalog document unusable, continuing with an empty catalog (recovery #{}): {}",
                    count, err
                );
                Catalog::new()
            }
        }
    }
}
