// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod document;
pub mod repository;
pub mod store;

pub use document::{Catalog, CatalogError, Font, FontRemoval, Group, MIN_GROUP_FONTS};
pub use repository::{CatalogRepository, RepositoryError};
pub use store::{CatalogStore, FileCatalogStore, MemoryCatalogStore, StoreError};
