// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::config::ValidatedConfig;
use crate::runtime_paths::RuntimePaths;
use std::path::Path;

pub fn ensure_paths(root: &Path, config: &ValidatedConfig) -> Result<RuntimePaths, BootstrapError> {
    let uploads_dir = root.join(&config.storage.uploads_dir);
    let created_uploads = !uploads_dir.exists();

    let runtime_paths = RuntimePaths::from_root(root, config).map_err(BootstrapError::Config)?;

    if created_uploads {
        log_action(format!(
            "created uploads directory {}",
            runtime_paths.uploads_dir.display()
        ));
    }

    Ok(runtime_paths)
}
