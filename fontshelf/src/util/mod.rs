// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod test_config;
pub mod test_fixtures;
pub mod upload_temp;

pub use test_config::TestConfigBuilder;
pub use upload_temp::{
    TEMP_UPLOAD_PREFIX, TEMP_UPLOAD_SUFFIX, is_temp_upload_name, temp_upload_name,
};
