// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Naming rules for the temporary files that back in-flight uploads.

use uuid::Uuid;

pub const TEMP_UPLOAD_PREFIX: &str = ".fontshelf-upload-";
pub const TEMP_UPLOAD_SUFFIX: &str = ".upload";

/// Builds a fresh temp name for an upload of `target`.
pub fn temp_upload_name(target: &str) -> String {
    let stem: String = target
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(32)
        .collect();
    format!(
        "{}{}-{}{}",
        TEMP_UPLOAD_PREFIX,
        stem,
        Uuid::new_v4().simple(),
        TEMP_UPLOAD_SUFFIX
    )
}

pub fn is_temp_upload_name(name: &str) -> bool {
    name.starts_with(TEMP_UPLOAD_PREFIX) || name.ends_with(TEMP_UPLOAD_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_recognized() {
        let name = temp_upload_name("Roboto.ttf");
        assert!(name.starts_with(".fontshelf-upload-Robotottf-"));
        assert!(is_temp_upload_name(&name));
    }

    #[test]
    fn generated_names_are_unique() {
        assert_ne!(temp_upload_name("a.ttf"), temp_upload_name("a.ttf"));
    }

    #[test]
    fn regular_font_names_are_not_temp_names() {
        assert!(!is_temp_upload_name("Roboto.ttf"));
        assert!(is_temp_upload_name("Roboto.ttf.upload"));
    }
}
