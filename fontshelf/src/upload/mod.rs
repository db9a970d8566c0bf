// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod multipart;

pub use multipart::{
    FONT_EXTENSION, FilePart, MultipartError, boundary_from_content_type, extract_file_part,
    is_accepted_font_name,
};
