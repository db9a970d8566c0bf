// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Minimal `multipart/form-data` decoding for single-file uploads.
//!
//! Only the first part that carries a non-empty `filename="..."` marker is
//! extracted; any further file parts in the same body are ignored.

use std::error::Error;
use std::fmt;

pub const FONT_EXTENSION: &str = ".ttf";

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const FILENAME_MARKER: &str = "filename=\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipartError {
    NoBoundary,
    NoFileData,
}

impl fmt::Display for MultipartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultipartError::NoBoundary => write!(f, "no boundary"),
            MultipartError::NoFileData => write!(f, "no file data"),
        }
    }
}

impl Error for MultipartError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Pulls the boundary token out of a `Content-Type` header value.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.find("boundary=")? + "boundary=".len();
    let raw = content_type[start..].split(';').next()?.trim();
    let token = raw
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .unwrap_or(raw);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Decodes the first file part of `body`.
pub fn extract_file_part(body: &[u8], boundary: &str) -> Result<FilePart, MultipartError> {
    if boundary.is_empty() {
        return Err(MultipartError::NoBoundary);
    }
    let dash_boundary = format!("--{}", boundary).into_bytes();
    let part_delimiter = format!("\r\n--{}", boundary).into_bytes();

    let Some(first) = find(body, &dash_boundary) else {
        return Err(MultipartError::NoFileData);
    };
    let mut cursor = first + dash_boundary.len();

    loop {
        let rest = &body[cursor..];
        // "--" right after a delimiter closes the body.
        if rest.starts_with(b"--") {
            break;
        }
        let (part, next) = match find(rest, &part_delimiter) {
            Some(end) => (&rest[..end], Some(cursor + end + part_delimiter.len())),
            None => (rest, None),
        };
        if let Some(file_part) = parse_part(part) {
            return Ok(file_part);
        }
        match next {
            Some(next) => cursor = next,
            None => break,
        }
    }

    Err(MultipartError::NoFileData)
}

pub fn is_accepted_font_name(filename: &str) -> bool {
    filename.ends_with(FONT_EXTENSION)
}

fn parse_part(part: &[u8]) -> Option<FilePart> {
    let header_end = find(part, HEADER_TERMINATOR)?;
    let headers = String::from_utf8_lossy(&part[..header_end]);
    let filename = filename_from_headers(&headers)?;
    Some(FilePart {
        filename,
        content: part[header_end + HEADER_TERMINATOR.len()..].to_vec(),
    })
}

fn filename_from_headers(headers: &str) -> Option<String> {
    let start = headers.find(FILENAME_MARKER)? + FILENAME_MARKER.len();
    let len = headers[start..].find('"')?;
    let filename = &headers[start..start + len];
    if filename.is_empty() {
        None
    } else {
        Some(filename.to_string())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
