// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::body::SizedStream;
use actix_web::{HttpResponse, web};
use log::debug;
use tokio_util::io::ReaderStream;

use super::{envelope, run_blocking};
use crate::app_state::AppState;

const FONT_CONTENT_TYPE: &str = "font/ttf";

/// Streams a stored font. Names that fail validation look exactly like
/// missing files.
pub async fn serve_font(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let name = path.into_inner();
    let service = state.service.clone();
    let lookup = name.clone();

    let (file, len) = match run_blocking("serve_font", move || service.open_asset(&lookup)).await {
        Ok(opened) => opened,
        Err(err) => {
            debug!("Font {:?} not served: {}", name, err);
            return envelope::failure(&err);
        }
    };

    let stream = ReaderStream::new(tokio::fs::File::from_std(file));
    let body = SizedStream::new(len, stream);

    HttpResponse::Ok()
        .content_type(FONT_CONTENT_TYPE)
        .insert_header(("Content-Length", len.to_string()))
        .body(body)
}
