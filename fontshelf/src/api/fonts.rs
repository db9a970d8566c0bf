// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{envelope, run_blocking};
use crate::app_state::AppState;
use crate::catalog::FontRemoval;
use crate::service::ServiceError;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FontDeleted {
    name: String,
    removed_from_groups: Vec<String>,
    deleted_groups: Vec<String>,
}

pub async fn upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    mut payload: web::Payload,
) -> HttpResponse {
    let limit = state.upload_limit();

    if let Some(limit) = limit
        && let Some(declared) = declared_length(&req)
        && declared > limit
    {
        warn!("Upload rejected: declared length {} over limit {}", declared, limit);
        return envelope::payload_too_large(limit);
    }

    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                debug!("Upload body read failed: {}", err);
                return envelope::failure(&ServiceError::decode("Failed to read request body"));
            }
        };
        if let Some(limit) = limit
            && body.len() + chunk.len() > limit
        {
            warn!("Upload rejected: body over limit {}", limit);
            return envelope::payload_too_large(limit);
        }
        body.extend_from_slice(&chunk);
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = body.freeze();
    let service = state.service.clone();

    match run_blocking("upload", move || service.upload(content_type.as_deref(), &body)).await {
        Ok(font) => envelope::success(StatusCode::OK, "File uploaded successfully", font),
        Err(err) => envelope::failure(&err),
    }
}

pub async fn list_fonts(state: web::Data<AppState>) -> HttpResponse {
    let service = state.service.clone();
    match run_blocking("list_fonts", move || Ok(service.list_fonts())).await {
        Ok(fonts) if fonts.is_empty() => {
            envelope::success(StatusCode::OK, "No fonts found in the database.", fonts)
        }
        Ok(fonts) => envelope::success(StatusCode::OK, "Fonts retrieved", fonts),
        Err(err) => envelope::failure(&err),
    }
}

pub async fn delete_font(
    state: web::Data<AppState>,
    query: web::Query<NameQuery>,
) -> HttpResponse {
    let name = query.into_inner().name.unwrap_or_default();
    let service = state.service.clone();
    let deleted = name.clone();

    match run_blocking("delete_font", move || service.delete_font(&deleted)).await {
        Ok(removal) => envelope::success(
            StatusCode::OK,
            "Font deleted successfully",
            font_deleted(name, removal),
        ),
        Err(err) => envelope::failure(&err),
    }
}

fn font_deleted(name: String, removal: FontRemoval) -> FontDeleted {
    FontDeleted {
        name,
        removed_from_groups: removal.shrunk_groups,
        deleted_groups: removal.dropped_groups,
    }
}

fn declared_length(req: &HttpRequest) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<usize>().ok())
}
