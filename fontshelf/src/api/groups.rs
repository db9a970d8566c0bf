// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::fonts::NameQuery;
use super::{envelope, run_blocking};
use crate::app_state::AppState;
use crate::service::ServiceError;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fonts: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditGroupRequest {
    #[serde(default)]
    pub old_name: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub fonts: Option<Vec<String>>,
}

pub async fn list_groups(state: web::Data<AppState>) -> HttpResponse {
    let service = state.service.clone();
    match run_blocking("list_groups", move || Ok(service.list_groups())).await {
        Ok(groups) => envelope::success(StatusCode::OK, "Groups retrieved", groups),
        Err(err) => envelope::failure(&err),
    }
}

pub async fn create_group(
    state: web::Data<AppState>,
    request: web::Json<CreateGroupRequest>,
) -> HttpResponse {
    let CreateGroupRequest { name, fonts } = request.into_inner();
    let Some(fonts) = fonts else {
        return envelope::failure(&ServiceError::validation("A list of fonts is required"));
    };
    let name = name.unwrap_or_default();
    let service = state.service.clone();

    match run_blocking("create_group", move || service.create_group(&name, fonts)).await {
        Ok(group) => envelope::success(StatusCode::CREATED, "Group created successfully", group),
        Err(err) => envelope::failure(&err),
    }
}

pub async fn edit_group(
    state: web::Data<AppState>,
    request: web::Json<EditGroupRequest>,
) -> HttpResponse {
    let EditGroupRequest {
        old_name,
        new_name,
        fonts,
    } = request.into_inner();
    let old_name = old_name.unwrap_or_default();
    let service = state.service.clone();

    match run_blocking("edit_group", move || {
        service.edit_group(&old_name, new_name.as_deref(), fonts)
    })
    .await
    {
        Ok(group) => envelope::success(StatusCode::OK, "Group updated successfully", group),
        Err(err) => envelope::failure(&err),
    }
}

pub async fn delete_group(
    state: web::Data<AppState>,
    query: web::Query<NameQuery>,
) -> HttpResponse {
    let name = query.into_inner().name.unwrap_or_default();
    let service = state.service.clone();

    match run_blocking("delete_group", move || service.delete_group(&name)).await {
        Ok(()) => HttpResponse::Ok().json(envelope::ApiEnvelope::<()> {
            success: true,
            message: "Group deleted successfully".to_string(),
            data: None,
            error: None,
        }),
        Err(err) => envelope::failure(&err),
    }
}
