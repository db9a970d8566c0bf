// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, error, web};
use log::{debug, error};

use crate::service::ServiceError;

mod assets;
mod envelope;
mod fonts;
mod groups;

pub use envelope::{ApiEnvelope, ErrorBody, status_for};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/upload", web::post().to(fonts::upload))
        .route("/fonts", web::get().to(fonts::list_fonts))
        .route("/delete-font", web::delete().to(fonts::delete_font))
        .route("/create-group", web::post().to(groups::create_group))
        .route("/edit-group", web::put().to(groups::edit_group))
        .route("/delete-group", web::delete().to(groups::delete_group))
        .route("/groups", web::get().to(groups::list_groups))
        .route("/uploads/{name}", web::get().to(assets::serve_font));
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!(
        "No route for {} {} from {}",
        req.method(),
        req.path(),
        req.connection_info().realip_remote_addr().unwrap_or("unknown")
    );
    envelope::failure(&ServiceError::not_found("Not Found"))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected JSON body: {}", err);
        let response =
            envelope::failure(&ServiceError::decode(format!("Invalid JSON body: {}", err)));
        error::InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        debug!("Rejected query string: {}", err);
        let response =
            envelope::failure(&ServiceError::decode(format!("Invalid query string: {}", err)));
        error::InternalError::from_response(err, response).into()
    })
}

/// Runs catalog and asset work off the async workers.
async fn run_blocking<F, R>(context: &'static str, task: F) -> Result<R, ServiceError>
where
    F: FnOnce() -> Result<R, ServiceError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|err| {
        error!("Blocking task {} failed: {}", context, err);
        ServiceError::storage("Internal storage error")
    })?
}
