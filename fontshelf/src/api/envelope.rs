// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! JSON response envelope shared by every endpoint.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::service::{ErrorKind, ServiceError};

#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::DecodeFailure | ErrorKind::ValidationFailure => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiEnvelope {
        success: true,
        message: message.to_string(),
        data: Some(data),
        error: None,
    })
}

pub fn failure(err: &ServiceError) -> HttpResponse {
    failure_with_status(status_for(err.kind()), err)
}

pub fn failure_with_status(status: StatusCode, err: &ServiceError) -> HttpResponse {
    HttpResponse::build(status).json(ApiEnvelope::<()> {
        success: false,
        message: err.message().to_string(),
        data: None,
        error: Some(ErrorBody {
            kind: err.kind().as_str(),
            details: err.details().to_vec(),
        }),
    })
}

pub fn payload_too_large(limit: usize) -> HttpResponse {
    let err = ServiceError::validation(format!(
        "Upload exceeds the maximum size of {} bytes",
        limit
    ));
    failure_with_status(StatusCode::PAYLOAD_TOO_LARGE, &err)
}
