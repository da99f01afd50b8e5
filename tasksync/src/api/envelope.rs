// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, ResponseError, error, web};
use serde::Serialize;

use crate::error::DomainError;

/// Body shape shared by every response.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct ErrorData {
    pub error: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            status: status.as_u16(),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        HttpResponseBuilder::new(status).json(self)
    }
}

pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    Envelope::ok(StatusCode::OK, message, data).into_response()
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    Envelope::ok(StatusCode::CREATED, message, data).into_response()
}

fn failure(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponseBuilder::new(status).json(Envelope {
        success: false,
        message: message.to_string(),
        data: ErrorData {
            error: message.to_string(),
        },
        status: status.as_u16(),
    })
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(DomainError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            log::error!("{}", self);
        }
        failure(ResponseError::status_code(self), self.public_message())
    }
}

const INVALID_BODY: &str = "Invalid request body";

/// JSON extractor config rendering body errors as a 400 envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        log::debug!("Rejected request body: {}", err);
        error::InternalError::from_response(err, failure(StatusCode::BAD_REQUEST, INVALID_BODY))
            .into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        log::debug!("Rejected path parameters: {}", err);
        error::InternalError::from_response(err, failure(StatusCode::BAD_REQUEST, INVALID_BODY))
            .into()
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    failure(StatusCode::NOT_FOUND, "Route not found")
}
