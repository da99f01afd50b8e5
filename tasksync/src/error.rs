// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fmt;

/// Classified failure surfaced by every domain operation.
///
/// The HTTP layer maps each variant onto a status code; raw storage errors
/// never cross this boundary unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Integrity(String),
    Storage(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        DomainError::Integrity(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Validation(_) => 400,
            DomainError::Unauthorized(_) => 401,
            DomainError::Forbidden(_) => 403,
            DomainError::NotFound(_) => 404,
            DomainError::Conflict(_) => 409,
            DomainError::Integrity(_) | DomainError::Storage(_) => 500,
        }
    }

    /// Message that is safe to show to clients.
    pub fn public_message(&self) -> &str {
        match self {
            DomainError::Integrity(_) | DomainError::Storage(_) => "Internal server error",
            DomainError::Validation(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Forbidden(msg)
            | DomainError::NotFound(msg)
            | DomainError::Conflict(msg) => msg,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Integrity(_) | DomainError::Storage(_))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            DomainError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Integrity(msg) => write!(f, "Integrity error: {}", msg),
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::Conflict("Record already exists".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DomainError::Validation("Referenced record does not exist".to_string())
            }
            _ => DomainError::Storage(err.to_string()),
        }
    }
}

impl From<crate::iam::PasswordError> for DomainError {
    fn from(err: crate::iam::PasswordError) -> Self {
        DomainError::Storage(format!("Password hashing failed: {}", err))
    }
}

impl From<crate::iam::jwt::JwtError> for DomainError {
    fn from(err: crate::iam::jwt::JwtError) -> Self {
        match err {
            crate::iam::jwt::JwtError::TokenVerificationError(_) => {
                DomainError::Unauthorized("Invalid/Expired Token".to_string())
            }
            other => DomainError::Storage(other.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for DomainError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        DomainError::Storage(format!("Blocking task failed: {}", err))
    }
}
