// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};

use super::envelope::ok;
use crate::authz::RoleRegistry;
use crate::error::DomainError;

pub async fn list_roles(registry: web::Data<RoleRegistry>) -> Result<HttpResponse, DomainError> {
    let roles = registry.list_roles().await?;
    Ok(ok("Roles retrieved successfully", roles))
}

pub async fn get_role(
    registry: web::Data<RoleRegistry>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let role = registry.get_role(&path).await?;
    Ok(ok("Role details retrieved successfully", role))
}
