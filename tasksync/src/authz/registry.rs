// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::Serialize;

use super::catalog::{Permission, RoleName};
use crate::error::{DomainError, DomainResult};
use crate::store::{CatalogSeed, RoleRow, SqliteStore};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoleView {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

/// Read and seed access to the fixed role/permission catalog.
#[derive(Clone)]
pub struct RoleRegistry {
    store: SqliteStore,
}

impl RoleRegistry {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// Bring the catalog to its configured state. Safe to run on every start.
    pub async fn seed(&self) -> DomainResult<()> {
        let permissions: Vec<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        let roles: Vec<(&str, Vec<&str>)> = RoleName::ALL
            .iter()
            .map(|role| {
                (
                    role.as_str(),
                    role.permissions().iter().map(|p| p.as_str()).collect(),
                )
            })
            .collect();

        self.store
            .seed_catalog(&CatalogSeed {
                permissions: &permissions,
                roles: &roles,
            })
            .await?;

        log::info!(
            "Seeded {} permissions and {} roles",
            permissions.len(),
            roles.len()
        );
        Ok(())
    }

    pub async fn list_roles(&self) -> DomainResult<Vec<RoleView>> {
        let rows = self.store.role_catalog().await?;
        let mut roles: Vec<RoleView> = Vec::new();
        for row in rows {
            let needs_new = roles.last().is_none_or(|last| last.id != row.role_id);
            if needs_new {
                roles.push(RoleView {
                    id: row.role_id.clone(),
                    name: row.role_name.clone(),
                    permissions: Vec::new(),
                });
            }
            if let (Some(role), Some(permission)) = (roles.last_mut(), row.permission_name) {
                role.permissions.push(permission);
            }
        }
        Ok(roles)
    }

    pub async fn get_role(&self, role_id: &str) -> DomainResult<RoleView> {
        let role = self
            .store
            .find_role_by_id(role_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Role not found"))?;
        let permissions = self.store.role_permission_names(&role.id).await?;
        Ok(RoleView {
            id: role.id,
            name: role.name,
            permissions,
        })
    }

    pub async fn find_role(&self, role_id: &str) -> DomainResult<Option<RoleRow>> {
        self.store.find_role_by_id(role_id).await
    }

    /// Resolve one of the seeded roles. Absence means the catalog was never seeded.
    pub async fn seeded_role(&self, name: RoleName) -> DomainResult<RoleRow> {
        self.store
            .find_role_by_name(name.as_str())
            .await?
            .ok_or_else(|| {
                DomainError::integrity(format!("Seeded role '{}' is missing", name.as_str()))
            })
    }
}
