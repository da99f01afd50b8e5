// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use sqlx::{Sqlite, Transaction, query, query_as};

use super::rows::{RolePermissionRow, RoleRow};
use super::{SqliteStore, new_id, now_millis};
use crate::error::DomainResult;

/// Desired catalog state: permission names plus each role's permission names.
pub struct CatalogSeed<'a> {
    pub permissions: &'a [&'a str],
    pub roles: &'a [(&'a str, Vec<&'a str>)],
}

impl SqliteStore {
    /// Upsert permissions and roles by name and replace each role's permission set.
    pub async fn seed_catalog(&self, seed: &CatalogSeed<'_>) -> DomainResult<()> {
        let mut tx = self.begin().await?;

        for name in seed.permissions {
            upsert_named(&mut tx, "permissions", name).await?;
        }

        for (role_name, permission_names) in seed.roles {
            let role_id = upsert_named(&mut tx, "roles", role_name).await?;

            query("DELETE FROM role_permissions WHERE role_id = ?")
                .bind(&role_id)
                .execute(&mut *tx)
                .await?;

            for permission_name in permission_names {
                query(
                    "INSERT INTO role_permissions (role_id, permission_id)
                     SELECT ?, id FROM permissions WHERE name = ? AND deleted_at IS NULL",
                )
                .bind(&role_id)
                .bind(permission_name)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_role_by_id(&self, role_id: &str) -> DomainResult<Option<RoleRow>> {
        let row = query_as::<_, RoleRow>(
            "SELECT id, name FROM roles WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_role_by_name(&self, name: &str) -> DomainResult<Option<RoleRow>> {
        let row = query_as::<_, RoleRow>(
            "SELECT id, name FROM roles WHERE name = ? AND deleted_at IS NULL",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn role_permission_names(&self, role_id: &str) -> DomainResult<Vec<String>> {
        let rows: Vec<(String,)> = query_as(
            "SELECT p.name FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id AND p.deleted_at IS NULL
             WHERE rp.role_id = ?
             ORDER BY p.name",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Every role with its permissions, one row per pair.
    pub async fn role_catalog(&self) -> DomainResult<Vec<RolePermissionRow>> {
        let rows = query_as::<_, RolePermissionRow>(
            "SELECT r.id AS role_id, r.name AS role_name, p.name AS permission_name
             FROM roles r
             LEFT JOIN role_permissions rp ON rp.role_id = r.id
             LEFT JOIN permissions p ON p.id = rp.permission_id AND p.deleted_at IS NULL
             WHERE r.deleted_at IS NULL
             ORDER BY r.created_at, r.rowid, p.name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_catalog(&self) -> DomainResult<(i64, i64, i64)> {
        let (permissions,): (i64,) =
            query_as("SELECT COUNT(*) FROM permissions WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let (roles,): (i64,) = query_as("SELECT COUNT(*) FROM roles WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        let (links,): (i64,) = query_as("SELECT COUNT(*) FROM role_permissions")
            .fetch_one(&self.pool)
            .await?;
        Ok((permissions, roles, links))
    }
}

async fn upsert_named(
    tx: &mut Transaction<'static, Sqlite>,
    table: &str,
    name: &str,
) -> DomainResult<String> {
    let select = format!(
        "SELECT id FROM {} WHERE name = ? AND deleted_at IS NULL",
        table
    );
    let existing: Option<(String,)> = query_as(&select)
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = new_id();
    let now = now_millis();
    let insert = format!(
        "INSERT INTO {} (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        table
    );
    query(&insert)
        .bind(&id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(id)
}
