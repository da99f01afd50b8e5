// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use sqlx::{query, query_as};

use super::rows::{GroupMemberRow, GroupRow, GroupSummaryRow, ListRefRow, MappingRow};
use super::{SqliteStore, new_id, now_millis};
use crate::error::DomainResult;

const GROUP_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";
const MAPPING_COLUMNS: &str = "id, user_id, group_id, role_id, created_at, updated_at";

/// Outcome of writing a role mapping for a (user, group) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingUpsert {
    Created(MappingRow),
    Replaced(MappingRow),
}

impl MappingUpsert {
    pub fn into_row(self) -> MappingRow {
        match self {
            MappingUpsert::Created(row) | MappingUpsert::Replaced(row) => row,
        }
    }
}

impl SqliteStore {
    /// Insert a group and the owner's mapping in one transaction.
    pub async fn create_group_with_owner(
        &self,
        group: &GroupRow,
        owner_role_id: &str,
    ) -> DomainResult<MappingRow> {
        let mut tx = self.begin().await?;

        query(
            "INSERT INTO todo_groups (id, name, description, owner_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(&group.owner_id)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&mut *tx)
        .await?;

        let mapping = MappingRow {
            id: new_id(),
            user_id: group.owner_id.clone(),
            group_id: group.id.clone(),
            role_id: owner_role_id.to_string(),
            created_at: group.created_at,
            updated_at: group.created_at,
        };
        query(
            "INSERT INTO group_role_mappings (id, user_id, group_id, role_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&mapping.id)
        .bind(&mapping.user_id)
        .bind(&mapping.group_id)
        .bind(&mapping.role_id)
        .bind(mapping.created_at)
        .bind(mapping.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(mapping)
    }

    pub async fn find_group(&self, group_id: &str) -> DomainResult<Option<GroupRow>> {
        let sql = format!(
            "SELECT {} FROM todo_groups WHERE id = ? AND deleted_at IS NULL",
            GROUP_COLUMNS
        );
        let row = query_as::<_, GroupRow>(&sql)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_mapping(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> DomainResult<Option<MappingRow>> {
        let sql = format!(
            "SELECT {} FROM group_role_mappings
             WHERE user_id = ? AND group_id = ? AND deleted_at IS NULL",
            MAPPING_COLUMNS
        );
        let row = query_as::<_, MappingRow>(&sql)
            .bind(user_id)
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Insert a mapping; a live mapping for the same pair is a conflict.
    pub async fn insert_mapping(
        &self,
        user_id: &str,
        group_id: &str,
        role_id: &str,
    ) -> DomainResult<MappingRow> {
        let now = now_millis();
        let mapping = MappingRow {
            id: new_id(),
            user_id: user_id.to_string(),
            group_id: group_id.to_string(),
            role_id: role_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        query(
            "INSERT INTO group_role_mappings (id, user_id, group_id, role_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&mapping.id)
        .bind(&mapping.user_id)
        .bind(&mapping.group_id)
        .bind(&mapping.role_id)
        .bind(mapping.created_at)
        .bind(mapping.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(mapping)
    }

    /// Point the live mapping for (user, group) at a role, creating it if absent.
    pub async fn upsert_mapping(
        &self,
        user_id: &str,
        group_id: &str,
        role_id: &str,
    ) -> DomainResult<MappingUpsert> {
        let mut tx = self.begin().await?;
        let now = now_millis();

        let sql = format!(
            "SELECT {} FROM group_role_mappings
             WHERE user_id = ? AND group_id = ? AND deleted_at IS NULL",
            MAPPING_COLUMNS
        );
        let existing = query_as::<_, MappingRow>(&sql)
            .bind(user_id)
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match existing {
            Some(mut mapping) => {
                query("UPDATE group_role_mappings SET role_id = ?, updated_at = ? WHERE id = ?")
                    .bind(role_id)
                    .bind(now)
                    .bind(&mapping.id)
                    .execute(&mut *tx)
                    .await?;
                mapping.role_id = role_id.to_string();
                mapping.updated_at = now;
                MappingUpsert::Replaced(mapping)
            }
            None => {
                let mapping = MappingRow {
                    id: new_id(),
                    user_id: user_id.to_string(),
                    group_id: group_id.to_string(),
                    role_id: role_id.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                query(
                    "INSERT INTO group_role_mappings (id, user_id, group_id, role_id, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&mapping.id)
                .bind(&mapping.user_id)
                .bind(&mapping.group_id)
                .bind(&mapping.role_id)
                .bind(mapping.created_at)
                .bind(mapping.updated_at)
                .execute(&mut *tx)
                .await?;
                MappingUpsert::Created(mapping)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Groups the user holds a live mapping in, newest first.
    pub async fn groups_for_member(&self, user_id: &str) -> DomainResult<Vec<GroupSummaryRow>> {
        let rows = query_as::<_, GroupSummaryRow>(
            "SELECT g.id, g.name, g.description, g.owner_id,
                    o.name AS owner_name, o.email AS owner_email, g.created_at,
                    r.name AS role_name,
                    (SELECT COUNT(*) FROM group_role_mappings m2
                      WHERE m2.group_id = g.id AND m2.deleted_at IS NULL) AS members_count,
                    (SELECT COUNT(*) FROM todo_lists l
                      WHERE l.group_id = g.id AND l.deleted_at IS NULL) AS todo_lists_count
             FROM group_role_mappings m
             JOIN todo_groups g ON g.id = m.group_id AND g.deleted_at IS NULL
             JOIN users o ON o.id = g.owner_id
             LEFT JOIN roles r ON r.id = m.role_id AND r.deleted_at IS NULL
             WHERE m.user_id = ? AND m.deleted_at IS NULL
             ORDER BY g.created_at DESC, g.rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn group_members(&self, group_id: &str) -> DomainResult<Vec<GroupMemberRow>> {
        let rows = query_as::<_, GroupMemberRow>(
            "SELECT m.id AS mapping_id, u.id AS user_id, u.name, u.email, m.role_id,
                    r.name AS role_name
             FROM group_role_mappings m
             JOIN users u ON u.id = m.user_id AND u.deleted_at IS NULL
             LEFT JOIN roles r ON r.id = m.role_id AND r.deleted_at IS NULL
             WHERE m.group_id = ? AND m.deleted_at IS NULL
             ORDER BY m.created_at, m.rowid",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn group_lists(&self, group_id: &str) -> DomainResult<Vec<ListRefRow>> {
        let rows = query_as::<_, ListRefRow>(
            "SELECT id, name FROM todo_lists
             WHERE group_id = ? AND deleted_at IS NULL
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_group(
        &self,
        group_id: &str,
        name: &str,
        description: &str,
    ) -> DomainResult<()> {
        query(
            "UPDATE todo_groups SET name = ?, description = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(name)
        .bind(description)
        .bind(now_millis())
        .bind(group_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Tombstone a group and its mappings and detach its lists.
    pub async fn delete_group(&self, group_id: &str) -> DomainResult<()> {
        let mut tx = self.begin().await?;
        let now = now_millis();

        query(
            "UPDATE group_role_mappings SET deleted_at = ?, updated_at = ?
             WHERE group_id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        // Detached lists start out private to their owners.
        query(
            "DELETE FROM list_shares
             WHERE list_id IN (SELECT id FROM todo_lists WHERE group_id = ?)",
        )
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        query(
            "UPDATE todo_lists SET group_id = NULL, updated_at = ?
             WHERE group_id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        query(
            "UPDATE todo_groups SET deleted_at = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
