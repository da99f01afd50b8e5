// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use sqlx::{query, query_as};

use super::rows::{ListRow, UserRow};
use super::{SqliteStore, now_millis};
use crate::error::DomainResult;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, profile_picture, created_at, updated_at";

impl SqliteStore {
    pub async fn find_user_by_id(&self, user_id: &str) -> DomainResult<Option<UserRow>> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let row = query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<UserRow>> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = ? AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let row = query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn user_exists(&self, user_id: &str) -> DomainResult<bool> {
        let row: Option<(i64,)> =
            query_as("SELECT 1 FROM users WHERE id = ? AND deleted_at IS NULL")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Insert a user together with their first list.
    pub async fn register_user(&self, user: &UserRow, default_list: &ListRow) -> DomainResult<()> {
        let mut tx = self.begin().await?;

        query(
            "INSERT INTO users (id, name, email, password_hash, profile_picture, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_picture)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        query(
            "INSERT INTO todo_lists (id, name, description, color, owner_id, group_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, NULL, ?, ?)",
        )
        .bind(&default_list.id)
        .bind(&default_list.name)
        .bind(&default_list.description)
        .bind(&default_list.color)
        .bind(&default_list.owner_id)
        .bind(default_list.created_at)
        .bind(default_list.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn update_user_profile(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
    ) -> DomainResult<()> {
        query(
            "UPDATE users SET name = ?, email = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(name)
        .bind(email)
        .bind(now_millis())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_user_password(&self, user_id: &str, password_hash: &str) -> DomainResult<()> {
        query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(password_hash)
        .bind(now_millis())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_user_picture(&self, user_id: &str, picture: &str) -> DomainResult<()> {
        query(
            "UPDATE users SET profile_picture = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(picture)
        .bind(now_millis())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
