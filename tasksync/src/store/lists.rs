// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use sqlx::{query, query_as};

use super::rows::{ListRow, ListShareRow, ListSummaryRow, TodoRow, UserRefRow};
use super::{SqliteStore, now_millis};
use crate::error::{DomainError, DomainResult};

const LIST_COLUMNS: &str =
    "id, name, description, color, owner_id, group_id, created_at, updated_at";
const TODO_COLUMNS: &str = "id, todo_list_id, task, description, is_completed, start_date, \
     end_date, priority, created_at, updated_at";

const LIST_SUMMARY_SELECT: &str = "SELECT l.id, l.name, l.description, l.color,
        l.owner_id, u.name AS owner_name, u.email AS owner_email,
        l.group_id, g.name AS group_name, l.created_at, l.updated_at,
        (SELECT COUNT(*) FROM todos t
          WHERE t.todo_list_id = l.id AND t.deleted_at IS NULL) AS todo_items_count,
        (SELECT COUNT(*) FROM todos t
          WHERE t.todo_list_id = l.id AND t.deleted_at IS NULL AND t.is_completed = 1) AS completed_count,
        (SELECT COUNT(*) FROM list_shares s
          JOIN users su ON su.id = s.user_id AND su.deleted_at IS NULL
          WHERE s.list_id = l.id) AS shared_with_count
     FROM todo_lists l
     JOIN users u ON u.id = l.owner_id
     LEFT JOIN todo_groups g ON g.id = l.group_id AND g.deleted_at IS NULL";

impl SqliteStore {
    /// Insert a list. When the list names a group, the group must exist in
    /// the same transaction or nothing is written.
    pub async fn create_list(&self, list: &ListRow) -> DomainResult<()> {
        let mut tx = self.begin().await?;

        if let Some(group_id) = &list.group_id {
            let group: Option<(i64,)> =
                query_as("SELECT 1 FROM todo_groups WHERE id = ? AND deleted_at IS NULL")
                    .bind(group_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if group.is_none() {
                tx.rollback().await?;
                return Err(DomainError::validation("invalid group id"));
            }
        }

        query(
            "INSERT INTO todo_lists (id, name, description, color, owner_id, group_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&list.id)
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.color)
        .bind(&list.owner_id)
        .bind(&list.group_id)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_list(&self, list_id: &str) -> DomainResult<Option<ListRow>> {
        let sql = format!(
            "SELECT {} FROM todo_lists WHERE id = ? AND deleted_at IS NULL",
            LIST_COLUMNS
        );
        let row = query_as::<_, ListRow>(&sql)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_summary(&self, list_id: &str) -> DomainResult<Option<ListSummaryRow>> {
        let sql = format!("{} WHERE l.id = ? AND l.deleted_at IS NULL", LIST_SUMMARY_SELECT);
        let row = query_as::<_, ListSummaryRow>(&sql)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Lists owned by the user, newest first.
    pub async fn lists_owned_by(&self, owner_id: &str) -> DomainResult<Vec<ListSummaryRow>> {
        let sql = format!(
            "{} WHERE l.owner_id = ? AND l.deleted_at IS NULL
             ORDER BY l.created_at DESC, l.rowid DESC",
            LIST_SUMMARY_SELECT
        );
        let rows = query_as::<_, ListSummaryRow>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn update_list(
        &self,
        list_id: &str,
        name: &str,
        description: &str,
        color: &str,
    ) -> DomainResult<()> {
        query(
            "UPDATE todo_lists SET name = ?, description = ?, color = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(now_millis())
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Tombstone a list and every item in it.
    pub async fn delete_list(&self, list_id: &str) -> DomainResult<()> {
        let mut tx = self.begin().await?;
        let now = now_millis();

        query(
            "UPDATE todos SET deleted_at = ?, updated_at = ?
             WHERE todo_list_id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        query(
            "UPDATE todo_lists SET deleted_at = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn is_list_shared_with(&self, list_id: &str, user_id: &str) -> DomainResult<bool> {
        let row: Option<(i64,)> =
            query_as("SELECT 1 FROM list_shares WHERE list_id = ? AND user_id = ?")
                .bind(list_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    pub async fn list_shared_with(&self, list_id: &str) -> DomainResult<Vec<UserRefRow>> {
        let rows = query_as::<_, UserRefRow>(
            "SELECT u.id, u.name, u.email FROM list_shares s
             JOIN users u ON u.id = s.user_id AND u.deleted_at IS NULL
             WHERE s.list_id = ?
             ORDER BY s.created_at, u.email",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Sharees of every live list the user owns.
    pub async fn shares_of_lists_owned_by(&self, owner_id: &str) -> DomainResult<Vec<ListShareRow>> {
        let rows = query_as::<_, ListShareRow>(
            "SELECT s.list_id, u.id, u.name, u.email FROM list_shares s
             JOIN todo_lists l ON l.id = s.list_id AND l.deleted_at IS NULL
             JOIN users u ON u.id = s.user_id AND u.deleted_at IS NULL
             WHERE l.owner_id = ?
             ORDER BY s.created_at, u.email",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn share_list(&self, list_id: &str, user_id: &str) -> DomainResult<()> {
        query(
            "INSERT INTO list_shares (list_id, user_id, created_at) VALUES (?, ?, ?)
             ON CONFLICT (list_id, user_id) DO NOTHING",
        )
        .bind(list_id)
        .bind(user_id)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns whether a share was removed.
    pub async fn unshare_list(&self, list_id: &str, user_id: &str) -> DomainResult<bool> {
        let result = query("DELETE FROM list_shares WHERE list_id = ? AND user_id = ?")
            .bind(list_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_todo(&self, todo: &TodoRow) -> DomainResult<()> {
        query(
            "INSERT INTO todos (id, todo_list_id, task, description, is_completed, start_date,
                                end_date, priority, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&todo.id)
        .bind(&todo.todo_list_id)
        .bind(&todo.task)
        .bind(&todo.description)
        .bind(todo.is_completed)
        .bind(todo.start_date)
        .bind(todo.end_date)
        .bind(&todo.priority)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Items of a list in creation order.
    pub async fn todos_in_list(&self, list_id: &str) -> DomainResult<Vec<TodoRow>> {
        let sql = format!(
            "SELECT {} FROM todos WHERE todo_list_id = ? AND deleted_at IS NULL
             ORDER BY created_at, rowid",
            TODO_COLUMNS
        );
        let rows = query_as::<_, TodoRow>(&sql)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Look an item up by its id scoped to its list.
    pub async fn find_todo(&self, list_id: &str, todo_id: &str) -> DomainResult<Option<TodoRow>> {
        let sql = format!(
            "SELECT {} FROM todos WHERE id = ? AND todo_list_id = ? AND deleted_at IS NULL",
            TODO_COLUMNS
        );
        let row = query_as::<_, TodoRow>(&sql)
            .bind(todo_id)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update_todo(&self, todo: &TodoRow) -> DomainResult<()> {
        query(
            "UPDATE todos SET task = ?, description = ?, is_completed = ?, start_date = ?,
                              end_date = ?, priority = ?, updated_at = ?
             WHERE id = ? AND todo_list_id = ? AND deleted_at IS NULL",
        )
        .bind(&todo.task)
        .bind(&todo.description)
        .bind(todo.is_completed)
        .bind(todo.start_date)
        .bind(todo.end_date)
        .bind(&todo.priority)
        .bind(todo.updated_at)
        .bind(&todo.id)
        .bind(&todo.todo_list_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_todo(&self, list_id: &str, todo_id: &str) -> DomainResult<()> {
        let now = now_millis();
        query(
            "UPDATE todos SET deleted_at = ?, updated_at = ?
             WHERE id = ? AND todo_list_id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(todo_id)
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
