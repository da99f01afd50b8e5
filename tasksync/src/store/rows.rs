// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Minimal user projection embedded in list and group responses.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct UserRefRow {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A sharee of one list, for loading the shares of many lists at once.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ListShareRow {
    pub list_id: String,
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    pub id: String,
    pub name: String,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionRow {
    pub role_id: String,
    pub role_name: String,
    pub permission_name: Option<String>,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub role_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A group as seen by one of its members.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GroupSummaryRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_email: String,
    pub created_at: i64,
    pub role_name: Option<String>,
    pub members_count: i64,
    pub todo_lists_count: i64,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct GroupMemberRow {
    pub mapping_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub role_name: Option<String>,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub owner_id: String,
    pub group_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// List joined with its owner, its group and counts derived at read time.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ListSummaryRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_email: String,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub todo_items_count: i64,
    pub completed_count: i64,
    pub shared_with_count: i64,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ListRefRow {
    pub id: String,
    pub name: String,
}

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    pub id: String,
    pub todo_list_id: String,
    pub task: String,
    pub description: String,
    pub is_completed: bool,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub priority: String,
    pub created_at: i64,
    pub updated_at: i64,
}
