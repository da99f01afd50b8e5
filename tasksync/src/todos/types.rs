// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::store::{ListShareRow, ListSummaryRow, TodoRow, UserRefRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    #[default]
    Normal,
    High,
    Urgent,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            "critical" => Ok(Priority::Critical),
            other => Err(DomainError::validation(format!("Unknown priority: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserRefRow> for UserRef {
    fn from(row: UserRefRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

impl From<ListShareRow> for UserRef {
    fn from(row: ListShareRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub owner: UserRef,
    pub group: Option<GroupRef>,
    pub todo_items_count: i64,
    pub completed_count: i64,
    pub shared_with_count: i64,
    pub shared_with: Vec<UserRef>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sharees are loaded separately; see `ListSummary::with_shares`.
impl From<ListSummaryRow> for ListSummary {
    fn from(row: ListSummaryRow) -> Self {
        let group = match (row.group_id, row.group_name) {
            (Some(id), Some(name)) => Some(GroupRef { id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
            owner: UserRef {
                id: row.owner_id,
                name: row.owner_name,
                email: row.owner_email,
            },
            group,
            todo_items_count: row.todo_items_count,
            completed_count: row.completed_count,
            shared_with_count: row.shared_with_count,
            shared_with: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ListSummary {
    pub fn with_shares(mut self, shared_with: Vec<UserRef>) -> Self {
        self.shared_with = shared_with;
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListDetail {
    #[serde(flatten)]
    pub summary: ListSummary,
    pub todos: Vec<TodoItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub todo_list_id: String,
    pub task: String,
    pub description: String,
    pub is_completed: bool,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub priority: Priority,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<TodoRow> for TodoItem {
    fn from(row: TodoRow) -> Self {
        // Stored values are written through Priority, so a miss means a hand edit.
        let priority = row.priority.parse().unwrap_or_default();
        Self {
            id: row.id,
            todo_list_id: row.todo_list_id,
            task: row.task,
            description: row.description,
            is_completed: row.is_completed,
            start_date: row.start_date,
            end_date: row.end_date,
            priority,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateListRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Dates are unix milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub task: String,
    pub description: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(alias = "name")]
    pub task: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    /// Absent leaves the date unchanged; `null` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<i64>>,
    pub priority: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareListRequest {
    #[serde(default, alias = "id")]
    pub user_id: String,
}
