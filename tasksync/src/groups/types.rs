// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

use crate::store::{GroupMemberRow, GroupRow, GroupSummaryRow, ListRefRow, MappingRow};
use crate::todos::UserRef;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<GroupRow> for GroupView {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A group as listed for one of its members.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub owner: UserRef,
    pub role: Option<String>,
    pub members_count: i64,
    pub todo_lists_count: i64,
    pub created_at: i64,
}

impl From<GroupSummaryRow> for GroupSummary {
    fn from(row: GroupSummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            owner: UserRef {
                id: row.owner_id.clone(),
                name: row.owner_name,
                email: row.owner_email,
            },
            owner_id: row.owner_id,
            role: row.role_name,
            members_count: row.members_count,
            todo_lists_count: row.todo_lists_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupMember {
    pub mapping_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub role: Option<String>,
}

impl From<GroupMemberRow> for GroupMember {
    fn from(row: GroupMemberRow) -> Self {
        Self {
            mapping_id: row.mapping_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role_id: row.role_id,
            role: row.role_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupListRef {
    pub id: String,
    pub name: String,
}

impl From<ListRefRow> for GroupListRef {
    fn from(row: ListRefRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: GroupView,
    pub owner: Option<UserRef>,
    pub members: Vec<GroupMember>,
    pub todo_lists: Vec<GroupListRef>,
    pub members_count: usize,
    pub todo_lists_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MappingView {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub role_id: String,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MappingView {
    pub fn new(row: MappingRow, role: impl Into<String>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            group_id: row.group_id,
            role_id: row.role_id,
            role: role.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Invitation {
    pub mapping_id: String,
    pub invitee_id: String,
    pub group_id: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Role is a role name; Viewer when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InviteRequest {
    #[serde(default, alias = "id")]
    pub user_id: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleMappingRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub role_id: String,
}
