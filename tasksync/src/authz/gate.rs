// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Request-level access decisions.
//!
//! Group operations are decided by the permissions of the caller's role in
//! the group. Lists and items are decided by ownership, sharing, or group
//! membership depending on whether the list belongs to a group.
//!
//! A caller with no relationship to a resource is told it does not exist;
//! a caller who can see it but lacks the capability is told it is forbidden.

use super::authority::GroupAuthority;
use super::catalog::Permission;
use crate::error::{DomainError, DomainResult};
use crate::store::{ListRow, SqliteStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    DenyUnauthenticated,
    DenyForbidden,
    DenyNotFound,
}

impl Access {
    /// Convert a decision into the error the caller should see.
    pub fn require(self, resource: &str) -> DomainResult<()> {
        match self {
            Access::Allow => Ok(()),
            Access::DenyUnauthenticated => {
                Err(DomainError::Unauthorized("Missing authorization header".to_string()))
            }
            Access::DenyForbidden => Err(DomainError::forbidden(format!(
                "You do not have permission to perform this action on this {}",
                resource.to_lowercase()
            ))),
            Access::DenyNotFound => Err(DomainError::not_found(format!("{} not found", resource))),
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Access::Allow
    }
}

/// Caller identity check shared by every protected operation.
pub fn authenticated<T>(identity: Option<T>) -> Result<T, Access> {
    identity.ok_or(Access::DenyUnauthenticated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    View,
    Edit,
    Delete,
    Invite,
    ChangeRole,
}

impl GroupAction {
    /// Any one of these permissions allows the action. The catalog has no
    /// dedicated group-delete permission; deleting a group needs `delete_list`.
    pub fn required_permissions(self) -> &'static [Permission] {
        match self {
            GroupAction::View => &[Permission::View],
            GroupAction::Edit => &[Permission::Edit],
            GroupAction::Delete => &[Permission::DeleteList],
            GroupAction::Invite => &[Permission::Invite],
            GroupAction::ChangeRole => &[Permission::ChangeRole],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Read,
    Update,
    Delete,
    ManageShares,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

#[derive(Clone)]
pub struct AccessGate {
    store: SqliteStore,
    authority: GroupAuthority,
}

impl AccessGate {
    pub fn new(store: SqliteStore, authority: GroupAuthority) -> Self {
        Self { store, authority }
    }

    pub fn authority(&self) -> &GroupAuthority {
        &self.authority
    }

    pub async fn group_access(
        &self,
        caller_id: &str,
        group_id: &str,
        action: GroupAction,
    ) -> DomainResult<Access> {
        if self.store.find_group(group_id).await?.is_none() {
            return Ok(Access::DenyNotFound);
        }
        let Some(membership) = self.authority.membership(caller_id, group_id).await? else {
            return Ok(Access::DenyNotFound);
        };

        let allowed = action
            .required_permissions()
            .iter()
            .any(|permission| membership.grants(*permission));
        if allowed {
            Ok(Access::Allow)
        } else {
            log::warn!(
                "Denied {:?} on group {} for user {} with role {}",
                action,
                group_id,
                caller_id,
                membership.role_name
            );
            Ok(Access::DenyForbidden)
        }
    }

    pub async fn list_access(
        &self,
        caller_id: &str,
        list: &ListRow,
        action: ListAction,
    ) -> DomainResult<Access> {
        let is_owner = list.owner_id == caller_id;
        let access = match &list.group_id {
            Some(group_id) => self.group_list_access(caller_id, group_id, is_owner, action).await?,
            None => self.standalone_list_access(caller_id, list, is_owner, action).await?,
        };
        if access == Access::DenyForbidden {
            log::warn!("Denied {:?} on list {} for user {}", action, list.id, caller_id);
        }
        Ok(access)
    }

    async fn group_list_access(
        &self,
        caller_id: &str,
        group_id: &str,
        is_owner: bool,
        action: ListAction,
    ) -> DomainResult<Access> {
        if is_owner {
            return Ok(Access::Allow);
        }
        let Some(membership) = self.authority.membership(caller_id, group_id).await? else {
            return Ok(Access::DenyNotFound);
        };

        let allowed = match action {
            ListAction::Read
            | ListAction::Update
            | ListAction::CreateItem
            | ListAction::UpdateItem => true,
            ListAction::Delete => membership.grants(Permission::DeleteList),
            ListAction::DeleteItem => membership.grants(Permission::DeleteTodo),
            ListAction::ManageShares => false,
        };
        Ok(if allowed {
            Access::Allow
        } else {
            Access::DenyForbidden
        })
    }

    async fn standalone_list_access(
        &self,
        caller_id: &str,
        list: &ListRow,
        is_owner: bool,
        action: ListAction,
    ) -> DomainResult<Access> {
        if is_owner {
            return Ok(Access::Allow);
        }
        if !self.store.is_list_shared_with(&list.id, caller_id).await? {
            return Ok(Access::DenyNotFound);
        }
        Ok(match action {
            ListAction::Delete | ListAction::ManageShares => Access::DenyForbidden,
            _ => Access::Allow,
        })
    }
}
