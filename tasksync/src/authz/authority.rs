// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::catalog::Permission;
use crate::error::{DomainError, DomainResult};
use crate::store::{MappingRow, SqliteStore};

/// A member's mapping in a group with its role resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub mapping: MappingRow,
    pub role_name: String,
    pub permissions: Vec<String>,
}

impl Membership {
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.iter().any(|name| name == permission.as_str())
    }
}

/// Answers "does user U hold permission P in group G".
///
/// Nothing is cached: every decision re-reads the mapping and role from
/// storage so a role change applies to the very next request.
#[derive(Clone)]
pub struct GroupAuthority {
    store: SqliteStore,
}

impl GroupAuthority {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// `Ok(None)` when the user has no mapping in the group. A mapping whose
    /// role no longer resolves is an integrity error.
    pub async fn membership(&self, user_id: &str, group_id: &str) -> DomainResult<Option<Membership>> {
        let Some(mapping) = self.store.find_mapping(user_id, group_id).await? else {
            return Ok(None);
        };

        let role = self
            .store
            .find_role_by_id(&mapping.role_id)
            .await?
            .ok_or_else(|| {
                log::error!(
                    "Mapping {} for user {} in group {} references missing role {}",
                    mapping.id,
                    user_id,
                    group_id,
                    mapping.role_id
                );
                DomainError::integrity(format!(
                    "role {} referenced by mapping {} does not exist",
                    mapping.role_id, mapping.id
                ))
            })?;
        let permissions = self.store.role_permission_names(&role.id).await?;

        Ok(Some(Membership {
            mapping,
            role_name: role.name,
            permissions,
        }))
    }

    pub async fn is_member(&self, user_id: &str, group_id: &str) -> DomainResult<bool> {
        Ok(self.store.find_mapping(user_id, group_id).await?.is_some())
    }

    pub async fn has_permission(
        &self,
        user_id: &str,
        group_id: &str,
        permission: Permission,
    ) -> DomainResult<bool> {
        Ok(self
            .membership(user_id, group_id)
            .await?
            .is_some_and(|membership| membership.grants(permission)))
    }

    /// Succeeds on the first permission the user holds.
    pub async fn has_any_permission(
        &self,
        user_id: &str,
        group_id: &str,
        permissions: &[Permission],
    ) -> DomainResult<bool> {
        let Some(membership) = self.membership(user_id, group_id).await? else {
            return Ok(false);
        };
        Ok(permissions.iter().any(|permission| membership.grants(*permission)))
    }
}
