// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fmt;
use std::str::FromStr;

/// Atomic capability a role can grant inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    View,
    Edit,
    Invite,
    DeleteTodo,
    DeleteList,
    ChangeRole,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::View,
        Permission::Edit,
        Permission::Invite,
        Permission::DeleteTodo,
        Permission::DeleteList,
        Permission::ChangeRole,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Edit => "edit",
            Permission::Invite => "invite",
            Permission::DeleteTodo => "delete_todo",
            Permission::DeleteList => "delete_list",
            Permission::ChangeRole => "change_role",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| format!("Unknown permission '{}'", value))
    }
}

/// The fixed role set seeded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleName {
    Owner,
    Contributor,
    Viewer,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::Owner, RoleName::Contributor, RoleName::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Owner => "Owner",
            RoleName::Contributor => "Contributor",
            RoleName::Viewer => "Viewer",
        }
    }

    pub fn permissions(self) -> &'static [Permission] {
        match self {
            RoleName::Owner => &Permission::ALL,
            RoleName::Contributor => &[Permission::View, Permission::Edit],
            RoleName::Viewer => &[Permission::View],
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    /// Role names match case-insensitively so clients may send `viewer`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        RoleName::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown role '{}'", trimmed))
    }
}
