// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod authority;
pub mod catalog;
pub mod gate;
pub mod registry;

pub use authority::{GroupAuthority, Membership};
pub use catalog::{Permission, RoleName};
pub use gate::{Access, AccessGate, GroupAction, ListAction, authenticated};
pub use registry::{RoleRegistry, RoleView};
