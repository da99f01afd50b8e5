// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod service;
pub mod types;

pub use service::GroupService;
pub use types::{
    CreateGroupRequest, GroupDetail, GroupSummary, GroupView, Invitation, InviteRequest,
    MappingView, RoleMappingRequest, UpdateGroupRequest,
};
