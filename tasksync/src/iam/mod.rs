// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod jwt;
pub mod middleware;
mod password;
mod service;
pub(crate) mod types;

pub use middleware::{AuthRequest, CurrentUser, JwtAuthMiddlewareFactory};
pub use password::{PasswordError, generate_secret_hex, hash_password, verify_password};
pub use service::{DEFAULT_LIST_NAME, IdentityService};
pub use types::{AuthSession, ProfileUpdate, User, UserProfile};
