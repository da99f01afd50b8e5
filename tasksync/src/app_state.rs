// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

use crate::authz::{AccessGate, GroupAuthority, RoleRegistry};
use crate::config::ValidatedConfig;
use crate::error::DomainResult;
use crate::groups::GroupService;
use crate::iam::IdentityService;
use crate::store::SqliteStore;
use crate::todos::ListService;

/// Services shared by every worker. Each field is already wrapped in
/// `web::Data`, so cloning the state per worker only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<ValidatedConfig>,
    pub identity: web::Data<IdentityService>,
    pub roles: web::Data<RoleRegistry>,
    pub lists: web::Data<ListService>,
    pub groups: web::Data<GroupService>,
}

impl AppState {
    pub fn new(config: ValidatedConfig, store: SqliteStore) -> DomainResult<Self> {
        let identity = IdentityService::new(&config, store.clone())?;
        let registry = RoleRegistry::new(store.clone());
        let gate = AccessGate::new(store.clone(), GroupAuthority::new(store.clone()));
        let lists = ListService::new(store.clone(), gate.clone());
        let groups = GroupService::new(store, gate, registry.clone());

        Ok(Self {
            config: web::Data::new(config),
            identity: web::Data::new(identity),
            roles: web::Data::new(registry),
            lists: web::Data::new(lists),
            groups: web::Data::new(groups),
        })
    }
}
