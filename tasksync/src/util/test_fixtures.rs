// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::authz::RoleRegistry;
use crate::store::{SqliteStore, new_id, now_millis};

#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_fixed(name: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self { path: root })
    }

    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let name = format!("{}-{}", prefix, Uuid::new_v4());
        Self::new_fixed(&name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config_file(&self) -> PathBuf {
        self.path.join("config.yaml")
    }

    /// File-backed database url inside the fixture root.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.path.join("tasksync.db").display())
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}

/// In-memory store with migrations applied and the role catalog seeded.
pub async fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    RoleRegistry::new(store.clone())
        .seed()
        .await
        .expect("seed role catalog");
    store
}

/// Insert a user row directly, bypassing password hashing. Returns the id.
pub async fn insert_test_user(store: &SqliteStore, name: &str, email: &str) -> String {
    let id = new_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, 'not-a-hash', ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(now)
    .bind(now)
    .execute(store.pool())
    .await
    .expect("insert test user");
    id
}
