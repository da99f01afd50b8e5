// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::iam::generate_secret_hex;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKERS: u16 = 4;
const DEFAULT_DATABASE_FILE: &str = "tasksync.db";
const JWT_SECRET_BYTES: usize = 32;

/// Writes a default `config.yaml` when none exists. Returns whether a file
/// was created; an existing file is never touched.
pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let root_path = normalize_root(root)?;
    let config_path = root_path.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let jwt_secret = generate_secret_hex(JWT_SECRET_BYTES);
    let database_url = format!(
        "sqlite://{}",
        root_path.join(DEFAULT_DATABASE_FILE).display()
    );
    let contents = default_config_yaml(&jwt_secret, &database_url);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!(
        "created config.yaml (port {}, database {})",
        DEFAULT_PORT, database_url
    ));

    Ok(true)
}

pub(super) fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if root_path.exists() {
        if !root_path.is_dir() {
            return Err(BootstrapError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Runtime root is not a directory: {}", root_path.display()),
            )));
        }
        return Ok(root_path);
    }

    fs::create_dir_all(&root_path)?;
    log_action(format!(
        "created runtime root directory {}",
        root_path.display()
    ));
    Ok(root_path)
}

fn default_config_yaml(jwt_secret: &str, database_url: &str) -> String {
    format!(
        "server:\n  host: \"0.0.0.0\"\n  port: {port}\n  workers: {workers}\n\napp:\n  name: \"TaskSync\"\n  description: \"Shared to-do lists for teams\"\n\ndatabase:\n  url: \"{database_url}\"\n  max_connections: 5\n  acquire_timeout_seconds: 10\n  busy_timeout_seconds: 5\n\nlogging:\n  level: \"info\"\n\nusers:\n  jwt:\n    secret: \"{jwt_secret}\"\n    issuer: \"tasksync\"\n    audience: \"tasksync-users\"\n    expiration_hours: 168\n    cookie_name: \"auth_session\"\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        database_url = database_url,
        jwt_secret = jwt_secret,
    )
}
