// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, Argon2Params, DatabaseConfig, JwtConfig, LoggingConfig, ServerConfig,
    ValidatedConfig, ValidatedUsersConfig,
};

const TEST_JWT_SECRET: &str = "test-secret-key-that-is-at-least-32-bytes-long";

/// Cheap Argon2 parameters; production defaults make every test hash slow.
pub const TEST_ARGON2_PARAMS: Argon2Params = Argon2Params {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                app: AppConfig {
                    name: "Test App".to_string(),
                    description: "Test Description".to_string(),
                },
                database: DatabaseConfig {
                    url: "sqlite::memory:".to_string(),
                    max_connections: 1,
                    acquire_timeout_seconds: 5,
                    busy_timeout_seconds: 5,
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                users: ValidatedUsersConfig {
                    jwt: JwtConfig {
                        secret: TEST_JWT_SECRET.to_string(),
                        issuer: "tasksync".to_string(),
                        audience: "tasksync-users".to_string(),
                        expiration_hours: 24 * 7,
                        cookie_name: "auth_session".to_string(),
                    },
                    password: TEST_ARGON2_PARAMS,
                },
            },
        }
    }

    pub fn with_jwt_secret(mut self, secret: &str) -> Self {
        self.config.users.jwt.secret = secret.to_string();
        self
    }

    pub fn with_jwt_expiration_hours(mut self, hours: u64) -> Self {
        self.config.users.jwt.expiration_hours = hours;
        self
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.config.server.host = host.to_string();
        self
    }

    pub fn with_database_url(mut self, url: &str) -> Self {
        self.config.database.url = url.to_string();
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
