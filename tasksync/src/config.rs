// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ENV_DATABASE_URL: &str = "TASKSYNC_DATABASE_URL";
pub const ENV_JWT_SECRET: &str = "TASKSYNC_JWT_SECRET";
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub users: UsersConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub users: ValidatedUsersConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: String::new(),
        }
    }
}

fn default_app_name() -> String {
    "TaskSync".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
    #[serde(default = "default_busy_timeout_seconds")]
    pub busy_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_seconds() -> u64 {
    10
}

fn default_busy_timeout_seconds() -> u64 {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> LevelFilter {
        parse_level(&self.level).unwrap_or(LevelFilter::Info)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UsersConfig {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: Argon2ParamsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,
    #[serde(default = "default_jwt_audience")]
    pub audience: String,
    #[serde(default = "default_jwt_expiration_hours")]
    pub expiration_hours: u64,
    #[serde(default = "default_jwt_cookie_name")]
    pub cookie_name: String,
}

fn default_jwt_issuer() -> String {
    "tasksync".to_string()
}

fn default_jwt_audience() -> String {
    "tasksync-users".to_string()
}

fn default_jwt_expiration_hours() -> u64 {
    24 * 7
}

fn default_jwt_cookie_name() -> String {
    "auth_session".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Argon2ParamsConfig {
    #[serde(default)]
    pub memory_kib: Option<u32>,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub parallelism: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

pub const DEFAULT_ARGON2_PARAMS: Argon2Params = Argon2Params {
    memory_kib: 19456,
    iterations: 2,
    parallelism: 1,
};

impl Argon2Params {
    fn resolve(config: &Argon2ParamsConfig, defaults: Argon2Params) -> Result<Self, ConfigError> {
        let resolved = Argon2Params {
            memory_kib: config.memory_kib.unwrap_or(defaults.memory_kib),
            iterations: config.iterations.unwrap_or(defaults.iterations),
            parallelism: config.parallelism.unwrap_or(defaults.parallelism),
        };

        if resolved.memory_kib == 0 || resolved.iterations == 0 || resolved.parallelism == 0 {
            return Err(ConfigError::ValidationError(
                "Argon2id password params must be non-zero".to_string(),
            ));
        }

        if let Err(err) = argon2::Params::new(
            resolved.memory_kib,
            resolved.iterations,
            resolved.parallelism,
            None,
        ) {
            return Err(ConfigError::ValidationError(format!(
                "Argon2id password params are invalid: {}",
                err
            )));
        }

        Ok(resolved)
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedUsersConfig {
    pub jwt: JwtConfig,
    pub password: Argon2Params,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        let config: Config = serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let mut config = Self::load(root)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()
    }

    /// Environment values win over the file for the settings that usually
    /// differ between deployments.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|value| !value.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET).filter(|value| !value.trim().is_empty()) {
            self.users.jwt.secret = secret;
        }
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_database(&self.database)?;
        Self::validate_logging(&self.logging)?;
        Self::validate_jwt(&self.users.jwt)?;
        let password = Argon2Params::resolve(&self.users.password, DEFAULT_ARGON2_PARAMS)?;

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            database: self.database,
            logging: self.logging,
            users: ValidatedUsersConfig {
                jwt: self.users.jwt,
                password,
            },
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
        if database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url cannot be empty".to_string(),
            ));
        }
        if database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if database.acquire_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "database.acquire_timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if parse_level(&logging.level).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "logging.level '{}' is not one of off, error, warn, info, debug, trace",
                logging.level
            )));
        }
        Ok(())
    }

    fn validate_jwt(jwt: &JwtConfig) -> Result<(), ConfigError> {
        if jwt.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "users.jwt.secret must be at least {} bytes",
                MIN_JWT_SECRET_LEN
            )));
        }
        if jwt.expiration_hours == 0 {
            return Err(ConfigError::ValidationError(
                "users.jwt.expiration_hours must be at least 1".to_string(),
            ));
        }
        if jwt.issuer.trim().is_empty() || jwt.audience.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "users.jwt.issuer and users.jwt.audience cannot be empty".to_string(),
            ));
        }
        if jwt.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "users.jwt.cookie_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
