use std::env;

use crate::{error::ConfigError, permissions::Permissions, rules::Category};

/// Signing secret used when running locally without `GATE_JWT_SECRET`.
pub const LOCAL_JWT_SECRET: &str = "pathgate-local-development-secret";

/// AppConfig
///
/// Everything the gate and its host process read from the environment.
/// Loaded once at startup and immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    // Runtime environment marker; selects log format and secret strictness.
    pub env: Env,
    // Postgres connection string for the user state. None selects the in-memory store.
    pub db_url: Option<String>,
    // HS256 secret used to sign and verify session tokens.
    pub jwt_secret: String,
    pub root_is_public: bool,
    // Optional replacements for the default prefix lists.
    pub admin_paths: Option<Vec<String>>,
    pub user_paths: Option<Vec<String>>,
    pub public_paths: Option<Vec<String>>,
    pub bind_addr: String,
}

/// Env
///
/// Runtime context of the process.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe values for tests: local mode, in-memory store, default rules.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            root_is_public: true,
            admin_paths: None,
            user_paths: None,
            public_paths: None,
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// Production requires `GATE_JWT_SECRET`; local mode falls back to
    /// `LOCAL_JWT_SECRET`. Path lists are comma-separated and, when present,
    /// replace the corresponding category wholesale.
    pub fn load() -> Result<Self, ConfigError> {
        let env_mode = match var("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match (env_mode, var("GATE_JWT_SECRET")) {
            (_, Some(secret)) => secret,
            (Env::Production, None) => return Err(ConfigError::Missing("GATE_JWT_SECRET")),
            (Env::Local, None) => LOCAL_JWT_SECRET.to_string(),
        };

        let root_is_public = match var("GATE_ROOT_IS_PUBLIC") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "GATE_ROOT_IS_PUBLIC",
                value: raw,
            })?,
        };

        Ok(Self {
            env: env_mode,
            db_url: var("DATABASE_URL"),
            jwt_secret,
            root_is_public,
            admin_paths: var("GATE_ADMIN_PATHS").map(|raw| split_list(&raw)),
            user_paths: var("GATE_USER_PATHS").map(|raw| split_list(&raw)),
            public_paths: var("GATE_PUBLIC_PATHS").map(|raw| split_list(&raw)),
            bind_addr: var("GATE_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
        })
    }

    /// Pushes the configured rule overrides and root flag into `perm`.
    pub fn apply(&self, perm: &Permissions) {
        let overrides = [
            (Category::Admin, &self.admin_paths),
            (Category::User, &self.user_paths),
            (Category::Public, &self.public_paths),
        ];
        for (category, paths) in overrides {
            if let Some(paths) = paths {
                perm.set_path(category, paths.iter().cloned());
            }
        }
        perm.set_root_is_public(self.root_is_public);
    }
}

// Unset and empty variables are treated the same.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
