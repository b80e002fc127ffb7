use pathgate::{
    AppConfig, Category, ConfigError, Permissions,
    config::{Env, LOCAL_JWT_SECRET},
};
use serial_test::serial;
use std::{env, panic};

const VARS: [&str; 8] = [
    "APP_ENV",
    "DATABASE_URL",
    "GATE_JWT_SECRET",
    "GATE_ROOT_IS_PUBLIC",
    "GATE_ADMIN_PATHS",
    "GATE_USER_PATHS",
    "GATE_PUBLIC_PATHS",
    "GATE_BIND_ADDR",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with exactly the given variables set, restoring the originals afterwards.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> =
        VARS.iter().map(|&var| (var, env::var(var).ok())).collect();

    unsafe {
        for var in VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    unsafe {
        for (key, original) in originals {
            match original {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(&[], AppConfig::load).unwrap();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.db_url, None);
    assert_eq!(config.jwt_secret, LOCAL_JWT_SECRET);
    assert!(config.root_is_public);
    assert_eq!(config.admin_paths, None);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config, AppConfig::default());
}

#[test]
#[serial]
fn test_production_requires_secret() {
    let result = run_with_env(&[("APP_ENV", "production")], AppConfig::load);

    assert_eq!(result, Err(ConfigError::Missing("GATE_JWT_SECRET")));
}

#[test]
#[serial]
fn test_production_with_store() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("GATE_JWT_SECRET", "prod-secret"),
            ("DATABASE_URL", "postgres://gate:pass@db/users"),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.db_url.as_deref(), Some("postgres://gate:pass@db/users"));
}

#[test]
#[serial]
fn test_path_lists_and_root_flag() {
    let config = run_with_env(
        &[
            ("GATE_ADMIN_PATHS", "/admin, /ops ,"),
            ("GATE_PUBLIC_PATHS", "/,/docs"),
            ("GATE_ROOT_IS_PUBLIC", "false"),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(
        config.admin_paths,
        Some(vec!["/admin".to_string(), "/ops".to_string()])
    );
    assert_eq!(config.user_paths, None);
    assert!(!config.root_is_public);

    let perm = Permissions::new().unwrap();
    config.apply(&perm);

    let rules = perm.rules();
    assert_eq!(rules.prefixes(Category::Admin), ["/admin", "/ops"]);
    // untouched categories keep their defaults
    assert_eq!(rules.prefixes(Category::User), ["/profiles", "/data"]);
    assert_eq!(rules.prefixes(Category::Public), ["/", "/docs"]);
    assert!(!perm.root_is_public());
}

#[test]
#[serial]
fn test_invalid_root_flag() {
    let result = run_with_env(&[("GATE_ROOT_IS_PUBLIC", "maybe")], AppConfig::load);

    assert_eq!(
        result,
        Err(ConfigError::Invalid {
            key: "GATE_ROOT_IS_PUBLIC",
            value: "maybe".to_string(),
        })
    );
}
