//! # submission-diff-config
//!
//! Configuration schema, validation, env overrides, and loading for the CLI.
//! This crate depends on `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    DiffEnv, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_STORE_MAX_FILE_SIZE_BYTES, ENV_STORE_MAX_FILES,
    ENV_STORE_ROOT, EnvParseError, apply_env_overrides,
};
pub use load::{
    load_diff_config_from_path, load_diff_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DiffConfig, LogFormat, LogLevelSetting,
    LoggingConfig, StoreConfig, ValidatedDiffConfig, diff_config_schema, parse_diff_config_json,
    parse_diff_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
