//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but empty or
//! malformed fails fast instead of being ignored.

use crate::schema::{DiffConfig, LogFormat, LogLevelSetting, ValidatedDiffConfig};
use std::collections::BTreeMap;
use std::fmt;
use submission_diff_shared::{ErrorCode, ErrorEnvelope};

/// Env var: local submission store root.
pub const ENV_STORE_ROOT: &str = "SUBDIFF_STORE_ROOT";
/// Env var: maximum accepted file size in bytes.
pub const ENV_STORE_MAX_FILE_SIZE_BYTES: &str = "SUBDIFF_STORE_MAX_FILE_SIZE_BYTES";
/// Env var: maximum accepted files per revision.
pub const ENV_STORE_MAX_FILES: &str = "SUBDIFF_STORE_MAX_FILES";
/// Env var: minimum log level.
pub const ENV_LOG_LEVEL: &str = "SUBDIFF_LOG_LEVEL";
/// Env var: log line format.
pub const ENV_LOG_FORMAT: &str = "SUBDIFF_LOG_FORMAT";

const ALL_ENV_VARS: [&str; 5] = [
    ENV_STORE_ROOT,
    ENV_STORE_MAX_FILE_SIZE_BYTES,
    ENV_STORE_MAX_FILES,
    ENV_LOG_LEVEL,
    ENV_LOG_FORMAT,
];

/// Parsed env overrides. Absent variables leave the config untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffEnv {
    /// `SUBDIFF_STORE_ROOT`.
    pub store_root: Option<Box<str>>,
    /// `SUBDIFF_STORE_MAX_FILE_SIZE_BYTES`.
    pub store_max_file_size_bytes: Option<u64>,
    /// `SUBDIFF_STORE_MAX_FILES`.
    pub store_max_files: Option<u32>,
    /// `SUBDIFF_LOG_LEVEL`.
    pub log_level: Option<LogLevelSetting>,
    /// `SUBDIFF_LOG_FORMAT`.
    pub log_format: Option<LogFormat>,
}

impl DiffEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            store_root: parse_optional_trimmed_string(map, ENV_STORE_ROOT)?,
            store_max_file_size_bytes: parse_optional_int(map, ENV_STORE_MAX_FILE_SIZE_BYTES)?,
            store_max_files: parse_optional_int(map, ENV_STORE_MAX_FILES)?,
            log_level: parse_optional_enum(map, ENV_LOG_LEVEL, LogLevelSetting::parse)?,
            log_format: parse_optional_enum(map, ENV_LOG_FORMAT, LogFormat::parse)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: DiffConfig,
    env: &DiffEnv,
) -> Result<ValidatedDiffConfig, ErrorEnvelope> {
    let mut config = base;
    if let Some(root) = env.store_root.as_ref() {
        config.store.root = Some(root.clone());
    }
    if let Some(value) = env.store_max_file_size_bytes {
        config.store.max_file_size_bytes = value;
    }
    if let Some(value) = env.store_max_files {
        config.store.max_files = value;
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }
    if let Some(format) = env.log_format {
        config.logging.format = format;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidInt { var, value } | EnvParseError::InvalidEnum { var, value } => {
                envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value)
            },
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_int<T: std::str::FromStr>(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<T>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    parse(raw).map(Some).ok_or_else(|| EnvParseError::InvalidEnum {
        var,
        value: raw.clone(),
    })
}
