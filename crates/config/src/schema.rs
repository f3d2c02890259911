//! Configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims path values and drops empty ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use submission_diff_shared::{ErrorCode, ErrorEnvelope};

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const STORE_MAX_FILE_SIZE_MIN_BYTES: u64 = 1;
const STORE_MAX_FILE_SIZE_MAX_BYTES: u64 = 100_000_000;
const STORE_MAX_FILE_SIZE_DEFAULT_BYTES: u64 = 256 * 1024;
const STORE_MAX_FILES_MIN: u32 = 1;
const STORE_MAX_FILES_MAX: u32 = 10_000;
const STORE_MAX_FILES_DEFAULT: u32 = 100;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct DiffConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Submission store settings.
    pub store: StoreConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DiffConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedDiffConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }

        self.store.normalize_and_validate()?;
        Ok(ValidatedDiffConfig { raw: self })
    }
}

/// Validated config wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDiffConfig {
    raw: DiffConfig,
}

impl ValidatedDiffConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &DiffConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> DiffConfig {
        self.raw
    }
}

impl AsRef<DiffConfig> for ValidatedDiffConfig {
    fn as_ref(&self) -> &DiffConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedDiffConfig {
    type Target = DiffConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a config from a JSON string, applying validation and normalization.
pub fn parse_diff_config_json(input: &str) -> Result<ValidatedDiffConfig, ErrorEnvelope> {
    let config: DiffConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a config from a TOML string, applying validation and normalization.
pub fn parse_diff_config_toml(input: &str) -> Result<ValidatedDiffConfig, ErrorEnvelope> {
    let config: DiffConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// JSON Schema for the config file.
#[must_use]
pub fn diff_config_schema() -> schemars::Schema {
    schemars::schema_for!(DiffConfig)
}

/// Submission store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct StoreConfig {
    /// Root directory of the local submission store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<Box<str>>,
    /// Largest source file accepted from a store or directory, in bytes.
    pub max_file_size_bytes: u64,
    /// Largest number of files accepted for one revision.
    pub max_files: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_file_size_bytes: STORE_MAX_FILE_SIZE_DEFAULT_BYTES,
            max_files: STORE_MAX_FILES_DEFAULT,
        }
    }
}

impl StoreConfig {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        normalize_optional_trimmed(&mut self.root);
        if let Some(root) = self.root.as_deref() {
            if root.contains('\0') {
                return Err(ConfigSchemaError::InvalidStoreRoot {
                    root: "<nul>".to_owned(),
                    reason: "path contains NUL",
                });
            }
            if root.contains("://") {
                return Err(ConfigSchemaError::InvalidStoreRoot {
                    root: root.to_owned(),
                    reason: "path must be a filesystem path (not a URL)",
                });
            }
        }

        validate_limit(
            "store",
            "maxFileSizeBytes",
            self.max_file_size_bytes,
            STORE_MAX_FILE_SIZE_MIN_BYTES,
            STORE_MAX_FILE_SIZE_MAX_BYTES,
        )?;
        validate_limit(
            "store",
            "maxFiles",
            u64::from(self.max_files),
            u64::from(STORE_MAX_FILES_MIN),
            u64::from(STORE_MAX_FILES_MAX),
        )
    }
}

/// Minimum log level emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelSetting {
    /// Everything.
    Debug,
    /// Lifecycle events and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevelSetting {
    /// Returns the stable string form, usable as a tracing filter directive.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a level from user input (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevelSetting {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parse a format from user input (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Minimum level emitted.
    pub level: LogLevelSetting,
    /// Line format.
    pub format: LogFormat,
}

/// Typed validation errors for the configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section (e.g. `store`).
        section: &'static str,
        /// Field name in the config file (e.g. `maxFiles`).
        field: &'static str,
        /// Value provided.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
    /// The store root is not a usable filesystem path.
    InvalidStoreRoot {
        /// Offending value, or a placeholder for non-printable input.
        root: String,
        /// Short reason describing why validation failed.
        reason: &'static str,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "invalid_limit"),
            Self::InvalidStoreRoot { .. } => ErrorCode::new("config", "invalid_store_root"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => {
                write!(
                    formatter,
                    "unsupported config version: {found} (supported: {supported})"
                )
            },
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be within [{min}, {max}] (got {value})"
            ),
            Self::InvalidStoreRoot { reason, .. } => {
                write!(formatter, "store.root is invalid: {reason}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => envelope
                .with_metadata("section", section)
                .with_metadata("field", field)
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::InvalidStoreRoot { root, reason } => envelope
                .with_metadata("section", "store")
                .with_metadata("field", "root")
                .with_metadata("reason", reason)
                .with_metadata("value", root),
        }
    }
}

const fn validate_limit(
    section: &'static str,
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ConfigSchemaError> {
    if value < min || value > max {
        return Err(ConfigSchemaError::LimitOutOfRange {
            section,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn normalize_optional_trimmed(value: &mut Option<Box<str>>) {
    let Some(current) = value.as_deref() else {
        return;
    };
    let trimmed = current.trim();
    *value = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.into())
    };
}
