//! Structured loggers backing `LoggerPort`.

use crate::log_sink::LogSink;
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use submission_diff_config::{LogLevelSetting, LoggingConfig};
use submission_diff_ports::{LogEvent, LogFields, LogLevel, LoggerPort};

const REDACTED: &str = "[REDACTED]";

/// Map the configured level onto the port level.
#[must_use]
pub const fn log_level_from_setting(setting: LogLevelSetting) -> LogLevel {
    match setting {
        LogLevelSetting::Debug => LogLevel::Debug,
        LogLevelSetting::Info => LogLevel::Info,
        LogLevelSetting::Warn => LogLevel::Warn,
        LogLevelSetting::Error => LogLevel::Error,
    }
}

/// JSON logger emitting one line per event.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Create a JSON logger honoring the configured minimum level.
    #[must_use]
    pub fn from_config(sink: Arc<dyn LogSink>, config: &LoggingConfig) -> Self {
        Self::new(sink).with_min_level(log_level_from_setting(config.level))
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }

        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());

        let mut payload = serde_json::Map::new();
        payload.insert("timestampMs".to_owned(), Value::from(now_epoch_ms()));
        payload.insert("level".to_owned(), Value::from(event.level.as_str()));
        payload.insert("event".to_owned(), Value::from(event.event.as_ref()));
        payload.insert("message".to_owned(), Value::from(event.message.as_ref()));
        if !fields.is_empty() {
            payload.insert("fields".to_owned(), redacted_fields(fields));
        }
        if let Some(mut error) = event.error {
            redact_value(&mut error);
            payload.insert("error".to_owned(), error);
        }

        let line = serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_owned()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        );
        self.sink.write_line(&line);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            sink: Arc::clone(&self.sink),
            base_fields: merged,
            min_level: self.min_level,
        })
    }
}

/// Logger forwarding port events to the installed `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Create a forwarding logger without base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());
        let fields = redacted_fields(fields);
        let error = event.error.map(|mut error| {
            redact_value(&mut error);
            error
        });
        let name = event.event.as_ref();
        let message = event.message.as_ref();
        match event.level {
            LogLevel::Debug => {
                tracing::debug!(event = name, fields = %fields, error = ?error, "{message}");
            },
            LogLevel::Info => {
                tracing::info!(event = name, fields = %fields, error = ?error, "{message}");
            },
            LogLevel::Warn => {
                tracing::warn!(event = name, fields = %fields, error = ?error, "{message}");
            },
            LogLevel::Error => {
                tracing::error!(event = name, fields = %fields, error = ?error, "{message}");
            },
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self { base_fields })
    }
}

fn redacted_fields(fields: LogFields) -> Value {
    let mut map = serde_json::Map::new();
    for (key, value) in fields {
        let value = redact_entry(&key, value);
        map.insert(key.into_string(), value);
    }
    Value::Object(map)
}

fn redact_entry(key: &str, mut value: Value) -> Value {
    if is_secret_key(key) {
        return Value::from(REDACTED);
    }
    if is_content_key(key) {
        if let Value::String(text) = &value {
            return Value::from(format!("[REDACTED,len={}]", text.len()));
        }
    }
    redact_value(&mut value);
    value
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                *nested = redact_entry(key, std::mem::take(nested));
            }
        },
        Value::Array(items) => {
            for item in items {
                redact_value(item);
            }
        },
        _ => {},
    }
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ["token", "password", "secret", "authorization", "apikey", "api_key"]
        .iter()
        .any(|needle| key.contains(needle))
}

fn is_content_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.ends_with("content") || key == "source"
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
