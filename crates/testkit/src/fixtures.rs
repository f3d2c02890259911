//! Loaders for JSON fixtures shipped under `crates/testkit/fixtures`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::{fmt, fs};

/// Errors raised while loading fixtures.
#[derive(Debug)]
pub enum FixtureError {
    /// Fixture file does not exist.
    MissingFixture {
        /// Path that could not be found.
        path: PathBuf,
    },
    /// Fixture file could not be read.
    FixtureRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Fixture file could not be parsed.
    FixtureParse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFixture { path } => {
                write!(formatter, "missing fixture: {}", path.display())
            },
            Self::FixtureRead { path, source } => {
                write!(
                    formatter,
                    "failed to read fixture {}: {}",
                    path.display(),
                    source
                )
            },
            Self::FixtureParse { path, source } => {
                write!(
                    formatter,
                    "failed to parse fixture {}: {}",
                    path.display(),
                    source
                )
            },
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FixtureRead { source, .. } => Some(source),
            Self::FixtureParse { source, .. } => Some(source),
            Self::MissingFixture { .. } => None,
        }
    }
}

/// JSON fixtures for API v1 DTOs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1JsonFixtures {
    /// Error DTO example.
    pub error_dto: Value,
    /// Ok result wrapper example.
    pub ok_result: Value,
    /// Error result wrapper example.
    pub error_result: Value,
    /// Classify request fixture.
    pub classify_request: Value,
    /// Classification payload fixture.
    pub file_change_set: Value,
    /// Compare-submission request fixture.
    pub compare_submission_request: Value,
    /// Compare-submission response fixture.
    pub compare_submission_response: Value,
}

/// One file of a classifier case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseFile {
    /// Filename.
    pub filename: String,
    /// File content.
    pub content: String,
}

/// Expected classification of a classifier case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExpectation {
    /// Sorted added filenames.
    pub added: Vec<String>,
    /// Sorted removed filenames.
    pub removed: Vec<String>,
    /// Changed filenames in order.
    pub changed: Vec<String>,
    /// Unchanged filenames in order.
    pub unchanged: Vec<String>,
    /// `(new, old)` filename pairs behind `changed`.
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
}

/// A named classifier scenario: two revisions and the expected outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierCase {
    /// Scenario name.
    pub name: String,
    /// Files of the newer revision, in rank order.
    pub files: Vec<CaseFile>,
    /// Files of the older revision, in rank order.
    pub old_files: Vec<CaseFile>,
    /// Expected classification.
    pub expected: CaseExpectation,
}

/// Load API v1 JSON fixtures.
pub fn api_v1_json_fixtures() -> Result<ApiV1JsonFixtures, FixtureError> {
    load_fixture("api-v1/json-fixtures.json")
}

/// Load the classifier scenario table.
pub fn classifier_cases() -> Result<Vec<ClassifierCase>, FixtureError> {
    load_fixture("classifier/cases.json")
}

/// Absolute path of a fixture file.
#[must_use]
pub fn fixture_path(relative_path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(relative_path)
}

fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> Result<T, FixtureError> {
    let path = fixture_path(relative_path);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(FixtureError::MissingFixture { path });
        },
        Err(error) => {
            return Err(FixtureError::FixtureRead {
                path,
                source: error,
            });
        },
    };

    serde_json::from_str(&contents).map_err(|error| FixtureError::FixtureParse {
        path,
        source: error,
    })
}
