//! Domain primitives with validated constructors.

use serde::{Deserialize, Serialize};
use std::fmt;
use submission_diff_shared::{ErrorCode, ErrorEnvelope};

/// Validation failures for domain primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// `SubmissionId` is empty after trimming.
    InvalidSubmissionId {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `TeamId` is empty after trimming.
    InvalidTeamId {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `ProblemId` is empty after trimming.
    InvalidProblemId {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `LanguageId` is empty after trimming.
    InvalidLanguageId {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// A source filename is empty.
    EmptyFilename {
        /// Rank of the offending file.
        rank: u32,
    },
}

impl PrimitiveError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidSubmissionId { .. } => ErrorCode::new("domain", "invalid_submission_id"),
            Self::InvalidTeamId { .. } => ErrorCode::new("domain", "invalid_team_id"),
            Self::InvalidProblemId { .. } => ErrorCode::new("domain", "invalid_problem_id"),
            Self::InvalidLanguageId { .. } => ErrorCode::new("domain", "invalid_language_id"),
            Self::EmptyFilename { .. } => ErrorCode::new("domain", "invalid_filename"),
        }
    }
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSubmissionId { .. } => {
                formatter.write_str("SubmissionId must be non-empty")
            },
            Self::InvalidTeamId { .. } => formatter.write_str("TeamId must be non-empty"),
            Self::InvalidProblemId { .. } => formatter.write_str("ProblemId must be non-empty"),
            Self::InvalidLanguageId { .. } => formatter.write_str("LanguageId must be non-empty"),
            Self::EmptyFilename { rank } => {
                write!(formatter, "filename of file with rank {rank} must be non-empty")
            },
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl From<PrimitiveError> for ErrorEnvelope {
    fn from(error: PrimitiveError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            PrimitiveError::InvalidSubmissionId { input_length }
            | PrimitiveError::InvalidTeamId { input_length }
            | PrimitiveError::InvalidProblemId { input_length }
            | PrimitiveError::InvalidLanguageId { input_length } => {
                envelope.with_metadata("input_length", input_length.to_string())
            },
            PrimitiveError::EmptyFilename { rank } => {
                envelope.with_metadata("rank", rank.to_string())
            },
        }
    }
}

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name(Box<str>);

        impl TryFrom<String> for $name {
            type Error = PrimitiveError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl $name {
            /// Parse the identifier from user input. Surrounding whitespace is trimmed.
            pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
                let raw = input.as_ref();
                let Some(trimmed) = trimmed_non_empty(raw) else {
                    return Err(PrimitiveError::$variant {
                        input_length: raw.len(),
                    });
                };

                Ok(Self(trimmed.to_owned().into_boxed_str()))
            }

            /// Access the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> Box<str> {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(self.as_str())
            }
        }
    };
}

string_identifier!(
    /// Identifier of one submission (one revision of a team's source files).
    SubmissionId,
    InvalidSubmissionId
);
string_identifier!(
    /// Identifier of the submitting team.
    TeamId,
    InvalidTeamId
);
string_identifier!(
    /// Identifier of the contest problem.
    ProblemId,
    InvalidProblemId
);
string_identifier!(
    /// Identifier of the programming language.
    LanguageId,
    InvalidLanguageId
);

fn trimmed_non_empty(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn submission_id_requires_non_empty_input() {
        let error = SubmissionId::parse("   ").err();
        assert!(matches!(
            error,
            Some(PrimitiveError::InvalidSubmissionId { input_length: 3 })
        ));
    }

    #[test]
    fn identifiers_are_trimmed() -> Result<(), PrimitiveError> {
        assert_eq!(TeamId::parse(" team-4 ")?.as_str(), "team-4");
        assert_eq!(LanguageId::parse("cpp\n")?.into_inner().as_ref(), "cpp");
        Ok(())
    }

    #[test]
    fn empty_filename_maps_to_invalid_filename_code() {
        let envelope: ErrorEnvelope = PrimitiveError::EmptyFilename { rank: 2 }.into();
        assert_eq!(envelope.code, ErrorCode::new("domain", "invalid_filename"));
        assert_eq!(envelope.metadata.get("rank").map(String::as_str), Some("2"));
    }

    proptest! {
        #[test]
        fn problem_id_accepts_visible_ascii(id in "[A-Za-z0-9_-]{1,16}") {
            let parsed = ProblemId::parse(&id);
            prop_assert_eq!(parsed.map(ProblemId::into_inner).ok(), Some(id.into_boxed_str()));
        }
    }
}
