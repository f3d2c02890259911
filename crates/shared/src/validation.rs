//! Validation traits for request DTOs.

/// Trait for validation errors used by `Validate`.
pub trait ValidationError: Sized {
    /// A required field was empty.
    fn empty(field: &'static str) -> Self;

    /// A field value is invalid for a specific reason.
    fn invalid(field: &'static str, reason: &'static str) -> Self;

    /// A collection or numeric field is outside the allowed range.
    fn out_of_range(field: &'static str, value: String, min: String, max: String) -> Self;
}

/// Validate a request DTO before it is turned into a typed command.
pub trait Validate {
    /// Error type returned by validation.
    type Error: ValidationError;

    /// Validate the DTO.
    fn validate(&self) -> Result<(), Self::Error>;
}

/// Proof wrapper indicating a value passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    /// Wrap a validated value.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the inner value.
    pub const fn as_ref(&self) -> &T {
        &self.0
    }

    /// Consume and return the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
