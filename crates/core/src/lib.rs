//! Shared primitives for all Rust crates in grantstore.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across grantstore crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A validated SQL table identifier.
///
/// The assignment table name is chosen by the caller and spliced into
/// statement text, where bind parameters cannot be used, so the accepted
/// alphabet is restricted to ASCII alphanumerics and underscores with a
/// non-digit first character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    /// Maximum identifier length accepted by the storage engines we target.
    pub const MAX_LENGTH: usize = 63;

    /// Creates a validated table name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(AppError::Validation(
                "table name must not be empty".to_owned(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "table name must not exceed {} characters",
                Self::MAX_LENGTH
            )));
        }

        let mut characters = value.chars();
        let first_is_valid = characters
            .next()
            .map(|character| character.is_ascii_alphabetic() || character == '_')
            .unwrap_or(false);
        if !first_is_valid {
            return Err(AppError::Validation(format!(
                "table name '{value}' must start with an ASCII letter or underscore"
            )));
        }

        if !characters.all(|character| character.is_ascii_alphanumeric() || character == '_') {
            return Err(AppError::Validation(format!(
                "table name '{value}' may only contain ASCII letters, digits, and underscores"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the validated identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TableName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by the backing store, passed through unchanged.
    #[error("storage error: {0}")]
    Storage(String),
}
