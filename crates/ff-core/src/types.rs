//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Planned minutes must be at least 1.
    #[error("planned minutes must be positive")]
    ZeroPlannedMins,

    /// An hour quantity was negative or not a number.
    #[error("{field} must be a non-negative number of hours, got {value}")]
    InvalidHours { field: &'static str, value: f64 },
}

/// Validates an optional hour quantity (estimate or time spent).
///
/// Hours must be finite and non-negative. `None` passes through unchanged,
/// since absent estimates are a normal state for a task.
pub fn validate_hours(
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(ValidationError::InvalidHours { field, value: v })
        }
        other => Ok(other),
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated task identifier.
    ///
    /// Task IDs must be non-empty strings. Uniqueness is enforced at the
    /// database level.
    TaskId, "task ID"
);

define_string_id!(
    /// A validated focus session identifier.
    SessionId, "session ID"
);

/// A positive number of planned minutes for a focus session.
///
/// Effectiveness is `actual / planned`, so a zero denominator must be
/// unrepresentable. Construction rejects zero; callers validate user input
/// before a session record ever exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PlannedMins(u32);

impl PlannedMins {
    /// Creates a planned-minutes value, rejecting zero.
    pub const fn new(mins: u32) -> Result<Self, ValidationError> {
        if mins == 0 {
            return Err(ValidationError::ZeroPlannedMins);
        }
        Ok(Self(mins))
    }

    /// Returns the inner minute count (always >= 1).
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PlannedMins {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlannedMins> for u32 {
    fn from(mins: PlannedMins) -> Self {
        mins.0
    }
}

impl fmt::Display for PlannedMins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
