//! Error types for behave_core operations.

use crate::failure::TestFailure;
use crate::matcher::MatchError;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for behave_core operations.
#[derive(Error, Debug)]
pub enum BehaveError {
    /// An assertion did not hold.
    #[error(transparent)]
    AssertionFailed(Box<TestFailure>),

    /// A quantifier or matcher was constructed with a malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A named property could not be resolved.
    #[error("property not found: '{name}' is not defined for {type_name}")]
    PropertyNotFound {
        /// The requested property name
        name: String,
        /// Type the property was looked up on
        type_name: String,
    },

    /// Two test cases were registered under the same full name.
    #[error("duplicate test name: {0}")]
    DuplicateTest(String),

    /// A fixture failed during setup or teardown.
    #[error("fixture '{fixture}' failed during {phase}: {reason}")]
    Fixture {
        /// Name of the failing fixture
        fixture: String,
        /// "setup" or "teardown"
        phase: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// The test body is not written yet.
    #[error("test pending")]
    Pending,

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A check file could not be read or is malformed.
    #[error("invalid check file at {}: {}", path.display(), reason)]
    CheckFile {
        /// Path to the check file
        path: PathBuf,
        /// Description of what's invalid
        reason: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BehaveError {
    /// Returns true if this error reports a failed assertion rather than a
    /// misuse of the library.
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, Self::AssertionFailed(_))
    }

    /// Returns the structured failure when this is an assertion failure.
    pub fn as_failure(&self) -> Option<&TestFailure> {
        match self {
            Self::AssertionFailed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns a short hint on how to fix the error, if available.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument(_) => {
                Some("Quantifier counts must be non-negative and 'between' needs from <= to.")
            }
            Self::PropertyNotFound { .. } => {
                Some("Register the property on the registry or implement HasProperty for the type.")
            }
            Self::DuplicateTest(_) => Some("Give each test a unique name within its scope."),
            Self::ConfigError(_) => Some("Check behave.toml for typos; unknown keys are rejected."),
            _ => None,
        }
    }
}

impl From<TestFailure> for BehaveError {
    fn from(failure: TestFailure) -> Self {
        Self::AssertionFailed(Box::new(failure))
    }
}

impl From<MatchError> for BehaveError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::PropertyNotFound { name, type_name } => {
                Self::PropertyNotFound { name, type_name }
            }
        }
    }
}

/// Convenience Result type for behave_core operations.
pub type Result<T> = std::result::Result<T, BehaveError>;
