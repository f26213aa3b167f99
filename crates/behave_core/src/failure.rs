//! Structured failures raised by assertions.

use crate::location::SourceLocation;
use crate::outcome::ElementOutcome;
use serde::Serialize;
use std::any::Any;
use std::fmt;

/// Why a single element did not satisfy its predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FailureCause {
    /// The matcher evaluated to false; holds its failure message.
    Mismatch(String),

    /// The predicate panicked; holds the panic payload when it was a string.
    Panicked(String),

    /// The predicate ran a nested assertion that failed.
    Nested(Box<TestFailure>),

    /// The predicate returned some other error.
    Error(String),
}

impl FailureCause {
    /// Builds a cause from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self::Panicked(message)
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch(message) | Self::Error(message) => f.write_str(message),
            Self::Panicked(message) => write!(f, "predicate panicked: {}", message),
            Self::Nested(failure) => f.write_str(failure.message()),
        }
    }
}

impl std::error::Error for FailureCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Nested(failure) => Some(failure.as_ref()),
            _ => None,
        }
    }
}

/// A failed assertion: message, location and the data behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestFailure {
    message: String,
    location: Option<SourceLocation>,
    cause: Option<FailureCause>,
    failed_elements: Vec<ElementOutcome>,
}

impl TestFailure {
    /// Creates a failure with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            cause: None,
            failed_elements: Vec::new(),
        }
    }

    /// Attaches the source location of the assertion.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches the first underlying cause.
    pub fn with_cause(mut self, cause: Option<FailureCause>) -> Self {
        self.cause = cause;
        self
    }

    /// Attaches the element outcomes the message was built from.
    pub fn with_failed_elements(mut self, elements: Vec<ElementOutcome>) -> Self {
        self.failed_elements = elements;
        self
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the assertion was written, when known.
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    /// The first underlying cause, when available.
    pub fn cause(&self) -> Option<&FailureCause> {
        self.cause.as_ref()
    }

    /// Elements that made the assertion fail.
    pub fn failed_elements(&self) -> &[ElementOutcome] {
        &self.failed_elements
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

impl std::error::Error for TestFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
