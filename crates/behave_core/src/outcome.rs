//! Per-element outcomes and their aggregate for one inspection.

use crate::failure::FailureCause;
use serde::Serialize;

/// Result of applying the predicate to one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementOutcome {
    /// Position of the element in iteration order.
    pub index: usize,
    /// The element rendered with `Debug`.
    pub value: String,
    /// Whether the predicate held.
    pub passed: bool,
    /// Matcher message for this outcome: the negated failure message when
    /// the element passed, the failure message when it did not.
    pub message: String,
    /// Why the element failed. Always `None` for passing elements.
    pub cause: Option<FailureCause>,
}

impl ElementOutcome {
    /// A passing outcome.
    pub fn passed(index: usize, value: String, message: String) -> Self {
        Self {
            index,
            value,
            passed: true,
            message,
            cause: None,
        }
    }

    /// A failing outcome with its cause.
    pub fn failed(index: usize, value: String, cause: FailureCause) -> Self {
        Self {
            index,
            value,
            passed: false,
            message: cause.to_string(),
            cause: Some(cause),
        }
    }
}

/// Reduction of every [`ElementOutcome`] of one inspection.
///
/// Every element is visited exactly once, so
/// `passed_count() + failed().len() == total()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    total: usize,
    passed: Vec<ElementOutcome>,
    failed: Vec<ElementOutcome>,
}

impl AggregateResult {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the next outcome, preserving iteration order.
    pub fn record(&mut self, outcome: ElementOutcome) {
        self.total += 1;
        if outcome.passed {
            self.passed.push(outcome);
        } else {
            self.failed.push(outcome);
        }
    }

    /// Number of elements visited.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of elements that satisfied the predicate.
    pub fn passed_count(&self) -> usize {
        self.passed.len()
    }

    /// Passing outcomes in iteration order.
    pub fn passed(&self) -> &[ElementOutcome] {
        &self.passed
    }

    /// Failing outcomes in iteration order.
    pub fn failed(&self) -> &[ElementOutcome] {
        &self.failed
    }

    /// All rendered values in iteration order.
    pub fn values(&self) -> Vec<&str> {
        let mut all: Vec<&ElementOutcome> = self.passed.iter().chain(&self.failed).collect();
        all.sort_by_key(|outcome| outcome.index);
        all.into_iter().map(|outcome| outcome.value.as_str()).collect()
    }

    /// The cause of the first failing element, if any.
    pub fn first_cause(&self) -> Option<&FailureCause> {
        self.failed.first().and_then(|outcome| outcome.cause.as_ref())
    }
}
