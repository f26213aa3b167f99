//! Quantified assertions over collections ("inspectors").
//!
//! An [`Inspection`] pairs a [`Quantifier`] with a collection. Applying a
//! predicate visits every element exactly once, in the collection's iteration
//! order, and records an [`ElementOutcome`] for each. Panics and failed
//! assertions raised by the predicate are recorded as failing outcomes instead
//! of aborting the pass, so counts stay exact for `at_least`, `at_most`,
//! `exactly` and `between`. Misuse is not an outcome: an unknown property or
//! a malformed nested quantifier stops the inspection with that error.
//!
//! ```
//! use behave_core::{all, at_most, be_gt, no};
//!
//! all(&[1, 2, 3]).should(be_gt(0));
//! no(&[1, 2, 3]).should(be_gt(10));
//!
//! let err = at_most(1, &[1, 2, 3]).check(be_gt(1)).unwrap_err();
//! assert!(err
//!     .to_string()
//!     .contains("2 elements satisfied the predicate, expected at most 1"));
//! ```

use crate::config::InspectorConfig;
use crate::error::{BehaveError, Result};
use crate::failure::{FailureCause, TestFailure};
use crate::location::SourceLocation;
use crate::matcher::Matcher;
use crate::message::{self, render_guarded};
use crate::outcome::{AggregateResult, ElementOutcome};
use crate::quantifier::Quantifier;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// A quantifier bound to the elements it will inspect.
#[derive(Debug)]
pub struct Inspection<'a, T: ?Sized, I> {
    quantifier: Quantifier,
    items: I,
    config: InspectorConfig,
    _elements: PhantomData<&'a T>,
}

/// Starts an inspection of `items` under `quantifier`.
pub fn inspect<'a, T, C>(quantifier: Quantifier, items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    Inspection {
        quantifier,
        items: items.into_iter(),
        config: InspectorConfig::default(),
        _elements: PhantomData,
    }
}

/// Every element must satisfy the predicate; a failure reports the first
/// failing element.
pub fn all<'a, T, C>(items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::All, items)
}

/// Every element must satisfy the predicate; a failure reports every failing
/// element.
pub fn every<'a, T, C>(items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::Every, items)
}

/// At least `min` elements must satisfy the predicate.
pub fn at_least<'a, T, C>(min: usize, items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::AtLeast(min), items)
}

/// At most `max` elements may satisfy the predicate.
pub fn at_most<'a, T, C>(max: usize, items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::AtMost(max), items)
}

/// Exactly `count` elements must satisfy the predicate.
pub fn exactly<'a, T, C>(count: usize, items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::Exactly(count), items)
}

/// Between `from` and `to` elements (inclusive) must satisfy the predicate.
pub fn between<'a, T, C>(from: usize, to: usize, items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::Between { from, to }, items)
}

/// No element may satisfy the predicate.
pub fn no<'a, T, C>(items: C) -> Inspection<'a, T, C::IntoIter>
where
    T: ?Sized + 'a,
    C: IntoIterator<Item = &'a T>,
{
    inspect(Quantifier::No, items)
}

impl<'a, T, I> Inspection<'a, T, I>
where
    T: Debug + ?Sized + 'a,
    I: Iterator<Item = &'a T>,
{
    /// Overrides how failure messages are rendered.
    pub fn with_config(mut self, config: InspectorConfig) -> Self {
        self.config = config;
        self
    }

    /// The quantifier this inspection applies.
    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Applies `matcher` to every element and returns the aggregate without
    /// judging it.
    pub fn evaluate<M: Matcher<T>>(self, matcher: M) -> Result<AggregateResult> {
        let (aggregate, _) = self.run(|item| Step::matched(&matcher, item))?;
        Ok(aggregate)
    }

    /// Applies `matcher` and fails if the quantifier is not satisfied.
    #[track_caller]
    pub fn check<M: Matcher<T>>(self, matcher: M) -> Result<()> {
        let location = SourceLocation::caller();
        let (aggregate, inspection) = self.run(|item| Step::matched(&matcher, item))?;
        inspection.conclude(aggregate, location)
    }

    /// Applies a boolean predicate and fails if the quantifier is not
    /// satisfied.
    #[track_caller]
    pub fn check_that<F>(self, mut predicate: F) -> Result<()>
    where
        F: FnMut(&T) -> bool,
    {
        let location = SourceLocation::caller();
        let (aggregate, inspection) = self.run(|item| {
            let satisfied = predicate(item);
            let rendered = render_guarded(item);
            if satisfied {
                Step::Pass(format!("{} satisfied the predicate", rendered))
            } else {
                Step::Fail(FailureCause::Mismatch(format!(
                    "{} did not satisfy the predicate",
                    rendered
                )))
            }
        })?;
        inspection.conclude(aggregate, location)
    }

    /// Runs a fallible block per element, typically holding further
    /// assertions, and fails if the quantifier is not satisfied.
    ///
    /// Failed assertions inside the block count as failing elements.
    /// `InvalidArgument` and `PropertyNotFound` stop the inspection and are
    /// returned as they are.
    #[track_caller]
    pub fn check_each<F>(self, mut block: F) -> Result<()>
    where
        F: FnMut(&T) -> Result<()>,
    {
        let location = SourceLocation::caller();
        let (aggregate, inspection) = self.run(|item| match block(item) {
            Ok(()) => Step::Pass(format!("{} passed", render_guarded(item))),
            Err(BehaveError::AssertionFailed(failure)) => {
                Step::Fail(FailureCause::Nested(failure))
            }
            Err(err @ (BehaveError::InvalidArgument(_) | BehaveError::PropertyNotFound { .. })) => {
                Step::Abort(err)
            }
            Err(other) => Step::Fail(FailureCause::Error(other.to_string())),
        })?;
        inspection.conclude(aggregate, location)
    }

    /// Like [`check`](Self::check), but panics with the failure message.
    #[track_caller]
    pub fn should<M: Matcher<T>>(self, matcher: M) {
        if let Err(err) = self.check(matcher) {
            panic!("{}", err);
        }
    }

    /// Like [`check_that`](Self::check_that), but panics with the failure
    /// message.
    #[track_caller]
    pub fn should_satisfy<F>(self, predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        if let Err(err) = self.check_that(predicate) {
            panic!("{}", err);
        }
    }

    /// Like [`check_each`](Self::check_each), but panics with the failure
    /// message.
    #[track_caller]
    pub fn should_pass<F>(self, block: F)
    where
        F: FnMut(&T) -> Result<()>,
    {
        if let Err(err) = self.check_each(block) {
            panic!("{}", err);
        }
    }

    /// Visits every element once, stopping early only on [`Step::Abort`].
    fn run<F>(self, mut check: F) -> Result<(AggregateResult, Verdict)>
    where
        F: FnMut(&T) -> Step,
    {
        self.quantifier.validate()?;

        let mut aggregate = AggregateResult::new();
        for (index, item) in self.items.enumerate() {
            let value = render_guarded(item);
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| check(item))) {
                Ok(Step::Pass(message)) => ElementOutcome::passed(index, value, message),
                Ok(Step::Fail(cause)) => ElementOutcome::failed(index, value, cause),
                Ok(Step::Abort(err)) => {
                    debug!(
                        quantifier = %self.quantifier,
                        index,
                        error = %err,
                        "inspection aborted"
                    );
                    return Err(err);
                }
                Err(payload) => {
                    ElementOutcome::failed(index, value, FailureCause::from_panic(payload))
                }
            };
            aggregate.record(outcome);
        }

        debug!(
            quantifier = %self.quantifier,
            total = aggregate.total(),
            passed = aggregate.passed_count(),
            "inspection evaluated"
        );

        Ok((
            aggregate,
            Verdict {
                quantifier: self.quantifier,
                config: self.config,
            },
        ))
    }
}

/// Result of checking one element.
enum Step {
    /// Holds the message explaining the pass.
    Pass(String),
    Fail(FailureCause),
    /// The check could not be performed; the whole inspection fails with it.
    Abort(BehaveError),
}

impl Step {
    fn matched<T: ?Sized, M: Matcher<T>>(matcher: &M, item: &T) -> Self {
        let result = matcher.apply(item);
        if let Some(error) = result.error {
            return Self::Abort(error.into());
        }
        if result.matches {
            Self::Pass(result.negated_failure_message)
        } else {
            Self::Fail(FailureCause::Mismatch(result.failure_message))
        }
    }
}

/// What is left of an inspection once its elements are consumed.
struct Verdict {
    quantifier: Quantifier,
    config: InspectorConfig,
}

impl Verdict {
    fn conclude(self, aggregate: AggregateResult, location: SourceLocation) -> Result<()> {
        if self
            .quantifier
            .is_satisfied(aggregate.passed_count(), aggregate.total())
        {
            return Ok(());
        }

        let message = message::failure_message(self.quantifier, &aggregate, &self.config);
        let offending = message::offending(self.quantifier, &aggregate).to_vec();
        let cause = if offending.iter().any(|outcome| !outcome.passed) {
            aggregate.first_cause().cloned()
        } else {
            None
        };

        Err(TestFailure::new(message)
            .at(location)
            .with_cause(cause)
            .with_failed_elements(offending)
            .into())
    }
}
