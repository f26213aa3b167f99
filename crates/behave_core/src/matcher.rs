//! Matchers and their combinators.
//!
//! A [`Matcher`] evaluates a value and explains the result both ways: the
//! failure message is used when the matcher was expected to hold, the negated
//! failure message when it was expected not to (for example under
//! [`not`] or the `no` quantifier).
//!
//! ```
//! use behave_core::{be_gt, be_lt, Composable, Matcher};
//!
//! let in_range = be_gt(0).and(be_lt(10));
//! assert!(in_range.apply(&5).matches);
//!
//! let result = in_range.apply(&12);
//! assert_eq!(result.failure_message, "12 was greater than 0, but 12 was not less than 10");
//! ```

use crate::equality::{DefaultEquality, Equality};
use crate::message::render;
use std::fmt::Debug;

/// Outcome of applying a matcher to one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the value matched.
    pub matches: bool,
    /// Explains why the value did not match.
    pub failure_message: String,
    /// Explains why the value matched.
    pub negated_failure_message: String,
    /// Set when the matcher could not be evaluated at all. The verdict is
    /// meaningless then, and inspections stop with this error.
    pub error: Option<MatchError>,
}

/// Why a matcher could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The matcher named a property the value does not define.
    PropertyNotFound {
        /// The requested property name
        name: String,
        /// Type the property was looked up on
        type_name: String,
    },
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PropertyNotFound { name, type_name } => {
                write!(f, "property '{}' not found for {}", name, type_name)
            }
        }
    }
}

impl MatchResult {
    /// Creates a result from its verdict and both messages.
    pub fn new(
        matches: bool,
        failure_message: impl Into<String>,
        negated_failure_message: impl Into<String>,
    ) -> Self {
        Self {
            matches,
            failure_message: failure_message.into(),
            negated_failure_message: negated_failure_message.into(),
            error: None,
        }
    }

    /// A result for a matcher that could not be evaluated.
    pub fn unresolved(error: MatchError) -> Self {
        let message = error.to_string();
        Self {
            matches: false,
            failure_message: message.clone(),
            negated_failure_message: message,
            error: Some(error),
        }
    }

    /// Flips the verdict and swaps the messages.
    pub fn negate(self) -> Self {
        Self {
            matches: !self.matches,
            failure_message: self.negated_failure_message,
            negated_failure_message: self.failure_message,
            error: self.error,
        }
    }

    /// The message describing this result's verdict.
    pub fn explanation(&self) -> &str {
        if self.matches {
            &self.negated_failure_message
        } else {
            &self.failure_message
        }
    }
}

/// A predicate over `T` that explains its verdict.
pub trait Matcher<T: ?Sized> {
    /// Evaluates the matcher against `actual`.
    fn apply(&self, actual: &T) -> MatchResult;

    /// Erases the matcher type.
    fn boxed<'a>(self) -> Box<dyn Matcher<T> + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn apply(&self, actual: &T) -> MatchResult {
        (**self).apply(actual)
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
    fn apply(&self, actual: &T) -> MatchResult {
        (**self).apply(actual)
    }
}

/// Infix composition shared by every matcher type.
///
/// Kept apart from [`Matcher`] so that composing two matchers never has to
/// guess which input type they will be applied to.
pub trait Composable: Sized {
    /// Both matchers must hold. The right side is not evaluated when the left
    /// side fails.
    fn and<M>(self, other: M) -> And<Self, M> {
        And {
            left: self,
            right: other,
        }
    }

    /// Either matcher must hold. The right side is not evaluated when the
    /// left side holds.
    fn or<M>(self, other: M) -> Or<Self, M> {
        Or {
            left: self,
            right: other,
        }
    }
}

impl<'a, T: ?Sized> Composable for Box<dyn Matcher<T> + 'a> {}
impl<L, R> Composable for And<L, R> {}
impl<L, R> Composable for Or<L, R> {}
impl<M> Composable for Not<M> {}
impl<T, E> Composable for Equal<T, E> {}
impl<T> Composable for Ordered<T> {}
impl Composable for Within {}
impl Composable for Text {}
impl Composable for BeSome {}
impl Composable for BeNone {}
impl Composable for BeOk {}
impl Composable for BeErr {}
impl<F> Composable for Satisfy<F> {}

/// Conjunction built by [`Composable::and`].
#[derive(Debug, Clone)]
pub struct And<L, R> {
    left: L,
    right: R,
}

impl<T: ?Sized, L: Matcher<T>, R: Matcher<T>> Matcher<T> for And<L, R> {
    fn apply(&self, actual: &T) -> MatchResult {
        let left = self.left.apply(actual);
        if !left.matches || left.error.is_some() {
            return left;
        }
        let right = self.right.apply(actual);
        if right.error.is_some() {
            return right;
        }
        MatchResult::new(
            right.matches,
            format!(
                "{}, but {}",
                left.negated_failure_message, right.failure_message
            ),
            format!(
                "{}, and {}",
                left.negated_failure_message, right.negated_failure_message
            ),
        )
    }
}

/// Disjunction built by [`Composable::or`].
#[derive(Debug, Clone)]
pub struct Or<L, R> {
    left: L,
    right: R,
}

impl<T: ?Sized, L: Matcher<T>, R: Matcher<T>> Matcher<T> for Or<L, R> {
    fn apply(&self, actual: &T) -> MatchResult {
        let left = self.left.apply(actual);
        if left.matches || left.error.is_some() {
            return left;
        }
        let right = self.right.apply(actual);
        if right.error.is_some() {
            return right;
        }
        MatchResult::new(
            right.matches,
            format!("{}, and {}", left.failure_message, right.failure_message),
            format!(
                "{}, but {}",
                left.failure_message, right.negated_failure_message
            ),
        )
    }
}

/// Negation built by [`not`].
#[derive(Debug, Clone)]
pub struct Not<M>(M);

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for Not<M> {
    fn apply(&self, actual: &T) -> MatchResult {
        self.0.apply(actual).negate()
    }
}

/// Inverts a matcher.
pub fn not<M>(matcher: M) -> Not<M> {
    Not(matcher)
}

/// Equality against an expected value under an [`Equality`] strategy.
#[derive(Debug, Clone)]
pub struct Equal<T, E = DefaultEquality> {
    expected: T,
    equality: E,
}

/// Matches values equal to `expected` according to `PartialEq`.
pub fn equal<T>(expected: T) -> Equal<T> {
    Equal {
        expected,
        equality: DefaultEquality,
    }
}

/// Matches values equal to `expected` according to `equality`.
pub fn equal_with<T, E: Equality<T>>(expected: T, equality: E) -> Equal<T, E> {
    Equal { expected, equality }
}

impl<T: Debug, E: Equality<T>> Matcher<T> for Equal<T, E> {
    fn apply(&self, actual: &T) -> MatchResult {
        let suffix = self
            .equality
            .describe()
            .map(|d| format!(" ({})", d))
            .unwrap_or_default();
        let rendered = render(actual);
        let expected = render(&self.expected);
        MatchResult::new(
            self.equality.are_equal(actual, &self.expected),
            format!("{} did not equal {}{}", rendered, expected, suffix),
            format!("{} equaled {}{}", rendered, expected, suffix),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    fn phrase(self) -> &'static str {
        match self {
            Self::Greater => "greater than",
            Self::GreaterOrEqual => "greater than or equal to",
            Self::Less => "less than",
            Self::LessOrEqual => "less than or equal to",
        }
    }
}

/// Ordering comparison against a bound, built by [`be_gt`] and friends.
#[derive(Debug, Clone)]
pub struct Ordered<T> {
    bound: T,
    comparison: Comparison,
}

/// Matches values strictly greater than `bound`.
pub fn be_gt<T>(bound: T) -> Ordered<T> {
    Ordered {
        bound,
        comparison: Comparison::Greater,
    }
}

/// Matches values greater than or equal to `bound`.
pub fn be_ge<T>(bound: T) -> Ordered<T> {
    Ordered {
        bound,
        comparison: Comparison::GreaterOrEqual,
    }
}

/// Matches values strictly less than `bound`.
pub fn be_lt<T>(bound: T) -> Ordered<T> {
    Ordered {
        bound,
        comparison: Comparison::Less,
    }
}

/// Matches values less than or equal to `bound`.
pub fn be_le<T>(bound: T) -> Ordered<T> {
    Ordered {
        bound,
        comparison: Comparison::LessOrEqual,
    }
}

impl<T: PartialOrd + Debug> Matcher<T> for Ordered<T> {
    fn apply(&self, actual: &T) -> MatchResult {
        let matches = match self.comparison {
            Comparison::Greater => actual > &self.bound,
            Comparison::GreaterOrEqual => actual >= &self.bound,
            Comparison::Less => actual < &self.bound,
            Comparison::LessOrEqual => actual <= &self.bound,
        };
        let actual = render(actual);
        let bound = render(&self.bound);
        let phrase = self.comparison.phrase();
        MatchResult::new(
            matches,
            format!("{} was not {} {}", actual, phrase, bound),
            format!("{} was {} {}", actual, phrase, bound),
        )
    }
}

/// Floating point closeness, built by [`be_within`].
#[derive(Debug, Clone, Copy)]
pub struct Within {
    expected: f64,
    tolerance: f64,
}

/// Matches floats within `tolerance` of `expected`.
pub fn be_within(expected: f64, tolerance: f64) -> Within {
    Within {
        expected,
        tolerance: tolerance.abs(),
    }
}

impl Matcher<f64> for Within {
    fn apply(&self, actual: &f64) -> MatchResult {
        MatchResult::new(
            (actual - self.expected).abs() <= self.tolerance,
            format!(
                "{:?} was not {:?} plus or minus {:?}",
                actual, self.expected, self.tolerance
            ),
            format!(
                "{:?} was {:?} plus or minus {:?}",
                actual, self.expected, self.tolerance
            ),
        )
    }
}

impl Matcher<f32> for Within {
    fn apply(&self, actual: &f32) -> MatchResult {
        Matcher::<f64>::apply(self, &f64::from(*actual))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextOp {
    StartWith,
    EndWith,
    Include,
}

/// Substring matcher over anything string-like.
#[derive(Debug, Clone)]
pub struct Text {
    expected: String,
    op: TextOp,
}

/// Matches strings starting with `prefix`.
pub fn start_with(prefix: impl Into<String>) -> Text {
    Text {
        expected: prefix.into(),
        op: TextOp::StartWith,
    }
}

/// Matches strings ending with `suffix`.
pub fn end_with(suffix: impl Into<String>) -> Text {
    Text {
        expected: suffix.into(),
        op: TextOp::EndWith,
    }
}

/// Matches strings containing `needle`.
pub fn include_substring(needle: impl Into<String>) -> Text {
    Text {
        expected: needle.into(),
        op: TextOp::Include,
    }
}

impl<S: AsRef<str> + ?Sized> Matcher<S> for Text {
    fn apply(&self, actual: &S) -> MatchResult {
        let actual = actual.as_ref();
        let (matches, phrase) = match self.op {
            TextOp::StartWith => (actual.starts_with(&self.expected), "start with"),
            TextOp::EndWith => (actual.ends_with(&self.expected), "end with"),
            TextOp::Include => (actual.contains(&self.expected), "include substring"),
        };
        MatchResult::new(
            matches,
            format!("{:?} did not {} {:?}", actual, phrase, self.expected),
            format!("{:?} did {} {:?}", actual, phrase, self.expected),
        )
    }
}

/// Matches `Some(_)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeSome;

/// Matches `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeNone;

/// Matches `Some(_)`.
pub fn be_some() -> BeSome {
    BeSome
}

/// Matches `None`.
pub fn be_none() -> BeNone {
    BeNone
}

impl<T: Debug> Matcher<Option<T>> for BeSome {
    fn apply(&self, actual: &Option<T>) -> MatchResult {
        MatchResult::new(
            actual.is_some(),
            format!("{} was not defined", render(actual)),
            format!("{} was defined", render(actual)),
        )
    }
}

impl<T: Debug> Matcher<Option<T>> for BeNone {
    fn apply(&self, actual: &Option<T>) -> MatchResult {
        BeSome.apply(actual).negate()
    }
}

/// Matches `Ok(_)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeOk;

/// Matches `Err(_)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeErr;

/// Matches `Ok(_)`.
pub fn be_ok() -> BeOk {
    BeOk
}

/// Matches `Err(_)`.
pub fn be_err() -> BeErr {
    BeErr
}

impl<T: Debug, E: Debug> Matcher<Result<T, E>> for BeOk {
    fn apply(&self, actual: &Result<T, E>) -> MatchResult {
        MatchResult::new(
            actual.is_ok(),
            format!("{} was not a success", render(actual)),
            format!("{} was a success", render(actual)),
        )
    }
}

impl<T: Debug, E: Debug> Matcher<Result<T, E>> for BeErr {
    fn apply(&self, actual: &Result<T, E>) -> MatchResult {
        BeOk.apply(actual).negate()
    }
}

/// Boolean predicate with a description, built by [`satisfy`].
#[derive(Clone)]
pub struct Satisfy<F> {
    description: String,
    predicate: F,
}

impl<F> std::fmt::Debug for Satisfy<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Satisfy({:?})", self.description)
    }
}

/// Lifts a boolean closure into a matcher.
pub fn satisfy<T: ?Sized, F: Fn(&T) -> bool>(
    description: impl Into<String>,
    predicate: F,
) -> Satisfy<F> {
    Satisfy {
        description: description.into(),
        predicate,
    }
}

impl<T: Debug + ?Sized, F: Fn(&T) -> bool> Matcher<T> for Satisfy<F> {
    fn apply(&self, actual: &T) -> MatchResult {
        let rendered = render(actual);
        MatchResult::new(
            (self.predicate)(actual),
            format!("{} did not satisfy {}", rendered, self.description),
            format!("{} satisfied {}", rendered, self.description),
        )
    }
}
