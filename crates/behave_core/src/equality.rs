//! Equality strategies threaded through matcher construction.
//!
//! Matchers such as [`equal_with`](crate::equal_with) and
//! [`contain_with`](crate::contain_with) take an explicit strategy instead of
//! relying on `PartialEq`, so callers can compare floats with a tolerance or
//! strings without regard to case.

/// Decides whether two values are equal.
pub trait Equality<T: ?Sized> {
    /// Whether `left` and `right` are equal under this strategy.
    fn are_equal(&self, left: &T, right: &T) -> bool;

    /// Short description appended to failure messages, if the strategy is
    /// not plain `PartialEq`.
    fn describe(&self) -> Option<String> {
        None
    }
}

/// Equality according to `PartialEq`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEquality;

impl<T: PartialEq + ?Sized> Equality<T> for DefaultEquality {
    fn are_equal(&self, left: &T, right: &T) -> bool {
        left == right
    }
}

/// Floating point equality within an absolute tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Largest accepted absolute difference.
    pub epsilon: f64,
}

impl Tolerance {
    /// Creates a tolerance; the sign of `epsilon` is ignored.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }
}

impl Equality<f64> for Tolerance {
    fn are_equal(&self, left: &f64, right: &f64) -> bool {
        (left - right).abs() <= self.epsilon
    }

    fn describe(&self) -> Option<String> {
        Some(format!("within {:?}", self.epsilon))
    }
}

impl Equality<f32> for Tolerance {
    fn are_equal(&self, left: &f32, right: &f32) -> bool {
        (f64::from(*left) - f64::from(*right)).abs() <= self.epsilon
    }

    fn describe(&self) -> Option<String> {
        Equality::<f64>::describe(self)
    }
}

/// String equality ignoring case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl Equality<str> for CaseInsensitive {
    fn are_equal(&self, left: &str, right: &str) -> bool {
        left.to_lowercase() == right.to_lowercase()
    }

    fn describe(&self) -> Option<String> {
        Some("ignoring case".to_string())
    }
}

impl Equality<String> for CaseInsensitive {
    fn are_equal(&self, left: &String, right: &String) -> bool {
        Equality::<str>::are_equal(self, left, right)
    }

    fn describe(&self) -> Option<String> {
        Equality::<str>::describe(self)
    }
}

/// String equality after trimming surrounding whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimmedEquality;

impl Equality<str> for TrimmedEquality {
    fn are_equal(&self, left: &str, right: &str) -> bool {
        left.trim() == right.trim()
    }

    fn describe(&self) -> Option<String> {
        Some("after trimming".to_string())
    }
}

impl Equality<String> for TrimmedEquality {
    fn are_equal(&self, left: &String, right: &String) -> bool {
        Equality::<str>::are_equal(self, left, right)
    }

    fn describe(&self) -> Option<String> {
        Equality::<str>::describe(self)
    }
}
