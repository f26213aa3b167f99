//! Quantifiers governing how many elements must satisfy a predicate.

use crate::error::{BehaveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selection rule for a quantified assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantifier {
    /// Every element must pass; failures report the first failing element.
    All,
    /// Every element must pass; failures report every failing element.
    Every,
    /// At least `n` elements must pass.
    AtLeast(usize),
    /// At most `n` elements may pass.
    AtMost(usize),
    /// Exactly `n` elements must pass.
    Exactly(usize),
    /// The number of passing elements must lie in `from..=to`.
    Between {
        /// Inclusive lower bound.
        from: usize,
        /// Inclusive upper bound.
        to: usize,
    },
    /// No element may pass.
    No,
}

impl Quantifier {
    /// Rejects quantifiers whose parameters cannot describe any count.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Between { from, to } if from > to => Err(BehaveError::InvalidArgument(format!(
                "between requires from <= to, got from = {}, to = {}",
                from, to
            ))),
            _ => Ok(()),
        }
    }

    /// Whether `passed` passing elements out of `total` satisfy the rule.
    pub fn is_satisfied(&self, passed: usize, total: usize) -> bool {
        match *self {
            Self::All | Self::Every => passed == total,
            Self::AtLeast(k) => passed >= k,
            Self::AtMost(k) => passed <= k,
            Self::Exactly(k) => passed == k,
            Self::Between { from, to } => from <= passed && passed <= to,
            Self::No => passed == 0,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Every => f.write_str("every"),
            Self::AtLeast(k) => write!(f, "at_least({})", k),
            Self::AtMost(k) => write!(f, "at_most({})", k),
            Self::Exactly(k) => write!(f, "exactly({})", k),
            Self::Between { from, to } => write!(f, "between({}, {})", from, to),
            Self::No => f.write_str("no"),
        }
    }
}

/// Quantifier as written in configuration or check files.
///
/// Counts are signed here so that negative values can be reported as
/// [`BehaveError::InvalidArgument`] instead of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierSpec {
    /// `"all"`
    All,
    /// `"every"`
    Every,
    /// `{ at_least = n }`
    AtLeast(i64),
    /// `{ at_most = n }`
    AtMost(i64),
    /// `{ exactly = n }`
    Exactly(i64),
    /// `{ between = [from, to] }`
    Between(i64, i64),
    /// `"no"`
    No,
}

fn count(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        BehaveError::InvalidArgument(format!(
            "{} requires a non-negative count, got {}",
            name, value
        ))
    })
}

impl TryFrom<QuantifierSpec> for Quantifier {
    type Error = BehaveError;

    fn try_from(spec: QuantifierSpec) -> Result<Self> {
        let quantifier = match spec {
            QuantifierSpec::All => Self::All,
            QuantifierSpec::Every => Self::Every,
            QuantifierSpec::AtLeast(k) => Self::AtLeast(count("at_least", k)?),
            QuantifierSpec::AtMost(k) => Self::AtMost(count("at_most", k)?),
            QuantifierSpec::Exactly(k) => Self::Exactly(count("exactly", k)?),
            QuantifierSpec::Between(from, to) => Self::Between {
                from: count("between", from)?,
                to: count("between", to)?,
            },
            QuantifierSpec::No => Self::No,
        };
        quantifier.validate()?;
        Ok(quantifier)
    }
}
