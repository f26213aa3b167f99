//! Behave Core Library
//!
//! Building blocks for behaviour-driven tests:
//! - Quantified assertions over collections (`all`, `every`, `at_least`,
//!   `at_most`, `exactly`, `between`, `no`)
//! - Composable matchers with readable failure messages
//! - Equality strategies, named properties and collection capabilities
//! - Fixtures, tagged suites and a runner
//!
//! # Quick Start
//!
//! ```
//! use behave_core::{all, at_least, be_gt, no};
//!
//! let readings = vec![3, 7, 12];
//!
//! all(&readings).should(be_gt(0));
//! at_least(2, &readings).should(be_gt(5));
//! no(&readings).should(be_gt(100));
//! ```
//!
//! # Features
//!
//! ## Structured failures
//!
//! `check` returns a [`BehaveError::AssertionFailed`] instead of panicking,
//! carrying the offending elements and the first underlying cause:
//!
//! ```
//! use behave_core::{all, be_gt};
//!
//! let err = all(&[1, -2, 3]).check(be_gt(0)).unwrap_err();
//! let failure = err.as_failure().unwrap();
//! assert_eq!(failure.failed_elements()[0].index, 1);
//! assert!(failure.message().contains("-2 was not greater than 0"));
//! ```
//!
//! ## Nested collections
//!
//! Inspections nest, and the inner failure becomes the outer cause:
//!
//! ```
//! use behave_core::{all, be_gt, exactly};
//!
//! let matrix = vec![vec![1, 2], vec![3, 4]];
//! let result = all(&matrix).check_each(|row| exactly(1, row).check(be_gt(2)));
//! assert!(result.is_err());
//! ```
//!
//! ## Suites
//!
//! ```
//! use behave_core::{all, be_gt, CollectingReporter, Runner, Suite};
//!
//! let mut suite = Suite::new("inventory");
//! suite
//!     .feature("stock levels", |s| {
//!         s.scenario("every shelf is stocked", |_| all(&[4, 9]).check(be_gt(0)))?
//!             .tag("smoke");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let report = Runner::default().run(&mut suite, &mut CollectingReporter::default());
//! assert!(report.is_success());
//! ```

mod capability;
mod config;
mod equality;
mod error;
mod failure;
mod fixture;
mod inspector;
mod location;
mod matcher;
mod message;
mod outcome;
mod property;
mod quantifier;
mod runner;
mod suite;
mod tags;

pub use capability::{
    be_empty, contain, contain_key, contain_value, contain_with, have_count, have_length,
    have_size, BeEmpty, Contain, ContainKey, ContainValue, Container, HasLength, HasSize,
    HaveCount, HaveLength, HaveSize, KeyedContainer, ValueContainer,
};
pub use config::{Config, InspectorConfig, RunnerConfig, CONFIG_FILE_NAME};
pub use equality::{CaseInsensitive, DefaultEquality, Equality, Tolerance, TrimmedEquality};
pub use error::{BehaveError, Result};
pub use failure::{FailureCause, TestFailure};
pub use fixture::{
    run_fixtures, BeforeAndAfter, Fixture, FixturePipeline, TempDirFixture, TestContext,
};
pub use inspector::{all, at_least, at_most, between, every, exactly, inspect, no, Inspection};
pub use location::SourceLocation;
pub use matcher::{
    be_err, be_ge, be_gt, be_le, be_lt, be_none, be_ok, be_some, be_within, end_with, equal,
    equal_with, include_substring, not, satisfy, start_with, And, BeErr, BeNone, BeOk, BeSome,
    Composable, Equal, MatchError, MatchResult, Matcher, Not, Or, Ordered, Satisfy, Text, Within,
};
pub use outcome::{AggregateResult, ElementOutcome};
pub use property::{
    be_a, have_property, BeA, HasProperty, HaveProperty, NamedProperty, PropertyRegistry,
};
pub use quantifier::{Quantifier, QuantifierSpec};
pub use runner::{
    CollectingReporter, Outcome, Reporter, Runner, SuiteReport, TestResult, TracingReporter,
};
pub use suite::{pending, Suite, TestBody, TestCase};
pub use tags::{NameFilter, Selection, TagFilter, IGNORE_TAG};
