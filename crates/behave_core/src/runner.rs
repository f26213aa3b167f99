//! Executes a [`Suite`] and reports per-test outcomes.

use crate::config::RunnerConfig;
use crate::error::{BehaveError, Result};
use crate::fixture::{run_fixtures, Fixture, TestContext};
use crate::suite::Suite;
use crate::tags::Selection;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Final state of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Pending,
    Ignored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Ignored => "ignored",
        };
        f.write_str(label)
    }
}

/// Result of running one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Full test name.
    pub name: String,
    /// Tags of the test.
    pub tags: Vec<String>,
    /// Final state.
    pub outcome: Outcome,
    /// Failure message, for failed tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where the failing assertion was made, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Wall time spent in fixtures and body.
    pub duration_ms: u64,
}

impl TestResult {
    /// Builds a result without timing information.
    pub fn new(name: impl Into<String>, tags: Vec<String>, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            tags,
            outcome,
            message: None,
            location: None,
            duration_ms: 0,
        }
    }

    /// Attaches a failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Summary of a suite run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite: String,
    /// Number of passed tests.
    pub passed: usize,
    /// Number of failed tests.
    pub failed: usize,
    /// Number of pending tests.
    pub pending: usize,
    /// Number of ignored tests.
    pub ignored: usize,
    /// Per-test results, in run order.
    pub results: Vec<TestResult>,
}

impl SuiteReport {
    /// Creates an empty report for `suite`.
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            ..Self::default()
        }
    }

    /// Adds a result and updates the counts.
    pub fn record(&mut self, result: TestResult) {
        match result.outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Pending => self.pending += 1,
            Outcome::Ignored => self.ignored += 1,
        }
        self.results.push(result);
    }

    /// Number of reported tests.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no test failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Results of failed tests.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == Outcome::Failed)
    }

    /// Returns a one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} pending, {} ignored",
            self.passed, self.failed, self.pending, self.ignored
        )
    }
}

/// Receives results while a suite runs.
pub trait Reporter {
    /// Called before a selected test starts.
    fn test_started(&mut self, _name: &str) {}

    /// Called once per reported test.
    fn test_finished(&mut self, result: &TestResult);

    /// Called after the last test.
    fn suite_finished(&mut self, _report: &SuiteReport) {}
}

/// Keeps every result in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    /// Names of started tests, in order.
    pub started: Vec<String>,
    /// Finished results, in order.
    pub results: Vec<TestResult>,
}

impl Reporter for CollectingReporter {
    fn test_started(&mut self, name: &str) {
        self.started.push(name.to_string());
    }

    fn test_finished(&mut self, result: &TestResult) {
        self.results.push(result.clone());
    }
}

/// Emits results as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn test_started(&mut self, name: &str) {
        debug!(test = name, "test started");
    }

    fn test_finished(&mut self, result: &TestResult) {
        match result.outcome {
            Outcome::Failed => warn!(
                test = %result.name,
                message = result.message.as_deref().unwrap_or(""),
                "test failed"
            ),
            outcome => info!(test = %result.name, %outcome, "test finished"),
        }
    }

    fn suite_finished(&mut self, report: &SuiteReport) {
        info!(suite = %report.suite, summary = %report.summary(), "suite finished");
    }
}

/// Runs the selected tests of a suite.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    selection: Selection,
    fail_fast: bool,
}

impl Runner {
    /// Creates a runner from the `[runner]` configuration section.
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            selection: config.selection(),
            fail_fast: config.fail_fast,
        }
    }

    /// Replaces the test selection.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Stops after the first failing test.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Whether a test would be selected by this runner.
    pub fn selects(&self, name: &str, tags: &[String]) -> bool {
        self.selection.selects(name, tags)
    }

    /// Runs the suite. Unselected tests are left out of the report; tests
    /// tagged `ignore` are reported without running.
    pub fn run(&self, suite: &mut Suite, reporter: &mut dyn Reporter) -> SuiteReport {
        let mut report = SuiteReport::new(suite.name());
        let Suite {
            tests, fixtures, ..
        } = suite;

        for case in tests.iter_mut() {
            if !self.selection.selects(case.name(), case.tags()) {
                debug!(test = case.name(), "deselected");
                continue;
            }

            if case.is_ignored() {
                let result = TestResult::new(case.name(), case.tags().to_vec(), Outcome::Ignored);
                reporter.test_finished(&result);
                report.record(result);
                continue;
            }

            reporter.test_started(case.name());
            let mut ctx = TestContext::new(case.name(), case.tags().to_vec());
            let started = Instant::now();

            let mut layers: Vec<&mut dyn Fixture> = fixtures.layers();
            layers.extend(case.fixtures.layers());
            let body = &mut case.body;
            let outcome = run_fixtures(&mut layers, &mut ctx, |ctx| body(ctx));
            drop(layers);

            let mut result = classify(case.name(), case.tags().to_vec(), outcome);
            result.duration_ms = started.elapsed().as_millis() as u64;
            reporter.test_finished(&result);
            let failed = result.outcome == Outcome::Failed;
            report.record(result);

            if failed && self.fail_fast {
                info!(test = case.name(), "stopping after first failure");
                break;
            }
        }

        reporter.suite_finished(&report);
        report
    }
}

fn classify(name: &str, tags: Vec<String>, outcome: Result<()>) -> TestResult {
    match outcome {
        Ok(()) => TestResult::new(name, tags, Outcome::Passed),
        Err(BehaveError::Pending) => TestResult::new(name, tags, Outcome::Pending),
        Err(err) => {
            let location = err
                .as_failure()
                .and_then(|f| f.location())
                .map(|l| l.to_string());
            let mut result =
                TestResult::new(name, tags, Outcome::Failed).with_message(err.to_string());
            result.location = location;
            result
        }
    }
}
