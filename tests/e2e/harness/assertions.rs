use anyhow::{anyhow, bail, Result};
use behave_core::{no, satisfy, Outcome, SuiteReport, TestResult};

/// Declarative assertions on a suite run
pub enum Assertion {
    // Per-test
    Outcome { test: String, outcome: Outcome },
    MessageContains { test: String, text: String },
    NotReported { test: String },

    // Whole run
    Summary {
        passed: usize,
        failed: usize,
        pending: usize,
        ignored: usize,
    },
    RunOrder(Vec<String>),
    Log(Vec<String>),

    // Custom
    Custom(Box<dyn Fn(&SuiteReport) -> Result<()>>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outcome { test, outcome } => {
                write!(f, "Outcome {{ test: {:?}, outcome: {} }}", test, outcome)
            }
            Self::MessageContains { test, text } => {
                write!(f, "MessageContains {{ test: {:?}, text: {:?} }}", test, text)
            }
            Self::NotReported { test } => write!(f, "NotReported {{ test: {:?} }}", test),
            Self::Summary {
                passed,
                failed,
                pending,
                ignored,
            } => write!(
                f,
                "Summary {{ passed: {}, failed: {}, pending: {}, ignored: {} }}",
                passed, failed, pending, ignored
            ),
            Self::RunOrder(names) => write!(f, "RunOrder({:?})", names),
            Self::Log(entries) => write!(f, "Log({:?})", entries),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

impl Assertion {
    /// Check this assertion against a finished run and the fixture log
    pub fn check(&self, report: &SuiteReport, log: &[String]) -> Result<()> {
        match self {
            Self::Outcome { test, outcome } => {
                let result = find(report, test)?;
                if result.outcome != *outcome {
                    bail!(
                        "Expected '{}' to be {}, but it was {} ({})",
                        test,
                        outcome,
                        result.outcome,
                        result.message.as_deref().unwrap_or("no message")
                    );
                }
                Ok(())
            }
            Self::MessageContains { test, text } => {
                let result = find(report, test)?;
                let message = result
                    .message
                    .as_deref()
                    .ok_or_else(|| anyhow!("'{}' has no failure message", test))?;
                if !message.contains(text.as_str()) {
                    bail!(
                        "Message of '{}' does not contain {:?}:\n{}",
                        test,
                        text,
                        message
                    );
                }
                Ok(())
            }
            Self::NotReported { test } => {
                let named = satisfy(format!("named {:?}", test), |r: &TestResult| {
                    r.name == *test
                });
                no(&report.results)
                    .check(named)
                    .map_err(|_| anyhow!("'{}' was reported but should be deselected", test))
            }
            Self::Summary {
                passed,
                failed,
                pending,
                ignored,
            } => {
                let actual = (report.passed, report.failed, report.pending, report.ignored);
                if actual != (*passed, *failed, *pending, *ignored) {
                    bail!(
                        "Expected {} passed, {} failed, {} pending, {} ignored; got {}",
                        passed,
                        failed,
                        pending,
                        ignored,
                        report.summary()
                    );
                }
                Ok(())
            }
            Self::RunOrder(expected) => {
                let actual: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
                if actual != *expected {
                    bail!("Expected run order {:?}, got {:?}", expected, actual);
                }
                Ok(())
            }
            Self::Log(expected) => {
                if log != expected.as_slice() {
                    bail!("Expected fixture log {:?}, got {:?}", expected, log);
                }
                Ok(())
            }
            Self::Custom(check) => check(report),
        }
    }
}

fn find<'r>(report: &'r SuiteReport, test: &str) -> Result<&'r TestResult> {
    report
        .results
        .iter()
        .find(|r| r.name == test)
        .ok_or_else(|| anyhow!("No result for test '{}'", test))
}
