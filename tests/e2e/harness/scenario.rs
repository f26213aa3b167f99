use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::{ScenarioStep, Style};
use behave_core::{Outcome, SuiteReport, TestContext, CONFIG_FILE_NAME};
use std::collections::HashMap;

/// Fluent DSL for building test scenarios
pub struct Scenario {
    name: String,
    initial_files: HashMap<String, Vec<u8>>,
    fixture: Option<String>,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            initial_files: HashMap::new(),
            fixture: None,
            steps: Vec::new(),
        }
    }

    // ===== Initial setup =====

    /// Add a single file to initial workspace
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.initial_files
            .insert(path.to_string(), content.to_vec());
        self
    }

    /// Write behave.toml into the initial workspace
    pub fn with_config(self, toml: &str) -> Self {
        self.with_file(CONFIG_FILE_NAME, toml.as_bytes())
    }

    /// Copy tests/fixtures/<name> into the workspace
    pub fn from_fixture(mut self, name: &str) -> Self {
        self.fixture = Some(name.to_string());
        self
    }

    // ===== Registration =====

    fn register<F>(mut self, style: Style, name: &str, body: F) -> Self
    where
        F: FnMut(&mut TestContext) -> behave_core::Result<()> + 'static,
    {
        self.steps.push(ScenarioStep::Register {
            style,
            name: name.to_string(),
            tags: Vec::new(),
            body: Box::new(body),
        });
        self
    }

    /// Register a top-level test
    pub fn test<F>(self, name: &str, body: F) -> Self
    where
        F: FnMut(&mut TestContext) -> behave_core::Result<()> + 'static,
    {
        self.register(Style::Test, name, body)
    }

    /// Register a test tagged as ignored
    pub fn ignored(self, name: &str) -> Self {
        self.register(Style::Ignored, name, |_| {
            panic!("ignored tests must not run")
        })
    }

    /// Register `it` inside `describe(subject)`
    pub fn describe_it<F>(self, subject: &str, name: &str, body: F) -> Self
    where
        F: FnMut(&mut TestContext) -> behave_core::Result<()> + 'static,
    {
        let style = Style::Describe {
            subject: subject.to_string(),
        };
        self.register(style, name, body)
    }

    /// Register a scenario inside `feature`
    pub fn feature_scenario<F>(self, feature: &str, name: &str, body: F) -> Self
    where
        F: FnMut(&mut TestContext) -> behave_core::Result<()> + 'static,
    {
        let style = Style::Feature {
            feature: feature.to_string(),
        };
        self.register(style, name, body)
    }

    /// Register `should` inside `when(condition)`
    pub fn when_should<F>(self, condition: &str, behaviour: &str, body: F) -> Self
    where
        F: FnMut(&mut TestContext) -> behave_core::Result<()> + 'static,
    {
        let style = Style::When {
            condition: condition.to_string(),
        };
        self.register(style, behaviour, body)
    }

    /// Tag the most recently registered test
    pub fn tagged(mut self, tag: &str) -> Self {
        let last = self
            .steps
            .iter_mut()
            .rev()
            .find_map(|step| match step {
                ScenarioStep::Register { tags, .. } => Some(tags),
                _ => None,
            });
        match last {
            Some(tags) => tags.push(tag.to_string()),
            None => panic!("tagged() called before any test was registered"),
        }
        self
    }

    // ===== Fixtures =====

    /// Give every test a fresh temporary directory
    pub fn with_temp_dir(mut self) -> Self {
        self.steps.push(ScenarioStep::TempDir);
        self
    }

    /// Wrap every test in a fixture that records its hook calls
    pub fn with_recording_fixture(mut self, name: &str) -> Self {
        self.steps.push(ScenarioStep::Recording {
            name: name.to_string(),
        });
        self
    }

    // ===== Execution =====

    /// Run the suite now; later assertions see this run
    pub fn run_suite(mut self) -> Self {
        self.steps.push(ScenarioStep::Run);
        self
    }

    // ===== Assertions =====

    fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert the outcome of one test
    pub fn assert_outcome(self, test: &str, outcome: Outcome) -> Self {
        self.assert(Assertion::Outcome {
            test: test.to_string(),
            outcome,
        })
    }

    /// Assert a test passed
    pub fn assert_passed(self, test: &str) -> Self {
        self.assert_outcome(test, Outcome::Passed)
    }

    /// Assert a test failed
    pub fn assert_failed(self, test: &str) -> Self {
        self.assert_outcome(test, Outcome::Failed)
    }

    /// Assert a failure message contains `text`
    pub fn assert_message_contains(self, test: &str, text: &str) -> Self {
        self.assert(Assertion::MessageContains {
            test: test.to_string(),
            text: text.to_string(),
        })
    }

    /// Assert a test was deselected
    pub fn assert_not_reported(self, test: &str) -> Self {
        self.assert(Assertion::NotReported {
            test: test.to_string(),
        })
    }

    /// Assert the run counts
    pub fn assert_summary(
        self,
        passed: usize,
        failed: usize,
        pending: usize,
        ignored: usize,
    ) -> Self {
        self.assert(Assertion::Summary {
            passed,
            failed,
            pending,
            ignored,
        })
    }

    /// Assert the reported tests, in order
    pub fn assert_run_order(self, names: &[&str]) -> Self {
        self.assert(Assertion::RunOrder(
            names.iter().map(|n| n.to_string()).collect(),
        ))
    }

    /// Assert the recorded fixture hook calls, in order
    pub fn assert_log(self, entries: &[&str]) -> Self {
        self.assert(Assertion::Log(
            entries.iter().map(|e| e.to_string()).collect(),
        ))
    }

    /// Custom check against the report
    pub fn assert_custom<F>(self, check: F) -> Self
    where
        F: Fn(&SuiteReport) -> anyhow::Result<()> + 'static,
    {
        self.assert(Assertion::Custom(Box::new(check)))
    }

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner =
            match ScenarioRunner::new(&self.name, self.initial_files, self.fixture.as_deref()) {
                Ok(r) => r,
                Err(e) => {
                    return ScenarioResult {
                        name: self.name,
                        success: false,
                        steps_executed: 0,
                        failure_step: Some(0),
                        error: Some(format!("Failed to create runner: {}", e)),
                    }
                }
            };

        let total = self.steps.len();
        match runner.execute(self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: total,
                failure_step: None,
                error: None,
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
