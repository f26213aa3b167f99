use super::steps::{ScenarioStep, Style};
use super::workspace::TestWorkspace;
use anyhow::{anyhow, bail, Context, Result};
use behave_core::{
    BeforeAndAfter, CollectingReporter, Config, Runner, Suite, SuiteReport, TempDirFixture,
    TestBody, TestContext,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Shared record of fixture hook calls
pub type FixtureLog = Rc<RefCell<Vec<String>>>;

/// Executes scenarios against a real suite and runner
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    suite: Suite,
    log: FixtureLog,
    report: Option<SuiteReport>,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a new runner with initial files and an optional fixture directory
    pub fn new(
        name: &str,
        initial_files: HashMap<String, Vec<u8>>,
        fixture: Option<&str>,
    ) -> Result<Self> {
        let workspace = TestWorkspace::with_files(initial_files)?;
        if let Some(fixture) = fixture {
            workspace.copy_fixture(fixture)?;
        }

        let config = workspace.load_config()?;
        let mut suite = Suite::new(name);
        suite.with_fixture(workspace_fixture(config, workspace.path().to_path_buf()));

        Ok(Self {
            workspace,
            suite,
            log: FixtureLog::default(),
            report: None,
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: Vec<ScenarioStep>) -> Result<()> {
        for (i, step) in steps.into_iter().enumerate() {
            self.current_step = i;
            let description = format!("{:?}", step);
            self.execute_step(step)
                .with_context(|| format!("Step {}: {}", i, description))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::Register {
                style,
                name,
                tags,
                body,
            } => self.handle_register(style, &name, tags, body),
            ScenarioStep::TempDir => {
                self.ensure_not_run()?;
                self.suite.with_fixture(TempDirFixture);
                Ok(())
            }
            ScenarioStep::Recording { name } => {
                self.ensure_not_run()?;
                self.suite.with_fixture(recording_fixture(&name, &self.log));
                Ok(())
            }
            ScenarioStep::Run => self.handle_run(),
            ScenarioStep::Assert { assertion } => {
                if self.report.is_none() {
                    self.handle_run()?;
                }
                let report = self
                    .report
                    .as_ref()
                    .ok_or_else(|| anyhow!("Suite has not run"))?;
                let log = self.log.borrow();
                assertion.check(report, &log)
            }
        }
    }

    fn handle_register(
        &mut self,
        style: Style,
        name: &str,
        tags: Vec<String>,
        body: TestBody,
    ) -> Result<()> {
        self.ensure_not_run()?;
        let mut body = Some(body);
        let mut register = |suite: &mut Suite| -> behave_core::Result<()> {
            let body = body.take().expect("body registered once");
            let case = match &style {
                Style::Test => suite.test(name, body)?,
                Style::Ignored => suite.ignore(name, body)?,
                Style::Describe { .. } => suite.it(name, body)?,
                Style::Feature { .. } => suite.scenario(name, body)?,
                Style::When { .. } => suite.should(name, body)?,
            };
            for tag in &tags {
                case.tag(tag.as_str());
            }
            Ok(())
        };

        let suite = &mut self.suite;
        match &style {
            Style::Describe { subject } => suite.describe(subject.as_str(), register)?,
            Style::Feature { feature } => suite.feature(feature, register)?,
            Style::When { condition } => suite.when(condition, register)?,
            Style::Test | Style::Ignored => register(suite)?,
        }
        Ok(())
    }

    fn handle_run(&mut self) -> Result<()> {
        self.ensure_not_run()?;
        let config = self.workspace.load_config()?;
        let mut reporter = CollectingReporter::default();
        let report = Runner::new(&config.runner).run(&mut self.suite, &mut reporter);
        if reporter.results != report.results {
            bail!("Reporter and report disagree");
        }
        self.report = Some(report);
        Ok(())
    }

    fn ensure_not_run(&self) -> Result<()> {
        if self.report.is_some() {
            bail!("Suite has already run");
        }
        Ok(())
    }
}

/// Root directory of the scenario workspace, as a test context resource
#[derive(Debug, Clone)]
pub struct WorkspaceRoot(pub PathBuf);

/// Makes the workspace root and configuration available to test bodies
fn workspace_fixture(config: Config, root: PathBuf) -> BeforeAndAfter {
    BeforeAndAfter::new("workspace").before(move |ctx: &mut TestContext| {
        ctx.insert(config.clone());
        ctx.insert(WorkspaceRoot(root.clone()));
        Ok(())
    })
}

/// Appends "<name> setup <test>" and "<name> teardown <test>" to the log
fn recording_fixture(name: &str, log: &FixtureLog) -> BeforeAndAfter {
    let (before_name, after_name) = (name.to_string(), name.to_string());
    let (before_log, after_log) = (Rc::clone(log), Rc::clone(log));
    BeforeAndAfter::new(name)
        .before(move |ctx| {
            before_log
                .borrow_mut()
                .push(format!("{} setup {}", before_name, ctx.name()));
            Ok(())
        })
        .after(move |ctx| {
            after_log
                .borrow_mut()
                .push(format!("{} teardown {}", after_name, ctx.name()));
            Ok(())
        })
}
