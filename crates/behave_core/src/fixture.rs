//! Setup and teardown hooks around test bodies.
//!
//! Fixtures are composed explicitly into a [`FixturePipeline`]. Setups run
//! first-to-last, teardowns last-to-first, and only fixtures whose setup
//! succeeded are torn down. The body runs inside `catch_unwind`, so a
//! panicking body still gets its teardowns.

use crate::error::{BehaveError, Result};
use crate::failure::{FailureCause, TestFailure};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Per-test state shared between fixtures and the test body.
pub struct TestContext {
    name: String,
    tags: Vec<String>,
    resources: HashMap<TypeId, Box<dyn Any>>,
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("resources", &self.resources.len())
            .finish()
    }
}

impl TestContext {
    /// Creates a context for the test `name`.
    pub fn new(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            resources: HashMap::new(),
        }
    }

    /// Full name of the running test.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags of the running test.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the running test carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Stores a resource, returning the one it replaced.
    pub fn insert<R: Any>(&mut self, resource: R) -> Option<R> {
        self.resources
            .insert(TypeId::of::<R>(), Box::new(resource))
            .and_then(|old| old.downcast::<R>().ok())
            .map(|old| *old)
    }

    /// Borrows the resource of type `R`, if present.
    pub fn get<R: Any>(&self) -> Option<&R> {
        self.resources
            .get(&TypeId::of::<R>())
            .and_then(|r| r.downcast_ref::<R>())
    }

    /// Mutably borrows the resource of type `R`, if present.
    pub fn get_mut<R: Any>(&mut self) -> Option<&mut R> {
        self.resources
            .get_mut(&TypeId::of::<R>())
            .and_then(|r| r.downcast_mut::<R>())
    }

    /// Removes and returns the resource of type `R`.
    pub fn remove<R: Any>(&mut self) -> Option<R> {
        self.resources
            .remove(&TypeId::of::<R>())
            .and_then(|r| r.downcast::<R>().ok())
            .map(|r| *r)
    }

    /// Borrows the resource of type `R`, failing when no fixture provided it.
    pub fn resource<R: Any>(&self) -> Result<&R> {
        self.get::<R>().ok_or_else(|| {
            BehaveError::InvalidArgument(format!(
                "no resource of type {} in context of '{}'",
                type_name::<R>(),
                self.name
            ))
        })
    }
}

/// A setup/teardown pair wrapped around test bodies.
pub trait Fixture {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Runs before the body.
    fn setup(&mut self, ctx: &mut TestContext) -> Result<()>;

    /// Runs after the body, even when it failed.
    fn teardown(&mut self, _ctx: &mut TestContext) -> Result<()> {
        Ok(())
    }
}

/// An ordered stack of fixtures.
#[derive(Default)]
pub struct FixturePipeline {
    fixtures: Vec<Box<dyn Fixture>>,
}

impl fmt::Debug for FixturePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fixtures.iter().map(|f| f.name()))
            .finish()
    }
}

impl FixturePipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `fixture` as the innermost layer.
    pub fn with(mut self, fixture: impl Fixture + 'static) -> Self {
        self.push(fixture);
        self
    }

    /// Appends `fixture` as the innermost layer.
    pub fn push(&mut self, fixture: impl Fixture + 'static) {
        self.fixtures.push(Box::new(fixture));
    }

    /// Number of fixtures.
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Returns true if the pipeline has no fixtures.
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Fixture names, outermost first.
    pub fn names(&self) -> Vec<&str> {
        self.fixtures.iter().map(|f| f.name()).collect()
    }

    /// Runs `body` wrapped by every fixture.
    pub fn run<F>(&mut self, ctx: &mut TestContext, body: F) -> Result<()>
    where
        F: FnOnce(&mut TestContext) -> Result<()>,
    {
        let mut layers = self.layers();
        run_fixtures(&mut layers, ctx, body)
    }

    pub(crate) fn layers(&mut self) -> Vec<&mut dyn Fixture> {
        self.fixtures
            .iter_mut()
            .map(|f| f.as_mut() as &mut dyn Fixture)
            .collect()
    }
}

/// Runs `body` inside `fixtures`, outermost first.
///
/// Returns the body's error if it failed, otherwise the first teardown
/// error. A setup error skips the body and tears down only the fixtures
/// already set up.
pub fn run_fixtures<F>(
    fixtures: &mut [&mut dyn Fixture],
    ctx: &mut TestContext,
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut TestContext) -> Result<()>,
{
    let mut ready = 0;
    let mut setup_error = None;
    for fixture in fixtures.iter_mut() {
        debug!(test = %ctx.name(), fixture = fixture.name(), "fixture setup");
        if let Err(err) = fixture.setup(ctx) {
            setup_error = Some(wrap(fixture.name(), "setup", err));
            break;
        }
        ready += 1;
    }

    let body_result = match setup_error {
        Some(err) => Err(err),
        None => run_body(ctx, body),
    };

    let mut teardown_error = None;
    for fixture in fixtures[..ready].iter_mut().rev() {
        debug!(test = %ctx.name(), fixture = fixture.name(), "fixture teardown");
        if let Err(err) = fixture.teardown(ctx) {
            let err = wrap(fixture.name(), "teardown", err);
            warn!(test = %ctx.name(), error = %err, "teardown failed");
            teardown_error.get_or_insert(err);
        }
    }

    body_result?;
    match teardown_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn run_body<F>(ctx: &mut TestContext, body: F) -> Result<()>
where
    F: FnOnce(&mut TestContext) -> Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| body(ctx))) {
        Ok(result) => result,
        Err(payload) => {
            let cause = FailureCause::from_panic(payload);
            let message = match &cause {
                FailureCause::Panicked(message) => message.clone(),
                other => other.to_string(),
            };
            Err(TestFailure::new(message).with_cause(Some(cause)).into())
        }
    }
}

fn wrap(fixture: &str, phase: &'static str, err: BehaveError) -> BehaveError {
    match err {
        BehaveError::Fixture { .. } => err,
        other => BehaveError::Fixture {
            fixture: fixture.to_string(),
            phase,
            reason: other.to_string(),
        },
    }
}

type Hook = Box<dyn FnMut(&mut TestContext) -> Result<()>>;

/// A fixture built from closures.
pub struct BeforeAndAfter {
    name: String,
    before: Option<Hook>,
    after: Option<Hook>,
}

impl fmt::Debug for BeforeAndAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeforeAndAfter")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

impl BeforeAndAfter {
    /// Creates a fixture with no hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            after: None,
        }
    }

    /// Sets the hook run before each body.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    /// Sets the hook run after each body.
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }
}

impl Fixture for BeforeAndAfter {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, ctx: &mut TestContext) -> Result<()> {
        match self.before.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn teardown(&mut self, ctx: &mut TestContext) -> Result<()> {
        match self.after.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }
}

/// Provides a fresh [`TempDir`] per test, removed on teardown.
#[derive(Debug, Default)]
pub struct TempDirFixture;

impl TempDirFixture {
    /// Path of the directory provided to the running test.
    pub fn path(ctx: &TestContext) -> Result<&Path> {
        ctx.resource::<TempDir>().map(TempDir::path)
    }
}

impl Fixture for TempDirFixture {
    fn name(&self) -> &str {
        "temp-dir"
    }

    fn setup(&mut self, ctx: &mut TestContext) -> Result<()> {
        let dir = tempfile::Builder::new().prefix("behave-").tempdir()?;
        debug!(test = %ctx.name(), path = %dir.path().display(), "created temp dir");
        ctx.insert(dir);
        Ok(())
    }

    fn teardown(&mut self, ctx: &mut TestContext) -> Result<()> {
        match ctx.remove::<TempDir>() {
            Some(dir) => Ok(dir.close()?),
            None => Ok(()),
        }
    }
}
