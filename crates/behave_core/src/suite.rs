//! Test registration in several spec styles.
//!
//! A [`Suite`] keeps a stack of enclosing scopes (`describe`, `feature`,
//! `when`); each registered test's full name is its scopes joined with its
//! own name, and full names must be unique within the suite.
//!
//! ```
//! use behave_core::{all, be_gt, Suite};
//!
//! let mut suite = Suite::new("numbers");
//! suite
//!     .describe("positive numbers", |s| {
//!         s.it("are greater than zero", |_| all(&[1, 2, 3]).check(be_gt(0)))?;
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(suite.names(), vec!["positive numbers are greater than zero"]);
//! ```

use crate::error::{BehaveError, Result};
use crate::fixture::{Fixture, FixturePipeline, TestContext};
use crate::tags::IGNORE_TAG;
use std::collections::HashSet;
use std::fmt;

/// Body of a registered test.
pub type TestBody = Box<dyn FnMut(&mut TestContext) -> Result<()>>;

/// Marks the current test as not yet written.
///
/// ```
/// use behave_core::{pending, Suite};
///
/// let mut suite = Suite::new("todo");
/// suite.test("handles unicode", |_| pending()).unwrap();
/// ```
pub fn pending() -> Result<()> {
    Err(BehaveError::Pending)
}

/// A registered test.
pub struct TestCase {
    name: String,
    tags: Vec<String>,
    pub(crate) body: TestBody,
    pub(crate) fixtures: FixturePipeline,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("fixtures", &self.fixtures)
            .finish()
    }
}

impl TestCase {
    /// Full name, including enclosing scopes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags attached to this test.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the test is tagged to be skipped.
    pub fn is_ignored(&self) -> bool {
        self.tags.iter().any(|t| t == IGNORE_TAG)
    }

    /// Attaches a tag.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Wraps this test in `fixture`, inside any suite-level fixtures.
    pub fn with_fixture(&mut self, fixture: impl Fixture + 'static) -> &mut Self {
        self.fixtures.push(fixture);
        self
    }
}

/// An ordered collection of tests.
pub struct Suite {
    name: String,
    scopes: Vec<String>,
    pub(crate) tests: Vec<TestCase>,
    registered: HashSet<String>,
    pub(crate) fixtures: FixturePipeline,
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .field("fixtures", &self.fixtures)
            .finish()
    }
}

impl Suite {
    /// Creates an empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scopes: Vec::new(),
            tests: Vec::new(),
            registered: HashSet::new(),
            fixtures: FixturePipeline::new(),
        }
    }

    /// Suite name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered tests, in registration order.
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Full names of the registered tests.
    pub fn names(&self) -> Vec<&str> {
        self.tests.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if no test is registered.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Wraps every test of the suite in `fixture`.
    pub fn with_fixture(&mut self, fixture: impl Fixture + 'static) -> &mut Self {
        self.fixtures.push(fixture);
        self
    }

    /// Registers a test under the current scopes.
    pub fn test<F>(&mut self, name: impl AsRef<str>, body: F) -> Result<&mut TestCase>
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        let full_name = self.qualify(name.as_ref());
        if !self.registered.insert(full_name.clone()) {
            return Err(BehaveError::DuplicateTest(full_name));
        }
        self.tests.push(TestCase {
            name: full_name,
            tags: Vec::new(),
            body: Box::new(body),
            fixtures: FixturePipeline::new(),
        });
        let index = self.tests.len() - 1;
        Ok(&mut self.tests[index])
    }

    /// Registers a test that is reported as ignored instead of run.
    pub fn ignore<F>(&mut self, name: impl AsRef<str>, body: F) -> Result<&mut TestCase>
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        let case = self.test(name, body)?;
        case.tag(IGNORE_TAG);
        Ok(case)
    }

    /// Opens a `describe` block.
    pub fn describe<F>(&mut self, subject: impl Into<String>, block: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.scoped(subject.into(), block)
    }

    /// Registers a test inside a `describe` block.
    pub fn it<F>(&mut self, name: impl AsRef<str>, body: F) -> Result<&mut TestCase>
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        self.test(name, body)
    }

    /// Opens a `Feature:` block.
    pub fn feature<F>(&mut self, name: impl AsRef<str>, block: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.scoped(format!("Feature: {}", name.as_ref()), block)
    }

    /// Registers a `Scenario:` test.
    pub fn scenario<F>(&mut self, name: impl AsRef<str>, body: F) -> Result<&mut TestCase>
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        self.test(format!("Scenario: {}", name.as_ref()), body)
    }

    /// Opens a `when` block.
    pub fn when<F>(&mut self, condition: impl AsRef<str>, block: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.scoped(format!("when {}", condition.as_ref()), block)
    }

    /// Registers a `should` test.
    pub fn should<F>(&mut self, behaviour: impl AsRef<str>, body: F) -> Result<&mut TestCase>
    where
        F: FnMut(&mut TestContext) -> Result<()> + 'static,
    {
        self.test(format!("should {}", behaviour.as_ref()), body)
    }

    fn scoped<F>(&mut self, scope: String, block: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.scopes.push(scope);
        let result = block(self);
        self.scopes.pop();
        result
    }

    fn qualify(&self, name: &str) -> String {
        if self.scopes.is_empty() {
            return name.to_string();
        }
        format!("{} {}", self.scopes.join(" "), name)
    }
}
