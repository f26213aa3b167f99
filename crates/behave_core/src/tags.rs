//! Tag- and name-based test selection.

use std::collections::BTreeSet;

/// Tests carrying this tag are reported as ignored instead of being run.
pub const IGNORE_TAG: &str = "ignore";

/// Include/exclude rule over test tags.
///
/// With a non-empty include set a test is selected only if it carries at
/// least one included tag. Any excluded tag deselects the test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl TagFilter {
    /// Creates a filter from include and exclude tag lists.
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// A filter that selects everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a tag to the include set.
    pub fn include(mut self, tag: impl Into<String>) -> Self {
        self.include.insert(tag.into());
        self
    }

    /// Adds a tag to the exclude set.
    pub fn exclude(mut self, tag: impl Into<String>) -> Self {
        self.exclude.insert(tag.into());
        self
    }

    /// Whether a test with `tags` passes this filter.
    pub fn selects(&self, tags: &[String]) -> bool {
        if !self.include.is_empty() && !tags.iter().any(|t| self.include.contains(t)) {
            return false;
        }
        !tags.iter().any(|t| self.exclude.contains(t))
    }
}

/// Include/exclude rule over fully qualified test names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    /// Patterns for tests to be included.
    pub include: Vec<String>,
    /// Patterns for tests to be excluded.
    pub exclude: Vec<String>,
    /// Compare whole names instead of substrings.
    pub exact: bool,
}

impl NameFilter {
    /// Whether a test named `qualified_name` passes this filter.
    pub fn selects(&self, qualified_name: &str) -> bool {
        if self.include.is_empty() && self.exclude.is_empty() {
            return true;
        }

        // Include filters switch to opt-in mode.
        if !self.include.is_empty() && !self.matches(qualified_name, &self.include) {
            return false;
        }

        !(!self.exclude.is_empty() && self.matches(qualified_name, &self.exclude))
    }

    fn matches(&self, qualified_name: &str, filters: &[String]) -> bool {
        if self.exact {
            filters.iter().any(|f| f == qualified_name)
        } else {
            filters.iter().any(|f| qualified_name.contains(f.as_str()))
        }
    }
}

/// Combined tag and name selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Tag rule.
    pub tags: TagFilter,
    /// Name rule.
    pub names: NameFilter,
}

impl Selection {
    /// Whether a test passes both the name and the tag rule.
    pub fn selects(&self, qualified_name: &str, tags: &[String]) -> bool {
        self.names.selects(qualified_name) && self.tags.selects(tags)
    }
}
