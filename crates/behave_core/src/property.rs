//! Named boolean properties and runtime type checks.
//!
//! Types opt in to [`have_property`] by implementing [`HasProperty`]; an
//! inspection over an unknown property stops with
//! [`BehaveError::PropertyNotFound`]. For
//! properties defined outside the type, a [`PropertyRegistry`] maps names to
//! predicates and resolves them up front, so a typo is reported as
//! [`BehaveError::PropertyNotFound`] before any element is inspected.

use crate::error::{BehaveError, Result};
use crate::matcher::{Composable, MatchError, MatchResult, Matcher};
use crate::message::render;
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A type exposing boolean properties by name.
pub trait HasProperty {
    /// The value of property `name`, or `None` when the type has no such
    /// property.
    fn property(&self, name: &str) -> Option<bool>;
}

impl HasProperty for Path {
    fn property(&self, name: &str) -> Option<bool> {
        match name {
            "file" => Some(self.is_file()),
            "directory" => Some(self.is_dir()),
            "absolute" => Some(self.is_absolute()),
            "relative" => Some(self.is_relative()),
            "exists" => Some(self.exists()),
            _ => None,
        }
    }
}

impl HasProperty for PathBuf {
    fn property(&self, name: &str) -> Option<bool> {
        self.as_path().property(name)
    }
}

impl HasProperty for str {
    fn property(&self, name: &str) -> Option<bool> {
        match name {
            "empty" => Some(self.is_empty()),
            "blank" => Some(self.trim().is_empty()),
            "ascii" => Some(self.is_ascii()),
            "lowercase" => Some(!self.chars().any(char::is_uppercase)),
            "uppercase" => Some(!self.chars().any(char::is_lowercase)),
            _ => None,
        }
    }
}

impl HasProperty for String {
    fn property(&self, name: &str) -> Option<bool> {
        self.as_str().property(name)
    }
}

impl<P: HasProperty + ?Sized> HasProperty for &P {
    fn property(&self, name: &str) -> Option<bool> {
        (**self).property(name)
    }
}

/// Matches values whose property `name` is true.
#[derive(Debug, Clone)]
pub struct HaveProperty {
    name: String,
}

/// Matches values whose [`HasProperty`] property `name` is true. An unknown
/// property is an error, also under [`not`](crate::not) or the `no`
/// quantifier.
pub fn have_property(name: impl Into<String>) -> HaveProperty {
    HaveProperty { name: name.into() }
}

impl<T: HasProperty + Debug + ?Sized> Matcher<T> for HaveProperty {
    fn apply(&self, actual: &T) -> MatchResult {
        let rendered = render(actual);
        match actual.property(&self.name) {
            Some(value) => MatchResult::new(
                value,
                format!("{} was not {}", rendered, self.name),
                format!("{} was {}", rendered, self.name),
            ),
            None => MatchResult::unresolved(MatchError::PropertyNotFound {
                name: self.name.clone(),
                type_name: type_name::<T>().to_string(),
            }),
        }
    }
}

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Named predicates over `T`, resolved by name.
pub struct PropertyRegistry<T: ?Sized> {
    properties: BTreeMap<String, Predicate<T>>,
}

impl<T: ?Sized> Default for PropertyRegistry<T> {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized> Clone for PropertyRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            properties: self.properties.clone(),
        }
    }
}

impl<T: ?Sized> Debug for PropertyRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: ?Sized> PropertyRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `predicate` under `name`, replacing any previous entry.
    pub fn with<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.properties.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Registered property names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Resolves `name` into a matcher.
    pub fn be(&self, name: &str) -> Result<NamedProperty<T>> {
        let predicate =
            self.properties
                .get(name)
                .cloned()
                .ok_or_else(|| BehaveError::PropertyNotFound {
                    name: name.to_string(),
                    type_name: type_name::<T>().to_string(),
                })?;
        Ok(NamedProperty {
            name: name.to_string(),
            predicate,
        })
    }
}

/// A property resolved from a [`PropertyRegistry`].
pub struct NamedProperty<T: ?Sized> {
    name: String,
    predicate: Predicate<T>,
}

impl<T: ?Sized> Clone for NamedProperty<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: ?Sized> Debug for NamedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedProperty({:?})", self.name)
    }
}

impl<T: Debug + ?Sized> Matcher<T> for NamedProperty<T> {
    fn apply(&self, actual: &T) -> MatchResult {
        let rendered = render(actual);
        MatchResult::new(
            (self.predicate)(actual),
            format!("{} was not {}", rendered, self.name),
            format!("{} was {}", rendered, self.name),
        )
    }
}

/// Matches type-erased values holding a `U`.
pub struct BeA<U> {
    _target: PhantomData<fn() -> U>,
}

impl<U> Debug for BeA<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeA<{}>", type_name::<U>())
    }
}

impl<U> Clone for BeA<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for BeA<U> {}

/// Matches `dyn Any` values whose concrete type is `U`.
pub fn be_a<U: Any>() -> BeA<U> {
    BeA {
        _target: PhantomData,
    }
}

fn type_check<U: Any>(is_target: bool) -> MatchResult {
    MatchResult::new(
        is_target,
        format!("value was not a {}", type_name::<U>()),
        format!("value was a {}", type_name::<U>()),
    )
}

impl<U: Any> Matcher<dyn Any> for BeA<U> {
    fn apply(&self, actual: &dyn Any) -> MatchResult {
        type_check::<U>(actual.is::<U>())
    }
}

impl<U: Any> Matcher<dyn Any + Send> for BeA<U> {
    fn apply(&self, actual: &(dyn Any + Send)) -> MatchResult {
        type_check::<U>(actual.is::<U>())
    }
}

impl<U: Any> Matcher<Box<dyn Any>> for BeA<U> {
    fn apply(&self, actual: &Box<dyn Any>) -> MatchResult {
        type_check::<U>((**actual).is::<U>())
    }
}

impl Composable for HaveProperty {}
impl<T: ?Sized> Composable for NamedProperty<T> {}
impl<U> Composable for BeA<U> {}
