//! Collection capabilities and the matchers that dispatch over them.
//!
//! `contain`, `have_size`, `have_length` and friends work the same whether
//! the inspected value is a slice, an array, a `Vec`, a set or a map, which
//! lets a quantified assertion apply them to every element of a
//! collection-of-collections:
//!
//! ```
//! use behave_core::{all, contain, have_length, Composable};
//!
//! let rows = vec![vec![1, 2, 3], vec![3, 4, 5]];
//! all(&rows).should(have_length(3).and(contain(3)));
//! ```

use crate::equality::{DefaultEquality, Equality};
use crate::matcher::{Composable, MatchResult, Matcher};
use crate::message::render;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

/// Types with a number of elements.
pub trait HasSize {
    /// Number of elements.
    fn size(&self) -> usize;
}

/// Sequences with a length.
///
/// Strings report their length in characters.
pub trait HasLength {
    /// Length of the sequence.
    fn length(&self) -> usize;
}

/// Collections that can be searched for an element.
pub trait Container<T> {
    /// Whether an element equal to `element` under `equality` is present.
    fn contains_with(&self, element: &T, equality: &dyn Equality<T>) -> bool;
}

/// Maps that can be searched by key.
pub trait KeyedContainer<K> {
    /// Whether `key` is present.
    fn contains_key(&self, key: &K) -> bool;
}

/// Maps that can be searched by value.
pub trait ValueContainer<V> {
    /// Whether a value equal to `value` under `equality` is present.
    fn contains_value_with(&self, value: &V, equality: &dyn Equality<V>) -> bool;
}

macro_rules! sequence_capabilities {
    ($($ty:ty => [$($gen:tt)*]),* $(,)?) => {
        $(
            impl<$($gen)*> HasSize for $ty {
                fn size(&self) -> usize {
                    self.len()
                }
            }

            impl<$($gen)*> HasLength for $ty {
                fn length(&self) -> usize {
                    self.len()
                }
            }

            impl<$($gen)*> Container<T> for $ty {
                fn contains_with(&self, element: &T, equality: &dyn Equality<T>) -> bool {
                    self.iter().any(|candidate| equality.are_equal(candidate, element))
                }
            }
        )*
    };
}

sequence_capabilities! {
    [T] => [T],
    Vec<T> => [T],
    VecDeque<T> => [T],
    LinkedList<T> => [T],
}

impl<T, const N: usize> HasSize for [T; N] {
    fn size(&self) -> usize {
        N
    }
}

impl<T, const N: usize> HasLength for [T; N] {
    fn length(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Container<T> for [T; N] {
    fn contains_with(&self, element: &T, equality: &dyn Equality<T>) -> bool {
        self.as_slice().contains_with(element, equality)
    }
}

impl<T> HasSize for BinaryHeap<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T, S> HasSize for HashSet<T, S> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T, S> Container<T> for HashSet<T, S> {
    fn contains_with(&self, element: &T, equality: &dyn Equality<T>) -> bool {
        self.iter().any(|candidate| equality.are_equal(candidate, element))
    }
}

impl<T> HasSize for BTreeSet<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Container<T> for BTreeSet<T> {
    fn contains_with(&self, element: &T, equality: &dyn Equality<T>) -> bool {
        self.iter().any(|candidate| equality.are_equal(candidate, element))
    }
}

impl<K, V, S> HasSize for HashMap<K, V, S> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> KeyedContainer<K> for HashMap<K, V, S> {
    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }
}

impl<K, V, S> ValueContainer<V> for HashMap<K, V, S> {
    fn contains_value_with(&self, value: &V, equality: &dyn Equality<V>) -> bool {
        self.values().any(|candidate| equality.are_equal(candidate, value))
    }
}

impl<K, V> HasSize for BTreeMap<K, V> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<K: Ord, V> KeyedContainer<K> for BTreeMap<K, V> {
    fn contains_key(&self, key: &K) -> bool {
        BTreeMap::contains_key(self, key)
    }
}

impl<K, V> ValueContainer<V> for BTreeMap<K, V> {
    fn contains_value_with(&self, value: &V, equality: &dyn Equality<V>) -> bool {
        self.values().any(|candidate| equality.are_equal(candidate, value))
    }
}

impl HasSize for str {
    fn size(&self) -> usize {
        self.chars().count()
    }
}

impl HasLength for str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl HasSize for String {
    fn size(&self) -> usize {
        self.as_str().size()
    }
}

impl HasLength for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl<C: HasSize + ?Sized> HasSize for &C {
    fn size(&self) -> usize {
        (**self).size()
    }
}

impl<C: HasLength + ?Sized> HasLength for &C {
    fn length(&self) -> usize {
        (**self).length()
    }
}

/// Element membership, built by [`contain`] and [`contain_with`].
#[derive(Debug, Clone)]
pub struct Contain<T, E = DefaultEquality> {
    element: T,
    equality: E,
}

/// Matches collections containing `element`.
pub fn contain<T>(element: T) -> Contain<T> {
    Contain {
        element,
        equality: DefaultEquality,
    }
}

/// Matches collections containing an element equal to `element` under
/// `equality`.
pub fn contain_with<T, E: Equality<T>>(element: T, equality: E) -> Contain<T, E> {
    Contain { element, equality }
}

impl<C, T, E> Matcher<C> for Contain<T, E>
where
    C: Container<T> + Debug + ?Sized,
    T: Debug,
    E: Equality<T>,
{
    fn apply(&self, actual: &C) -> MatchResult {
        let rendered = render(actual);
        let element = render(&self.element);
        MatchResult::new(
            actual.contains_with(&self.element, &self.equality),
            format!("{} did not contain element {}", rendered, element),
            format!("{} contained element {}", rendered, element),
        )
    }
}

/// Key membership, built by [`contain_key`].
#[derive(Debug, Clone)]
pub struct ContainKey<K> {
    key: K,
}

/// Matches maps containing `key`.
pub fn contain_key<K>(key: K) -> ContainKey<K> {
    ContainKey { key }
}

/// Value membership, built by [`contain_value`].
#[derive(Debug, Clone)]
pub struct ContainValue<V, E = DefaultEquality> {
    value: V,
    equality: E,
}

/// Matches maps containing `value`.
pub fn contain_value<V>(value: V) -> ContainValue<V> {
    ContainValue {
        value,
        equality: DefaultEquality,
    }
}

impl<M, K> Matcher<M> for ContainKey<K>
where
    M: KeyedContainer<K> + Debug + ?Sized,
    K: Debug,
{
    fn apply(&self, actual: &M) -> MatchResult {
        let rendered = render(actual);
        let key = render(&self.key);
        MatchResult::new(
            actual.contains_key(&self.key),
            format!("{} did not contain key {}", rendered, key),
            format!("{} contained key {}", rendered, key),
        )
    }
}

impl<M, V, E> Matcher<M> for ContainValue<V, E>
where
    M: ValueContainer<V> + Debug + ?Sized,
    V: Debug,
    E: Equality<V>,
{
    fn apply(&self, actual: &M) -> MatchResult {
        let rendered = render(actual);
        let value = render(&self.value);
        MatchResult::new(
            actual.contains_value_with(&self.value, &self.equality),
            format!("{} did not contain value {}", rendered, value),
            format!("{} contained value {}", rendered, value),
        )
    }
}

/// Size check, built by [`have_size`].
#[derive(Debug, Clone, Copy)]
pub struct HaveSize(usize);

/// Matches collections with exactly `expected` elements.
pub fn have_size(expected: usize) -> HaveSize {
    HaveSize(expected)
}

impl<C: HasSize + Debug + ?Sized> Matcher<C> for HaveSize {
    fn apply(&self, actual: &C) -> MatchResult {
        let size = actual.size();
        let rendered = render(actual);
        MatchResult::new(
            size == self.0,
            format!("{} had size {} instead of expected size {}", rendered, size, self.0),
            format!("{} had size {}", rendered, self.0),
        )
    }
}

/// Length check, built by [`have_length`].
#[derive(Debug, Clone, Copy)]
pub struct HaveLength(usize);

/// Matches sequences of length `expected`.
pub fn have_length(expected: usize) -> HaveLength {
    HaveLength(expected)
}

impl<C: HasLength + Debug + ?Sized> Matcher<C> for HaveLength {
    fn apply(&self, actual: &C) -> MatchResult {
        let length = actual.length();
        let rendered = render(actual);
        MatchResult::new(
            length == self.0,
            format!(
                "{} had length {} instead of expected length {}",
                rendered, length, self.0
            ),
            format!("{} had length {}", rendered, self.0),
        )
    }
}

/// Iteration count check, built by [`have_count`].
#[derive(Debug, Clone, Copy)]
pub struct HaveCount(usize);

/// Matches any traversable yielding exactly `expected` items.
///
/// Falls back to counting iterations, so it works for collections that
/// implement neither [`HasSize`] nor [`HasLength`].
pub fn have_count(expected: usize) -> HaveCount {
    HaveCount(expected)
}

impl<C> Matcher<C> for HaveCount
where
    C: Debug + ?Sized,
    for<'a> &'a C: IntoIterator,
{
    fn apply(&self, actual: &C) -> MatchResult {
        let count = IntoIterator::into_iter(actual).count();
        let rendered = render(actual);
        MatchResult::new(
            count == self.0,
            format!(
                "{} yielded {} items instead of expected {}",
                rendered, count, self.0
            ),
            format!("{} yielded {} items", rendered, self.0),
        )
    }
}

/// Emptiness check, built by [`be_empty`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BeEmpty;

/// Matches collections without elements.
pub fn be_empty() -> BeEmpty {
    BeEmpty
}

impl<C: HasSize + Debug + ?Sized> Matcher<C> for BeEmpty {
    fn apply(&self, actual: &C) -> MatchResult {
        let rendered = render(actual);
        MatchResult::new(
            actual.size() == 0,
            format!("{} was not empty", rendered),
            format!("{} was empty", rendered),
        )
    }
}

impl<T, E> Composable for Contain<T, E> {}
impl<K> Composable for ContainKey<K> {}
impl<V, E> Composable for ContainValue<V, E> {}
impl Composable for HaveSize {}
impl Composable for HaveLength {}
impl Composable for HaveCount {}
impl Composable for BeEmpty {}
