//! Declarative checks loaded from TOML.
//!
//! ```toml
//! [[check]]
//! name = "latencies stay low"
//! tags = ["perf"]
//! quantifier = { at_least = 2 }
//! values = [12, 48, 230]
//! expect = { lt = 100 }
//! ```

use behave_core::{
    be_a, be_ge, be_gt, be_le, be_lt, contain, contain_key, equal, have_length, have_size,
    include_substring, inspect, not, BehaveError, Composable, InspectorConfig, MatchResult,
    Matcher, Quantifier, QuantifierSpec, Suite,
};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A value under test, rendered as JSON in messages.
#[derive(Clone, PartialEq)]
pub struct CheckValue(pub Value);

impl fmt::Debug for CheckValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type names accepted by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Number,
    String,
    Array,
    Object,
}

/// Predicate tree of a check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    Gt(Number),
    Ge(Number),
    Lt(Number),
    Le(Number),
    Eq(Value),
    Kind(ValueKind),
    Contains(Value),
    Length(usize),
    Not(Box<Expect>),
    AllOf(Vec<Expect>),
    AnyOf(Vec<Expect>),
}

/// One `[[check]]` entry, validated.
#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub tags: Vec<String>,
    pub quantifier: Quantifier,
    pub values: Vec<CheckValue>,
    pub expect: Expect,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckFileToml {
    #[serde(default, rename = "check")]
    checks: Vec<CheckToml>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckToml {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    quantifier: Option<QuantifierSpec>,
    values: Vec<Value>,
    expect: Expect,
}

/// Reads and validates a check file.
pub fn load(path: &Path) -> behave_core::Result<Vec<Check>> {
    let content = std::fs::read_to_string(path)?;
    parse(&content, path)
}

/// Parses check file content; `path` is only used in errors.
pub fn parse(content: &str, path: &Path) -> behave_core::Result<Vec<Check>> {
    let invalid = |reason: String| BehaveError::CheckFile {
        path: PathBuf::from(path),
        reason,
    };

    let file: CheckFileToml = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
    let mut checks = Vec::with_capacity(file.checks.len());
    for raw in file.checks {
        let quantifier = Quantifier::try_from(raw.quantifier.unwrap_or(QuantifierSpec::All))
            .map_err(|e| invalid(format!("check '{}': {}", raw.name, e)))?;
        validate(&raw.expect)
            .map_err(|reason| invalid(format!("check '{}': {}", raw.name, reason)))?;
        checks.push(Check {
            name: raw.name,
            tags: raw.tags,
            quantifier,
            values: raw.values.into_iter().map(CheckValue).collect(),
            expect: raw.expect,
        });
    }
    debug!(path = %path.display(), checks = checks.len(), "loaded check file");
    Ok(checks)
}

fn validate(expect: &Expect) -> Result<(), String> {
    match expect {
        Expect::Not(inner) => validate(inner),
        Expect::AllOf(list) => list.iter().try_for_each(validate),
        Expect::AnyOf(list) if list.is_empty() => {
            Err("any_of needs at least one predicate".to_string())
        }
        Expect::AnyOf(list) => list.iter().try_for_each(validate),
        _ => Ok(()),
    }
}

/// Registers every check as a test of a new suite.
pub fn into_suite(
    name: &str,
    checks: Vec<Check>,
    config: InspectorConfig,
) -> behave_core::Result<Suite> {
    let mut suite = Suite::new(name);
    for check in checks {
        let matcher = matcher(&check.expect);
        let quantifier = check.quantifier;
        let values = check.values;
        let case = suite.test(&check.name, move |_| {
            inspect(quantifier, &values)
                .with_config(config)
                .check(&matcher)
        })?;
        for tag in check.tags {
            case.tag(tag);
        }
    }
    Ok(suite)
}

/// Builds the matcher described by `expect`.
pub fn matcher(expect: &Expect) -> Box<dyn Matcher<CheckValue>> {
    match expect {
        Expect::Gt(bound) => Compare::new(Op::Gt, bound).boxed(),
        Expect::Ge(bound) => Compare::new(Op::Ge, bound).boxed(),
        Expect::Lt(bound) => Compare::new(Op::Lt, bound).boxed(),
        Expect::Le(bound) => Compare::new(Op::Le, bound).boxed(),
        Expect::Eq(value) => equal(CheckValue(value.clone())).boxed(),
        Expect::Kind(kind) => OfKind(*kind).boxed(),
        Expect::Contains(needle) => Contains(needle.clone()).boxed(),
        Expect::Length(n) => Length(*n).boxed(),
        Expect::Not(inner) => not(matcher(inner)).boxed(),
        Expect::AllOf(list) => list
            .iter()
            .map(matcher)
            .reduce(|acc, next| acc.and(next).boxed())
            .unwrap_or_else(|| Always.boxed()),
        Expect::AnyOf(list) => list
            .iter()
            .map(matcher)
            .reduce(|acc, next| acc.or(next).boxed())
            .unwrap_or_else(|| not(Always).boxed()),
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Op {
    fn apply<T: PartialOrd + fmt::Debug>(self, actual: &T, bound: T) -> MatchResult {
        match self {
            Self::Gt => be_gt(bound).apply(actual),
            Self::Ge => be_ge(bound).apply(actual),
            Self::Lt => be_lt(bound).apply(actual),
            Self::Le => be_le(bound).apply(actual),
        }
    }
}

/// Numeric comparison; integers compare exactly, everything else as `f64`.
#[derive(Debug)]
struct Compare {
    op: Op,
    bound: Number,
}

impl Compare {
    fn new(op: Op, bound: &Number) -> Self {
        Self {
            op,
            bound: bound.clone(),
        }
    }
}

impl Matcher<CheckValue> for Compare {
    fn apply(&self, actual: &CheckValue) -> MatchResult {
        let Value::Number(n) = &actual.0 else {
            return MatchResult::new(
                false,
                format!("{:?} was not a number", actual),
                format!("{:?} was a number", actual),
            );
        };
        match (n.as_i64(), self.bound.as_i64()) {
            (Some(value), Some(bound)) => self.op.apply(&value, bound),
            _ => {
                let value = n.as_f64().unwrap_or(f64::NAN);
                let bound = self.bound.as_f64().unwrap_or(f64::NAN);
                self.op.apply(&value, bound)
            }
        }
    }
}

/// Type check through `be_a` on the value's native Rust form.
#[derive(Debug)]
struct OfKind(ValueKind);

fn to_any(value: &Value) -> Box<dyn Any> {
    match value {
        Value::Null => Box::new(()),
        Value::Bool(b) => Box::new(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Box::new(i),
            None => Box::new(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Box::new(s.clone()),
        Value::Array(items) => Box::new(items.clone()),
        Value::Object(map) => Box::new(map.clone()),
    }
}

impl Matcher<CheckValue> for OfKind {
    fn apply(&self, actual: &CheckValue) -> MatchResult {
        let native = to_any(&actual.0);
        let result = match self.0 {
            ValueKind::Null => be_a::<()>().apply(&native),
            ValueKind::Bool => be_a::<bool>().apply(&native),
            ValueKind::Integer => be_a::<i64>().apply(&native),
            ValueKind::Number => be_a::<i64>().or(be_a::<f64>()).apply(&native),
            ValueKind::String => be_a::<String>().apply(&native),
            ValueKind::Array => be_a::<Vec<Value>>().apply(&native),
            ValueKind::Object => be_a::<serde_json::Map<String, Value>>().apply(&native),
        };
        let kind = format!("{:?}", self.0).to_lowercase();
        MatchResult::new(
            result.matches,
            format!("{:?} was not of kind {}", actual, kind),
            format!("{:?} was of kind {}", actual, kind),
        )
    }
}

fn entries(map: &serde_json::Map<String, Value>) -> BTreeMap<&str, CheckValue> {
    map.iter()
        .map(|(k, v)| (k.as_str(), CheckValue(v.clone())))
        .collect()
}

/// Membership for arrays, substrings for strings, keys for objects.
#[derive(Debug)]
struct Contains(Value);

impl Matcher<CheckValue> for Contains {
    fn apply(&self, actual: &CheckValue) -> MatchResult {
        match (&actual.0, &self.0) {
            (Value::Array(items), needle) => {
                let items: Vec<CheckValue> = items.iter().cloned().map(CheckValue).collect();
                contain(CheckValue(needle.clone())).apply(&items)
            }
            (Value::String(s), Value::String(needle)) => {
                include_substring(needle.as_str()).apply(s)
            }
            (Value::Object(map), Value::String(key)) => {
                contain_key(key.as_str()).apply(&entries(map))
            }
            _ => MatchResult::new(
                false,
                format!("{:?} cannot contain {:?}", actual, CheckValue(self.0.clone())),
                format!("{:?} contained {:?}", actual, CheckValue(self.0.clone())),
            ),
        }
    }
}

/// Length of arrays and strings, size of objects.
#[derive(Debug)]
struct Length(usize);

impl Matcher<CheckValue> for Length {
    fn apply(&self, actual: &CheckValue) -> MatchResult {
        match &actual.0 {
            Value::Array(items) => {
                let items: Vec<CheckValue> = items.iter().cloned().map(CheckValue).collect();
                have_length(self.0).apply(&items)
            }
            Value::String(s) => have_length(self.0).apply(s),
            Value::Object(map) => have_size(self.0).apply(&entries(map)),
            _ => MatchResult::new(
                false,
                format!("{:?} has no length", actual),
                format!("{:?} has a length", actual),
            ),
        }
    }
}

/// Matches everything; the identity of an empty `all_of`.
#[derive(Debug)]
struct Always;

impl Matcher<CheckValue> for Always {
    fn apply(&self, actual: &CheckValue) -> MatchResult {
        MatchResult::new(
            true,
            format!("{:?} did not match", actual),
            format!("{:?} matched", actual),
        )
    }
}
