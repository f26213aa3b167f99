//! Failure message templates for quantified assertions.

use crate::config::InspectorConfig;
use crate::outcome::{AggregateResult, ElementOutcome};
use crate::quantifier::Quantifier;
use std::fmt::{Debug, Write};
use std::panic::{self, AssertUnwindSafe};

/// Stands in for a value whose `Debug` impl panicked.
pub(crate) const UNPRINTABLE: &str = "<unprintable value>";

/// Renders a value the way it appears in failure messages.
pub(crate) fn render<T: Debug + ?Sized>(value: &T) -> String {
    format!("{:?}", value)
}

/// Like [`render`], but a panicking `Debug` impl yields [`UNPRINTABLE`].
pub(crate) fn render_guarded<T: Debug + ?Sized>(value: &T) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| render(value)))
        .unwrap_or_else(|_| UNPRINTABLE.to_string())
}

/// "1 element", "2 elements".
fn elements(n: usize) -> String {
    if n == 1 {
        "1 element".to_string()
    } else {
        format!("{} elements", n)
    }
}

/// The outcomes that made `quantifier` fail over `aggregate`, in iteration
/// order. Depending on the quantifier these are failing or passing elements.
pub(crate) fn offending<'r>(
    quantifier: Quantifier,
    aggregate: &'r AggregateResult,
) -> &'r [ElementOutcome] {
    let passed = aggregate.passed_count();
    match quantifier {
        Quantifier::All | Quantifier::Every | Quantifier::AtLeast(_) => aggregate.failed(),
        Quantifier::AtMost(_) | Quantifier::No => aggregate.passed(),
        Quantifier::Exactly(k) if passed < k => aggregate.failed(),
        Quantifier::Between { from, .. } if passed < from => aggregate.failed(),
        Quantifier::Exactly(_) | Quantifier::Between { .. } => aggregate.passed(),
    }
}

/// Builds the message for a quantifier that was not satisfied.
pub(crate) fn failure_message(
    quantifier: Quantifier,
    aggregate: &AggregateResult,
    config: &InspectorConfig,
) -> String {
    let passed = aggregate.passed_count();
    let satisfied = format!("{} satisfied the predicate", elements(passed));
    let header = match quantifier {
        Quantifier::All | Quantifier::Every | Quantifier::No => {
            format!("{} failed, because", quantifier)
        }
        Quantifier::AtLeast(k) => format!(
            "{} failed, because {}, expected at least {}",
            quantifier, satisfied, k
        ),
        Quantifier::AtMost(k) => format!(
            "{} failed, because {}, expected at most {}",
            quantifier, satisfied, k
        ),
        Quantifier::Exactly(k) => format!(
            "{} failed, because {}, expected exactly {}",
            quantifier, satisfied, k
        ),
        Quantifier::Between { from, to } => format!(
            "{} failed, because {}, expected between {} and {}",
            quantifier, satisfied, from, to
        ),
    };

    let shown = match quantifier {
        Quantifier::All | Quantifier::No => 1,
        _ => config.display_limit,
    };
    let offending = offending(quantifier, aggregate);

    let mut message = header;
    if !offending.is_empty() {
        message.push(':');
        for outcome in offending.iter().take(shown) {
            let _ = write!(
                message,
                "\n  at index {}, {}",
                outcome.index,
                indent(&outcome.message)
            );
        }
        if offending.len() > shown && !matches!(quantifier, Quantifier::All | Quantifier::No) {
            let _ = write!(message, "\n  ... and {} more", offending.len() - shown);
        }
    }
    let _ = write!(
        message,
        "\nin {}",
        render_collection(aggregate, config.max_rendered_elements)
    );
    message
}

/// Indents continuation lines of nested messages under their element line.
fn indent(message: &str) -> String {
    message.replace('\n', "\n    ")
}

fn render_collection(aggregate: &AggregateResult, max: usize) -> String {
    let values = aggregate.values();
    if values.len() <= max {
        return format!("[{}]", values.join(", "));
    }
    format!(
        "[{}, ... ({} more)]",
        values[..max].join(", "),
        values.len() - max
    )
}
