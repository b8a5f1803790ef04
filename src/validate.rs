use jiff::civil;

use crate::rule::{End, Frequency, Rule};

/// A user-level problem in a rule.
///
/// These are the problems an otherwise well-formed rule can have, like a
/// zero interval typed during editing or loaded from an older record.
/// Structurally broken rules (an unknown recurrence type, a weekday bitmask
/// out of range) never get this far. They are rejected outright when the
/// rule is deserialized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    /// The repeat interval is zero or negative.
    InvalidInterval,
    /// The occurrence count is zero or negative.
    InvalidOccurrenceCount,
    /// The until-date falls before the start of the series.
    UntilBeforeStart,
    /// A weekly rule with no weekday selected.
    NoWeekdaySelected,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match *self {
            Violation::InvalidInterval => {
                "interval: must be a positive whole number"
            }
            Violation::InvalidOccurrenceCount => {
                "occurrences: must be a positive whole number"
            }
            Violation::UntilBeforeStart => {
                "until: must fall on or after the start date"
            }
            Violation::NoWeekdaySelected => {
                "days: at least one weekday must be selected"
            }
        })
    }
}

/// Checks a rule for user-level problems.
///
/// All problems are reported at once rather than stopping at the first, in
/// a fixed order: interval, weekday selection, end condition. A rule with
/// no recurrence has nothing to check and is always fine.
///
/// This never blocks anything by itself. Editing operations accept rules
/// that fail validation so that a half-finished edit behaves the same as a
/// questionable record loaded from storage. It's up to callers to decide
/// when a clean bill of health is required.
pub fn validate(
    rule: &Rule,
    anchor: civil::Date,
) -> Result<(), Vec<Violation>> {
    let Some(frequency) = rule.frequency() else {
        return Ok(());
    };
    let mut violations = vec![];
    if rule.interval() < 1 {
        violations.push(Violation::InvalidInterval);
    }
    if frequency == Frequency::Weekly
        && rule.days().is_none_or(|days| days.is_empty())
    {
        violations.push(Violation::NoWeekdaySelected);
    }
    match rule.end() {
        End::Never => {}
        End::Count(n) => {
            if n < 1 {
                violations.push(Violation::InvalidOccurrenceCount);
            }
        }
        End::Until(date) => {
            if date < anchor {
                violations.push(Violation::UntilBeforeStart);
            }
        }
    }
    if violations.is_empty() { Ok(()) } else { Err(violations) }
}
