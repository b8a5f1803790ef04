use jiff::civil;

use crate::{
    rule::{End, Frequency, Rule},
    validate,
    weekset::WeekdaySet,
    workweek::Workweek,
};

/// The structured facts behind a human readable description of a rule.
///
/// This is deliberately not a string. The cadence carries resolved facts
/// (which weekday set, which ordinal, which month) and leaves wording,
/// joining and date formatting to the presentation layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    pub cadence: Cadence,
    pub end: End,
}

/// The repeating pattern of a rule, classified for presentation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Cadence {
    Daily {
        interval: i64,
    },
    Weekly {
        interval: i64,
        days: WeeklyDays,
    },
    MonthlyByDate {
        interval: i64,
        day: i8,
    },
    MonthlyByWeekday {
        interval: i64,
        ordinal: i8,
        days: WeekdaySet,
    },
    YearlyByDate {
        month: i8,
        day: i8,
    },
    YearlyByWeekday {
        month: i8,
        ordinal: i8,
        days: WeekdaySet,
    },
}

/// A weekly selection, with the shapes that read better as a word than as
/// a list of weekday names picked out.
///
/// Workdays are classified against the configured workweek, so a Sunday
/// through Thursday shop sees its own mask described as workdays. The
/// weekend is the fixed Saturday and Sunday pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WeeklyDays {
    All,
    Workdays,
    Weekend,
    Set(WeekdaySet),
}

/// Distills a rule into the facts a description is built from.
///
/// Returns `None` when there is nothing to describe, i.e. the rule has no
/// recurrence. Callers must validate the rule first; handing an invalid
/// rule over here is a bug in the caller, asserted in debug builds and
/// degrading to `None` in release builds.
pub fn summarize(
    rule: &Rule,
    anchor: civil::Date,
    workweek: &Workweek,
) -> Option<Summary> {
    let frequency = rule.frequency()?;
    if let Err(violations) = validate::validate(rule, anchor) {
        debug_assert!(
            false,
            "cannot summarize an invalid rule: {violations:?}",
        );
        return None;
    }
    let interval = rule.interval();
    let cadence = match frequency {
        Frequency::Daily => Cadence::Daily { interval },
        Frequency::Weekly => {
            let days = rule.days()?;
            let days = if days == WeekdaySet::ALL {
                WeeklyDays::All
            } else if days == workweek.mask() {
                WeeklyDays::Workdays
            } else if days == WeekdaySet::WEEKEND {
                WeeklyDays::Weekend
            } else {
                WeeklyDays::Set(days)
            };
            Cadence::Weekly { interval, days }
        }
        Frequency::Monthly => {
            let day = rule.day_in_month()?;
            match rule.days() {
                None => Cadence::MonthlyByDate { interval, day },
                Some(days) => {
                    Cadence::MonthlyByWeekday { interval, ordinal: day, days }
                }
            }
        }
        Frequency::Yearly => {
            let month = rule.month()?;
            let day = rule.day_in_month()?;
            match rule.days() {
                None => Cadence::YearlyByDate { month, day },
                Some(days) => {
                    Cadence::YearlyByWeekday { month, ordinal: day, days }
                }
            }
        }
    };
    Some(Summary { cadence, end: rule.end() })
}
