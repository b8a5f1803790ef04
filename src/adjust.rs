use jiff::civil;

use crate::{
    rule::{End, Frequency, Rule, ordinal_week},
    weekset::WeekdaySet,
};

/// The outcome of re-anchoring a rule to a new start date.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Adjusted {
    /// The rule with its pattern following the new anchor.
    pub rule: Rule,
    /// Whether the repeat pattern itself changed. Callers use this to tell
    /// the user their selection was rewritten. Dropping an until-date that
    /// fell before the new anchor is not counted; that cleanup happens
    /// quietly.
    pub auto_changed: bool,
}

/// Rewrites a rule's pattern after its series anchor moved.
///
/// The pattern follows the anchor: a weekly weekday set rotates by the day
/// delta, a monthly or yearly pattern is recomputed from the new date, and
/// a yearly rule re-pins its month. A rule with no recurrence is returned
/// untouched, and a daily rule has no pattern to follow.
///
/// Rotation means a move of a whole number of weeks leaves a weekly rule
/// alone, and moving the anchor away and back restores the original set.
/// `auto_changed` reports value changes, not the move itself, so a move
/// that happens to land on the same pattern reports `false`.
///
/// Whatever the frequency, an until-date that now falls before the anchor
/// is dropped and the rule reverts to never ending.
pub fn anchor_moved(
    rule: &Rule,
    old: civil::Date,
    new: civil::Date,
) -> Adjusted {
    let Some(frequency) = rule.frequency() else {
        return Adjusted { rule: rule.clone(), auto_changed: false };
    };
    let mut adjusted = rule.clone();
    let mut auto_changed = false;
    match frequency {
        Frequency::Daily => {}
        Frequency::Weekly => {
            // A weekly rule with no selection has nothing to rotate.
            if let Some(days) = adjusted.days() {
                let shift = (new - old).get_days();
                let rotated = days.rotated(shift);
                if rotated != days {
                    log::trace!(
                        "anchor moved from {old} to {new}, \
                         rotating weekday set {days} to {rotated}",
                    );
                    adjusted.set_days(Some(rotated));
                    adjusted.rederive_every_weekday();
                    auto_changed = true;
                }
            }
        }
        Frequency::Monthly | Frequency::Yearly => {
            if adjusted.days().is_some() {
                // Repeat by weekday: the Nth weekday of the new anchor.
                let ordinal = Some(ordinal_week(new));
                let days = Some(WeekdaySet::single(new.weekday()));
                if adjusted.day_in_month() != ordinal
                    || adjusted.days() != days
                {
                    adjusted.set_day_in_month(ordinal);
                    adjusted.set_days(days);
                    auto_changed = true;
                }
            } else if adjusted.day_in_month() != Some(new.day()) {
                // Repeat by date: the new anchor's day of the month.
                adjusted.set_day_in_month(Some(new.day()));
                auto_changed = true;
            }
            if frequency == Frequency::Yearly
                && adjusted.month() != Some(new.month())
            {
                adjusted.set_month(Some(new.month()));
                auto_changed = true;
            }
        }
    }
    if let End::Until(until) = adjusted.end() {
        if until < new {
            log::debug!(
                "dropping until date {until}, which falls before \
                 the new anchor {new}",
            );
            adjusted.set_end(End::Never);
        }
    }
    Adjusted { rule: adjusted, auto_changed }
}
