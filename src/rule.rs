use {
    anyhow::Context,
    jiff::{Span, Unit, civil},
};

use crate::{weekset::WeekdaySet, workweek::Workweek};

/// A recurrence rule for a calendar event or task.
///
/// A rule describes a repeating date pattern ("every Tuesday and Thursday,"
/// "the last workday of the month," "yearly on May 4th for 10 occurrences")
/// relative to an anchor date: the start of the series. The anchor is not
/// part of the rule. It is owned by the event the rule belongs to and is
/// passed in to every operation that needs it.
///
/// A rule is a value. Every editing operation takes `&self` and returns a
/// new rule, so callers replace their copy rather than mutate it in place.
///
/// A rule may be in a state that fails validation (say, a non-positive
/// interval loaded from storage). That's deliberate: validation is a
/// separate non-blocking pass so that callers can show every problem at
/// once. Only structurally nonsensical rules are unrepresentable, either by
/// the type layout (the end condition is an enum, so "both an until-date
/// and an occurrence count" cannot exist) or by rejection when
/// deserializing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    /// How often the series repeats. `None` means no recurrence at all, in
    /// which case every other field is at its cleared default.
    frequency: Option<Frequency>,
    /// The "daily on workdays" shorthand. Only meaningful for weekly rules.
    /// Never persisted; re-derived from the serialized weekday mask.
    every_weekday: bool,
    /// Repeat every N units of `frequency`. Pinned to 1 for yearly rules
    /// and while `every_weekday` is set.
    interval: i64,
    /// The weekday set of a weekly rule, or the single weekday of a
    /// monthly/yearly rule repeating by weekday. Absence on a monthly or
    /// yearly rule means it repeats by date instead.
    days: Option<WeekdaySet>,
    /// For monthly/yearly rules: the calendar day (1..=31) when repeating
    /// by date, or the ordinal week (1..=5) when repeating by weekday.
    day_in_month: Option<i8>,
    /// The month (1..=12) of a yearly rule. The serialized form is
    /// zero-based.
    month: Option<i8>,
    /// When the series stops.
    end: End,
}

impl Rule {
    /// Returns a rule with no recurrence.
    ///
    /// This is both the initial state of a fresh event and the result of
    /// disabling recurrence on an existing one. All pattern fields are
    /// cleared, not retained.
    pub fn none() -> Rule {
        Rule {
            frequency: None,
            every_weekday: false,
            interval: 1,
            days: None,
            day_in_month: None,
            month: None,
            end: End::Never,
        }
    }

    /// Returns the default rule created when recurrence is first enabled:
    /// weekly, every one week, on the anchor's weekday, never ending.
    pub fn weekly(anchor: civil::Date) -> Rule {
        Rule {
            frequency: Some(Frequency::Weekly),
            every_weekday: false,
            interval: 1,
            days: Some(WeekdaySet::single(anchor.weekday())),
            day_in_month: None,
            month: None,
            end: End::Never,
        }
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    #[cfg(test)]
    pub fn every_weekday(&self) -> bool {
        self.every_weekday
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn days(&self) -> Option<WeekdaySet> {
        self.days
    }

    pub fn day_in_month(&self) -> Option<i8> {
        self.day_in_month
    }

    /// The month (1..=12) of a yearly rule.
    pub fn month(&self) -> Option<i8> {
        self.month
    }

    pub fn end(&self) -> End {
        self.end
    }

    /// The by-date/by-weekday sub-mode of a monthly or yearly rule, derived
    /// from whether a weekday set is present. `None` for every other
    /// frequency.
    #[cfg(test)]
    pub fn repeat_by(&self) -> Option<RepeatBy> {
        match self.frequency {
            Some(Frequency::Monthly) | Some(Frequency::Yearly) => {
                Some(if self.days.is_some() {
                    RepeatBy::Weekday
                } else {
                    RepeatBy::Date
                })
            }
            _ => None,
        }
    }

    /// Changes the repeat cadence, populating defaults for fields that
    /// become relevant and clearing fields that become irrelevant.
    ///
    /// A monthly or yearly target keeps an existing by-weekday pattern
    /// (ordinal plus weekday) when one is already set, e.g. when toggling
    /// monthly to yearly and back. Otherwise it defaults to repeating by
    /// date on the anchor's day of the month. Choosing the same frequency
    /// again is a no-op.
    pub fn with_frequency(
        &self,
        choice: FrequencyChoice,
        anchor: civil::Date,
        workweek: &Workweek,
    ) -> Rule {
        let mut rule = self.clone();
        // Shorthand bookkeeping comes first: entering "daily on workdays"
        // selects the workweek mask and pins the interval, while leaving it
        // drops the mask so the weekly default below can take over.
        match choice {
            FrequencyChoice::Weekdays => {
                rule.days = Some(workweek.mask());
                rule.every_weekday = true;
                rule.interval = 1;
            }
            _ => {
                if rule.every_weekday {
                    rule.days = None;
                }
                rule.every_weekday = false;
            }
        }
        rule.frequency = Some(choice.frequency());
        // A rule that never had a day-of-month keeps nothing for the
        // monthly/yearly branches: it starts over in by-date mode on the
        // anchor. One that had it keeps both it and any weekday set.
        let (day_in_month, ordinal_days) = match rule.day_in_month {
            None => (anchor.day(), None),
            Some(day) => (day, rule.days),
        };
        match choice.frequency() {
            Frequency::Daily => {
                rule.days = None;
                rule.day_in_month = None;
                rule.month = None;
            }
            Frequency::Weekly => {
                rule.days = rule
                    .days
                    .or_else(|| Some(WeekdaySet::single(anchor.weekday())));
                rule.day_in_month = None;
                rule.month = None;
            }
            Frequency::Monthly => {
                rule.days = ordinal_days;
                rule.day_in_month = Some(day_in_month);
                rule.month = None;
            }
            Frequency::Yearly => {
                rule.days = ordinal_days;
                rule.day_in_month = Some(day_in_month);
                rule.month = rule.month.or(Some(anchor.month()));
                rule.interval = 1;
            }
        }
        rule
    }

    /// Switches a monthly or yearly rule between repeating by date and
    /// repeating by weekday, recomputing the pattern from the anchor.
    ///
    /// By date repeats on the anchor's day of the month. By weekday repeats
    /// on the Nth occurrence of the anchor's weekday, where N is the
    /// anchor's ordinal week within its month. Yearly rules also re-pin the
    /// month to the anchor's.
    pub fn with_repeat_by(
        &self,
        by: RepeatBy,
        anchor: civil::Date,
    ) -> anyhow::Result<Rule> {
        let mut rule = self.clone();
        let month = match rule.frequency {
            Some(Frequency::Yearly) => Some(anchor.month()),
            Some(Frequency::Monthly) => None,
            _ => anyhow::bail!(
                "repeating by date or by weekday only applies to \
                 monthly and yearly rules",
            ),
        };
        match by {
            RepeatBy::Date => {
                rule.month = month;
                rule.days = None;
                rule.day_in_month = Some(anchor.day());
            }
            RepeatBy::Weekday => {
                rule.month = month;
                rule.day_in_month = Some(ordinal_week(anchor));
                rule.days = Some(WeekdaySet::single(anchor.weekday()));
            }
        }
        Ok(rule)
    }

    /// Replaces the repeat interval.
    ///
    /// The value is stored as given, including non-positive values; the
    /// validator reports those rather than this method rejecting them, so
    /// that a rule under editing behaves the same as one loaded from
    /// storage.
    pub fn with_interval(&self, interval: i64) -> anyhow::Result<Rule> {
        anyhow::ensure!(
            self.frequency.is_some(),
            "this rule has no recurrence to set an interval on",
        );
        anyhow::ensure!(
            !self.every_weekday,
            "a rule repeating on every workday has a fixed interval of 1",
        );
        anyhow::ensure!(
            self.frequency != Some(Frequency::Yearly),
            "yearly rules always repeat every year",
        );
        let mut rule = self.clone();
        rule.interval = interval;
        Ok(rule)
    }

    /// Replaces the weekday pattern.
    ///
    /// For weekly rules, the given set replaces the whole weekday set. For
    /// monthly and yearly rules repeating by weekday, exactly one weekday
    /// must be given and it replaces the weekday the ordinal refers to.
    pub fn with_weekdays(&self, days: WeekdaySet) -> anyhow::Result<Rule> {
        let mut rule = self.clone();
        match self.frequency {
            Some(Frequency::Weekly) => {
                anyhow::ensure!(
                    !self.every_weekday,
                    "this rule repeats on every workday; switch it to \
                     `--freq weekly` before picking specific weekdays",
                );
                rule.days = Some(days);
            }
            Some(Frequency::Monthly) | Some(Frequency::Yearly) => {
                anyhow::ensure!(
                    self.days.is_some(),
                    "this rule repeats by date; switch it with \
                     `--by weekday` before picking a weekday",
                );
                anyhow::ensure!(
                    days.len() == 1,
                    "monthly and yearly rules repeat on exactly one \
                     weekday, but {} were given",
                    days.len(),
                );
                rule.days = Some(days);
            }
            Some(Frequency::Daily) => {
                anyhow::bail!("weekday sets do not apply to daily rules")
            }
            None => anyhow::bail!("this rule has no recurrence"),
        }
        Ok(rule)
    }

    /// Replaces the calendar day of a monthly or yearly rule repeating by
    /// date.
    pub fn with_day(&self, day: i8) -> anyhow::Result<Rule> {
        anyhow::ensure!(
            matches!(
                self.frequency,
                Some(Frequency::Monthly) | Some(Frequency::Yearly),
            ),
            "a day of the month only applies to monthly and yearly rules",
        );
        anyhow::ensure!(
            self.days.is_none(),
            "this rule repeats by weekday; switch it with `--by date` \
             before picking a day of the month",
        );
        anyhow::ensure!(
            1 <= day && day <= 31,
            "day of the month must be in the range 1..=31, but got `{day}`",
        );
        let mut rule = self.clone();
        rule.day_in_month = Some(day);
        Ok(rule)
    }

    /// Replaces the ordinal week of a monthly or yearly rule repeating by
    /// weekday, i.e., the N in "the Nth Tuesday of the month."
    pub fn with_ordinal(&self, ordinal: i8) -> anyhow::Result<Rule> {
        anyhow::ensure!(
            matches!(
                self.frequency,
                Some(Frequency::Monthly) | Some(Frequency::Yearly),
            ),
            "an ordinal week only applies to monthly and yearly rules",
        );
        anyhow::ensure!(
            self.days.is_some(),
            "this rule repeats by date; switch it with `--by weekday` \
             before picking an ordinal week",
        );
        anyhow::ensure!(
            1 <= ordinal && ordinal <= 5,
            "ordinal week must be in the range 1..=5, but got `{ordinal}`",
        );
        let mut rule = self.clone();
        rule.day_in_month = Some(ordinal);
        Ok(rule)
    }

    /// Replaces the month of a yearly rule. The month is 1-based here, like
    /// Jiff's, not the zero-based serialized form.
    pub fn with_month(&self, month: i8) -> anyhow::Result<Rule> {
        anyhow::ensure!(
            self.frequency == Some(Frequency::Yearly),
            "a month only applies to yearly rules",
        );
        anyhow::ensure!(
            1 <= month && month <= 12,
            "month must be in the range 1..=12, but got `{month}`",
        );
        let mut rule = self.clone();
        rule.month = Some(month);
        Ok(rule)
    }

    /// Replaces the end condition.
    pub fn with_end(&self, end: End) -> anyhow::Result<Rule> {
        anyhow::ensure!(
            self.frequency.is_some(),
            "this rule has no recurrence to set an end condition on",
        );
        let mut rule = self.clone();
        rule.end = end;
        Ok(rule)
    }

    /// Writes this rule as a JSON object, without a line terminator.
    pub fn write<W: std::io::Write>(&self, wtr: W) -> anyhow::Result<()> {
        Ok(serde_json::to_writer(wtr, self)?)
    }

    /// Re-derives the `every_weekday` shorthand from the current fields.
    ///
    /// The shorthand is not persisted, and the serialized detection is
    /// pinned to the Monday-Friday mask no matter how the workweek is
    /// configured.
    pub(crate) fn rederive_every_weekday(&mut self) {
        self.every_weekday = self.frequency == Some(Frequency::Weekly)
            && self.days == Some(WeekdaySet::WORKDAYS);
    }

    pub(crate) fn set_days(&mut self, days: Option<WeekdaySet>) {
        self.days = days;
    }

    pub(crate) fn set_day_in_month(&mut self, day: Option<i8>) {
        self.day_in_month = day;
    }

    pub(crate) fn set_month(&mut self, month: Option<i8>) {
        self.month = month;
    }

    pub(crate) fn set_end(&mut self, end: End) {
        self.end = end;
    }
}

/// How often a rule repeats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The serialized `recurrence_type` number. Zero is "no recurrence,"
    /// which has no `Frequency` value.
    fn recurrence_type(self) -> i64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 2,
            Frequency::Monthly => 3,
            Frequency::Yearly => 4,
        }
    }

    fn from_recurrence_type(n: i64) -> Option<Frequency> {
        Some(match n {
            1 => Frequency::Daily,
            2 => Frequency::Weekly,
            3 => Frequency::Monthly,
            4 => Frequency::Yearly,
            _ => return None,
        })
    }

    /// One repetition period of this frequency, `n` times over.
    fn periods(self, n: i64) -> anyhow::Result<Span> {
        match self {
            Frequency::Daily => Span::new().try_days(n),
            Frequency::Weekly => Span::new().try_weeks(n),
            Frequency::Monthly => Span::new().try_months(n),
            Frequency::Yearly => Span::new().try_years(n),
        }
        .with_context(|| {
            format!("`{n}` periods is too many for calendar arithmetic")
        })
    }

    fn unit(self) -> Unit {
        match self {
            Frequency::Daily => Unit::Day,
            Frequency::Weekly => Unit::Week,
            Frequency::Monthly => Unit::Month,
            Frequency::Yearly => Unit::Year,
        }
    }
}

/// A repeat cadence as chosen on the command line.
///
/// This is `Frequency` plus the "daily on workdays" shorthand, which maps
/// to a weekly rule carrying the workweek mask with its interval pinned
/// to 1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrequencyChoice {
    Daily,
    Weekdays,
    Weekly,
    Monthly,
    Yearly,
}

impl FrequencyChoice {
    pub fn frequency(self) -> Frequency {
        match self {
            FrequencyChoice::Daily => Frequency::Daily,
            FrequencyChoice::Weekdays => Frequency::Weekly,
            FrequencyChoice::Weekly => Frequency::Weekly,
            FrequencyChoice::Monthly => Frequency::Monthly,
            FrequencyChoice::Yearly => Frequency::Yearly,
        }
    }
}

impl std::str::FromStr for FrequencyChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<FrequencyChoice> {
        Ok(match &*s.to_lowercase() {
            "daily" => FrequencyChoice::Daily,
            "weekdays" | "workdays" => FrequencyChoice::Weekdays,
            "weekly" => FrequencyChoice::Weekly,
            "monthly" => FrequencyChoice::Monthly,
            "yearly" => FrequencyChoice::Yearly,
            unk => anyhow::bail!("unrecognized frequency: `{unk}`"),
        })
    }
}

/// Whether a monthly or yearly rule repeats on a fixed calendar day or on
/// the Nth occurrence of a weekday in the month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RepeatBy {
    Date,
    Weekday,
}

impl std::str::FromStr for RepeatBy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<RepeatBy> {
        Ok(match &*s.to_lowercase() {
            "date" => RepeatBy::Date,
            "weekday" => RepeatBy::Weekday,
            unk => anyhow::bail!(
                "unrecognized repeat mode: `{unk}` \
                 (expected `date` or `weekday`)",
            ),
        })
    }
}

/// When a series stops repeating.
///
/// Exactly one variant is ever active. Switching variants goes through
/// `converted`, which computes a sensible default for the new variant from
/// the old one rather than retaining both underneath.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum End {
    /// The series never ends.
    Never,
    /// The series ends on the given day (inclusive).
    Until(civil::Date),
    /// The series ends after this many occurrences.
    Count(i64),
}

impl End {
    pub fn kind(&self) -> EndKind {
        match *self {
            End::Never => EndKind::Never,
            End::Until(_) => EndKind::Until,
            End::Count(_) => EndKind::Count,
        }
    }

    /// Converts this end condition to the target variant, preserving the
    /// visible series length as closely as possible.
    ///
    /// From never: one period ahead of the anchor, or a single occurrence.
    /// From a count: the until-date lands on the last occurrence,
    /// `anchor + (n - 1)` periods, clamped to the anchor. From an
    /// until-date: how many whole periods fit between anchor and the date,
    /// rounded up, plus one for the occurrence on the anchor itself.
    /// Converting to the variant that is already active keeps it unchanged.
    pub fn converted(
        &self,
        target: EndKind,
        frequency: Frequency,
        anchor: civil::Date,
    ) -> anyhow::Result<End> {
        Ok(match (*self, target) {
            (_, EndKind::Never) => End::Never,
            (End::Until(date), EndKind::Until) => End::Until(date),
            (End::Count(n), EndKind::Count) => End::Count(n),
            (End::Never, EndKind::Until) => {
                let date = anchor
                    .checked_add(frequency.periods(1)?)
                    .with_context(|| {
                        format!("failed to add one period to `{anchor}`")
                    })?;
                End::Until(date)
            }
            (End::Count(n), EndKind::Until) => {
                let date = anchor
                    .checked_add(frequency.periods(n.saturating_sub(1))?)
                    .with_context(|| {
                        format!(
                            "failed to add {n} periods to `{anchor}`",
                            n = n.saturating_sub(1),
                        )
                    })?;
                End::Until(date.max(anchor))
            }
            (End::Never, EndKind::Count) => End::Count(1),
            (End::Until(date), EndKind::Count) => {
                let fit = periods_between(anchor, date, frequency)?;
                End::Count(fit.saturating_add(1).max(1))
            }
        })
    }
}

/// Which end-condition variant is meant, without a value attached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndKind {
    Never,
    Until,
    Count,
}

impl std::str::FromStr for EndKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<EndKind> {
        Ok(match &*s.to_lowercase() {
            "never" => EndKind::Never,
            "until" => EndKind::Until,
            "count" | "occurrences" => EndKind::Count,
            unk => anyhow::bail!(
                "unrecognized end condition: `{unk}` \
                 (expected `never`, `until` or `count`)",
            ),
        })
    }
}

/// The number of whole periods between two dates, rounded up.
///
/// Calendar arithmetic, not fixed-size buckets: a month is a month whether
/// it has 28 or 31 days. A partial trailing period counts as one.
fn periods_between(
    anchor: civil::Date,
    until: civil::Date,
    frequency: Frequency,
) -> anyhow::Result<i64> {
    let span = anchor.until((frequency.unit(), until)).with_context(|| {
        format!("failed to find span between `{anchor}` and `{until}`")
    })?;
    let whole = i64::from(match frequency {
        Frequency::Daily => span.get_days(),
        Frequency::Weekly => span.get_weeks(),
        Frequency::Monthly => span.get_months(),
        Frequency::Yearly => i32::from(span.get_years()),
    });
    let covered = anchor
        .checked_add(frequency.periods(whole)?)
        .with_context(|| {
            format!("failed to add {whole} periods to `{anchor}`")
        })?;
    Ok(if covered < until { whole + 1 } else { whole })
}

/// The 1-based ordinal week of a date within its month, i.e., this date's
/// weekday is the Nth of its kind that month.
pub(crate) fn ordinal_week(date: civil::Date) -> i8 {
    (date.day() - 1) / 7 + 1
}

impl serde::Serialize for Rule {
    fn serialize<S: serde::Serializer>(
        &self,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let Some(frequency) = self.frequency else {
            let mut state = s.serialize_struct("Rule", 1)?;
            state.serialize_field("recurrence_type", &0i64)?;
            return state.end();
        };
        let mut len = 2;
        len += usize::from(self.days.is_some());
        len += usize::from(self.day_in_month.is_some());
        len += usize::from(self.month.is_some());
        len += usize::from(self.end != End::Never);
        let mut state = s.serialize_struct("Rule", len)?;
        state
            .serialize_field("recurrence_type", &frequency.recurrence_type())?;
        state.serialize_field("interval", &self.interval)?;
        if let Some(days) = self.days {
            state.serialize_field("days", &days.bits())?;
        }
        if let Some(day) = self.day_in_month {
            state.serialize_field("day_in_month", &day)?;
        }
        if let Some(month) = self.month {
            // The serialized month is zero based.
            state.serialize_field("month", &(month - 1))?;
        }
        match self.end {
            End::Never => {}
            End::Until(date) => state.serialize_field("until", &date)?,
            End::Count(n) => state.serialize_field("occurrences", &n)?,
        }
        state.end()
    }
}

// Hand-written for the same reason as elsewhere in this crate: it keeps the
// dependency tree slim and compile times quick.
//
// Ref: https://serde.rs/deserialize-struct.html
impl<'de> serde::Deserialize<'de> for Rule {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Rule, D::Error> {
        use serde::de;

        enum Field {
            RecurrenceType,
            Interval,
            Days,
            DayInMonth,
            Month,
            Occurrences,
            Until,
        }

        impl<'de> serde::Deserialize<'de> for Field {
            fn deserialize<D>(deserializer: D) -> Result<Field, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct FieldVisitor;

                impl<'de> serde::de::Visitor<'de> for FieldVisitor {
                    type Value = Field;

                    fn expecting(
                        &self,
                        f: &mut std::fmt::Formatter,
                    ) -> std::fmt::Result {
                        f.write_str("a recurrence rule field name")
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Field, E>
                    where
                        E: serde::de::Error,
                    {
                        match value {
                            "recurrence_type" => Ok(Field::RecurrenceType),
                            "interval" => Ok(Field::Interval),
                            "days" => Ok(Field::Days),
                            "day_in_month" => Ok(Field::DayInMonth),
                            "month" => Ok(Field::Month),
                            "occurrences" => Ok(Field::Occurrences),
                            "until" => Ok(Field::Until),
                            _ => Err(de::Error::unknown_field(value, FIELDS)),
                        }
                    }
                }

                deserializer.deserialize_identifier(FieldVisitor)
            }
        }

        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Rule;

            fn expecting(
                &self,
                f: &mut std::fmt::Formatter,
            ) -> std::fmt::Result {
                f.write_str("a recurrence rule object")
            }

            fn visit_map<V>(self, mut map: V) -> Result<Rule, V::Error>
            where
                V: serde::de::MapAccess<'de>,
            {
                let mut recurrence_type: Option<i64> = None;
                let mut interval: Option<i64> = None;
                let mut days: Option<i64> = None;
                let mut day_in_month: Option<i64> = None;
                let mut month: Option<i64> = None;
                let mut occurrences: Option<i64> = None;
                let mut until: Option<civil::Date> = None;
                while let Some(key) = map.next_key()? {
                    match key {
                        Field::RecurrenceType => {
                            if recurrence_type.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "recurrence_type",
                                ));
                            }
                            recurrence_type = Some(map.next_value()?);
                        }
                        Field::Interval => {
                            if interval.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "interval",
                                ));
                            }
                            interval = Some(map.next_value()?);
                        }
                        Field::Days => {
                            if days.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "days",
                                ));
                            }
                            days = Some(map.next_value()?);
                        }
                        Field::DayInMonth => {
                            if day_in_month.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "day_in_month",
                                ));
                            }
                            day_in_month = Some(map.next_value()?);
                        }
                        Field::Month => {
                            if month.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "month",
                                ));
                            }
                            month = Some(map.next_value()?);
                        }
                        Field::Occurrences => {
                            if occurrences.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "occurrences",
                                ));
                            }
                            occurrences = Some(map.next_value()?);
                        }
                        Field::Until => {
                            if until.is_some() {
                                return Err(de::Error::duplicate_field(
                                    "until",
                                ));
                            }
                            until = Some(map.next_value()?);
                        }
                    }
                }
                let recurrence_type = recurrence_type.ok_or_else(|| {
                    de::Error::missing_field("recurrence_type")
                })?;
                if recurrence_type == 0 {
                    if interval.is_some()
                        || days.is_some()
                        || day_in_month.is_some()
                        || month.is_some()
                        || occurrences.is_some()
                        || until.is_some()
                    {
                        return Err(de::Error::custom(
                            "a rule without recurrence \
                             (recurrence_type 0) must not carry any \
                             other fields",
                        ));
                    }
                    return Ok(Rule::none());
                }
                let frequency =
                    Frequency::from_recurrence_type(recurrence_type)
                        .ok_or_else(|| {
                            de::Error::custom(format_args!(
                                "recurrence_type must be in the range \
                                 0..=4, but got `{recurrence_type}`",
                            ))
                        })?;
                // A non-positive interval is a validation problem, not a
                // structural one, so any value is accepted here. A missing
                // interval is structural.
                let interval = interval
                    .ok_or_else(|| de::Error::missing_field("interval"))?;
                if occurrences.is_some() && until.is_some() {
                    return Err(de::Error::custom(
                        "`occurrences` and `until` are mutually exclusive",
                    ));
                }
                let days = match days {
                    None => None,
                    Some(bits) => Some(
                        WeekdaySet::from_bits(bits)
                            .map_err(de::Error::custom)?,
                    ),
                };
                let mut rule = Rule::none();
                match frequency {
                    Frequency::Daily => {
                        if days.is_some()
                            || day_in_month.is_some()
                            || month.is_some()
                        {
                            return Err(de::Error::custom(
                                "daily rules must not carry `days`, \
                                 `day_in_month` or `month`",
                            ));
                        }
                    }
                    Frequency::Weekly => {
                        // A weekly rule without a weekday set is loadable:
                        // the validator reports it as a missing selection.
                        if day_in_month.is_some() || month.is_some() {
                            return Err(de::Error::custom(
                                "weekly rules must not carry \
                                 `day_in_month` or `month`",
                            ));
                        }
                        rule.days = days;
                    }
                    Frequency::Monthly | Frequency::Yearly => {
                        let day = day_in_month.ok_or_else(|| {
                            de::Error::missing_field("day_in_month")
                        })?;
                        if days.is_some() {
                            if !(1..=5).contains(&day) {
                                return Err(de::Error::custom(format_args!(
                                    "day_in_month must be in the range \
                                     1..=5 for a rule repeating by \
                                     weekday, but got `{day}`",
                                )));
                            }
                        } else if !(1..=31).contains(&day) {
                            return Err(de::Error::custom(format_args!(
                                "day_in_month must be in the range 1..=31 \
                                 for a rule repeating by date, but got \
                                 `{day}`",
                            )));
                        }
                        rule.days = days;
                        rule.day_in_month = Some(day as i8);
                        if frequency == Frequency::Yearly {
                            let month = month.ok_or_else(|| {
                                de::Error::missing_field("month")
                            })?;
                            if !(0..=11).contains(&month) {
                                return Err(de::Error::custom(format_args!(
                                    "month must be in the range 0..=11, \
                                     but got `{month}`",
                                )));
                            }
                            rule.month = Some(month as i8 + 1);
                        } else if month.is_some() {
                            return Err(de::Error::custom(
                                "`month` only applies to yearly rules",
                            ));
                        }
                    }
                }
                rule.frequency = Some(frequency);
                rule.interval = interval;
                rule.end = match (occurrences, until) {
                    (None, None) => End::Never,
                    (Some(n), None) => End::Count(n),
                    (None, Some(date)) => End::Until(date),
                    (Some(_), Some(_)) => unreachable!(),
                };
                rule.rederive_every_weekday();
                Ok(rule)
            }
        }

        const FIELDS: &[&str] = &[
            "recurrence_type",
            "interval",
            "days",
            "day_in_month",
            "month",
            "occurrences",
            "until",
        ];
        deserializer.deserialize_struct("Rule", FIELDS, Visitor)
    }
}
