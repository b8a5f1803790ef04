use std::{io::Write, process::ExitCode};

use jiff::civil;

use crate::{
    args::{self, Usage, flags, positional},
    date::DateFlexible,
    rule::{FrequencyChoice, RepeatBy, Rule},
};

const USAGE: &'static str = r#"
Edit the repeat pattern of existing rules.

Each flag replaces one field of the pattern. Flags that don't apply to a
rule's cadence are errors, e.g., `--month` on a weekly rule. Switch the
cadence first with `--freq`, and the sub-mode of a monthly or yearly rule
with `--by`, then refine with the other flags.

Changing the cadence populates sensible defaults from the start date of
the series. A monthly rule starts out repeating by date on the anchor's
day of the month, and `--by weekday` re-reads "the Nth weekday" from the
anchor too. That's why some edits want `-a/--anchor`.

Edits are not validated as a whole. Each flag enforces its own range and
applicability, but the result can still be incoherent, e.g., emptying the
weekday set of a weekly rule is only caught by `recur check`. Run that as
the final step of a pipeline.

USAGE:
    recur set <flags> <rule>...
    recur set <flags> < line delimited <rule>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Every other Monday, Wednesday and Friday:

        recur new -a 2025-06-02 | recur set --interval 2 -w mon,wed,fri

    %snip-start%

    The third Tuesday of every month (2025-06-17 is one):

        recur new -a 2025-06-17 \
            | recur set -a 2025-06-17 --freq monthly --by weekday

    Every year on May 4th:

        recur new | recur set --freq yearly --month may -d 4

    Every workday, as configured by `RECUR_WORKWEEK`:

        recur new | recur set --freq weekdays

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<ExitCode> {
    let mut config = Config::default();
    let mut rules = positional::Rules::default();
    args::configure(p, USAGE, &mut [&mut config, &mut rules])?;

    let anchor = config.anchor.unwrap_or_default().get();
    let mut wtr = std::io::stdout().lock();
    rules.try_map(|rule| {
        let rule = config.apply(&rule, anchor)?;
        rule.write(&mut wtr)?;
        writeln!(wtr)?;
        Ok(true)
    })?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Default)]
struct Config {
    anchor: Option<DateFlexible>,
    freq: Option<FrequencyChoice>,
    by: Option<RepeatBy>,
    weekdays: Option<flags::CommaSequence<flags::Weekday>>,
    day: Option<i8>,
    ordinal: Option<flags::Ordinal>,
    month: Option<flags::Month>,
    interval: Option<i64>,
}

impl Config {
    /// Applies every given flag to the rule, cadence first, so that the
    /// narrower flags land on the pattern they're meant to refine.
    fn apply(
        &self,
        rule: &Rule,
        anchor: civil::Date,
    ) -> anyhow::Result<Rule> {
        let mut rule = rule.clone();
        if let Some(choice) = self.freq {
            rule = rule.with_frequency(choice, anchor, &crate::WORKWEEK);
        }
        if let Some(by) = self.by {
            rule = rule.with_repeat_by(by, anchor)?;
        }
        if let Some(ref weekdays) = self.weekdays {
            let days = weekdays.iter().map(|wd| wd.get()).collect();
            rule = rule.with_weekdays(days)?;
        }
        if let Some(day) = self.day {
            rule = rule.with_day(day)?;
        }
        if let Some(ordinal) = self.ordinal {
            rule = rule.with_ordinal(ordinal.get())?;
        }
        if let Some(month) = self.month {
            rule = rule.with_month(month.get())?;
        }
        if let Some(interval) = self.interval {
            rule = rule.with_interval(interval)?;
        }
        Ok(rule)
    }
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Short('a') | lexopt::Arg::Long("anchor") => {
                self.anchor = Some(args::parse_bytes(p, "-a/--anchor")?);
            }
            lexopt::Arg::Long("freq") => {
                self.freq = Some(args::parse(p, "--freq")?);
            }
            lexopt::Arg::Long("by") => {
                self.by = Some(args::parse(p, "--by")?);
            }
            lexopt::Arg::Short('w') | lexopt::Arg::Long("weekday") => {
                self.weekdays = Some(args::parse(p, "-w/--weekday")?);
            }
            lexopt::Arg::Short('d') | lexopt::Arg::Long("day") => {
                self.day = Some(args::parse(p, "-d/--day")?);
            }
            lexopt::Arg::Long("ordinal") => {
                self.ordinal = Some(args::parse(p, "--ordinal")?);
            }
            lexopt::Arg::Long("month") => {
                self.month = Some(args::parse(p, "--month")?);
            }
            lexopt::Arg::Long("interval") => {
                self.interval = Some(args::parse(p, "--interval")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[
            DateFlexible::ANCHOR_FLAG,
            FREQ,
            BY,
            WEEKDAY,
            DAY,
            ORDINAL,
            MONTH,
            INTERVAL,
        ]
    }
}

const FREQ: Usage = Usage::flag(
    "--freq <frequency>",
    "Switch the repeat cadence of the rule.",
    r#"
Switch the repeat cadence of the rule.

The frequency may be `daily`, `weekly`, `monthly` or `yearly`. It may
also be `weekdays` (or `workdays`), which is shorthand for a daily rule
that repeats on every day of the configured workweek. The workweek is
Monday through Friday unless the `RECUR_WORKWEEK` environment variable
says otherwise.

Switching the cadence populates defaults for the fields that become
relevant. A weekly rule starts out on the weekday of the start date. A
monthly or yearly rule starts out repeating by date on the start date's
day of the month, unless it already had a by-weekday pattern, which it
keeps.
"#,
);

const BY: Usage = Usage::flag(
    "--by <mode>",
    "Repeat a monthly or yearly rule by `date` or by `weekday`.",
    r#"
Repeat a monthly or yearly rule by `date` or by `weekday`.

A rule repeating by date recurs on a fixed day of the month, e.g., "on
day 15." One repeating by weekday recurs on an ordinal weekday, e.g.,
"on the third Tuesday."

Both modes re-read their fields from the start date of the series, so
`-a/--anchor` matters here: `--by weekday` with an anchor of 2025-06-17
means the third Tuesday.
"#,
);

const WEEKDAY: Usage = Usage::flag(
    "-w, --weekday <weekday>[,<weekday>..]",
    "Replace the weekdays a weekly rule repeats on.",
    r#"
Replace the weekdays a weekly rule repeats on.

Weekdays are comma delimited and may be full names, abbreviations or two
letter codes, e.g., `mon,wed,fri`. The whole set is replaced at once.

For a monthly or yearly rule repeating by weekday, exactly one weekday
must be given, and it replaces the weekday the ordinal week refers to.
"#,
);

const DAY: Usage = Usage::flag(
    "-d, --day <day>",
    "Replace the day of the month, for rules repeating by date.",
    r#"
Replace the day of the month, for rules repeating by date.

The day must be in the range `1..=31`. Months without the given day skip
that occurrence, e.g., day `31` recurs only in months with 31 days.
"#,
);

const ORDINAL: Usage = Usage::flag(
    "--ordinal <ordinal>",
    "Replace the ordinal week, for rules repeating by weekday.",
    r#"
Replace the ordinal week, for rules repeating by weekday. That is, the N
in "the Nth Tuesday of the month."

The ordinal may be a number in the range `1..=5` or one of the words
`first`, `second`, `third`, `fourth`, `fifth` or `last`. A month never
has more than five of any weekday, so the fifth one is also the last one.
"#,
);

const MONTH: Usage = Usage::flag(
    "--month <month>",
    "Replace the month of a yearly rule.",
    r#"
Replace the month of a yearly rule.

The month may be a number in the range `1..=12`, a full English name or
a three letter abbreviation, e.g., `5`, `May` or `may`.
"#,
);

const INTERVAL: Usage = Usage::flag(
    "--interval <n>",
    "Replace the number of periods between occurrences.",
    r#"
Replace the number of periods between occurrences. For example, an
interval of `2` on a weekly rule means every other week.

Yearly rules always repeat every year, and the `weekdays` shorthand has
a fixed interval of 1, so neither accepts this flag. The value must be
positive for a rule to pass `recur check`, but it is not rejected here,
so that fields can be edited in any order.
"#,
);
