use std::{io::Write, process::ExitCode};

use jiff::civil;

use crate::{
    args::{self, Usage, flags, positional},
    date::DateFlexible,
    locale::DateFormatter,
    rule::End,
    summary::{self, Cadence, Summary, WeeklyDays},
    validate,
    weekset::WeekdaySet,
};

const USAGE: &'static str = r#"
Render rules as human readable sentences.

Each rule becomes one line holding one sentence, e.g., "Every 2 weeks on
Monday, Wednesday, Friday. The series ends after 10 occurrences." A rule
with no recurrence, or one that would fail `recur check`, becomes an
empty line, so output lines always pair up with input rules.

Some weekly selections read better as a word than as a list: all seven
days, the configured workweek and the Saturday/Sunday pair are worded as
such. The workweek is Monday through Friday unless the `RECUR_WORKWEEK`
environment variable says otherwise.

End dates are formatted for the locale in `RECUR_LOCALE` when recur is
compiled with the `locale` feature. Otherwise they render as `M/D/YYYY`.

USAGE:
    recur describe <rule>...
    recur describe < line delimited <rule>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Describe a biweekly rule:

        $ recur describe '{"recurrence_type":2,"interval":2,"days":42}'
        Every 2 weeks on Monday, Wednesday, Friday.

    %snip-start%

    Describe the end of a pipeline:

        $ recur new -a 2025-06-02 | recur end count 10 | recur describe
        Every Monday. The series ends after 10 occurrences.

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
    let week_start = config
        .week_start
        .map(|ws| ws.get())
        .unwrap_or_else(|| crate::WORKWEEK.start());
    let dates = crate::LOCALE.to_date_formatter()?;
    let mut wtr = std::io::stdout().lock();
    rules.try_map(|rule| {
        if validate::validate(&rule, anchor).is_err() {
            writeln!(wtr)?;
            return Ok(true);
        }
        let Some(summary) =
            summary::summarize(&rule, anchor, &crate::WORKWEEK)
        else {
            writeln!(wtr)?;
            return Ok(true);
        };
        writeln!(wtr, "{}", render(&summary, week_start, &dates))?;
        Ok(true)
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the one sentence description of a summarized rule.
fn render(
    summary: &Summary,
    week_start: civil::Weekday,
    dates: &DateFormatter,
) -> String {
    let mut sentence = cadence(&summary.cadence, week_start);
    if let Some(end) = end_clause(summary.end, dates) {
        sentence.push(' ');
        sentence.push_str(&end);
    }
    sentence
}

fn cadence(cadence: &Cadence, week_start: civil::Weekday) -> String {
    match *cadence {
        Cadence::Daily { interval: 1 } => "Every day.".to_string(),
        Cadence::Daily { interval } => format!("Every {interval} days."),
        Cadence::Weekly { interval, days } => {
            weekly(interval, days, week_start)
        }
        Cadence::MonthlyByDate { interval: 1, day } => {
            format!("Every month on day {day}.")
        }
        Cadence::MonthlyByDate { interval, day } => {
            format!("Every {interval} months on day {day}.")
        }
        Cadence::MonthlyByWeekday { interval, ordinal, days } => {
            let ordinal = ordinal_word(ordinal);
            let days = weekday_list(days, week_start);
            if interval == 1 {
                format!("Every month on the {ordinal} {days}.")
            } else {
                format!("Every {interval} months on the {ordinal} {days}.")
            }
        }
        Cadence::YearlyByDate { month, day } => {
            format!("Every year in {} on day {day}.", month_name(month))
        }
        Cadence::YearlyByWeekday { month, ordinal, days } => {
            format!(
                "Every year on the {} {} in {}.",
                ordinal_word(ordinal),
                weekday_list(days, week_start),
                month_name(month),
            )
        }
    }
}

fn weekly(
    interval: i64,
    days: WeeklyDays,
    week_start: civil::Weekday,
) -> String {
    match days {
        WeeklyDays::All => {
            if interval == 1 {
                "Every day.".to_string()
            } else {
                format!("Every {interval} weeks on all days.")
            }
        }
        WeeklyDays::Workdays => {
            if interval == 1 {
                "On workdays.".to_string()
            } else {
                format!("Every {interval} weeks on workdays.")
            }
        }
        WeeklyDays::Weekend => {
            if interval == 1 {
                "Every weekend.".to_string()
            } else {
                format!("Every {interval} weeks on weekends.")
            }
        }
        WeeklyDays::Set(days) => {
            let days = weekday_list(days, week_start);
            if interval == 1 {
                format!("Every {days}.")
            } else {
                format!("Every {interval} weeks on {days}.")
            }
        }
    }
}

fn end_clause(end: End, dates: &DateFormatter) -> Option<String> {
    match end {
        End::Never => None,
        End::Until(date) => {
            Some(format!("The series ends on {}.", dates.format(date)))
        }
        End::Count(1) => {
            Some("The series ends after 1 occurrence.".to_string())
        }
        End::Count(n) => {
            Some(format!("The series ends after {n} occurrences."))
        }
    }
}

/// Renders the weekday names of the set, ordered from the start of the
/// week. Two names are joined with "and," more with commas.
fn weekday_list(days: WeekdaySet, week_start: civil::Weekday) -> String {
    let names = days
        .iter_from(week_start)
        .map(|wd| flags::Weekday::from(wd).to_string())
        .collect::<Vec<String>>();
    if names.len() == 2 { names.join(" and ") } else { names.join(", ") }
}

fn ordinal_word(ordinal: i8) -> &'static str {
    match ordinal {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        // A month never has more than five of any weekday, so the fifth
        // one reads as the last one.
        _ => "last",
    }
}

fn month_name(month: i8) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        unk => unreachable!("month out of range: {unk}"),
    }
}

#[derive(Debug, Default)]
struct Config {
    anchor: Option<DateFlexible>,
    week_start: Option<flags::Weekday>,
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
            lexopt::Arg::Long("week-start") => {
                self.week_start = Some(args::parse(p, "--week-start")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[DateFlexible::ANCHOR_FLAG, flags::Weekday::USAGE_WEEK_START]
    }
}
