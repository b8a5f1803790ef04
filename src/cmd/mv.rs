use std::{io::Write, process::ExitCode};

use anyhow::Context;

use crate::{
    adjust,
    args::{self, Usage, positional},
    date::DateFlexible,
};

const USAGE: &'static str = r#"
Recompute rules after the start date of their series moves.

A rule's repeat pattern follows the start date. When that date moves, the
fields read from it move too:

Weekly rules rotate their whole weekday set by the number of days moved,
so a hand-picked selection keeps its shape relative to the start.

Monthly and yearly rules repeating by weekday re-read "the Nth weekday"
from the new date. Ones repeating by date take its day of the month.
Yearly rules also re-pin the month.

An until-date that now falls before the new start date is dropped, and
the series goes back to never ending.

The rewritten rule always goes to stdout. When the repeat pattern itself
changed, a notice goes to stderr, one per rule, so that a pipeline's user
can see their selection was rewritten.

USAGE:
    recur move --from <date> --to <date> <rule>...
    recur move --from <date> --to <date> < line delimited <rule>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Move a series from Tuesday to Wednesday. The weekly selection follows:

        $ recur move --from 2025-06-03 --to 2025-06-04 \
            '{"recurrence_type":2,"interval":1,"days":4}'
        {"recurrence_type":2,"interval":1,"days":8}

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<ExitCode> {
    let mut config = Config::default();
    let mut rules = positional::Rules::default();
    args::configure(p, USAGE, &mut [&mut config, &mut rules])?;

    let from = config
        .from
        .context("the old start date is required; pass it with --from")?
        .get();
    let to = config
        .to
        .context("the new start date is required; pass it with --to")?
        .get();
    let mut wtr = std::io::stdout().lock();
    let mut nth = 0;
    rules.try_map(|rule| {
        nth += 1;
        let adjusted = adjust::anchor_moved(&rule, from, to);
        if adjusted.auto_changed {
            eprintln!(
                "rule {nth}: repeat pattern followed the start date \
                 from {from} to {to}",
            );
        }
        adjusted.rule.write(&mut wtr)?;
        writeln!(wtr)?;
        Ok(true)
    })?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Default)]
struct Config {
    from: Option<DateFlexible>,
    to: Option<DateFlexible>,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("from") => {
                self.from = Some(args::parse_bytes(p, "--from")?);
            }
            lexopt::Arg::Long("to") => {
                self.to = Some(args::parse_bytes(p, "--to")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[FROM, TO]
    }
}

const FROM: Usage = Usage::flag(
    "--from <date>",
    "The old start date of the series.",
    r#"
The old start date of the series, i.e., the one the input rules were
built against. Accepts the same formats as `-a/--anchor` elsewhere.
"#,
);

const TO: Usage = Usage::flag(
    "--to <date>",
    "The new start date of the series.",
    r#"
The new start date of the series. Accepts the same formats as
`-a/--anchor` elsewhere.
"#,
);
