use std::{io::Write, process::ExitCode};

use crate::{
    args::{self, Usage, positional},
    date::DateFlexible,
    style::Theme,
    validate,
};

const USAGE: &'static str = r#"
Validate rules and report every field level problem.

Valid rules pass through to stdout byte-for-byte, so this works as a
pipeline filter. Rules with problems are withheld from stdout, each
problem is reported on stderr prefixed with the 1-based position of the
offending rule, and the exit code is 1.

Every problem is reported, not just the first one. The checks are the
ones a rule must pass before it can be saved: a positive interval, a
positive occurrence count, an end date on or after the start date, and
at least one weekday on a weekly rule. A rule with no recurrence is
trivially valid.

The until-date check compares against the start date of the series, so
`-a/--anchor` matters.

USAGE:
    recur check <rule>...
    recur check < line delimited <rule>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    A count must be positive:

        $ recur check -a 2025-06-02 \
            '{"recurrence_type":1,"interval":1,"occurrences":0}'
        rule 1: occurrences: must be a positive whole number

    %snip-start%

    Use it as the last step of a pipeline:

        recur new | recur set --interval 2 | recur check

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
    let theme = Theme::stderr();
    let mut wtr = std::io::stdout().lock();
    let mut nth = 0;
    let mut failed = 0;
    rules.try_map_original(|rule, original| {
        nth += 1;
        match validate::validate(&rule, anchor) {
            Ok(()) => wtr.write_all(original)?,
            Err(violations) => {
                failed += 1;
                for violation in violations {
                    eprintln!(
                        "{}: {violation}",
                        theme.highlight(format!("rule {nth}")),
                    );
                }
            }
        }
        Ok(true)
    })?;
    if failed > 0 {
        log::debug!("{failed} of {nth} rules failed validation");
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Default)]
struct Config {
    anchor: Option<DateFlexible>,
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
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[DateFlexible::ANCHOR_FLAG]
    }
}
