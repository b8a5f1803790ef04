use std::{io::Write, process::ExitCode};

use crate::{
    args::{self, Usage},
    date::DateFlexible,
    rule::Rule,
};

const USAGE: &'static str = r#"
Emit the default rule for a new series.

The default repeats weekly, every week, on the weekday of the start date,
and never ends. So a series anchored on a Tuesday gets "every Tuesday."

This is meant to seed a pipeline. The other commands read rules from stdin,
one per line, so the output of `new` can be piped straight into them.

USAGE:
    recur new [-a <date>]

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    The default rule for a series starting today:

        recur new

    Build up a rule for "every other Monday and Thursday, ten times":

        recur new -a 2025-06-02 | recur set --interval 2 -w mon,thu \
            | recur end count 10

    %snip-start%

    The start date accepts relative descriptions too:

        recur new -a 'next friday'

    %snip-end%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<ExitCode> {
    let mut config = Config::default();
    args::configure(p, USAGE, &mut [&mut config])?;

    let anchor = config.anchor.unwrap_or_default().get();
    let rule = Rule::weekly(anchor);
    let mut wtr = std::io::stdout().lock();
    rule.write(&mut wtr)?;
    writeln!(wtr)?;
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
