use std::{io::Write, process::ExitCode};

use crate::{
    args::{self, positional},
    rule::Rule,
};

const USAGE: &'static str = r#"
Turn recurrence off entirely.

Every input rule is replaced by the empty rule, i.e., one whose
`recurrence_type` is `0`. The repeat pattern and the end condition are
discarded with it. This is how a series becomes a one-off event again.

USAGE:
    recur clear <rule>...
    recur clear < line delimited <rule>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Clear a weekly rule:

        $ recur clear '{"recurrence_type":2,"interval":1,"days":4}'
        {"recurrence_type":0}

REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<ExitCode> {
    let mut rules = positional::Rules::default();
    args::configure(p, USAGE, &mut [&mut rules])?;

    let mut wtr = std::io::stdout().lock();
    rules.try_map(|_| {
        Rule::none().write(&mut wtr)?;
        writeln!(wtr)?;
        Ok(true)
    })?;
    Ok(ExitCode::SUCCESS)
}
