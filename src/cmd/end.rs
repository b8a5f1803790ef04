use std::{io::Write, process::ExitCode};

use {
    anyhow::Context,
    bstr::{BString, ByteSlice, ByteVec},
};

use crate::{
    args::{self, Usage, positional},
    date::DateFlexible,
    parse::BytesExt,
    rule::{End, EndKind},
};

const USAGE: &'static str = r#"
Change when a series ends.

A series either never ends, ends on a date or ends after a fixed number
of occurrences. The first positional argument picks the target condition:
`never`, `until` or `count`.

An explicit value may follow: a date for `until`, a positive integer for
`count`. When the value is omitted, the current end condition is converted
while preserving the visible length of the series as closely as possible:

From never, `until` lands one period past the start date and `count`
becomes a single occurrence.

From a count of N, the until-date lands on the last occurrence, N - 1
periods past the start date.

From an until-date, the count becomes the number of whole periods between
the start date and that date, rounded up, plus one for the occurrence on
the start date itself.

Conversions are measured from the start date, so `-a/--anchor` matters
whenever the value is omitted.

USAGE:
    recur end <condition> [<value>] <rule>...
    recur end <condition> [<value>] < line delimited <rule>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    End a series on a fixed date:

        recur new | recur end until 2025-12-31

    %snip-start%

    Convert a count into the equivalent until-date:

        $ recur end until -a 2025-06-02 \
            '{"recurrence_type":2,"interval":1,"days":4,"occurrences":10}'
        {"recurrence_type":2,"interval":1,"days":4,"until":"2025-08-04"}

    Make a series open ended again:

        recur end never < rules.jsonl

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

    let target = config.target.context(
        "an end condition is required: `never`, `until` or `count`",
    )?;
    let anchor = config.anchor.unwrap_or_default().get();
    let explicit = match (target, config.value) {
        (_, None) => None,
        (EndKind::Until, Some(ref v)) => {
            let date: DateFlexible = v.parse()?;
            Some(End::Until(date.get()))
        }
        (EndKind::Count, Some(ref v)) => {
            let n = v
                .to_str()
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .with_context(|| {
                    format!("invalid occurrence count `{v}`")
                })?;
            Some(End::Count(n))
        }
        (EndKind::Never, Some(ref v)) => anyhow::bail!(
            "end condition `never` does not take a value, \
             but `{v}` was given",
        ),
    };
    let mut wtr = std::io::stdout().lock();
    rules.try_map(|rule| {
        let end = match explicit {
            Some(end) => end,
            None => {
                let frequency = rule.frequency().context(
                    "this rule has no recurrence to set an end condition on",
                )?;
                rule.end().converted(target, frequency, anchor)?
            }
        };
        let rule = rule.with_end(end)?;
        rule.write(&mut wtr)?;
        writeln!(wtr)?;
        Ok(true)
    })?;
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Default)]
struct Config {
    anchor: Option<DateFlexible>,
    target: Option<EndKind>,
    value: Option<BString>,
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
            lexopt::Arg::Value(ref mut v) => {
                if self.target.is_none() {
                    let v = std::mem::take(v);
                    let v = v.into_string().map_err(|v| {
                        anyhow::anyhow!(
                            "end condition `{v:?}` is not valid UTF-8",
                        )
                    })?;
                    self.target = Some(v.parse()?);
                } else if self.value.is_none() && !looks_like_rule(v) {
                    let v = std::mem::take(v);
                    let bytes = Vec::from_os_string(v).map_err(|v| {
                        anyhow::anyhow!(
                            "end condition value `{v:?}` is not valid UTF-8",
                        )
                    })?;
                    self.value = Some(BString::from(bytes));
                } else {
                    return Ok(false);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[DateFlexible::ANCHOR_FLAG, CONDITION, VALUE]
    }
}

/// Whether a positional argument looks like a rule record rather than an
/// explicit end condition value. Rules are JSON objects, and none of the
/// value forms can begin with a brace.
fn looks_like_rule(v: &std::ffi::OsStr) -> bool {
    v.as_encoded_bytes().trim_ascii_start().first() == Some(&b'{')
}

const CONDITION: Usage = Usage::arg(
    "<condition>",
    "One of `never`, `until` or `count`.",
    r#"
One of `never`, `until` or `count`. This is the end condition the rules
are switched to. `occurrences` is accepted as a synonym for `count`.
"#,
);

const VALUE: Usage = Usage::arg(
    "[<value>]",
    "An explicit end date or occurrence count.",
    r#"
An explicit end date or occurrence count.

For `until`, this is a date in any of the formats `-a/--anchor` accepts.
For `count`, it is a positive integer. `never` takes no value.

When omitted, the current end condition is converted to the target kind
while preserving the visible length of the series.
"#,
);
