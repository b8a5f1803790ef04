use std::borrow::Cow;

use {
    anyhow::Context,
    bstr::{BStr, BString, ByteSlice, ByteVec},
};

use crate::{
    args::{Configurable, Usage},
    parse::{BufReadExt, Line},
    rule::Rule,
};

/// The CLI parsing configuration for reading recurrence rules.
///
/// This will greedily consume all remaining positional arguments as rule
/// records.
///
/// When there are no positional arguments to consume, then this will read
/// rule records from `stdin` in a line delimited fashion. That's what makes
/// these commands composable: each one writes one record per line, so the
/// output of one is the input of the next.
#[derive(Clone, Debug, Default)]
pub struct Rules(Arguments);

impl Rules {
    pub const ARG_OR_STDIN: Usage = Usage::arg(
        "<rule>",
        "A recurrence rule in JSON form, or line delimited rules on stdin.",
        r#"
A recurrence rule in JSON form, or line delimited rules on stdin.

Each rule is a single JSON object. When no rules are given as positional
arguments, they are read from stdin, one rule per line. Since every command
writes one rule per line, the output of one command can be piped into the
next.

The fields of a rule are:

recurrence_type: How the series repeats. `0` is no recurrence, `1` is
daily, `2` is weekly, `3` is monthly and `4` is yearly. Every other field
is meaningless when this is `0`.

interval: The number of periods between occurrences. For example, `2` on a
weekly rule means every other week. Every recurring rule requires this.

days: A bitmask of weekdays, where bit 0 is Sunday, bit 1 is Monday and so
on through bit 6 for Saturday. For example, `42` selects Monday, Wednesday
and Friday. Weekly rules require this. Monthly and yearly rules use it only
when they repeat by weekday.

day_in_month: For monthly and yearly rules. When `days` is absent, this is
a day of the month in the range `1..=31`. When `days` is present, this is
an ordinal week in the range `1..=5`, i.e., "the `day_in_month`th `days` of
the month," where `5` means the last one.

month: The month of a yearly rule, zero based. That is, `0` is January and
`11` is December.

occurrences: The series ends after this many occurrences.

until: The series ends on this date, in `YYYY-MM-DD` form. A rule may have
`occurrences` or `until`, but never both. When neither is present, the
series never ends.
"#,
    );

    /// Run the given function over each rule read from the CLI.
    ///
    /// If there were no positional rules, then this tries to read them
    /// from stdin, one per line.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(Rule) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        self.0.try_map(|arg| f(arg.to_rule()?))
    }

    /// Like `try_map`, but also hands the closure the original input for
    /// the rule, with a line terminator.
    ///
    /// This is for commands that pass their input through unchanged, so
    /// that exact user formatting survives the trip.
    pub fn try_map_original(
        self,
        mut f: impl FnMut(Rule, &BStr) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        self.0.try_map(|arg| {
            let rule = arg.to_rule()?;
            let original = arg.original_with_line_terminator();
            f(rule, &original)
        })
    }
}

impl Configurable for Rules {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        self.0.configure(p, arg)
    }

    fn usage(&self) -> &[Usage] {
        &[Rules::ARG_OR_STDIN]
    }
}

/// The parsing configuration for reading arguments either as positional
/// arguments on the CLI, or as line-delimited data on `stdin`.
///
/// This will greedily consume all remaining positional arguments. That is,
/// this is generally intended for use cases where a variable number of
/// arguments can be given.
///
/// When there are _zero_ positional arguments, then this will read lines from
/// stdin instead.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    positional: Vec<Argument<'static>>,
}

impl Arguments {
    /// Run the given function over each argument read from the CLI.
    ///
    /// If there were no positional arguments, then this tries to read them
    /// from stdin, one per line. Stated differently, the argument given
    /// to the closure is either always `Positional` or always `StdinLine`.
    /// You can never get a mix.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(Argument<'_>) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        if !self.positional.is_empty() {
            for arg in self.positional {
                if !f(arg)? {
                    return Ok(());
                }
            }
            return Ok(());
        }
        std::io::stdin().lock().for_byte_line(|line| {
            f(Argument::StdinLine(line))
                .with_context(|| format!("line {} of <stdin>", line.number()))
        })
    }
}

impl Configurable for Arguments {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Value(ref mut v) => {
                let v = std::mem::take(v);
                let bytes = Vec::from_os_string(v).map_err(|arg| {
                    anyhow::anyhow!(
                        "recur requires that positional arguments \
                         be valid UTF-8 in non-Unix environments, \
                         but `{arg:?}` is not valid UTF-8",
                    )
                })?;
                self.positional
                    .push(Argument::Positional(BString::from(bytes)));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A generic argument parsed from either positional args on the CLI, or
/// as a single line from stdin.
#[derive(Clone, Debug)]
pub enum Argument<'a> {
    /// Just arbitrary bytes.
    ///
    /// On Windows, we require that this is valid UTF-8.
    Positional(BString),
    /// A line containing arbitrary ASCII compatible bytes.
    ///
    /// This specifically provides access to the line terminator for cases
    /// where commands want to pass through the original data unchanged.
    StdinLine(Line<'a>),
}

impl<'a> Argument<'a> {
    /// Parse this argument into a recurrence rule.
    pub fn to_rule(&self) -> anyhow::Result<Rule> {
        serde_json::from_slice(self.raw())
            .context("invalid recurrence rule")
    }

    /// Returns the original argument as a byte string with a line terminator.
    ///
    /// This is a bit of a weird method, but its purpose is to pass through
    /// data, as given by the end user, unchanged while abstracting over
    /// arguments from the CLI versus from stdin.
    ///
    /// When an argument is from stdin, it either has a line terminator or it's
    /// the last line in the input without a line terminator. In this case,
    /// the original line, in full, with its line terminator, is returned.
    /// When it's the last line without a line terminator, then no line
    /// terminator is included, because that matches the source data.
    ///
    /// But if an argument is from the CLI, then a `\n` line terminator is
    /// specifically inserted in _all_ cases. Which is why a `Cow` is returend.
    ///
    /// In other words, for arguments from stdin, you just get line delimited
    /// data as-is with no copying. But for positional arguments, you get
    /// a copied argument with an artificial line terminator inserted.
    ///
    /// Basically, this abstraction lets callers treat arguments *as if* it
    /// were line delimited data and without needing to worry about inserting
    /// line terminators themselves, and while preserving the exact data
    /// coming from the end user.
    pub fn original_with_line_terminator(&self) -> Cow<'a, BStr> {
        match self {
            Argument::Positional(arg) => {
                let mut data = arg.clone();
                data.push(b'\n');
                Cow::Owned(data)
            }
            Argument::StdinLine(line) => Cow::Borrowed(line.full()),
        }
    }

    /// Return the raw argument value.
    pub fn raw(&self) -> &BStr {
        match *self {
            Argument::Positional(ref arg) => arg.as_bstr(),
            Argument::StdinLine(line) => line.content(),
        }
    }
}
