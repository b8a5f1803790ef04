use {
    anyhow::Context,
    bstr::{BStr, ByteSlice},
    jiff::{Span, Zoned, civil, fmt},
};

use crate::{
    NOW,
    args::{Usage, flags::Weekday},
    parse::{BytesExt, FromBytes},
};

/// Represents a civil date parsed from the CLI.
///
/// Recurrence rules only ever care about calendar days. The anchor of a
/// series, the target of a move and an `until` end condition are all civil
/// dates with no time component. So unlike most datetime handling, there is
/// no instant here and no time zone attached to the parsed value.
///
/// Time zones do still matter for the relative formats, e.g., `today` or
/// `next friday`. Those resolve against the current time in the system's
/// configured time zone (or `RECUR_NOW` when set), and different zones can
/// disagree about which day "today" is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateFlexible {
    date: civil::Date,
}

impl DateFlexible {
    pub const ANCHOR_FLAG: Usage = Usage::flag(
        "-a/--anchor <date>",
        "The start date of the series, e.g., `2025-03-15` or `today`.",
        r#"
The start date of the series.

Recurrence rules do not carry their own start date, but most operations need
one anyway. Weekly rules default to the weekday the series starts on, end
condition conversions count periods from the start date, and validation
checks `until` against it. This flag supplies that date. When it is absent,
today is used.

Dates may be given in ISO 8601 format, e.g., `2025-03-15`. A full datetime
such as `2025-03-15T10:23:00-04:00[America/New_York]` is also accepted, and
only its date is used.

A few relative formats are supported as well:

`today`, `yesterday` and `tomorrow` refer to the current, previous and next
day. The current day is computed once when recur starts, in your system's
configured time zone (which may be overridden by the `TZ` environment
variable), or from the `RECUR_NOW` environment variable when set.

`this thurs` refers to the current day (if it's a Thursday) or the soonest
date that falls on a Thursday.

`last FRIDAY` refers to the previously occurring Friday, up to 1 week in the
past (if the current day is a Friday).

`next saturday` refers to the next Saturday, up to 1 week in the future (if
the current day is a Saturday). `2 fridays` and `-2 fridays` reach further
out in either direction.

A duration like `1 week` or `-3d` refers to the date that far away from
today.
"#,
    );

    /// Get the underlying civil date.
    pub fn get(&self) -> civil::Date {
        self.date
    }

    /// Parses a "flexible" date.
    ///
    /// This supports fixed calendar dates along with relative formats like
    /// `tomorrow` or `next thurs`. When a relative format is found, it is
    /// interpreted relative to the zoned datetime given.
    ///
    /// This type's `FromStr` and `FromBytes` impls are equivalent to calling
    /// this routine with `&crate::NOW`.
    pub fn parse_relative(
        relative: &Zoned,
        s: &[u8],
    ) -> anyhow::Result<DateFlexible> {
        // A fixed date first. `Pieces` accepts a bare civil date as well as
        // any datetime one might be buried in, e.g., a full RFC 9557
        // timestamp. Only the date portion is kept.
        if let Ok(pieces) = fmt::temporal::Pieces::parse(s) {
            return Ok(DateFlexible { date: pieces.date() });
        }
        if let Some(date) = parse_relative(relative, s.as_bstr())? {
            return Ok(DateFlexible { date });
        }
        anyhow::bail!("unrecognized date `{s}`", s = BStr::new(s))
    }
}

impl Default for DateFlexible {
    fn default() -> DateFlexible {
        DateFlexible { date: NOW.date() }
    }
}

impl From<civil::Date> for DateFlexible {
    fn from(date: civil::Date) -> DateFlexible {
        DateFlexible { date }
    }
}

impl std::fmt::Display for DateFlexible {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.date, f)
    }
}

impl std::str::FromStr for DateFlexible {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DateFlexible> {
        s.as_bytes().parse()
    }
}

impl FromBytes for DateFlexible {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<DateFlexible> {
        DateFlexible::parse_relative(&NOW, s)
    }
}

/// Tries to parse a date in `s` relative to the datetime given.
///
/// If one could not be found, then `None` is returned. If one is definitively
/// found, but it could not be processed into a date for some reason, then an
/// error is returned.
fn parse_relative(
    relative: &Zoned,
    s: &BStr,
) -> anyhow::Result<Option<civil::Date>> {
    let today = relative.date();
    match &**s {
        b"now" | b"today" => return Ok(Some(today)),
        b"yesterday" => return Ok(Some(today.yesterday()?)),
        b"tomorrow" => return Ok(Some(today.tomorrow()?)),
        _ => {}
    }
    let Some((first, rest)) = s.split_once_str(" ") else {
        // With zero spaces, this is either a friendly duration or just a
        // weekday.
        return Ok(if let Some(date) = parse_friendly(relative, s)? {
            Some(date)
        } else if let Some(wd) = parse_weekday(s) {
            Some(relative_weekday(relative, 0, wd)?)
        } else {
            None
        });
    };
    // Friendly durations can contain spaces too, e.g., `1 week ago`. Try
    // the whole input as one before splitting off a multiplier.
    if let Some(date) = parse_friendly(relative, s)? {
        return Ok(Some(date));
    }
    if let Some(multiplier) = parse_multiplier(first.as_bstr()) {
        if let Some(wd) = parse_weekday(rest.as_bstr()) {
            return Ok(Some(relative_weekday(relative, multiplier, wd)?));
        }
    }
    Ok(None)
}

/// Parses a weekday name, tolerating a plural, e.g., the one in `2 fridays`.
fn parse_weekday(s: &[u8]) -> Option<Weekday> {
    if let Ok(wd) = s.parse::<Weekday>() {
        return Some(wd);
    }
    let singular = s.strip_suffix(b"s")?;
    singular.parse::<Weekday>().ok()
}

/// Finds the next/previous weekday relative to the datetime given.
///
/// The multiplier refers to the "nth" weekday, with a negative multiplier
/// going back in time.
///
/// The zeroth multiplier is a little special. In this case, if the given
/// datetime falls on the given weekday, then its date is returned unchanged.
fn relative_weekday(
    relative: &Zoned,
    mut multiplier: i32,
    weekday: Weekday,
) -> anyhow::Result<civil::Date> {
    let today = relative.date();
    if multiplier == 0 {
        if today.weekday() == weekday.get() {
            return Ok(today);
        }
        multiplier = 1;
    }
    today.nth_weekday(multiplier, weekday.get()).with_context(|| {
        format!("failed to get {multiplier} {weekday}s after {today}")
    })
}

/// Attempts to parse `s` as a multiplier.
///
/// A multiplier can be a signed integer or an English word standing in for
/// a signed integer. Examples:
///
/// * `this` means `0`
/// * `last` means `-1`
/// * `next` means `1`
/// * `first` means `1`
///
/// Note that since this parses a signed integer, it may be ambiguous with a
/// friendly duration. So before using this, callers should ensure that a
/// friendly duration cannot be parsed.
fn parse_multiplier(s: &BStr) -> Option<i32> {
    if let Some(n) = s.to_str().ok().and_then(|s| s.parse::<i32>().ok()) {
        return Some(n);
    }
    match &*s.to_ascii_lowercase() {
        b"this" => Some(0),
        b"last" => Some(-1),
        b"next" | b"first" => Some(1),
        b"second" => Some(2),
        b"third" => Some(3),
        b"fourth" => Some(4),
        b"fifth" => Some(5),
        _ => None,
    }
}

/// Parses a friendly duration as a relative date.
fn parse_friendly(
    relative: &Zoned,
    s: &BStr,
) -> anyhow::Result<Option<civil::Date>> {
    let Some(span) = s.to_str().ok().and_then(|s| s.parse::<Span>().ok())
    else {
        return Ok(None);
    };
    let zdt = relative.checked_add(span).with_context(|| {
        format!("failed to add `{span:#}` to `{relative}`")
    })?;
    Ok(Some(zdt.date()))
}
