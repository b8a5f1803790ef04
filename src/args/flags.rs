use {
    anyhow::Context,
    bstr::ByteSlice,
    jiff::civil,
};

use crate::{
    args::Usage,
    parse::FromBytes,
};

/// Provides parsing for the English name of a month.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Month(i8);

impl Month {
    /// Return the parsed month as an integer in the range `1..=12`.
    pub fn get(&self) -> i8 {
        self.0
    }
}

impl std::str::FromStr for Month {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Month> {
        if s.chars().all(|c| c.is_ascii_digit()) {
            let month = s.parse::<i8>().with_context(|| {
                format!("failed to parse `{s}` as an integer month")
            })?;
            anyhow::ensure!(
                1 <= month && month <= 12,
                "parsed `{month}` as an integer month, but it's not \
                 in the required range of `1..=12`",
            );
            return Ok(Month(month));
        }
        let month = match &*s.to_lowercase() {
            "january" | "jan" => 1,
            "february" | "feb" => 2,
            "march" | "mar" => 3,
            "april" | "apr" => 4,
            "may" => 5,
            "june" | "jun" => 6,
            "july" | "jul" => 7,
            "august" | "aug" => 8,
            "september" | "sept" | "sep" => 9,
            "october" | "oct" => 10,
            "november" | "nov" => 11,
            "december" | "dec" => 12,
            unk => anyhow::bail!("unrecognized month name/number: `{unk}`"),
        };
        Ok(Month(month))
    }
}

/// Provides parsing for Jiff's civil `Weekday` type.
#[derive(Clone, Debug)]
pub struct Weekday {
    weekday: civil::Weekday,
}

impl Weekday {
    pub const USAGE_WEEK_START: Usage = Usage::flag(
        "--week-start <weekday>",
        "The weekday on which the displayed week starts.",
        r#"
The weekday on which the displayed week starts.

This controls the order in which the weekdays of a weekly pattern are
listed. When this flag is absent, the week starts on the first day of the
configured workweek, which is Monday unless the `RECUR_WORKWEEK`
environment variable says otherwise.

Any day of the week may be given. They can be specified in the following way
(without regard for case):

Sunday, Sun, SU

Monday, Mon, MO

Tuesday, Tues, Tue, TU

Wednesday, Wed, WE

Thursday, Thurs, Thu, TH

Friday, Fri, FR

Saturday, Sat, SA
"#,
    );

    /// Return the parsed weekday.
    pub fn get(&self) -> civil::Weekday {
        self.weekday
    }
}

impl Default for Weekday {
    fn default() -> Weekday {
        Weekday { weekday: civil::Weekday::Monday }
    }
}

impl From<civil::Weekday> for Weekday {
    fn from(weekday: civil::Weekday) -> Weekday {
        Weekday { weekday }
    }
}

impl std::str::FromStr for Weekday {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Weekday> {
        Weekday::from_bytes(s.as_bytes())
    }
}

impl FromBytes for Weekday {
    type Err = anyhow::Error;

    fn from_bytes(s: &[u8]) -> anyhow::Result<Weekday> {
        use jiff::civil::Weekday::*;

        let weekday = match &*s.to_ascii_lowercase() {
            b"sunday" | b"sun" | b"su" => Sunday,
            b"monday" | b"mon" | b"mo" => Monday,
            b"tuesday" | b"tues" | b"tue" | b"tu" => Tuesday,
            b"wednesday" | b"wed" | b"we" => Wednesday,
            b"thursday" | b"thurs" | b"thu" | b"th" => Thursday,
            b"friday" | b"fri" | b"fr" => Friday,
            b"saturday" | b"sat" | b"sa" => Saturday,
            unk => anyhow::bail!(
                "unrecognized weekday: `{unk}`",
                unk = unk.as_bstr()
            ),
        };
        Ok(Weekday { weekday })
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use jiff::civil::Weekday::*;

        let label = match self.get() {
            Sunday => "Sunday",
            Monday => "Monday",
            Tuesday => "Tuesday",
            Wednesday => "Wednesday",
            Thursday => "Thursday",
            Friday => "Friday",
            Saturday => "Saturday",
        };
        write!(f, "{label}")
    }
}

/// Provides parsing for the ordinal week of a monthly or yearly pattern,
/// i.e., the N in "the Nth Tuesday of the month."
///
/// Accepts both numbers and the English words. `last` is a synonym for the
/// fifth week, matching how the serialized value is read: a month never has
/// more than five of any weekday, so the fifth one is also the last one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ordinal(i8);

impl Ordinal {
    /// Return the parsed ordinal as an integer in the range `1..=5`.
    pub fn get(&self) -> i8 {
        self.0
    }
}

impl std::str::FromStr for Ordinal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Ordinal> {
        if s.chars().all(|c| c.is_ascii_digit()) {
            let ordinal = s.parse::<i8>().with_context(|| {
                format!("failed to parse `{s}` as an integer ordinal")
            })?;
            anyhow::ensure!(
                1 <= ordinal && ordinal <= 5,
                "parsed `{ordinal}` as an ordinal week, but it's not \
                 in the required range of `1..=5`",
            );
            return Ok(Ordinal(ordinal));
        }
        let ordinal = match &*s.to_lowercase() {
            "first" | "1st" => 1,
            "second" | "2nd" => 2,
            "third" | "3rd" => 3,
            "fourth" | "4th" => 4,
            "fifth" | "5th" | "last" => 5,
            unk => anyhow::bail!("unrecognized ordinal week: `{unk}`"),
        };
        Ok(Ordinal(ordinal))
    }
}

/// A scrappy comma delimited sequence of values.
///
/// This type doesn't have any requirements on `T` other than that it can be
/// parsed and printed. It also requires that `,` cannot appear within the
/// parse format of `T` (since this will try to split the sequence on `,`).
/// That is, there's no support for quoting or escaping the commas.
///
/// This does not impose any requirements on the order of the sequence. It does
/// require that the sequence is not empty though.
///
/// NOTE: At the time I wrote this, I wasn't planning on using it with anything
/// that could include a comma in it (integers, days of the week, months and
/// so on). But if this is ever adapted for datetimes or durations, we need to
/// be careful because a comma can be used as a decimal separator in that
/// context.
#[derive(Clone, Debug)]
pub struct CommaSequence<T>(Vec<T>);

impl<T> CommaSequence<T> {
    /// Returns an iterator over every item in this sequence.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<'a, T> IntoIterator for &'a CommaSequence<T> {
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> std::slice::Iter<'a, T> {
        self.0.iter()
    }
}

impl<T, E> std::str::FromStr for CommaSequence<T>
where
    T: std::str::FromStr<Err = E>,
    Result<T, E>: Context<T, E>,
    E: std::fmt::Display,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<CommaSequence<T>> {
        let mut seq = vec![];
        for item in s.split(",") {
            seq.push(item.parse::<T>().map_err(|err| {
                anyhow::Error::msg(format!(
                    "failed to parse `{item}` \
                     within sequence `{s}`: {err}",
                ))
            })?);
        }
        anyhow::ensure!(!seq.is_empty(), "empty sequences are not allowed",);
        Ok(CommaSequence(seq))
    }
}
