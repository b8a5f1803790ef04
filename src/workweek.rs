use anyhow::Context;

use jiff::civil::Weekday;

use crate::weekset::WeekdaySet;

/// The configured workweek: the weekday it starts on and how many
/// consecutive days it spans.
///
/// This drives which weekday mask the "daily on workdays" shorthand selects
/// and which masks the summary classifies as "on workdays." It does not
/// change how rules are serialized. It can be set via the `RECUR_WORKWEEK`
/// environment variable as a weekday range, e.g., `mon..fri` or `sun..thu`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Workweek {
    start: Weekday,
    count: u8,
}

impl Workweek {
    /// The weekday the workweek (and thus the displayed week) starts on.
    pub fn start(&self) -> Weekday {
        self.start
    }

    /// Returns the weekday mask covering this workweek.
    pub fn mask(&self) -> WeekdaySet {
        (0..i32::from(self.count))
            .map(|i| self.start.wrapping_add(i))
            .collect()
    }
}

impl Default for Workweek {
    fn default() -> Workweek {
        Workweek { start: Weekday::Monday, count: 5 }
    }
}

impl std::str::FromStr for Workweek {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Workweek> {
        use crate::args::flags;

        let Some((start, end)) = s.split_once("..") else {
            let day = s.parse::<flags::Weekday>().with_context(|| {
                format!("failed to parse `{s}` as a single weekday")
            })?;
            return Ok(Workweek { start: day.get(), count: 1 });
        };
        let start = start
            .parse::<flags::Weekday>()
            .with_context(|| {
                format!(
                    "failed to parse `{start}` \
                     as a weekday within the range `{s}`"
                )
            })?
            .get();
        let end = end
            .parse::<flags::Weekday>()
            .with_context(|| {
                format!(
                    "failed to parse `{end}` \
                     as a weekday within the range `{s}`"
                )
            })?
            .get();
        let diff = i32::from(end.to_sunday_zero_offset())
            - i32::from(start.to_sunday_zero_offset());
        let count = (diff.rem_euclid(7) + 1) as u8;
        Ok(Workweek { start, count })
    }
}

impl std::fmt::Display for Workweek {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let start = crate::args::flags::Weekday::from(self.start);
        let end = crate::args::flags::Weekday::from(
            self.start.wrapping_add(i32::from(self.count) - 1),
        );
        write!(f, "{start}..{end}")
    }
}
