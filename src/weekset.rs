use jiff::civil::Weekday;

/// A set of weekdays encoded as a 7-bit mask.
///
/// Bit 0 is Sunday and bit 6 is Saturday, which matches the encoding of the
/// `days` field in a serialized recurrence rule. A set is never required to
/// be non-empty by construction, but `from_bits` (the wire path) rejects
/// zero, so empty sets only arise from an empty iterator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Monday through Friday.
    ///
    /// This is the fixed mask that marks a weekly rule as the "daily on
    /// workdays" shorthand in its serialized form, regardless of how the
    /// configurable workweek is set.
    pub const WORKDAYS: WeekdaySet = WeekdaySet(0b0111110);

    /// Saturday and Sunday.
    pub const WEEKEND: WeekdaySet = WeekdaySet(0b1000001);

    /// Every day of the week.
    pub const ALL: WeekdaySet = WeekdaySet(0b1111111);

    /// Builds a set from its serialized bit representation.
    ///
    /// The value must be in the range `1..=127`. Zero is rejected here
    /// because a serialized rule omits the field entirely when no weekdays
    /// are in play.
    pub fn from_bits(bits: i64) -> anyhow::Result<WeekdaySet> {
        anyhow::ensure!(
            1 <= bits && bits <= 127,
            "weekday bitmask must be in the range 1..=127, but got `{bits}`",
        );
        Ok(WeekdaySet(bits as u8))
    }

    /// Returns a set containing only the given weekday.
    pub fn single(weekday: Weekday) -> WeekdaySet {
        WeekdaySet(1 << weekday.to_sunday_zero_offset())
    }

    /// Returns the serialized bit representation of this set.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if the given weekday is in this set.
    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.to_sunday_zero_offset()) != 0
    }

    /// Returns the number of weekdays in this set.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Rotates every weekday in this set forward by the given number of
    /// days.
    ///
    /// The shift is reduced modulo 7 first, so any difference between two
    /// weekday offsets (including a negative one) can be passed directly.
    /// A bit that moves past Saturday wraps around to Sunday. Rotating by
    /// `shift` and then by `7 - shift` is a no-op.
    pub fn rotated(self, shift: i32) -> WeekdaySet {
        let shift = shift.rem_euclid(7) as u32;
        if shift == 0 {
            return self;
        }
        let bits = u32::from(self.0);
        WeekdaySet((((bits << shift) | (bits >> (7 - shift))) & 0b111_1111) as u8)
    }

    /// Returns the weekdays in this set in serialized bit order, i.e.,
    /// starting from Sunday.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        self.iter_from(Weekday::Sunday)
    }

    /// Returns the weekdays in this set starting from the given weekday and
    /// wrapping around the week.
    ///
    /// This is the order used for display, where the first day of the week
    /// depends on the caller's preference.
    pub fn iter_from(self, start: Weekday) -> impl Iterator<Item = Weekday> {
        (0..7)
            .map(move |i| start.wrapping_add(i))
            .filter(move |&wd| self.contains(wd))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(it: I) -> WeekdaySet {
        let mut set = WeekdaySet(0);
        for wd in it {
            set.0 |= 1 << wd.to_sunday_zero_offset();
        }
        set
    }
}

impl std::fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut first = true;
        for wd in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            first = false;
            write!(f, "{}", crate::args::flags::Weekday::from(wd))?;
        }
        Ok(())
    }
}
