use jiff::civil;

pub use self::inner::*;

/// Renders a date without any locale data, `M/D/YYYY` with no zero padding.
///
/// This is what the `und` locale gets, and what every date gets when the
/// `locale` feature is disabled.
fn undetermined(date: civil::Date) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

#[cfg(feature = "locale")]
#[path = "enabled.rs"]
mod inner;

#[cfg(not(feature = "locale"))]
#[path = "disabled.rs"]
mod inner;
