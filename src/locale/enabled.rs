use jiff::civil;
use jiff_icu::ConvertInto;
use writeable::Writeable;
use {
    icu_calendar::{Date, Iso},
    icu_datetime::{
        DateTimeFormatter as IcuDateTimeFormatter,
        fieldsets::{YMD, enums::DateFieldSet},
    },
    icu_locale::Locale as IcuLocale,
};

/// A wrapper around an ICU4X locale to create a date formatter.
#[derive(Clone, Debug)]
pub struct Locale(IcuLocale);

impl Locale {
    /// Create a locale that is "unknown."
    pub fn unknown() -> Locale {
        Locale(IcuLocale::UNKNOWN)
    }

    /// Create a formatter for rendering civil dates in this locale.
    pub fn to_date_formatter(&self) -> anyhow::Result<DateFormatter> {
        if self.0.id.language.is_unknown() {
            // The `und` locale would otherwise pick up CLDR root patterns
            // like `2025 Oct 5`. Render the fixed M/D/YYYY form instead,
            // matching builds without the `locale` feature.
            return Ok(DateFormatter(None));
        }
        let fset = DateFieldSet::YMD(YMD::medium());
        let formatter = IcuDateTimeFormatter::try_new((&self.0).into(), fset)?;
        Ok(DateFormatter(Some(formatter)))
    }
}

impl std::str::FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Locale> {
        Ok(Locale(s.parse::<IcuLocale>()?))
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A formatter for civil dates in a fixed locale.
#[derive(Debug)]
pub struct DateFormatter(Option<IcuDateTimeFormatter<DateFieldSet>>);

impl DateFormatter {
    /// Format the given date, e.g., `Oct 5, 2025` in the `en-US` locale.
    pub fn format(&self, date: civil::Date) -> String {
        let Some(ref formatter) = self.0 else {
            return super::undetermined(date);
        };
        let date: Date<Iso> = date.convert_into();
        formatter.format(&date).write_to_string().into_owned()
    }
}
