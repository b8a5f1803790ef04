use jiff::civil;

#[derive(Clone, Debug)]
pub struct Locale(());

impl Locale {
    pub fn unknown() -> Locale {
        Locale(())
    }

    pub fn to_date_formatter(&self) -> anyhow::Result<DateFormatter> {
        Ok(DateFormatter(()))
    }
}

impl std::str::FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(_: &str) -> anyhow::Result<Locale> {
        anyhow::bail!(
            "recur must be compiled with the `locale` feature to \
             format dates in a particular locale",
        )
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "und")
    }
}

#[derive(Debug)]
pub struct DateFormatter(());

impl DateFormatter {
    pub fn format(&self, date: civil::Date) -> String {
        super::undetermined(date)
    }
}
