//! Date helper functions

use chrono::{DateTime, Datelike, Utc};

/// Locale used for short date formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    PtBr,
}

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

impl Locale {
    /// Resolve a locale from a language tag, falling back to English
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Locale::PtBr,
            _ => Locale::En,
        }
    }

    fn month_abbrev(&self, month0: usize) -> &'static str {
        match self {
            Locale::En => MONTHS_EN[month0],
            Locale::PtBr => MONTHS_PT_BR[month0],
        }
    }
}

/// Format a date in the short "dd MMM yyyy" display form
///
/// # Examples
/// ```ignore
/// format_short_date(&date, Locale::PtBr) // -> "15 mar 2021"
/// ```
pub fn format_short_date(date: &DateTime<Utc>, locale: Locale) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        locale.month_abbrev(date.month0() as usize),
        date.year(),
    )
}

/// Format an optional date, passing null through
pub fn format_short_date_opt(date: &Option<DateTime<Utc>>, locale: Locale) -> Option<String> {
    date.as_ref().map(|d| format_short_date(d, locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_short_date_pt_br() {
        let date = Utc.with_ymd_and_hms(2021, 3, 15, 19, 25, 28).unwrap();
        assert_eq!(format_short_date(&date, Locale::PtBr), "15 mar 2021");
    }

    #[test]
    fn test_format_short_date_en() {
        let date = Utc.with_ymd_and_hms(2021, 6, 5, 0, 0, 0).unwrap();
        assert_eq!(format_short_date(&date, Locale::En), "05 Jun 2021");
    }

    #[test]
    fn test_locale_from_tag() {
        assert_eq!(Locale::from_tag("pt-BR"), Locale::PtBr);
        assert_eq!(Locale::from_tag("en"), Locale::En);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
    }

    #[test]
    fn test_format_opt() {
        assert_eq!(format_short_date_opt(&None, Locale::En), None);
        let date = Utc.with_ymd_and_hms(2021, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(
            format_short_date_opt(&Some(date), Locale::En).as_deref(),
            Some("01 Dec 2021")
        );
    }
}
