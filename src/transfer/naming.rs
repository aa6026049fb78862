//! Default export file names.

use chrono::NaiveDate;

/// Stem of the default history export name.
pub const HISTORY_EXPORT_STEM: &str = "freetube-history";

/// `{stem}-YYYY-MM-DD.{extension}`
#[must_use]
pub fn default_export_name(stem: &str, extension: &str, date: NaiveDate) -> String {
    format!("{stem}-{}.{extension}", date.format("%Y-%m-%d"))
}

/// Today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_padded_date() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(
            default_export_name("youtube-subscriptions", "opml", date),
            "youtube-subscriptions-2021-03-07.opml"
        );
        assert_eq!(
            default_export_name(HISTORY_EXPORT_STEM, "db", date),
            "freetube-history-2021-03-07.db"
        );
    }
}
