use chrono::NaiveDate;

/// Human date used in email bodies, e.g. `Mar 1, 2025`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
