//! Display date parsing for the capture screen's date bar

use chrono::{DateTime, NaiveDate};

use crate::error::{Error, Result};

/// Format of the date bar label, e.g. `March 05, 2012`
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Turns a displayed date label back into a timestamp.
pub trait DateParser {
    /// Parse `display`, taking any part the label does not show (such as the
    /// time of day) from `reference_millis`.
    fn parse(&self, display: &str, reference_millis: i64) -> Result<i64>;
}

/// Parses [`DISPLAY_DATE_FORMAT`] labels in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayDateParser;

impl DateParser for DisplayDateParser {
    fn parse(&self, display: &str, reference_millis: i64) -> Result<i64> {
        let date = NaiveDate::parse_from_str(display.trim(), DISPLAY_DATE_FORMAT)
            .map_err(|error| Error::InvalidInput(format!("Invalid date '{display}': {error}")))?;
        let reference = DateTime::from_timestamp_millis(reference_millis).ok_or_else(|| {
            Error::InvalidInput(format!("Timestamp out of range: {reference_millis}"))
        })?;

        Ok(date.and_time(reference.time()).and_utc().timestamp_millis())
    }
}

/// Render a timestamp the way the date bar shows it
pub fn format_display_date(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|time| time.format(DISPLAY_DATE_FORMAT).to_string())
}
