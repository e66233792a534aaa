//! Helpers for xs:dateTime and xs:date values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, XmlError};

/// Parses an xs:dateTime carrying an offset (`2019-09-02T10:13:28.000+02:00`)
/// into the UTC wall-clock instant it denotes.
pub fn parse_xs_datetime(value: &str) -> Result<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .map_err(|_| XmlError::InvalidDateTime {
            value: value.to_string(),
        })
}

/// Calendar date of an xs:dateTime as seen in its own offset.
///
/// Plain xs:date values are accepted as well.
pub fn parse_xs_datetime_local_date(value: &str) -> Result<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local().date());
    }
    parse_xs_date(value)
}

/// Parses a plain xs:date (`YYYY-MM-DD`).
pub fn parse_xs_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| XmlError::InvalidDateTime {
        value: value.to_string(),
    })
}

/// 00:00:00 on the given date.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59 on the given date.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_with_offset_converts_to_utc() {
        let dt = parse_xs_datetime("2019-09-02T10:13:28.000+02:00").unwrap();
        assert_eq!(dt.to_string(), "2019-09-02 08:13:28");
    }

    #[test]
    fn local_date_keeps_the_sender_offset() {
        // 00:30 at +02:00 is still the previous day in UTC; the local
        // view keeps the sender's calendar date.
        let date = parse_xs_datetime_local_date("2019-09-01T00:30:00.000+02:00").unwrap();
        assert_eq!(date.to_string(), "2019-09-01");
        let utc = parse_xs_datetime("2019-09-01T00:30:00.000+02:00").unwrap();
        assert_eq!(utc.to_string(), "2019-08-31 22:30:00");
    }

    #[test]
    fn plain_date_parses() {
        let date = parse_xs_date("1982-03-28").unwrap();
        assert_eq!(date.to_string(), "1982-03-28");
        let date = parse_xs_datetime_local_date("1982-03-28").unwrap();
        assert_eq!(date.to_string(), "1982-03-28");
    }

    #[test]
    fn day_bounds() {
        let date = parse_xs_date("2019-09-30").unwrap();
        assert_eq!(start_of_day(date).to_string(), "2019-09-30 00:00:00");
        assert_eq!(end_of_day(date).to_string(), "2019-09-30 23:59:59");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            parse_xs_datetime("not a date"),
            Err(XmlError::InvalidDateTime { .. })
        ));
        assert!(matches!(
            parse_xs_date("28.03.1982"),
            Err(XmlError::InvalidDateTime { .. })
        ));
    }
}
