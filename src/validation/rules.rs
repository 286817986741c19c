//! Field rules shared by the catalog forms.
//!
//! Rules run on already-trimmed values. Every rule except `required` accepts
//! an empty value, so a blank field reports one error, not several.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::BookStatus;

pub const ISBN_LENGTH: usize = 13;

/// Parse an ISO-8601 calendar date, or the date part of an ISO-8601 timestamp
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse a positive row id
pub fn parse_id(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().filter(|id| *id > 0)
}

pub fn required(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must be specified"));
    }
    Ok(())
}

pub fn alphabetic(value: &str, _ctx: &()) -> garde::Result {
    if !value.chars().all(char::is_alphabetic) {
        return Err(garde::Error::new("has non-alphabetic characters"));
    }
    Ok(())
}

pub fn iso_date(value: &str, _ctx: &()) -> garde::Result {
    if !value.is_empty() && parse_iso_date(value).is_none() {
        return Err(garde::Error::new("is not a valid ISO-8601 date"));
    }
    Ok(())
}

pub fn isbn13(value: &str, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() != ISBN_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(garde::Error::new(format!(
            "must be exactly {} digits",
            ISBN_LENGTH
        )));
    }
    Ok(())
}

pub fn id(value: &str, _ctx: &()) -> garde::Result {
    if !value.is_empty() && parse_id(value).is_none() {
        return Err(garde::Error::new("is not a valid id"));
    }
    Ok(())
}

pub fn book_status(value: &str, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Ok(());
    }
    value.parse::<BookStatus>().map(|_| ()).map_err(|_| {
        let known: Vec<&str> = BookStatus::ALL.iter().map(BookStatus::as_str).collect();
        garde::Error::new(format!("must be one of {}", known.join(", ")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_values() {
        assert!(required("", &()).is_err());
        assert!(required("   ", &()).is_err());
        assert!(required("Jane", &()).is_ok());
    }

    #[test]
    fn alphabetic_allows_letters_only() {
        assert!(alphabetic("Jane", &()).is_ok());
        assert!(alphabetic("Zoë", &()).is_ok());
        assert!(alphabetic("", &()).is_ok());
        assert!(alphabetic("Jane2", &()).is_err());
        assert!(alphabetic("Mary Ann", &()).is_err());
    }

    #[test]
    fn iso_dates_accept_calendar_dates_and_timestamps() {
        assert_eq!(
            parse_iso_date("1973-06-06"),
            NaiveDate::from_ymd_opt(1973, 6, 6)
        );
        assert_eq!(
            parse_iso_date("1992-04-06T10:00:00Z"),
            NaiveDate::from_ymd_opt(1992, 4, 6)
        );
        assert_eq!(
            parse_iso_date("1992-04-06T10:00:00"),
            NaiveDate::from_ymd_opt(1992, 4, 6)
        );
        assert!(parse_iso_date("06/06/1973").is_none());
        assert!(parse_iso_date("1973-02-30").is_none());
        assert!(iso_date("", &()).is_ok());
        assert!(iso_date("yesterday", &()).is_err());
    }

    #[test]
    fn isbn_must_be_thirteen_digits() {
        assert!(isbn13("9781473211896", &()).is_ok());
        assert!(isbn13("978147321189", &()).is_err());
        assert!(isbn13("978-1473211896", &()).is_err());
        assert!(isbn13("ISBN111111", &()).is_err());
    }

    #[test]
    fn ids_are_positive_integers() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
        assert!(id("abc", &()).is_err());
    }

    #[test]
    fn status_must_be_in_the_closed_set() {
        assert!(book_status("ON_LOAN", &()).is_ok());
        assert!(book_status("on_loan", &()).is_err());
        let err = book_status("LOST", &()).unwrap_err();
        assert!(err.to_string().contains("AVAILABLE, ON_LOAN, MAINTENANCE, RESERVED"));
    }
}
