//! Timestamps as stored in the database.

use std::{borrow::Borrow, fmt::Display};
use time::format_description::well_known::Rfc3339;

/// A UTC timestamp with subsecond precision.
///
/// SQLite has no native datetime type. Every timestamp this crate writes or
/// compares goes through this type, so the stored text has one format and
/// interval windows can be selected with plain text comparisons.
///
/// # Examples
///
/// ```
/// # use gfa_sqlite::types::DateTime;
/// # use time::macros::datetime;
/// let start = DateTime::from(datetime!(2023-04-09 10:15 +10:00));
/// assert_eq!(start.to_string(), "2023-04-09T00:15:00Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct DateTime(time::PrimitiveDateTime);

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0.assume_utc();
        match value.format(&Rfc3339) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{value}"),
        }
    }
}

impl<T: Borrow<time::OffsetDateTime>> From<T> for DateTime {
    fn from(value: T) -> Self {
        let utc = value.borrow().to_offset(time::UtcOffset::UTC);
        Self(time::PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl From<DateTime> for time::OffsetDateTime {
    fn from(value: DateTime) -> Self {
        value.0.assume_utc()
    }
}
