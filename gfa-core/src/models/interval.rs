use std::{fmt::Display, time::Duration};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// A half-open trading interval `[start, start + duration)`.
///
/// The start is always held in UTC. Intervals are compared and hashed by
/// (start, duration), so two intervals of different networks with different
/// durations never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// The inclusive start of the interval
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub start: OffsetDateTime,

    /// The length of the interval
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub duration: Duration,
}

/// The reasons an interval can be rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    /// The duration is zero
    #[error("interval duration must be positive")]
    ZeroDuration,

    /// The start does not fall on a boundary of the interval duration
    #[error("interval start {start} is not aligned to {duration:?}")]
    Misaligned {
        /// The requested start
        start: OffsetDateTime,
        /// The requested duration
        duration: Duration,
    },
}

impl Interval {
    /// Construct an interval, requiring that `start` falls on a multiple of
    /// `duration` since the unix epoch.
    pub fn aligned(start: OffsetDateTime, duration: Duration) -> Result<Self, IntervalError> {
        if duration.is_zero() {
            return Err(IntervalError::ZeroDuration);
        }

        let start = start.to_offset(UtcOffset::UTC);
        if start.unix_timestamp_nanos() % duration.as_nanos() as i128 != 0 {
            return Err(IntervalError::Misaligned { start, duration });
        }

        Ok(Self { start, duration })
    }

    /// The exclusive end of the interval
    pub fn end(&self) -> OffsetDateTime {
        self.start + self.duration
    }

    /// The interval length in hours, used to convert power (MW) into energy (MWh)
    pub fn hours(&self) -> f64 {
        self.duration.as_secs_f64() / 3600.0
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.start.format(&Rfc3339) {
            Ok(start) => write!(f, "{start}"),
            Err(_) => write!(f, "{}", self.start),
        }
    }
}
