use chrono::{NaiveTime, TimeDelta};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const PARSE_FORMAT: &str = "%I:%M %p";
const DISPLAY_FORMAT: &str = "%-I:%M %p";

#[derive(Error, Debug)]
#[error("invalid time of day '{input}', expected H:MM AM|PM")]
pub struct ClockTimeError {
    input: String,
    #[source]
    source: chrono::ParseError,
}

/// Wall-clock time of day shown in 12-hour form, e.g. `10:45 AM`.
///
/// Arithmetic wraps around midnight, there is no date component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Builds a time from a 24-hour clock literal. Panics on out-of-range values.
    pub const fn hm(hour: u32, minute: u32) -> Self {
        match NaiveTime::from_hms_opt(hour, minute, 0) {
            Some(time) => ClockTime(time),
            None => panic!("hour or minute out of range"),
        }
    }

    pub fn add_minutes(&self, minutes: i64) -> Self {
        ClockTime(self.0 + TimeDelta::minutes(minutes))
    }

    pub fn naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        ClockTime(time)
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), PARSE_FORMAT)
            .map(ClockTime)
            .map_err(|source| ClockTimeError {
                input: s.to_owned(),
                source,
            })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

/// Adds `minutes` to a `H:MM AM|PM` string and formats the result the same way.
pub fn add_minutes(time: &str, minutes: i64) -> Result<String, ClockTimeError> {
    let time: ClockTime = time.parse()?;
    Ok(time.add_minutes(minutes).to_string())
}
