//! Token lifetime parsing.
//!
//! Accepts the compact notation deployments already use for `JWT_EXPIRES_IN`:
//! a number followed by a unit (`90s`, `15m`, `12h`, `30d`, `1.5 hours`,
//! `2w`, `1y`). A number without a unit is milliseconds, so `"86400000"` is
//! one day and `"3600"` is 3.6 seconds.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use super::{ConfigError, MAX_JWT_EXPIRES_IN_SECONDS};

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = MS_PER_SECOND * 60.0;
const MS_PER_HOUR: f64 = MS_PER_MINUTE * 60.0;
const MS_PER_DAY: f64 = MS_PER_HOUR * 24.0;
const MS_PER_WEEK: f64 = MS_PER_DAY * 7.0;
const MS_PER_YEAR: f64 = MS_PER_DAY * 365.25;

/// Lifetime of an issued token, whole seconds, between one second and 100 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenExpiry {
    seconds: i64,
}

impl TokenExpiry {
    /// Build from a number of seconds.
    pub fn from_seconds(seconds: i64) -> Result<Self, ConfigError> {
        if !(1..=MAX_JWT_EXPIRES_IN_SECONDS).contains(&seconds) {
            return Err(ConfigError::InvalidExpiry(seconds.to_string()));
        }
        Ok(Self { seconds })
    }

    pub fn as_seconds(&self) -> i64 {
        self.seconds
    }

    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.seconds)
    }
}

impl FromStr for TokenExpiry {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidExpiry(raw.to_string());
        let value = raw.trim();

        let split = value
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(value.len());
        let (number, unit) = value.split_at(split);
        let amount: f64 = number.parse().map_err(|_| invalid())?;
        let unit_ms = match unit.trim() {
            "" => 1.0,
            unit => unit_millis(unit).ok_or_else(invalid)?,
        };

        let seconds = (amount * unit_ms / MS_PER_SECOND).floor();
        if !seconds.is_finite() || seconds > MAX_JWT_EXPIRES_IN_SECONDS as f64 {
            return Err(invalid());
        }

        Self::from_seconds(seconds as i64).map_err(|_| invalid())
    }
}

impl fmt::Display for TokenExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

fn unit_millis(unit: &str) -> Option<f64> {
    let unit = unit.to_ascii_lowercase();
    let ms = match unit.as_str() {
        "years" | "year" | "yrs" | "yr" | "y" => MS_PER_YEAR,
        "weeks" | "week" | "w" => MS_PER_WEEK,
        "days" | "day" | "d" => MS_PER_DAY,
        "hours" | "hour" | "hrs" | "hr" | "h" => MS_PER_HOUR,
        "minutes" | "minute" | "mins" | "min" | "m" => MS_PER_MINUTE,
        "seconds" | "second" | "secs" | "sec" | "s" => MS_PER_SECOND,
        "milliseconds" | "millisecond" | "msecs" | "msec" | "ms" => 1.0,
        _ => return None,
    };
    Some(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seconds(raw: &str) -> i64 {
        raw.parse::<TokenExpiry>().unwrap().as_seconds()
    }

    #[test]
    fn test_unitless_number_is_milliseconds() {
        assert_eq!(seconds("86400000"), 86_400);
        assert_eq!(seconds("3600"), 3);
        assert_eq!(seconds(" 60000 "), 60);
    }

    #[test]
    fn test_short_units() {
        assert_eq!(seconds("90s"), 90);
        assert_eq!(seconds("15m"), 900);
        assert_eq!(seconds("12h"), 43_200);
        assert_eq!(seconds("30d"), 2_592_000);
        assert_eq!(seconds("2w"), 1_209_600);
        assert_eq!(seconds("1y"), 31_557_600);
    }

    #[test]
    fn test_long_units_and_spacing() {
        assert_eq!(seconds("1.5 hours"), 5_400);
        assert_eq!(seconds("2 Days"), 172_800);
        assert_eq!(seconds("2500ms"), 2);
    }

    #[test]
    fn test_rejects_garbage() {
        for raw in ["", "abc", "10 fortnights", "0", "-5", "0s", "500ms", "999", "1.2.3h"] {
            assert!(raw.parse::<TokenExpiry>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_lifetimes_beyond_limit() {
        for raw in ["9223372036854775807", "1000000000000y", "101y"] {
            assert!(
                matches!(raw.parse::<TokenExpiry>(), Err(ConfigError::InvalidExpiry(_))),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(seconds("100y"), MAX_JWT_EXPIRES_IN_SECONDS);
        assert!(TokenExpiry::from_seconds(i64::MAX).is_err());
    }

    #[test]
    fn test_duration_matches_seconds() {
        let expiry = TokenExpiry::from_seconds(120).unwrap();
        assert_eq!(expiry.as_duration(), Duration::minutes(2));
        assert_eq!(expiry.to_string(), "120s");
    }
}
