//! Substitution of time-dependent names.
//!
//! The clock is read at most once per pass so every `NOW` in a program sees
//! the same instant.

use chrono::{DateTime, Datelike, Local, Utc, Weekday};

use crate::api::SyntaxError;
use crate::bindings::{Binding, Resolved};

const SECONDS_PER_DAY: i64 = 86_400;

/// Time values captured at the start of a pass.
pub(super) struct Clock {
    now: f64,
    time: Option<f64>,
    count: Option<f64>,
}

/// The `TIME` binding, viewed in the local time zone.
struct BoundTime {
    local_seconds: i64,
    local: DateTime<Local>,
}

impl Clock {
    pub(super) fn capture(bindings: &Resolved) -> Result<Self, SyntaxError> {
        let time = match bindings.get("TIME") {
            Some(Binding::Scalar(epoch)) => Some(*epoch),
            Some(Binding::Series(_)) => return Err(SyntaxError::TimeNotNumeric),
            None => None,
        };
        let count = match bindings.get("COUNT") {
            Some(Binding::Scalar(count)) => Some(*count),
            _ => None,
        };
        Ok(Self {
            now: Utc::now().timestamp() as f64,
            time,
            count,
        })
    }

    /// Value of a time-dependent name, or `None` when it cannot be resolved.
    ///
    /// The calendar view of `TIME` is only built for the names that need it.
    pub(super) fn resolve(
        &self,
        name: &str,
        seconds_per_interval: f64,
    ) -> Result<Option<f64>, SyntaxError> {
        match name {
            "NOW" => return Ok(Some(self.now)),
            "COUNT" => return Ok(self.count),
            _ => {}
        }
        let Some(epoch) = self.time else {
            return Ok(None);
        };
        if name == "TIME" {
            return Ok(Some(epoch));
        }
        let time = BoundTime::new(epoch)?;
        let value = match name {
            "LTIME" => time.local_seconds as f64,
            "NEWDAY" => time.first_of_day(seconds_per_interval),
            "NEWWEEK" if time.local.weekday() == Weekday::Sun => {
                time.first_of_day(seconds_per_interval)
            }
            "NEWMONTH" if time.local.day() == 1 => time.first_of_day(seconds_per_interval),
            "NEWYEAR" if time.local.month() == 1 && time.local.day() == 1 => {
                time.first_of_day(seconds_per_interval)
            }
            "NEWWEEK" | "NEWMONTH" | "NEWYEAR" => 0.0,
            _ => return Ok(None),
        };
        Ok(Some(value))
    }
}

impl BoundTime {
    fn new(epoch: f64) -> Result<Self, SyntaxError> {
        if !epoch.is_finite() {
            return Err(SyntaxError::TimeOutOfRange(epoch));
        }
        let utc = DateTime::<Utc>::from_timestamp(epoch as i64, 0)
            .ok_or(SyntaxError::TimeOutOfRange(epoch))?;
        let local = utc.with_timezone(&Local);
        let offset = i64::from(local.offset().local_minus_utc());
        Ok(Self {
            local_seconds: utc.timestamp() + offset,
            local,
        })
    }

    /// 1 when the instant lies within one sampling interval after local midnight.
    fn first_of_day(&self, seconds_per_interval: f64) -> f64 {
        let js = self.local_seconds;
        let left = (js / SECONDS_PER_DAY) * SECONDS_PER_DAY;
        let right = left + seconds_per_interval as i64;
        if js < left || js > right { 0.0 } else { 1.0 }
    }
}

/// Key under which an unresolved time-dependent name is recorded.
pub(super) fn open_key(name: &str) -> &str {
    match name {
        "LTIME" | "NEWDAY" | "NEWWEEK" | "NEWMONTH" | "NEWYEAR" => "TIME",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;

    /// Epoch seconds whose local wall clock reads `local_seconds` after the epoch.
    fn local_to_utc(local_seconds: i64) -> f64 {
        let probe = DateTime::<Utc>::from_timestamp(local_seconds, 0)
            .unwrap()
            .with_timezone(&Local);
        (local_seconds - i64::from(probe.offset().local_minus_utc())) as f64
    }

    fn clock_at(epoch: f64) -> Clock {
        let mut bindings = HashMap::new();
        bindings.insert("TIME".to_string(), Binding::Scalar(epoch));
        Clock::capture(&bindings).unwrap()
    }

    #[test]
    fn test_open_keys() {
        assert_eq!(open_key("NOW"), "NOW");
        assert_eq!(open_key("TIME"), "TIME");
        assert_eq!(open_key("NEWYEAR"), "TIME");
        assert_eq!(open_key("COUNT"), "COUNT");
    }

    #[test]
    fn test_time_requires_binding() {
        let clock = Clock::capture(&HashMap::new()).unwrap();
        assert!(clock.resolve("NOW", 300.0).unwrap().is_some());
        assert_eq!(clock.resolve("TIME", 300.0).unwrap(), None);
        assert_eq!(clock.resolve("NEWDAY", 300.0).unwrap(), None);
        assert_eq!(clock.resolve("COUNT", 300.0).unwrap(), None);
    }

    #[test]
    fn test_series_time_rejected() {
        let mut bindings = HashMap::new();
        bindings.insert("TIME".to_string(), Binding::Series(vec![1.0]));
        assert!(matches!(
            Clock::capture(&bindings),
            Err(SyntaxError::TimeNotNumeric)
        ));
    }

    #[test]
    fn test_newday_edges() {
        let cases = [(-1, 0.0), (0, 1.0), (300, 1.0), (301, 0.0)];
        for (local, expected) in cases {
            let clock = clock_at(local_to_utc(local));
            assert_eq!(clock.resolve("NEWDAY", 300.0).unwrap(), Some(expected), "{}", local);
        }
    }

    #[test]
    fn test_newweek_only_on_sunday() {
        // 1970-01-04 was a Sunday.
        let sunday = 3 * SECONDS_PER_DAY;
        assert_eq!(
            clock_at(local_to_utc(sunday)).resolve("NEWWEEK", 300.0).unwrap(),
            Some(1.0)
        );
        assert_eq!(
            clock_at(local_to_utc(sunday + 300)).resolve("NEWWEEK", 300.0).unwrap(),
            Some(1.0)
        );
        assert_eq!(
            clock_at(local_to_utc(sunday - 1)).resolve("NEWWEEK", 300.0).unwrap(),
            Some(0.0)
        );
        assert_eq!(
            clock_at(local_to_utc(sunday + SECONDS_PER_DAY)).resolve("NEWWEEK", 300.0).unwrap(),
            Some(0.0)
        );
    }

    #[test]
    fn test_newmonth_and_newyear() {
        // 1970-02-01
        let february = 31 * SECONDS_PER_DAY;
        let clock = clock_at(local_to_utc(february));
        assert_eq!(clock.resolve("NEWMONTH", 300.0).unwrap(), Some(1.0));
        assert_eq!(clock.resolve("NEWYEAR", 300.0).unwrap(), Some(0.0));

        // 1971-01-01
        let year = 365 * SECONDS_PER_DAY;
        let clock = clock_at(local_to_utc(year));
        assert_eq!(clock.resolve("NEWMONTH", 300.0).unwrap(), Some(1.0));
        assert_eq!(clock.resolve("NEWYEAR", 300.0).unwrap(), Some(1.0));
    }

    #[test]
    fn test_ltime_shifts_by_local_offset() {
        let epoch = 1_234_567_890.0;
        let clock = clock_at(epoch);
        let offset = DateTime::<Utc>::from_timestamp(1_234_567_890, 0)
            .unwrap()
            .with_timezone(&Local)
            .offset()
            .local_minus_utc();
        assert_eq!(clock.resolve("TIME", 300.0).unwrap(), Some(epoch));
        assert_eq!(
            clock.resolve("LTIME", 300.0).unwrap(),
            Some(epoch + f64::from(offset))
        );
    }

    #[test]
    fn test_unusable_time_only_fails_calendar_names() {
        let clock = clock_at(1e300);
        assert!(clock.resolve("NOW", 300.0).unwrap().is_some());
        assert_eq!(clock.resolve("TIME", 300.0).unwrap(), Some(1e300));
        assert!(matches!(
            clock.resolve("NEWDAY", 300.0),
            Err(SyntaxError::TimeOutOfRange(_))
        ));
    }

    #[test]
    fn test_nan_time_is_rejected() {
        let clock = clock_at(f64::NAN);
        for name in ["LTIME", "NEWDAY", "NEWWEEK", "NEWMONTH", "NEWYEAR"] {
            assert!(
                matches!(clock.resolve(name, 300.0), Err(SyntaxError::TimeOutOfRange(v)) if v.is_nan()),
                "{}",
                name
            );
        }
    }
}
