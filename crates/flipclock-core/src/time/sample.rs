use chrono::Timelike;
use thiserror::Error;

const MILLIS_PER_DAY: u32 = 86_400_000;

/// Wall-clock time of day with millisecond precision.
///
/// Fields are validated on construction and cannot change afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TimeSample {
    hour: u8,
    minute: u8,
    second: u8,
    millisecond: u16,
}

/// A time-of-day field was outside its range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum TimeSampleError {
    #[error("hour {0} is outside 0..=23")]
    Hour(u8),
    #[error("minute {0} is outside 0..=59")]
    Minute(u8),
    #[error("second {0} is outside 0..=59")]
    Second(u8),
    #[error("millisecond {0} is outside 0..=999")]
    Millisecond(u16),
}

impl TimeSample {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    pub fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Result<Self, TimeSampleError> {
        if hour > 23 {
            return Err(TimeSampleError::Hour(hour));
        }
        if minute > 59 {
            return Err(TimeSampleError::Minute(minute));
        }
        if second > 59 {
            return Err(TimeSampleError::Second(second));
        }
        if millisecond > 999 {
            return Err(TimeSampleError::Millisecond(millisecond));
        }
        Ok(Self {
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// Builds a sample from milliseconds since midnight, wrapping at 24 h.
    pub fn from_millis_of_day(ms: u32) -> Self {
        let ms = ms % MILLIS_PER_DAY;
        Self {
            hour: (ms / 3_600_000) as u8,
            minute: (ms / 60_000 % 60) as u8,
            second: (ms / 1_000 % 60) as u8,
            millisecond: (ms % 1_000) as u16,
        }
    }

    /// Samples any chrono time value.
    ///
    /// Leap-second nanoseconds (>= 1 s) are clamped to 999 ms.
    pub fn from_timelike<T: Timelike>(t: &T) -> Self {
        let millisecond = (t.nanosecond() / 1_000_000).min(999) as u16;
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
            second: t.second() as u8,
            millisecond,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn millisecond(&self) -> u16 {
        self.millisecond
    }

    pub fn millis_of_day(&self) -> u32 {
        u32::from(self.hour) * 3_600_000
            + u32::from(self.minute) * 60_000
            + u32::from(self.second) * 1_000
            + u32::from(self.millisecond)
    }

    /// Returns the sample `ms` milliseconds later, wrapping past midnight.
    pub fn add_millis(&self, ms: u32) -> Self {
        let total = (u64::from(self.millis_of_day()) + u64::from(ms)) % u64::from(MILLIS_PER_DAY);
        Self::from_millis_of_day(total as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(TimeSample::new(24, 0, 0, 0), Err(TimeSampleError::Hour(24)));
        assert_eq!(TimeSample::new(0, 60, 0, 0), Err(TimeSampleError::Minute(60)));
        assert_eq!(TimeSample::new(0, 0, 60, 0), Err(TimeSampleError::Second(60)));
        assert_eq!(
            TimeSample::new(0, 0, 0, 1000),
            Err(TimeSampleError::Millisecond(1000))
        );
        assert!(TimeSample::new(23, 59, 59, 999).is_ok());
    }

    #[test]
    fn millis_of_day_round_trips() {
        let s = TimeSample::new(13, 7, 42, 512).unwrap();
        assert_eq!(TimeSample::from_millis_of_day(s.millis_of_day()), s);
    }

    #[test]
    fn add_millis_wraps_at_midnight() {
        let s = TimeSample::new(23, 59, 59, 999).unwrap();
        assert_eq!(s.add_millis(1), TimeSample::MIDNIGHT);
    }

    #[test]
    fn leap_second_nanos_clamp() {
        let t = NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap();
        let s = TimeSample::from_timelike(&t);
        assert_eq!(s.second(), 59);
        assert_eq!(s.millisecond(), 999);
    }

    #[test]
    fn error_messages_name_the_field() {
        assert_eq!(TimeSampleError::Minute(75).to_string(), "minute 75 is outside 0..=59");
    }
}
