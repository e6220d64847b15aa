//! Time formatting and hand angles.

use std::fmt;

use crate::time::TimeSample;

/// Hour-format preference.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct DisplayFormat {
    pub use_24_hour: bool,
}

impl DisplayFormat {
    pub const TWELVE_HOUR: Self = Self { use_24_hour: false };
    pub const TWENTY_FOUR_HOUR: Self = Self { use_24_hour: true };

    pub fn toggled(self) -> Self {
        Self {
            use_24_hour: !self.use_24_hour,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn as_str(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the renderers need from one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedTime {
    pub hours_text: String,
    pub minutes_text: String,
    pub seconds_text: String,

    /// `None` in 24-hour mode.
    pub meridiem: Option<Meridiem>,

    /// Degrees clockwise from 12 o'clock, in `[0, 360)`.
    pub hour_angle_deg: f64,
    pub minute_angle_deg: f64,
    pub second_angle_deg: f64,
}

impl FormattedTime {
    /// `HH:MM` followed by the meridiem when present.
    pub fn short_label(&self) -> String {
        match self.meridiem {
            Some(m) => format!("{}:{} {m}", self.hours_text, self.minutes_text),
            None => format!("{}:{}", self.hours_text, self.minutes_text),
        }
    }
}

/// Continuous hand angles for a sample.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

pub fn hand_angles(sample: TimeSample) -> HandAngles {
    let seconds = f64::from(sample.second()) + f64::from(sample.millisecond()) / 1000.0;
    let minutes = f64::from(sample.minute()) + seconds / 60.0;
    let hours = f64::from(sample.hour()) + minutes / 60.0;

    HandAngles {
        hour: (hours * 30.0).rem_euclid(360.0),
        minute: (minutes * 6.0).rem_euclid(360.0),
        second: (seconds * 6.0).rem_euclid(360.0),
    }
}

/// Formats a sample. Pure and infallible.
pub fn format(sample: TimeSample, format: DisplayFormat) -> FormattedTime {
    let (hours_text, meridiem) = if format.use_24_hour {
        (format!("{:02}", sample.hour()), None)
    } else {
        let h = match sample.hour() % 12 {
            0 => 12,
            h => h,
        };
        let m = if sample.hour() >= 12 {
            Meridiem::Pm
        } else {
            Meridiem::Am
        };
        (format!("{h:02}"), Some(m))
    };

    let angles = hand_angles(sample);

    FormattedTime {
        hours_text,
        minutes_text: format!("{:02}", sample.minute()),
        seconds_text: format!("{:02}", sample.second()),
        meridiem,
        hour_angle_deg: angles.hour,
        minute_angle_deg: angles.minute,
        second_angle_deg: angles.second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u8, m: u8, s: u8, ms: u16) -> TimeSample {
        TimeSample::new(h, m, s, ms).unwrap()
    }

    #[test]
    fn twelve_hour_table() {
        let cases = [
            (0, "12", Meridiem::Am),
            (1, "01", Meridiem::Am),
            (11, "11", Meridiem::Am),
            (12, "12", Meridiem::Pm),
            (13, "01", Meridiem::Pm),
            (23, "11", Meridiem::Pm),
        ];
        for (hour, text, meridiem) in cases {
            let f = format(at(hour, 0, 0, 0), DisplayFormat::TWELVE_HOUR);
            assert_eq!(f.hours_text, text, "hour {hour}");
            assert_eq!(f.meridiem, Some(meridiem), "hour {hour}");
        }
    }

    #[test]
    fn twenty_four_hour_pads_without_meridiem() {
        let f = format(at(7, 5, 9, 0), DisplayFormat::TWENTY_FOUR_HOUR);
        assert_eq!(f.hours_text, "07");
        assert_eq!(f.minutes_text, "05");
        assert_eq!(f.seconds_text, "09");
        assert_eq!(f.meridiem, None);
    }

    #[test]
    fn angles_at_known_times() {
        let a = hand_angles(at(3, 0, 0, 0));
        assert_eq!(a.hour, 90.0);
        assert_eq!(a.minute, 0.0);

        let a = hand_angles(at(6, 30, 30, 0));
        assert!((a.hour - 195.25).abs() < 1e-9);
        assert!((a.minute - 183.0).abs() < 1e-9);
        assert!((a.second - 180.0).abs() < 1e-9);

        // Afternoon hours wrap onto the same dial position.
        assert_eq!(hand_angles(at(15, 0, 0, 0)).hour, 90.0);
    }

    #[test]
    fn short_label_includes_meridiem() {
        let f = format(at(0, 5, 0, 0), DisplayFormat::TWELVE_HOUR);
        assert_eq!(f.short_label(), "12:05 AM");
        let f = format(at(0, 5, 0, 0), DisplayFormat::TWENTY_FOUR_HOUR);
        assert_eq!(f.short_label(), "00:05");
    }
}
