use flipclock_core::format::{DisplayFormat, format};
use flipclock_core::{Meridiem, TimeSample};
use proptest::prelude::*;

const DAY_MS: u32 = 86_400_000;

fn forward_delta(before: f64, after: f64) -> f64 {
    (after - before).rem_euclid(360.0)
}

proptest! {
    #[test]
    fn angles_are_in_range(ms in 0..DAY_MS) {
        let f = format(TimeSample::from_millis_of_day(ms), DisplayFormat::default());
        for a in [f.hour_angle_deg, f.minute_angle_deg, f.second_angle_deg] {
            prop_assert!((0.0..360.0).contains(&a));
        }
    }

    #[test]
    fn angles_move_forward_by_tiny_steps(ms in 0..DAY_MS) {
        let a = format(TimeSample::from_millis_of_day(ms), DisplayFormat::default());
        let b = format(TimeSample::from_millis_of_day(ms + 1), DisplayFormat::default());
        prop_assert!(forward_delta(a.second_angle_deg, b.second_angle_deg) < 0.01);
        prop_assert!(forward_delta(a.minute_angle_deg, b.minute_angle_deg) < 0.01);
        prop_assert!(forward_delta(a.hour_angle_deg, b.hour_angle_deg) < 0.01);
    }

    #[test]
    fn formatting_is_idempotent(ms in 0..DAY_MS, use_24_hour in any::<bool>()) {
        let sample = TimeSample::from_millis_of_day(ms);
        let fmt = DisplayFormat { use_24_hour };
        prop_assert_eq!(format(sample, fmt), format(sample, fmt));
    }

    #[test]
    fn twelve_hour_text_is_one_to_twelve(ms in 0..DAY_MS) {
        let sample = TimeSample::from_millis_of_day(ms);
        let f = format(sample, DisplayFormat::TWELVE_HOUR);
        let h: u8 = f.hours_text.parse().unwrap();
        prop_assert!((1..=12).contains(&h));
        prop_assert_eq!(f.hours_text.len(), 2);
        let expected = if sample.hour() >= 12 { Meridiem::Pm } else { Meridiem::Am };
        prop_assert_eq!(f.meridiem, Some(expected));
    }

    #[test]
    fn twenty_four_hour_text_matches_field(ms in 0..DAY_MS) {
        let sample = TimeSample::from_millis_of_day(ms);
        let f = format(sample, DisplayFormat::TWENTY_FOUR_HOUR);
        prop_assert_eq!(f.hours_text, format!("{:02}", sample.hour()));
        prop_assert_eq!(f.minutes_text, format!("{:02}", sample.minute()));
        prop_assert_eq!(f.seconds_text, format!("{:02}", sample.second()));
        prop_assert_eq!(f.meridiem, None);
    }
}

#[test]
fn midnight_wrap_is_continuous() {
    let before = format(TimeSample::from_millis_of_day(DAY_MS - 1), DisplayFormat::default());
    let after = format(TimeSample::MIDNIGHT, DisplayFormat::default());
    assert!(forward_delta(before.hour_angle_deg, after.hour_angle_deg) < 0.01);
    assert!(forward_delta(before.second_angle_deg, after.second_angle_deg) < 0.01);
}

#[test]
fn just_after_midnight_in_twelve_hour_format() {
    let sample = TimeSample::new(0, 5, 9, 500).unwrap();
    let f = format(sample, DisplayFormat::TWELVE_HOUR);
    assert_eq!(f.hours_text, "12");
    assert_eq!(f.minutes_text, "05");
    assert_eq!(f.seconds_text, "09");
    assert_eq!(f.meridiem, Some(Meridiem::Am));
}
