//! Minute-of-day to 12-hour clock labels.
//!
//! Used for the hour ticks on the timeline axis. Inputs are expected in
//! `[0, 1440)`; larger values are formatted without wrapping the day, so
//! `1500` becomes `"1:00 AM"` (hour 25 is outside the PM window).

/// Number of minutes in one day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Format a minute-of-day as `H:MM AM` / `H:MM PM`.
pub fn format_clock_time(minute_of_day: u32) -> String {
    let hour = minute_of_day / 60;
    let minute = minute_of_day % 60;
    let period = if (12..24).contains(&hour) { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minute:02} {period}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_and_noon_use_twelve() {
        assert_eq!(format_clock_time(0), "12:00 AM");
        assert_eq!(format_clock_time(720), "12:00 PM");
    }

    #[test]
    fn minutes_are_zero_padded() {
        assert_eq!(format_clock_time(781), "1:01 PM");
        assert_eq!(format_clock_time(65), "1:05 AM");
    }

    #[test]
    fn last_minute_of_day() {
        assert_eq!(format_clock_time(1439), "11:59 PM");
    }

    #[test]
    fn morning_hours_are_am() {
        assert_eq!(format_clock_time(420), "7:00 AM");
        assert_eq!(format_clock_time(719), "11:59 AM");
    }

    #[test]
    fn out_of_range_is_not_wrapped_to_pm() {
        assert_eq!(format_clock_time(1440), "12:00 AM");
        assert_eq!(format_clock_time(1500), "1:00 AM");
    }
}
