//! Header clock: the current UTC time as `YYYY-MM-DD HH:MM:SS UTC`,
//! refreshed every second.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use std::fmt;

/// Refresh period of the clock.
pub const TICK_MS: u32 = 1000;

/// Largest magnitude a JavaScript `Date` accepts, in milliseconds.
const MAX_EPOCH_MS: f64 = 8.64e15;

const SECS_PER_DAY: i64 = 86_400;

/// A wall-clock instant in UTC with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcTime {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl UtcTime {
    /// Break `ms` since the Unix epoch into calendar fields, truncating to
    /// the second. Returns `None` outside the range a `Date` can hold.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_epoch_ms(ms: f64) -> Option<Self> {
        if !ms.is_finite() || ms.abs() > MAX_EPOCH_MS {
            return None;
        }
        let secs = (ms / 1000.0).floor() as i64;
        let days = secs.div_euclid(SECS_PER_DAY);
        let of_day = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Some(Self {
            year,
            month,
            day,
            hour: narrow(of_day / 3600),
            minute: narrow(of_day % 3600 / 60),
            second: narrow(of_day % 60),
        })
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Proleptic Gregorian date for a day count relative to 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, narrow(month), narrow(day))
}

/// Values here are already bounded by the calendar math.
fn narrow(value: i64) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

#[cfg(feature = "csr")]
pub use browser::attach;

#[cfg(feature = "csr")]
mod browser {
    use gloo_timers::callback::Interval;
    use web_sys::Element;

    use super::{TICK_MS, UtcTime};

    fn render(element: &Element) {
        if let Some(now) = UtcTime::from_epoch_ms(js_sys::Date::now()) {
            element.set_text_content(Some(&now.to_string()));
        }
    }

    /// Show the current time in `element` and keep it ticking.
    pub fn attach(element: Element) {
        render(&element);
        // Lives as long as the page.
        Interval::new(TICK_MS, move || render(&element)).forget();
        log::debug!("clock: started");
    }
}
