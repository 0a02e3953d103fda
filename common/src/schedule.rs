use chrono::NaiveTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid {field} value {value:?}, expected HH:MM")]
    InvalidTime { field: &'static str, value: String },
}

/// Daily on/off window. Both times are absent until first set via the
/// schedule API; the value lives only in process memory.
///
/// A start after the end means the window wraps past midnight. That is
/// stored as-is and honored by [`Schedule::window_contains`]; nothing
/// enforces the window yet — a future scheduler task is expected to
/// poll it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub enabled: bool,
}

const TIME_FORMAT: &str = "%H:%M";

impl Schedule {
    /// Replaces the window from `"HH:MM"` strings. Both fields are
    /// parsed before anything is committed, so a malformed value
    /// leaves the stored schedule untouched.
    pub fn apply(
        &mut self,
        start: Option<&str>,
        end: Option<&str>,
        enabled: bool,
    ) -> Result<(), ScheduleError> {
        let start = start.map(|s| parse_time("start_time", s)).transpose()?;
        let end = end.map(|s| parse_time("end_time", s)).transpose()?;

        self.start = start;
        self.end = end;
        self.enabled = enabled;
        Ok(())
    }

    /// Whether `now` falls inside the configured window, wrapping past
    /// midnight when start > end. Always false while disabled or unset.
    pub fn window_contains(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return false;
        };

        if start <= end {
            start <= now && now <= end
        } else {
            now >= start || now <= end
        }
    }

    pub fn start_string(&self) -> Option<String> {
        self.start.map(format_time)
    }

    pub fn end_string(&self) -> Option<String> {
        self.end.map(format_time)
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| ScheduleError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn round_trips_hh_mm_to_hh_mm_ss() {
        let mut schedule = Schedule::default();
        schedule
            .apply(Some("20:00"), Some("06:00"), true)
            .unwrap();

        assert_eq!(schedule.start_string().as_deref(), Some("20:00:00"));
        assert_eq!(schedule.end_string().as_deref(), Some("06:00:00"));
        assert!(schedule.enabled);
    }

    #[test]
    fn malformed_time_leaves_schedule_unchanged() {
        let mut schedule = Schedule::default();
        schedule
            .apply(Some("08:30"), Some("22:00"), true)
            .unwrap();
        let before = schedule.clone();

        let err = schedule.apply(Some("25:99"), Some("22:00"), false);

        assert_eq!(
            err,
            Err(ScheduleError::InvalidTime {
                field: "start_time",
                value: "25:99".to_string(),
            })
        );
        assert_eq!(schedule, before);
    }

    #[test]
    fn unset_window_matches_nothing() {
        let mut schedule = Schedule::default();
        assert!(!schedule.window_contains(time(12, 0)));

        schedule.enabled = true;
        assert!(!schedule.window_contains(time(12, 0)));
    }

    #[test]
    fn plain_window_contains_only_interior() {
        let mut schedule = Schedule::default();
        schedule
            .apply(Some("08:00"), Some("18:00"), true)
            .unwrap();

        assert!(schedule.window_contains(time(8, 0)));
        assert!(schedule.window_contains(time(12, 30)));
        assert!(schedule.window_contains(time(18, 0)));
        assert!(!schedule.window_contains(time(7, 59)));
        assert!(!schedule.window_contains(time(19, 0)));
    }

    #[test]
    fn overnight_window_wraps_past_midnight() {
        let mut schedule = Schedule::default();
        schedule
            .apply(Some("20:00"), Some("06:00"), true)
            .unwrap();

        assert!(schedule.window_contains(time(23, 0)));
        assert!(schedule.window_contains(time(2, 0)));
        assert!(!schedule.window_contains(time(12, 0)));
    }

    #[test]
    fn disabled_window_matches_nothing() {
        let mut schedule = Schedule::default();
        schedule
            .apply(Some("08:00"), Some("18:00"), false)
            .unwrap();

        assert!(!schedule.window_contains(time(12, 0)));
    }
}
