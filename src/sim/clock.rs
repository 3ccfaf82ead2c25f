use crate::error::{GridError, require_positive};

/// Hours in one simulated day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Longest allowed tick; a single subtraction must be enough to wrap.
pub const MAX_TIME_STEP_S: f64 = 86_400.0;

/// A time-of-day clock that advances by a fixed step and wraps at midnight.
///
/// The hour stays in `[0, 24)`. Each tick advances by `time_step_s / 3600`
/// hours and subtracts 24 once if the result reaches 24.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::clock::DayClock;
///
/// let mut clock = DayClock::new(3600.0).unwrap();
/// clock.set_hour(23.5).unwrap();
/// assert_eq!(clock.tick(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DayClock {
    /// Tick length in seconds.
    time_step_s: f64,
    /// Current hour of day.
    hour: f64,
    /// Ticks taken since construction or the last reset.
    ticks: u64,
}

impl DayClock {
    /// Creates a clock at midnight.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `time_step_s` is non-positive,
    /// not finite, or longer than one day.
    pub fn new(time_step_s: f64) -> Result<Self, GridError> {
        let time_step_s = require_positive("time_step", time_step_s)?;
        if time_step_s > MAX_TIME_STEP_S {
            return Err(GridError::InvalidConfiguration {
                field: "time_step",
                value: time_step_s,
                reason: "must not exceed 86400 s (one day)",
            });
        }
        Ok(Self {
            time_step_s,
            hour: 0.0,
            ticks: 0,
        })
    }

    /// Advances one step and returns the new hour.
    pub fn tick(&mut self) -> f64 {
        self.hour += self.dt_hours();
        if self.hour >= HOURS_PER_DAY {
            self.hour -= HOURS_PER_DAY;
        }
        self.ticks += 1;
        self.hour
    }

    pub fn hour(&self) -> f64 {
        self.hour
    }

    /// Moves the clock to `hour`, folded into `[0, 24)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` and keeps the current hour if `hour`
    /// is NaN or infinite.
    pub fn set_hour(&mut self, hour: f64) -> Result<(), GridError> {
        if !hour.is_finite() {
            return Err(GridError::InvalidConfiguration {
                field: "hour",
                value: hour,
                reason: "must be a finite number",
            });
        }
        let folded = hour.rem_euclid(HOURS_PER_DAY);
        // Tiny negative inputs round up to exactly 24.0.
        self.hour = if folded < HOURS_PER_DAY { folded } else { 0.0 };
        Ok(())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn time_step_s(&self) -> f64 {
        self.time_step_s
    }

    /// Tick length in hours.
    pub fn dt_hours(&self) -> f64 {
        self.time_step_s / 3600.0
    }

    /// Returns to midnight with a zero tick count.
    pub fn reset(&mut self) {
        self.hour = 0.0;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = DayClock::new(900.0).unwrap();
        assert_eq!(clock.hour(), 0.0);
        assert_eq!(clock.ticks(), 0);
        assert_eq!(clock.dt_hours(), 0.25);
    }

    #[test]
    fn test_invalid_step() {
        assert!(DayClock::new(0.0).is_err());
        assert!(DayClock::new(-60.0).is_err());
        assert!(DayClock::new(MAX_TIME_STEP_S + 1.0).is_err());
        assert!(DayClock::new(MAX_TIME_STEP_S).is_ok());
    }

    #[test]
    fn test_tick() {
        let mut clock = DayClock::new(3600.0).unwrap();
        assert_eq!(clock.tick(), 1.0);
        assert_eq!(clock.tick(), 2.0);
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn test_wraps_at_midnight() {
        let mut clock = DayClock::new(3600.0).unwrap();
        clock.set_hour(23.5).unwrap();
        assert_eq!(clock.tick(), 0.5);

        let mut clock = DayClock::new(3600.0).unwrap();
        for _ in 0..24 {
            clock.tick();
        }
        assert_eq!(clock.hour(), 0.0);
    }

    #[test]
    fn test_full_day_step_stays_in_range() {
        let mut clock = DayClock::new(MAX_TIME_STEP_S).unwrap();
        clock.set_hour(6.0).unwrap();
        assert_eq!(clock.tick(), 6.0);
    }

    #[test]
    fn test_set_hour_folds() {
        let mut clock = DayClock::new(3600.0).unwrap();
        clock.set_hour(25.0).unwrap();
        assert_eq!(clock.hour(), 1.0);
        clock.set_hour(-1.0).unwrap();
        assert_eq!(clock.hour(), 23.0);
    }

    #[test]
    fn test_set_hour_tiny_negative_stays_below_midnight() {
        let mut clock = DayClock::new(3600.0).unwrap();
        clock.set_hour(-1e-17).unwrap();
        assert_eq!(clock.hour(), 0.0);
        assert!(clock.hour() < HOURS_PER_DAY);
    }

    #[test]
    fn test_set_hour_rejects_non_finite() {
        let mut clock = DayClock::new(3600.0).unwrap();
        clock.set_hour(5.0).unwrap();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                clock.set_hour(bad),
                Err(GridError::InvalidConfiguration { field: "hour", .. })
            ));
            assert_eq!(clock.hour(), 5.0);
        }
    }

    #[test]
    fn test_reset() {
        let mut clock = DayClock::new(3600.0).unwrap();
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.hour(), 0.0);
        assert_eq!(clock.ticks(), 0);
    }
}
