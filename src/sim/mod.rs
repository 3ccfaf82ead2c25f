/// Wrapping time-of-day clock.
pub mod clock;
pub mod grid;
pub mod kpi;
pub mod power_balance;
/// JSON state snapshot.
pub mod snapshot;
pub mod types;
