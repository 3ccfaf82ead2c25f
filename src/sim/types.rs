//! Per-tick record produced by the simulator.

use std::fmt;

use serde::Serialize;

/// Complete record of one simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickRecord {
    /// Tick index, starting at 1 for the first update after construction or reset.
    pub tick: u64,
    /// Time of day after advancing, in hours `[0, 24)`.
    pub time_hr: f64,
    /// Total producer output (kW).
    pub production_kw: f64,
    /// Total consumer demand (kW).
    pub demand_kw: f64,
    /// `production_kw - demand_kw`.
    pub imbalance_kw: f64,
    /// Energy absorbed by the battery this tick (kWh).
    pub charged_kwh: f64,
    /// Energy released by the battery this tick (kWh).
    pub discharged_kwh: f64,
    /// Battery stored energy after this tick (kWh).
    pub stored_energy_kwh: f64,
    /// Deficit energy bought from the main grid this tick (kWh).
    pub purchase_energy_kwh: f64,
}

impl fmt::Display for TickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({:>5.2}h) | prod={:>8.2} kW  demand={:>8.2} kW  \
             imbalance={:>8.2} kW | bat +{:.2}/-{:.2} kWh (stored={:.2} kWh) | \
             purchased={:.2} kWh",
            self.tick,
            self.time_hr,
            self.production_kw,
            self.demand_kw,
            self.imbalance_kw,
            self.charged_kwh,
            self.discharged_kwh,
            self.stored_energy_kwh,
            self.purchase_energy_kwh,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_record_display_does_not_panic() {
        let r = TickRecord {
            tick: 1,
            time_hr: 1.0,
            production_kw: 10.0,
            demand_kw: 12.0,
            imbalance_kw: -2.0,
            charged_kwh: 0.0,
            discharged_kwh: 2.0,
            stored_energy_kwh: 48.0,
            purchase_energy_kwh: 0.0,
        };
        let s = format!("{r}");
        assert!(s.contains("purchased=0.00 kWh"));
    }
}
