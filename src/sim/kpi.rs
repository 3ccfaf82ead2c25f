//! Post-hoc run summary computed from tick records.

use std::fmt;

use serde::Serialize;

use super::types::TickRecord;

/// Aggregate indicators derived from a complete simulation run.
///
/// Computed post-hoc from `Vec<TickRecord>` so the summary always agrees
/// with the per-tick data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of ticks summarised.
    pub ticks: usize,
    /// Energy produced over the run (kWh).
    pub production_kwh: f64,
    /// Energy demanded over the run (kWh).
    pub demand_kwh: f64,
    /// Energy bought from the main grid (kWh).
    pub purchased_kwh: f64,
    /// Ticks on which energy was purchased.
    pub deficit_ticks: usize,
    /// Largest single-tick purchase (kWh).
    pub peak_purchase_kwh: f64,
    /// Energy moved through the battery, charged plus discharged (kWh).
    pub battery_throughput_kwh: f64,
    /// Stored energy after the last tick (kWh).
    pub final_stored_kwh: f64,
}

impl RunSummary {
    /// Summarises `records` produced with a tick of `dt_hours`.
    pub fn from_records(records: &[TickRecord], dt_hours: f64) -> Self {
        let mut summary = Self {
            ticks: records.len(),
            production_kwh: 0.0,
            demand_kwh: 0.0,
            purchased_kwh: 0.0,
            deficit_ticks: 0,
            peak_purchase_kwh: 0.0,
            battery_throughput_kwh: 0.0,
            final_stored_kwh: records.last().map_or(0.0, |r| r.stored_energy_kwh),
        };

        for r in records {
            summary.production_kwh += r.production_kw * dt_hours;
            summary.demand_kwh += r.demand_kw * dt_hours;
            summary.purchased_kwh += r.purchase_energy_kwh;
            summary.peak_purchase_kwh = summary.peak_purchase_kwh.max(r.purchase_energy_kwh);
            summary.battery_throughput_kwh += r.charged_kwh + r.discharged_kwh;
            if r.purchase_energy_kwh > 0.0 {
                summary.deficit_ticks += 1;
            }
        }

        summary
    }

    /// Share of demand met without purchasing, in percent.
    pub fn self_sufficiency_pct(&self) -> f64 {
        if self.demand_kwh > 0.0 {
            100.0 * (1.0 - self.purchased_kwh / self.demand_kwh)
        } else {
            100.0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ({} ticks) ---", self.ticks)?;
        writeln!(f, "Production:          {:.2} kWh", self.production_kwh)?;
        writeln!(f, "Demand:              {:.2} kWh", self.demand_kwh)?;
        writeln!(
            f,
            "Purchased from grid: {:.2} kWh over {} ticks (peak {:.2} kWh)",
            self.purchased_kwh, self.deficit_ticks, self.peak_purchase_kwh
        )?;
        writeln!(
            f,
            "Self-sufficiency:    {:.1}%",
            self.self_sufficiency_pct()
        )?;
        writeln!(
            f,
            "Battery throughput:  {:.2} kWh",
            self.battery_throughput_kwh
        )?;
        write!(f, "Final stored energy: {:.2} kWh", self.final_stored_kwh)
    }
}
