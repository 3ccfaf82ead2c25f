//! Supply/demand aggregation for one tick.

use crate::devices::Device;

/// Sums the last computed power of every device in the collection (kW).
pub fn total_kw<D: Device>(devices: &[D]) -> f64 {
    devices.iter().map(Device::power_kw).sum()
}

/// Computes the tick imbalance: production minus demand (kW).
///
/// Positive values are surplus available for charging; negative values are
/// deficit to be covered by the battery or the main grid.
pub fn imbalance_kw(production_kw: f64, demand_kw: f64) -> f64 {
    production_kw - demand_kw
}

/// Converts an instantaneous power over one tick into energy (kWh).
pub fn tick_energy_kwh(power_kw: f64, time_step_s: f64) -> f64 {
    power_kw * (time_step_s / 3600.0)
}
