//! JSON state snapshot consumed by host applications.
//!
//! Key layout:
//!
//! ```json
//! {
//!   "time": 12.0,
//!   "battery": { "stored_energy": 50.0, "capacity": 100.0 },
//!   "producers": { "solar": 42.0 },
//!   "consumers": { "household": 3.1 },
//!   "purchase_energy": 0.0
//! }
//! ```
//!
//! Producer and consumer maps are keyed by category. When several devices
//! share a category the one added last wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::devices::{Battery, Device};

/// Battery portion of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryState {
    /// Stored energy (kWh).
    pub stored_energy: f64,
    /// Capacity (kWh).
    pub capacity: f64,
}

impl From<&Battery> for BatteryState {
    fn from(b: &Battery) -> Self {
        Self {
            stored_energy: b.stored_energy_kwh(),
            capacity: b.capacity_kwh(),
        }
    }
}

/// Observable state of a simulator after its last tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    /// Time of day in hours.
    pub time: f64,
    pub battery: BatteryState,
    /// Last output per producer category (kW).
    pub producers: BTreeMap<String, f64>,
    /// Last demand per consumer category (kW).
    pub consumers: BTreeMap<String, f64>,
    /// Energy bought from the main grid on the last tick (kWh).
    pub purchase_energy: f64,
}

impl GridState {
    /// Serializes the snapshot to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Collapses devices into a category -> power map, later devices overwriting earlier ones.
pub fn by_category<D: Device>(devices: &[D]) -> BTreeMap<String, f64> {
    let mut map = BTreeMap::new();
    for d in devices {
        map.insert(d.category().to_string(), d.power_kw());
    }
    map
}
