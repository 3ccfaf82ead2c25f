use crate::error::{GridError, require_positive};

/// Seconds per hour, used to turn a rate (kW) and a tick (s) into energy (kWh).
const SECONDS_PER_HOUR: f64 = 3600.0;

/// A battery energy storage system that absorbs surplus and covers deficit.
///
/// `Battery` is a bounded reservoir with rate-limited charge and discharge.
/// Stored energy stays within `[0, capacity]` after every operation; energy
/// offered beyond the rate cap or the remaining headroom is dropped.
///
/// New, reset, and reconfigured batteries start half full.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    capacity_kwh: f64,

    /// Energy currently stored in kilowatt-hours.
    stored_energy_kwh: f64,

    /// Maximum charge power in kilowatts.
    max_charge_kw: f64,

    /// Maximum discharge power in kilowatts.
    max_discharge_kw: f64,
}

impl Battery {
    /// Creates a half-charged battery with the same charge and discharge rate.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `rate_kw` - Maximum charge/discharge power in kW (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if either value is non-positive or not finite.
    pub fn new(capacity_kwh: f64, rate_kw: f64) -> Result<Self, GridError> {
        let capacity_kwh = require_positive("battery capacity", capacity_kwh)?;
        let rate_kw = require_positive("battery charge rate", rate_kw)?;
        Ok(Self {
            capacity_kwh,
            stored_energy_kwh: capacity_kwh / 2.0,
            max_charge_kw: rate_kw,
            max_discharge_kw: rate_kw,
        })
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    pub fn stored_energy_kwh(&self) -> f64 {
        self.stored_energy_kwh
    }

    pub fn max_charge_kw(&self) -> f64 {
        self.max_charge_kw
    }

    pub fn max_discharge_kw(&self) -> f64 {
        self.max_discharge_kw
    }

    /// Stored energy as a fraction of capacity.
    pub fn soc(&self) -> f64 {
        self.stored_energy_kwh / self.capacity_kwh
    }

    /// Stores up to `energy_kwh`, capped by `max_charge_kw * dt` and by the
    /// remaining headroom.
    ///
    /// Returns the energy actually absorbed (kWh).
    ///
    /// # Errors
    ///
    /// Returns `NegativeEnergyInput` if `energy_kwh` or `delta_time_s` is negative.
    pub fn charge(&mut self, energy_kwh: f64, delta_time_s: f64) -> Result<f64, GridError> {
        check_input("charge energy", energy_kwh)?;
        check_input("charge time", delta_time_s)?;
        Ok(self.absorb(energy_kwh, delta_time_s))
    }

    /// Charge without input checks; callers guarantee non-negative arguments.
    pub(crate) fn absorb(&mut self, energy_kwh: f64, delta_time_s: f64) -> f64 {
        let rate_cap_kwh = self.max_charge_kw * delta_time_s / SECONDS_PER_HOUR;
        let to_store = energy_kwh.min(rate_cap_kwh);
        let before = self.stored_energy_kwh;
        self.stored_energy_kwh = (before + to_store).min(self.capacity_kwh);
        self.stored_energy_kwh - before
    }

    /// Releases up to `energy_needed_kwh`, capped by `max_discharge_kw * dt`
    /// and by the stored energy.
    ///
    /// Returns the energy actually released (kWh), which may be less than requested.
    ///
    /// # Errors
    ///
    /// Returns `NegativeEnergyInput` if `energy_needed_kwh` or `delta_time_s` is negative.
    pub fn discharge(
        &mut self,
        energy_needed_kwh: f64,
        delta_time_s: f64,
    ) -> Result<f64, GridError> {
        check_input("discharge energy", energy_needed_kwh)?;
        check_input("discharge time", delta_time_s)?;
        Ok(self.release(energy_needed_kwh, delta_time_s))
    }

    /// Discharge without input checks; callers guarantee non-negative arguments.
    pub(crate) fn release(&mut self, energy_needed_kwh: f64, delta_time_s: f64) -> f64 {
        let rate_cap_kwh = self.max_discharge_kw * delta_time_s / SECONDS_PER_HOUR;
        let released = energy_needed_kwh
            .min(rate_cap_kwh)
            .min(self.stored_energy_kwh);
        self.stored_energy_kwh = (self.stored_energy_kwh - released).max(0.0);
        released
    }

    /// Replaces capacity and both rate limits, then re-seeds the battery half full.
    ///
    /// Previously stored energy is discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` and leaves the battery unchanged if
    /// either value is non-positive or not finite.
    pub fn reconfigure(&mut self, capacity_kwh: f64, rate_kw: f64) -> Result<(), GridError> {
        *self = Self::new(capacity_kwh, rate_kw)?;
        Ok(())
    }

    /// Restores the half-full starting state.
    pub fn reset(&mut self) {
        self.stored_energy_kwh = self.capacity_kwh / 2.0;
    }
}

fn check_input(what: &'static str, value: f64) -> Result<(), GridError> {
    // NaN fails the comparison and is rejected as well.
    if value >= 0.0 {
        Ok(())
    } else {
        Err(GridError::NegativeEnergyInput { what, value })
    }
}
