//! Microgrid simulator that orchestrates devices, battery, and the main-grid fallback.

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

use crate::devices::types::position_of;
use crate::devices::{Battery, Consumer, Device, DeviceId, Producer};
use crate::error::GridError;

use super::clock::DayClock;
use super::power_balance::{imbalance_kw, tick_energy_kwh, total_kw};
use super::snapshot::{BatteryState, GridState, by_category};
use super::types::TickRecord;

/// Default tick length: one hour.
pub const DEFAULT_TIME_STEP_S: f64 = 3600.0;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 42;

/// Tick-by-tick energy balance simulator for a small microgrid.
///
/// Owns its producers, consumers, battery, clock, and random generator.
/// Each [`update`](Self::update) advances the clock, refreshes every device,
/// and routes the imbalance through the battery. Deficit the battery cannot
/// cover is recorded as energy purchased from the main grid.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::{Consumer, ConsumerKind, Producer, ProducerKind};
/// use microgrid_sim::sim::grid::GridSimulator;
///
/// let mut grid = GridSimulator::new(100.0, 10.0, 3600.0, 7).unwrap();
/// grid.add_producer(Producer::new(1, ProducerKind::Solar, 50.0).unwrap()).unwrap();
/// grid.add_consumer(Consumer::new(1, ConsumerKind::Household, 20.0).unwrap()).unwrap();
///
/// let record = grid.update();
/// assert_eq!(record.time_hr, 1.0);
/// assert_eq!(grid.state().time, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GridSimulator {
    producers: Vec<Producer>,
    consumers: Vec<Consumer>,
    battery: Battery,
    clock: DayClock,
    /// Deficit bought from the main grid on the last tick (kWh).
    purchase_energy_kwh: f64,
    seed: u64,
    rng: StdRng,
}

impl GridSimulator {
    /// Creates an empty simulator at midnight with a half-full battery.
    ///
    /// # Arguments
    ///
    /// * `battery_capacity_kwh` - Battery capacity (must be > 0)
    /// * `charge_rate_kw` - Battery charge/discharge rate (must be > 0)
    /// * `time_step_s` - Tick length in seconds (must be > 0 and at most one day)
    /// * `seed` - Seed for the producer variability generator
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any numeric argument is out of range.
    pub fn new(
        battery_capacity_kwh: f64,
        charge_rate_kw: f64,
        time_step_s: f64,
        seed: u64,
    ) -> Result<Self, GridError> {
        Ok(Self {
            producers: Vec::new(),
            consumers: Vec::new(),
            battery: Battery::new(battery_capacity_kwh, charge_rate_kw)?,
            clock: DayClock::new(time_step_s)?,
            purchase_energy_kwh: 0.0,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Creates a simulator with the default one-hour tick and seed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if capacity or rate is non-positive.
    pub fn with_battery(battery_capacity_kwh: f64, charge_rate_kw: f64) -> Result<Self, GridError> {
        Self::new(
            battery_capacity_kwh,
            charge_rate_kw,
            DEFAULT_TIME_STEP_S,
            DEFAULT_SEED,
        )
    }

    /// Appends a producer.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if a producer with the same id exists.
    pub fn add_producer(&mut self, producer: Producer) -> Result<(), GridError> {
        if position_of(&self.producers, producer.id()).is_some() {
            return Err(GridError::DuplicateIdentifier {
                kind: "producer",
                id: producer.id(),
            });
        }
        self.producers.push(producer);
        Ok(())
    }

    /// Removes the producer whose identifier is `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if no producer has that id.
    pub fn remove_producer(&mut self, id: DeviceId) -> Result<Producer, GridError> {
        let idx = position_of(&self.producers, id).ok_or(GridError::InvalidIdentifier {
            kind: "producer",
            id,
        })?;
        let removed = self.producers.remove(idx);
        info!(id, kind = %removed.kind(), "producer removed");
        Ok(removed)
    }

    /// Appends a consumer.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if a consumer with the same id exists.
    pub fn add_consumer(&mut self, consumer: Consumer) -> Result<(), GridError> {
        if position_of(&self.consumers, consumer.id()).is_some() {
            return Err(GridError::DuplicateIdentifier {
                kind: "consumer",
                id: consumer.id(),
            });
        }
        self.consumers.push(consumer);
        Ok(())
    }

    /// Removes the consumer whose identifier is `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if no consumer has that id.
    pub fn remove_consumer(&mut self, id: DeviceId) -> Result<Consumer, GridError> {
        let idx = position_of(&self.consumers, id).ok_or(GridError::InvalidIdentifier {
            kind: "consumer",
            id,
        })?;
        let removed = self.consumers.remove(idx);
        info!(id, kind = %removed.kind(), "consumer removed");
        Ok(removed)
    }

    /// Replaces battery capacity and rate; stored energy restarts at half the new capacity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` and keeps the old battery if either value is non-positive.
    pub fn reconfigure_battery(
        &mut self,
        capacity_kwh: f64,
        charge_rate_kw: f64,
    ) -> Result<(), GridError> {
        self.battery.reconfigure(capacity_kwh, charge_rate_kw)?;
        info!(capacity_kwh, charge_rate_kw, "battery reconfigured");
        Ok(())
    }

    /// Returns to the zero state: no devices, half-full battery, midnight,
    /// nothing purchased, generator re-seeded.
    pub fn reset(&mut self) {
        self.producers.clear();
        self.consumers.clear();
        self.battery.reset();
        self.clock.reset();
        self.purchase_energy_kwh = 0.0;
        self.rng = StdRng::seed_from_u64(self.seed);
        info!("simulator reset");
    }

    /// Advances one tick and returns its record.
    pub fn update(&mut self) -> TickRecord {
        let dt_s = self.clock.time_step_s();
        let hour = self.clock.tick();

        for producer in &mut self.producers {
            producer.update_output(hour, &mut self.rng);
        }
        for consumer in &mut self.consumers {
            consumer.update_demand(hour);
        }

        let production_kw = total_kw(&self.producers);
        let demand_kw = total_kw(&self.consumers);
        let imbalance = imbalance_kw(production_kw, demand_kw);

        let mut charged_kwh = 0.0;
        let mut discharged_kwh = 0.0;

        if imbalance > 0.0 {
            // Surplus: convert to tick energy once, the battery applies its own rate cap.
            charged_kwh = self.battery.absorb(tick_energy_kwh(imbalance, dt_s), dt_s);
            self.purchase_energy_kwh = 0.0;
        } else {
            let energy_needed = tick_energy_kwh(imbalance.abs(), dt_s);
            discharged_kwh = self.battery.release(energy_needed, dt_s);
            self.purchase_energy_kwh = if discharged_kwh < energy_needed {
                energy_needed - discharged_kwh
            } else {
                0.0
            };
            if self.purchase_energy_kwh > 0.0 {
                debug!(
                    purchase_kwh = self.purchase_energy_kwh,
                    time_hr = hour,
                    "purchasing energy from the main grid"
                );
            }
        }

        trace!(
            time_hr = hour,
            production_kw, demand_kw, imbalance, "tick complete"
        );

        TickRecord {
            tick: self.clock.ticks(),
            time_hr: hour,
            production_kw,
            demand_kw,
            imbalance_kw: imbalance,
            charged_kwh,
            discharged_kwh,
            stored_energy_kwh: self.battery.stored_energy_kwh(),
            purchase_energy_kwh: self.purchase_energy_kwh,
        }
    }

    /// Runs `ticks` updates and returns every record.
    pub fn run(&mut self, ticks: usize) -> Vec<TickRecord> {
        let mut records = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            records.push(self.update());
        }
        records
    }

    /// Snapshot of the state after the last tick.
    pub fn state(&self) -> GridState {
        GridState {
            time: self.clock.hour(),
            battery: BatteryState::from(&self.battery),
            producers: by_category(&self.producers),
            consumers: by_category(&self.consumers),
            purchase_energy: self.purchase_energy_kwh,
        }
    }

    /// Moves the clock to `hour` without running a tick.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` and keeps the current time if `hour`
    /// is NaN or infinite.
    pub fn set_time(&mut self, hour: f64) -> Result<(), GridError> {
        self.clock.set_hour(hour)
    }

    pub fn current_time(&self) -> f64 {
        self.clock.hour()
    }

    pub fn time_step_s(&self) -> f64 {
        self.clock.time_step_s()
    }

    pub fn purchase_energy_kwh(&self) -> f64 {
        self.purchase_energy_kwh
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    pub fn consumers(&self) -> &[Consumer] {
        &self.consumers
    }

    pub fn producer(&self, id: DeviceId) -> Option<&Producer> {
        self.producers.iter().find(|p| p.id() == id)
    }

    pub fn consumer(&self, id: DeviceId) -> Option<&Consumer> {
        self.consumers.iter().find(|c| c.id() == id)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
