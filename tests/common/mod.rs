//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use microgrid_sim::devices::{Consumer, ConsumerKind, Producer, ProducerKind};
use microgrid_sim::sim::grid::GridSimulator;

/// Absolute tolerance for energy comparisons (kWh).
pub const EPS: f64 = 1e-9;

/// Baseline grid: 100 kWh / 10 kW battery, 50 kW solar, one household.
pub fn baseline_grid(seed: u64) -> GridSimulator {
    let mut grid = GridSimulator::new(100.0, 10.0, 3600.0, seed).unwrap();
    let solar = Producer::new(1, ProducerKind::Solar, 50.0).unwrap();
    let home = Consumer::new(1, ConsumerKind::Household, 20.0).unwrap();
    grid.add_producer(solar).unwrap();
    grid.add_consumer(home).unwrap();
    grid
}

/// Mixed grid: 200 kWh / 20 kW battery, solar and wind against household
/// and industry load.
pub fn mixed_grid(seed: u64, time_step_s: f64) -> GridSimulator {
    let mut grid = GridSimulator::new(200.0, 20.0, time_step_s, seed).unwrap();
    let solar = Producer::new(1, ProducerKind::Solar, 50.0).unwrap();
    let wind = Producer::new(2, ProducerKind::Wind, 30.0).unwrap();
    let home = Consumer::new(1, ConsumerKind::Household, 5.0).unwrap();
    let plant = Consumer::new(2, ConsumerKind::Industry, 100.0).unwrap();
    grid.add_producer(solar).unwrap();
    grid.add_producer(wind).unwrap();
    grid.add_consumer(home).unwrap();
    grid.add_consumer(plant).unwrap();
    grid
}

/// Asserts `a` and `b` agree within [`EPS`].
pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < EPS, "expected {b}, got {a}");
}
