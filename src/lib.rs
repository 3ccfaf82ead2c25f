//! Tick-by-tick microgrid energy balance simulator.
//!
//! A [`sim::grid::GridSimulator`] owns producers, consumers, and a single
//! battery. Each tick it advances a wrapping time-of-day clock, refreshes
//! every device, routes surplus into the battery, and covers deficit from
//! the battery first and the main grid second. The [`ffi`] module exposes
//! the same operations through a C ABI for foreign-language callers.

pub mod config;
pub mod devices;
pub mod error;
pub mod ffi;
pub mod io;
/// Simulation engine, clock, snapshot, and run summary modules.
pub mod sim;

pub use error::GridError;
pub use sim::grid::GridSimulator;
