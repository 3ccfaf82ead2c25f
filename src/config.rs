//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::devices::{Consumer, ConsumerKind, DeviceId, Producer, ProducerKind};
use crate::error::GridError;
use crate::sim::clock::MAX_TIME_STEP_S;
use crate::sim::grid::GridSimulator;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Producers, in insertion order.
    #[serde(default)]
    pub producers: Vec<ProducerConfig>,
    /// Consumers, in insertion order.
    #[serde(default)]
    pub consumers: Vec<ConsumerConfig>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Tick length in seconds (0 < step <= 86400).
    pub time_step_s: f64,
    /// Number of ticks to run (must be > 0).
    pub ticks: usize,
    /// Seed for producer variability.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step_s: 3600.0,
            ticks: 24,
            seed: 42,
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Charge and discharge power limit (kW).
    pub charge_rate_kw: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 100.0,
            charge_rate_kw: 10.0,
        }
    }
}

/// One producer entry (`[[producers]]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProducerConfig {
    pub id: DeviceId,
    pub kind: ProducerKind,
    /// Nameplate capacity (kW).
    pub capacity_kw: f64,
}

/// One consumer entry (`[[consumers]]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumerConfig {
    pub id: DeviceId,
    pub kind: ConsumerKind,
    /// Demand reported before the first tick (kW).
    #[serde(default)]
    pub base_demand_kw: f64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.time_step_s"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScenarioConfig {
    /// Returns the baseline scenario: one solar array feeding one household.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            battery: BatteryConfig::default(),
            producers: vec![ProducerConfig {
                id: 1,
                kind: ProducerKind::Solar,
                capacity_kw: 50.0,
            }],
            consumers: vec![ConsumerConfig {
                id: 1,
                kind: ConsumerKind::Household,
                base_demand_kw: 20.0,
            }],
        }
    }

    /// Returns the mixed preset: solar and wind against household and industry load.
    pub fn mixed() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            battery: BatteryConfig {
                capacity_kwh: 200.0,
                charge_rate_kw: 20.0,
            },
            producers: vec![
                ProducerConfig {
                    id: 1,
                    kind: ProducerKind::Solar,
                    capacity_kw: 50.0,
                },
                ProducerConfig {
                    id: 2,
                    kind: ProducerKind::Wind,
                    capacity_kw: 30.0,
                },
            ],
            consumers: vec![
                ConsumerConfig {
                    id: 1,
                    kind: ConsumerKind::Household,
                    base_demand_kw: 5.0,
                },
                ConsumerConfig {
                    id: 2,
                    kind: ConsumerKind::Industry,
                    base_demand_kw: 100.0,
                },
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "mixed"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "mixed" => Ok(Self::mixed()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !(s.time_step_s.is_finite() && s.time_step_s > 0.0) {
            errors.push(ConfigError {
                field: "simulation.time_step_s".into(),
                message: "must be > 0".into(),
            });
        } else if s.time_step_s > MAX_TIME_STEP_S {
            errors.push(ConfigError {
                field: "simulation.time_step_s".into(),
                message: format!("must be <= {MAX_TIME_STEP_S} (one day)"),
            });
        }
        if s.ticks == 0 {
            errors.push(ConfigError {
                field: "simulation.ticks".into(),
                message: "must be > 0".into(),
            });
        }

        let bat = &self.battery;
        if !(bat.capacity_kwh.is_finite() && bat.capacity_kwh > 0.0) {
            errors.push(ConfigError {
                field: "battery.capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !(bat.charge_rate_kw.is_finite() && bat.charge_rate_kw > 0.0) {
            errors.push(ConfigError {
                field: "battery.charge_rate_kw".into(),
                message: "must be > 0".into(),
            });
        }

        let mut seen = HashSet::new();
        for (i, p) in self.producers.iter().enumerate() {
            if !seen.insert(p.id) {
                errors.push(ConfigError {
                    field: format!("producers[{i}].id"),
                    message: format!("duplicate producer id {}", p.id),
                });
            }
            if !(p.capacity_kw.is_finite() && p.capacity_kw >= 0.0) {
                errors.push(ConfigError {
                    field: format!("producers[{i}].capacity_kw"),
                    message: "must be >= 0".into(),
                });
            }
        }

        let mut seen = HashSet::new();
        for (i, c) in self.consumers.iter().enumerate() {
            if !seen.insert(c.id) {
                errors.push(ConfigError {
                    field: format!("consumers[{i}].id"),
                    message: format!("duplicate consumer id {}", c.id),
                });
            }
            if !(c.base_demand_kw.is_finite() && c.base_demand_kw >= 0.0) {
                errors.push(ConfigError {
                    field: format!("consumers[{i}].base_demand_kw"),
                    message: "must be >= 0".into(),
                });
            }
        }

        errors
    }

    /// Builds a simulator populated with the configured devices.
    ///
    /// # Errors
    ///
    /// Returns the first `GridError` raised while constructing devices;
    /// call [`validate`](Self::validate) first for a complete report.
    pub fn build_simulator(&self) -> Result<GridSimulator, GridError> {
        let s = &self.simulation;
        let mut grid = GridSimulator::new(
            self.battery.capacity_kwh,
            self.battery.charge_rate_kw,
            s.time_step_s,
            s.seed,
        )?;
        for p in &self.producers {
            grid.add_producer(Producer::new(p.id, p.kind, p.capacity_kw)?)?;
        }
        for c in &self.consumers {
            grid.add_consumer(Consumer::new(c.id, c.kind, c.base_demand_kw)?)?;
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid_and_build() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let cfg = cfg.unwrap();
            let errors = cfg.validate();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
            assert!(cfg.build_simulator().is_ok());
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
time_step_s = 900.0
ticks = 96
seed = 7

[battery]
capacity_kwh = 150.0
charge_rate_kw = 25.0

[[producers]]
id = 1
kind = "solar"
capacity_kw = 50.0

[[producers]]
id = 2
kind = "grid"
capacity_kw = 20.0

[[consumers]]
id = 10
kind = "industry"
base_demand_kw = 60.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap();
        assert_eq!(cfg.simulation.ticks, 96);
        assert_eq!(cfg.simulation.time_step_s, 900.0);
        assert_eq!(cfg.producers.len(), 2);
        assert_eq!(cfg.producers[1].kind, ProducerKind::Grid);
        assert_eq!(cfg.consumers[0].kind, ConsumerKind::Industry);
        assert!(cfg.validate().is_empty());

        let grid = cfg.build_simulator().unwrap();
        assert_eq!(grid.time_step_s(), 900.0);
        assert_eq!(grid.seed(), 7);
        assert_eq!(grid.consumer(10).map(|c| c.demand_kw()), Some(60.0));
    }

    #[test]
    fn unknown_kind_rejected_by_parser() {
        let toml = r#"
[[producers]]
id = 1
kind = "nuclear"
capacity_kw = 1.0
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
ticks = 24
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.simulation.seed, 99);
        assert_eq!(cfg.simulation.ticks, 24);
        assert_eq!(cfg.battery.capacity_kwh, 100.0);
        assert!(cfg.producers.is_empty());
    }

    #[test]
    fn validation_catches_bad_time_step() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.time_step_s = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.time_step_s"));

        cfg.simulation.time_step_s = 2.0 * MAX_TIME_STEP_S;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.time_step_s"));
    }

    #[test]
    fn validation_catches_bad_battery() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.capacity_kwh = -1.0;
        cfg.battery.charge_rate_kw = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_kwh"));
        assert!(errors.iter().any(|e| e.field == "battery.charge_rate_kw"));
    }

    #[test]
    fn validation_catches_duplicate_ids() {
        let mut cfg = ScenarioConfig::mixed();
        cfg.producers[1].id = cfg.producers[0].id;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "producers[1].id"));
        assert!(matches!(
            cfg.build_simulator(),
            Err(GridError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn validation_catches_negative_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.producers[0].capacity_kw = -5.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "producers[0].capacity_kw"));
    }
}
