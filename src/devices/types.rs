//! Common types and traits for grid devices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Caller-assigned device identifier, unique within its collection.
pub type DeviceId = i32;

/// Generation technology of a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProducerKind {
    /// Photovoltaic array following a triangular daylight curve.
    Solar,
    /// Wind turbine with a random output between 30% and 100% of capacity.
    Wind,
    /// Main-grid feed, always at capacity.
    Grid,
}

impl ProducerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Wind => "wind",
            Self::Grid => "grid",
        }
    }
}

impl FromStr for ProducerKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solar" => Ok(Self::Solar),
            "wind" => Ok(Self::Wind),
            "grid" => Ok(Self::Grid),
            other => Err(GridError::UnknownCategory {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load profile of a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumerKind {
    /// Residential load with morning and evening peaks.
    Household,
    /// High baseline with a broad midday bump.
    Industry,
}

impl ConsumerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Industry => "industry",
        }
    }

    /// Lowest demand the profile can produce (kW).
    pub fn base_floor_kw(self) -> f64 {
        match self {
            Self::Household => 2.0,
            Self::Industry => 50.0,
        }
    }
}

impl FromStr for ConsumerKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "household" => Ok(Self::Household),
            "industry" => Ok(Self::Industry),
            other => Err(GridError::UnknownCategory {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConsumerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait shared by producers and consumers so the simulator can aggregate,
/// look up, and snapshot either collection the same way.
pub trait Device {
    /// Caller-assigned identifier.
    fn id(&self) -> DeviceId;

    /// Category name used as the snapshot key.
    fn category(&self) -> &'static str;

    /// Last computed power in kilowatts (output for producers, demand for consumers).
    ///
    /// Always non-negative.
    fn power_kw(&self) -> f64;
}

/// Unnormalised Gaussian bump `exp(-0.5 * ((t - mu) / sigma)^2)`.
///
/// Equals 1.0 at `t == mu`.
pub fn gaussian_bump(t: f64, mu: f64, sigma: f64) -> f64 {
    let z = (t - mu) / sigma;
    (-0.5 * z * z).exp()
}

/// Returns the index of the device with identifier `id`.
pub fn position_of<D: Device>(devices: &[D], id: DeviceId) -> Option<usize> {
    devices.iter().position(|d| d.id() == id)
}
