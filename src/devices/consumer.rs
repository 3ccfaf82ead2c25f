use crate::devices::types::{ConsumerKind, Device, DeviceId, gaussian_bump};
use crate::error::{GridError, require_non_negative};

/// A load drawing power from the microgrid.
///
/// Demand is a deterministic function of the time of day:
///
/// - **household**: `2 + 5 * (g(8, 2) + g(20, 2))`, morning and evening peaks.
/// - **industry**: `50 + 30 * g(12, 6)`, a broad midday bump on a high baseline.
///
/// where `g(mu, sigma)` is [`gaussian_bump`].
#[derive(Debug, Clone, PartialEq)]
pub struct Consumer {
    id: DeviceId,
    kind: ConsumerKind,
    /// Demand in kilowatts. Holds the base demand until the first tick.
    demand_kw: f64,
}

impl Consumer {
    /// Creates a consumer reporting `base_demand_kw` until its first update.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `base_demand_kw` is negative or not finite.
    pub fn new(id: DeviceId, kind: ConsumerKind, base_demand_kw: f64) -> Result<Self, GridError> {
        Ok(Self {
            id,
            kind,
            demand_kw: require_non_negative("consumer base demand", base_demand_kw)?,
        })
    }

    pub fn kind(&self) -> ConsumerKind {
        self.kind
    }

    pub fn demand_kw(&self) -> f64 {
        self.demand_kw
    }

    /// Profile demand in kW at `hour`.
    pub fn demand_at(kind: ConsumerKind, hour: f64) -> f64 {
        let bumps = match kind {
            ConsumerKind::Household => {
                5.0 * (gaussian_bump(hour, 8.0, 2.0) + gaussian_bump(hour, 20.0, 2.0))
            }
            ConsumerKind::Industry => 30.0 * gaussian_bump(hour, 12.0, 6.0),
        };
        kind.base_floor_kw() + bumps
    }

    /// Recomputes the demand for `hour`.
    pub fn update_demand(&mut self, hour: f64) -> f64 {
        self.demand_kw = Self::demand_at(self.kind, hour);
        self.demand_kw
    }
}

impl Device for Consumer {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn category(&self) -> &'static str {
        self.kind.as_str()
    }

    fn power_kw(&self) -> f64 {
        self.demand_kw
    }
}
