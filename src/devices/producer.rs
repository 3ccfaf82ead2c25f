use rand::Rng;

use crate::devices::types::{Device, DeviceId, ProducerKind};
use crate::error::{GridError, require_non_negative};

/// An energy source feeding the microgrid.
///
/// Output is recomputed every tick from the time of day and one uniform
/// random draw:
///
/// - **solar**: `capacity * max(0, 1 - |t - 12| / 6) * (0.8 + 0.2u)`, zero
///   before 06:00 and after 18:00, peaking at noon.
/// - **wind**: `capacity * (0.3 + 0.7u)`, independent of the hour.
/// - **grid**: always `capacity`; the main grid is treated as unlimited.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::{Producer, ProducerKind};
///
/// let pv = Producer::new(1, ProducerKind::Solar, 100.0).unwrap();
/// assert_eq!(pv.output_for(12.0, 1.0), 100.0);
/// assert_eq!(pv.output_for(0.0, 1.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    id: DeviceId,
    kind: ProducerKind,
    /// Nameplate capacity in kilowatts.
    capacity_kw: f64,
    /// Output computed on the last tick (kW).
    current_output_kw: f64,
}

impl Producer {
    /// Creates a producer with zero output.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `capacity_kw` is negative or not finite.
    pub fn new(id: DeviceId, kind: ProducerKind, capacity_kw: f64) -> Result<Self, GridError> {
        Ok(Self {
            id,
            kind,
            capacity_kw: require_non_negative("producer capacity", capacity_kw)?,
            current_output_kw: 0.0,
        })
    }

    pub fn kind(&self) -> ProducerKind {
        self.kind
    }

    pub fn capacity_kw(&self) -> f64 {
        self.capacity_kw
    }

    pub fn current_output_kw(&self) -> f64 {
        self.current_output_kw
    }

    /// Triangular daylight factor: 0 outside 06:00-18:00, 1 at noon.
    pub fn solar_factor(hour: f64) -> f64 {
        (1.0 - (hour - 12.0).abs() / 6.0).max(0.0)
    }

    /// Output in kW at `hour` for a given uniform draw `u` in `[0, 1]`.
    ///
    /// Pure form of [`Producer::update_output`].
    pub fn output_for(&self, hour: f64, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        match self.kind {
            ProducerKind::Solar => self.capacity_kw * Self::solar_factor(hour) * (0.8 + 0.2 * u),
            ProducerKind::Wind => self.capacity_kw * (0.3 + 0.7 * u),
            ProducerKind::Grid => self.capacity_kw,
        }
    }

    /// Recomputes the output for `hour`, drawing the variability from `rng`.
    ///
    /// Exactly one value is drawn per call regardless of kind, so the
    /// generator sequence does not depend on the producer mix.
    pub fn update_output<R: Rng + ?Sized>(&mut self, hour: f64, rng: &mut R) -> f64 {
        let u: f64 = rng.random();
        self.current_output_kw = self.output_for(hour, u);
        self.current_output_kw
    }
}

impl Device for Producer {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn category(&self) -> &'static str {
        self.kind.as_str()
    }

    fn power_kw(&self) -> f64 {
        self.current_output_kw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn solar(capacity: f64) -> Producer {
        Producer::new(1, ProducerKind::Solar, capacity).unwrap()
    }

    #[test]
    fn test_new_producer_starts_idle() {
        let p = Producer::new(3, ProducerKind::Wind, 30.0).unwrap();
        assert_eq!(p.id(), 3);
        assert_eq!(p.kind(), ProducerKind::Wind);
        assert_eq!(p.capacity_kw(), 30.0);
        assert_eq!(p.current_output_kw(), 0.0);
    }

    #[test]
    fn test_negative_capacity_rejected() {
        assert!(matches!(
            Producer::new(1, ProducerKind::Solar, -5.0),
            Err(GridError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_capacity_allowed() {
        let mut p = Producer::new(1, ProducerKind::Grid, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(p.update_output(12.0, &mut rng), 0.0);
    }

    #[test]
    fn test_solar_factor_curve() {
        assert_eq!(Producer::solar_factor(12.0), 1.0);
        assert_eq!(Producer::solar_factor(6.0), 0.0);
        assert_eq!(Producer::solar_factor(18.0), 0.0);
        assert_eq!(Producer::solar_factor(0.0), 0.0);
        assert_eq!(Producer::solar_factor(23.0), 0.0);
        assert_eq!(Producer::solar_factor(9.0), 0.5);
        assert_eq!(Producer::solar_factor(15.0), 0.5);
    }

    #[test]
    fn test_solar_peak_at_noon_with_full_multiplier() {
        assert_eq!(solar(100.0).output_for(12.0, 1.0), 100.0);
    }

    #[test]
    fn test_solar_zero_at_midnight() {
        let mut pv = solar(100.0);
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(pv.update_output(0.0, &mut rng), 0.0);
        assert_eq!(pv.current_output_kw(), 0.0);
    }

    #[test]
    fn test_solar_multiplier_range() {
        let pv = solar(100.0);
        assert!((pv.output_for(12.0, 0.0) - 80.0).abs() < 1e-9);
        assert!((pv.output_for(12.0, 0.5) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_range() {
        let wind = Producer::new(2, ProducerKind::Wind, 30.0).unwrap();
        assert!((wind.output_for(3.0, 0.0) - 9.0).abs() < 1e-9);
        assert!((wind.output_for(3.0, 1.0) - 30.0).abs() < 1e-9);
        // Hour has no effect on wind.
        assert_eq!(wind.output_for(3.0, 0.4), wind.output_for(15.0, 0.4));
    }

    #[test]
    fn test_grid_always_at_capacity() {
        let mut grid = Producer::new(9, ProducerKind::Grid, 250.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for hour in [0.0, 6.5, 12.0, 23.9] {
            assert_eq!(grid.update_output(hour, &mut rng), 250.0);
        }
    }

    #[test]
    fn test_output_bounded_by_capacity() {
        let mut rng = StdRng::seed_from_u64(42);
        for kind in [ProducerKind::Solar, ProducerKind::Wind, ProducerKind::Grid] {
            let mut p = Producer::new(1, kind, 40.0).unwrap();
            for step in 0..96 {
                let out = p.update_output(step as f64 * 0.25, &mut rng);
                assert!((0.0..=40.0).contains(&out), "{kind} out of range: {out}");
            }
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = Producer::new(1, ProducerKind::Wind, 30.0).unwrap();
        let mut b = a.clone();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        for t in 0..24 {
            assert_eq!(
                a.update_output(t as f64, &mut rng_a),
                b.update_output(t as f64, &mut rng_b)
            );
        }
    }
}
