//! Temperature schedules: step number to temperature.
//!
//! Swendsen-Wang includes a plaquette with probability `1 - e^T`, so the
//! useful range is `T <= 0`. Any `Fn(usize) -> f64` is a schedule too.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

pub trait TemperatureSchedule {
    fn temperature(&self, step: usize) -> f64;
}

/// Owned schedule as stored by models and acceptance rules.
pub type BoxedSchedule = Box<dyn TemperatureSchedule + Send + Sync>;

impl<F> TemperatureSchedule for F
where
    F: Fn(usize) -> f64,
{
    fn temperature(&self, step: usize) -> f64 {
        self(step)
    }
}

/// The same temperature at every step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(pub f64);

impl TemperatureSchedule for Constant {
    fn temperature(&self, _step: usize) -> f64 {
        self.0
    }
}

/// The critical temperature `ln(1 - √q / (1 + √q))` of the q-state model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Critical(pub f64);

impl Critical {
    pub fn for_field(order: u32) -> Self {
        Self(critical_temperature(order))
    }
}

impl TemperatureSchedule for Critical {
    fn temperature(&self, _step: usize) -> f64 {
        self.0
    }
}

/// `ln(1 - √q / (1 + √q))`.
pub fn critical_temperature(order: u32) -> f64 {
    let s = (order as f64).sqrt();
    (1.0 - s / (1.0 + s)).ln()
}

/// Linear ramp from `low` at step 0 to `high` at step `steps`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Linear {
    pub steps: usize,
    pub low: f64,
    pub high: f64,
}

impl Default for Linear {
    fn default() -> Self {
        Self {
            steps: 1000,
            low: -10.0,
            high: 10.0,
        }
    }
}

impl TemperatureSchedule for Linear {
    fn temperature(&self, step: usize) -> f64 {
        let t = step as f64 * ((self.high - self.low) / self.steps.max(1) as f64) + self.low;
        // exactly zero breaks Metropolis (β = 0 hides the energy)
        if t == 0.0 { 1e-13 } else { t }
    }
}

/// Standard normal samples shifted down by one until `hold` of the run is
/// left, then the critical temperature.
///
/// Samples are a pure function of `(seed, step)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomizedToConstant {
    hold_at: usize,
    critical: f64,
    seed: u64,
}

impl RandomizedToConstant {
    /// `hold` in `[0, 1]` is the fraction of `steps` spent at the critical
    /// temperature.
    ///
    /// A `hold` outside `[0, 1]` is clamped to the nearest end (`NaN` counts
    /// as `0`) and the clamp is logged at `warn`.
    pub fn new(steps: usize, order: u32, hold: f64, seed: u64) -> Self {
        let clamped = if hold.is_nan() { 0.0 } else { hold.clamp(0.0, 1.0) };
        if clamped != hold {
            log::warn!("hold fraction {hold} outside [0, 1]; using {clamped}");
        }
        let hold = clamped;
        Self {
            hold_at: (steps as f64 * (1.0 - hold)) as usize,
            critical: critical_temperature(order),
            seed,
        }
    }

    /// First step held at the critical temperature.
    pub fn hold_at(&self) -> usize {
        self.hold_at
    }
}

impl TemperatureSchedule for RandomizedToConstant {
    fn temperature(&self, step: usize) -> f64 {
        if step >= self.hold_at {
            return self.critical;
        }
        let mut rng =
            SmallRng::seed_from_u64(self.seed ^ (step as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let z: f64 = StandardNormal.sample(&mut rng);
        z - 1.0
    }
}

/// Serializable choice of schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScheduleConfig {
    Constant { temperature: f64 },
    /// Critical temperature of the lattice's field.
    Critical,
    Linear { low: f64, high: f64 },
    RandomizedToConstant { hold: f64 },
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig::Constant { temperature: -0.6 }
    }
}

impl ScheduleConfig {
    /// Concrete schedule for a run of `steps` over GF(`order`).
    pub fn build(&self, steps: usize, order: u32, seed: u64) -> BoxedSchedule {
        match *self {
            ScheduleConfig::Constant { temperature } => Box::new(Constant(temperature)),
            ScheduleConfig::Critical => Box::new(Critical::for_field(order)),
            ScheduleConfig::Linear { low, high } => Box::new(Linear { steps, low, high }),
            ScheduleConfig::RandomizedToConstant { hold } => {
                Box::new(RandomizedToConstant::new(steps, order, hold, seed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_temperature_for_ising() {
        // q = 2: ln(1 - √2/(1+√2)) = -ln(1+√2)
        let t = Critical::for_field(2).temperature(10);
        assert!((t + (1.0 + 2f64.sqrt()).ln()).abs() < 1e-12);
        assert!(t < 0.0);
    }

    #[test]
    fn linear_never_hits_zero() {
        let s = Linear { steps: 20, low: -10.0, high: 10.0 };
        assert_eq!(s.temperature(0), -10.0);
        assert_ne!(s.temperature(10), 0.0);
        assert_eq!(s.temperature(20), 10.0);
    }

    #[test]
    fn randomized_holds_at_critical() {
        let s = RandomizedToConstant::new(100, 3, 0.25, 9);
        assert_eq!(s.hold_at(), 75);
        assert_eq!(s.temperature(80), critical_temperature(3));
        assert_eq!(s.temperature(10), s.temperature(10));
        assert_ne!(s.temperature(10), s.temperature(11));
    }

    #[test]
    fn hold_fractions_outside_the_unit_interval_are_clamped() {
        assert_eq!(RandomizedToConstant::new(100, 2, 1.5, 0).hold_at(), 0);
        assert_eq!(RandomizedToConstant::new(100, 2, -0.5, 0).hold_at(), 100);
        assert_eq!(RandomizedToConstant::new(100, 2, f64::NAN, 0).hold_at(), 100);
    }

    #[test]
    fn closures_are_schedules() {
        let f = |step: usize| -(step as f64);
        assert_eq!(f.temperature(3), -3.0);
        let boxed = ScheduleConfig::Critical.build(10, 2, 0);
        assert_eq!(boxed.temperature(0), critical_temperature(2));
    }
}
