//! Analog fuel-level estimator.
//!
//! One read cycle: re-apply the configured pin, sample the averaged sender
//! voltage, run it through the calibration curve and the slosh filter, and
//! map the result onto the consumed-volume fields of the shared
//! [`TankState`].

use std::sync::Arc;
use std::time::Instant;

use fuelgauge_traits::clock::{Clock, MonotonicClock};
use fuelgauge_traits::{AnalogChannel, AnalogProvider};

use crate::calibration::LevelCurve;
use crate::config::{DEFAULT_SLOSH_CUTOFF_HZ, SensorCfg, TankCfg};
use crate::error::{BindError, BuildError};
use crate::filter::LowPassFilter;
use crate::monitor::GaugeBackend;
use crate::state::TankState;

/// Gauge backend reading a single analog level sender.
///
/// Construction is two-phase: [`FuelLevelBuilder::try_build`] validates the
/// configuration and produces an unbound estimator, then [`bind`] acquires
/// the analog channel. Until bind succeeds, [`read`] is a no-op.
///
/// [`bind`]: FuelLevelAnalog::bind
/// [`read`]: FuelLevelAnalog::read
pub struct FuelLevelAnalog {
    sensor: SensorCfg,
    curve: LevelCurve,
    tank: TankCfg,
    filter: LowPassFilter,
    channel: Option<Box<dyn AnalogChannel + Send>>,
    last_sample_at: Option<Instant>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl core::fmt::Debug for FuelLevelAnalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FuelLevelAnalog")
            .field("pin", &self.sensor.pin)
            .field("capacity_ml", &self.tank.capacity_ml)
            .field("bound", &self.channel.is_some())
            .finish()
    }
}

impl FuelLevelAnalog {
    /// Start building an estimator.
    pub fn builder() -> FuelLevelBuilder {
        FuelLevelBuilder::default()
    }

    /// Acquire the analog channel for the configured pin. Second phase of
    /// initialization; the estimator stays inert until this succeeds.
    pub fn bind(&mut self, provider: &mut dyn AnalogProvider) -> Result<(), BindError> {
        if self.sensor.pin < 0 {
            return Err(BindError::PinDisabled);
        }
        match provider.channel(self.sensor.pin) {
            Some(channel) => {
                self.channel = Some(channel);
                tracing::debug!(pin = self.sensor.pin, "analog channel bound");
                Ok(())
            }
            None => Err(BindError::ChannelUnavailable(self.sensor.pin)),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.channel.is_some()
    }

    /// Redirect future cycles to a different pin. Takes effect on the next
    /// read; no rebind is needed because the pin is re-applied per cycle.
    pub fn set_pin_target(&mut self, pin: i16) {
        self.sensor.pin = pin;
    }

    /// One read cycle; all results are side effects on `state`.
    ///
    /// Unbound: leaves `state` untouched. Pin routing failure: flags
    /// `state.healthy` and leaves every other field (timestamp included) at
    /// its previous value, so the record self-describes as stale.
    pub fn read(&mut self, state: &mut TankState) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        // Pin routing is re-applied every cycle so health tracks the
        // hardware live and pin reassignment needs no rebind.
        if !channel.set_pin(self.sensor.pin) {
            state.healthy = false;
            return;
        }
        state.healthy = true;

        let now = self.clock.now();
        let dt = match self.last_sample_at {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => 0.0,
        };

        let raw = channel.voltage_average();
        let calibrated = self.curve.evaluate(raw);
        // The filter ingests every cycle, including when bypassed below, so
        // the filtered signal stays available for cutoff tuning.
        let filtered = self.filter.apply(calibrated, dt);
        let level_voltage = if self.sensor.filter_cutoff_hz >= 0.0 {
            filtered
        } else {
            calibrated
        };

        // Linear and deliberately unclamped; a ratio outside [0, 1] means
        // the curve or the scaling is mis-calibrated.
        let fill_ratio =
            (level_voltage - self.sensor.empty_voltage) * self.sensor.voltage_multiplier;
        let used_ratio = 1.0 - fill_ratio;

        state.voltage = filtered;
        state.current_amps = 0.0;
        state.consumed_ml = used_ratio * self.tank.capacity_ml;
        // Nominal reference voltage of 1 collapses volume and energy.
        state.consumed_wh = state.consumed_ml;
        state.last_sample_at = Some(now);
        self.last_sample_at = Some(now);

        tracing::trace!(
            raw,
            calibrated,
            filtered,
            fill_ratio,
            consumed_ml = state.consumed_ml,
            "level sample"
        );
    }
}

impl GaugeBackend for FuelLevelAnalog {
    fn read(&mut self, state: &mut TankState) {
        Self::read(self, state);
    }
}

/// Builder for [`FuelLevelAnalog`]. Configuration only; channel acquisition
/// happens in the separate bind step so a binding failure is a value, not a
/// crash.
#[derive(Default)]
pub struct FuelLevelBuilder {
    sensor: Option<SensorCfg>,
    curve: Option<LevelCurve>,
    tank: Option<TankCfg>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

impl FuelLevelBuilder {
    pub fn with_sensor(mut self, sensor: SensorCfg) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn with_curve(mut self, curve: LevelCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn with_tank(mut self, tank: TankCfg) -> Self {
        self.tank = Some(tank);
        self
    }

    /// Inject a clock (deterministic tests, simulation).
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Validate the configuration and construct an unbound estimator.
    pub fn try_build(self) -> Result<FuelLevelAnalog, BuildError> {
        let sensor = self.sensor.unwrap_or_default();
        let curve = self.curve.unwrap_or_default();
        let tank = self.tank.unwrap_or_default();

        if !sensor.empty_voltage.is_finite() {
            return Err(BuildError::InvalidConfig("empty_voltage must be finite"));
        }
        if !sensor.voltage_multiplier.is_finite() || sensor.voltage_multiplier == 0.0 {
            return Err(BuildError::InvalidConfig(
                "voltage_multiplier must be finite and non-zero",
            ));
        }
        if !sensor.filter_cutoff_hz.is_finite() {
            return Err(BuildError::InvalidConfig("filter_cutoff_hz must be finite"));
        }
        if !tank.capacity_ml.is_finite() || tank.capacity_ml < 0.0 {
            return Err(BuildError::InvalidConfig(
                "capacity_ml must be finite and non-negative",
            ));
        }
        for c in [curve.c0, curve.c1, curve.c2, curve.c3] {
            if !c.is_finite() {
                return Err(BuildError::InvalidConfig("curve coefficients must be finite"));
            }
        }

        // Keep a pole at the default corner when filtering is bypassed, so
        // the filtered diagnostic in the state record stays meaningful.
        let cutoff = if sensor.filter_cutoff_hz >= 0.0 {
            sensor.filter_cutoff_hz
        } else {
            DEFAULT_SLOSH_CUTOFF_HZ
        };

        Ok(FuelLevelAnalog {
            sensor,
            curve,
            tank,
            filter: LowPassFilter::new(cutoff),
            channel: None,
            last_sample_at: None,
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(MonotonicClock::new())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults_to_disabled_pin() {
        let est = FuelLevelAnalog::builder().try_build().expect("build");
        assert!(!est.is_bound());
        assert_eq!(est.sensor.pin, -1);
    }

    #[test]
    fn build_rejects_zero_multiplier() {
        let err = FuelLevelAnalog::builder()
            .with_sensor(SensorCfg {
                voltage_multiplier: 0.0,
                ..SensorCfg::default()
            })
            .try_build()
            .expect_err("zero multiplier");
        assert!(err.to_string().contains("voltage_multiplier"));
    }

    #[test]
    fn build_rejects_non_finite_curve() {
        let err = FuelLevelAnalog::builder()
            .with_curve(LevelCurve {
                c2: f32::NAN,
                ..LevelCurve::default()
            })
            .try_build()
            .expect_err("NaN coefficient");
        assert!(err.to_string().contains("curve"));
    }

    #[test]
    fn build_rejects_negative_capacity() {
        let err = FuelLevelAnalog::builder()
            .with_tank(TankCfg { capacity_ml: -1.0 })
            .try_build()
            .expect_err("negative capacity");
        assert!(err.to_string().contains("capacity_ml"));
    }

    #[test]
    fn disabled_filter_still_gets_a_default_pole() {
        let est = FuelLevelAnalog::builder()
            .with_sensor(SensorCfg {
                filter_cutoff_hz: -1.0,
                ..SensorCfg::default()
            })
            .try_build()
            .expect("build");
        assert!((est.filter.cutoff_frequency() - DEFAULT_SLOSH_CUTOFF_HZ).abs() < 1e-6);
    }
}
