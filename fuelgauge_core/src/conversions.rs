//! `From` implementations bridging `fuelgauge_config` types to
//! `fuelgauge_core` types.
//!
//! These keep the CLI free of field-by-field mapping.

use crate::calibration::LevelCurve;
use crate::config::{SensorCfg, TankCfg};

// ── SensorCfg ────────────────────────────────────────────────────────────────

impl From<&fuelgauge_config::SensorCfg> for SensorCfg {
    fn from(c: &fuelgauge_config::SensorCfg) -> Self {
        Self {
            pin: c.pin,
            empty_voltage: c.empty_voltage,
            voltage_multiplier: c.voltage_multiplier,
            filter_cutoff_hz: c.filter_cutoff_hz,
        }
    }
}

// ── LevelCurve ───────────────────────────────────────────────────────────────

impl From<&fuelgauge_config::CurveCfg> for LevelCurve {
    fn from(c: &fuelgauge_config::CurveCfg) -> Self {
        Self {
            c3: c.c3,
            c2: c.c2,
            c1: c.c1,
            c0: c.c0,
        }
    }
}

// ── TankCfg ──────────────────────────────────────────────────────────────────

impl From<&fuelgauge_config::TankCfg> for TankCfg {
    fn from(c: &fuelgauge_config::TankCfg) -> Self {
        Self {
            capacity_ml: c.capacity_ml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_defaults_map_to_core_defaults() {
        let schema = fuelgauge_config::Config::default();
        let sensor: SensorCfg = (&schema.sensor).into();
        let curve: LevelCurve = (&schema.curve).into();
        let tank: TankCfg = (&schema.tank).into();

        assert_eq!(sensor.pin, -1);
        assert_eq!(curve, LevelCurve::default());
        assert_eq!(tank.capacity_ml, 0.0);
    }
}
