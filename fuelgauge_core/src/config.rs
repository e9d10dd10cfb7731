//! Runtime configuration for the gauge engine.
//!
//! These are the structs `FuelLevelAnalog` is built from. They are separate
//! from the TOML-deserialized schema in `fuelgauge_config`; see
//! `conversions` for the mapping.

/// Corner frequency used to keep the slosh filter state live when filtering
/// is disabled for the output value.
pub const DEFAULT_SLOSH_CUTOFF_HZ: f32 = 0.3;

/// Analog sender wiring and scaling.
#[derive(Debug, Clone, Copy)]
pub struct SensorCfg {
    /// Analog input pin the sender is wired to; negative disables the gauge.
    pub pin: i16,
    /// Sender level voltage of an empty tank.
    pub empty_voltage: f32,
    /// `1 / (full_voltage - empty_voltage)`; scales a voltage delta to a
    /// [0, 1] fill ratio.
    pub voltage_multiplier: f32,
    /// Slosh filter corner in Hz; negative feeds the raw calibrated value
    /// into the fill ratio while the filter itself stays live at
    /// [`DEFAULT_SLOSH_CUTOFF_HZ`]. Read once at build time; retuning the
    /// live filter requires rebuilding the estimator.
    pub filter_cutoff_hz: f32,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            pin: -1,
            empty_voltage: 0.5,
            voltage_multiplier: 0.5,
            filter_cutoff_hz: 0.3,
        }
    }
}

/// Tank geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TankCfg {
    /// Full-tank volume in millilitres; consumed output scales with it.
    pub capacity_ml: f32,
}
