//! Shared tank state record consumed by the reporting layer.

use std::time::Instant;

/// Last-known gauge outputs for one tank.
///
/// Written exclusively by the owning backend during its read cycle and read
/// by the reporting layer in between; see [`crate::monitor::TankMonitor`]
/// for the single-writer contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct TankState {
    /// Whether the most recent read cycle reached the sensor. A live
    /// signal, re-evaluated every cycle, never sticky. False until a bound
    /// backend reads successfully.
    pub healthy: bool,
    /// Filtered calibrated level voltage. Always the filtered signal, even
    /// when the filter is bypassed for the ratio computation, so slosh
    /// behavior stays observable for curve and cutoff tuning.
    pub voltage: f32,
    /// Instantaneous current draw. A level sender has none; fixed at 0.
    pub current_amps: f32,
    /// Fuel consumed so far, in millilitres. Proportional to capacity and
    /// deliberately unclamped: values outside [0, capacity] point at a
    /// mis-calibrated curve and must stay visible.
    pub consumed_ml: f32,
    /// Consumed energy with the nominal reference voltage pinned at 1,
    /// which makes it numerically equal to `consumed_ml`.
    pub consumed_wh: f32,
    /// Completion time of the last successful read cycle.
    pub last_sample_at: Option<Instant>,
}
