//! Single-pole low-pass filter for slosh rejection.

use core::f32::consts::TAU;

/// Single-pole exponential IIR low-pass filter.
///
/// The smoothing coefficient is derived per call from the elapsed time and
/// the configured corner frequency, so irregular sample spacing is handled
/// correctly. State seeds from the first sample; there is no startup
/// transient from zero.
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    cutoff_hz: f32,
    output: Option<f32>,
}

impl LowPassFilter {
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz: sanitize_cutoff(cutoff_hz),
            output: None,
        }
    }

    /// Retune the corner frequency. Existing state is kept; the new corner
    /// applies from the next `apply` call.
    pub fn set_cutoff_frequency(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = sanitize_cutoff(cutoff_hz);
    }

    pub fn cutoff_frequency(&self) -> f32 {
        self.cutoff_hz
    }

    /// Feed one sample taken `dt` seconds after the previous one and return
    /// the updated filter output.
    ///
    /// Malformed inputs degrade to pass-through rather than erroring:
    /// `dt <= 0` (the first cycle included), a non-finite `dt`, or a zero
    /// corner all yield the raw sample.
    pub fn apply(&mut self, sample: f32, dt: f32) -> f32 {
        let out = match self.output {
            None => sample,
            Some(prev) => prev + alpha_for(self.cutoff_hz, dt) * (sample - prev),
        };
        self.output = Some(out);
        out
    }

    /// Running output value, if at least one sample has been applied.
    pub fn output(&self) -> Option<f32> {
        self.output
    }

    pub fn reset(&mut self) {
        self.output = None;
    }
}

fn sanitize_cutoff(cutoff_hz: f32) -> f32 {
    if cutoff_hz.is_finite() && cutoff_hz > 0.0 {
        cutoff_hz
    } else {
        0.0
    }
}

/// RC discretization: `alpha = dt / (dt + 1 / (2 pi fc))`.
fn alpha_for(cutoff_hz: f32, dt: f32) -> f32 {
    if cutoff_hz <= 0.0 || !dt.is_finite() || dt <= 0.0 {
        return 1.0;
    }
    let rc = 1.0 / (TAU * cutoff_hz);
    dt / (dt + rc)
}
