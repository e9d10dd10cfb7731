//! Test and simulation doubles for the analog seam.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fuelgauge_traits::{AnalogChannel, AnalogProvider};

/// Shared control block for [`ScriptedChannel`]; lets a test reshape the
/// channel's behavior while the estimator owns the boxed channel.
#[derive(Debug)]
pub struct ChannelScript {
    voltage: Mutex<f32>,
    reject_pin: AtomicBool,
}

impl ChannelScript {
    pub fn new(voltage: f32) -> Arc<Self> {
        Arc::new(Self {
            voltage: Mutex::new(voltage),
            reject_pin: AtomicBool::new(false),
        })
    }

    pub fn set_voltage(&self, v: f32) {
        if let Ok(mut guard) = self.voltage.lock() {
            *guard = v;
        }
    }

    /// Make subsequent pin routing attempts fail (or succeed again).
    pub fn set_reject_pin(&self, reject: bool) {
        self.reject_pin.store(reject, Ordering::Relaxed);
    }

    fn voltage(&self) -> f32 {
        self.voltage.lock().map(|g| *g).unwrap_or(0.0)
    }
}

/// Channel whose readings and pin acceptance follow a [`ChannelScript`].
pub struct ScriptedChannel {
    script: Arc<ChannelScript>,
}

impl ScriptedChannel {
    pub fn new(script: Arc<ChannelScript>) -> Self {
        Self { script }
    }
}

impl AnalogChannel for ScriptedChannel {
    fn set_pin(&mut self, _pin: i16) -> bool {
        !self.script.reject_pin.load(Ordering::Relaxed)
    }

    fn voltage_average(&mut self) -> f32 {
        self.script.voltage()
    }
}

/// Provider handing out [`ScriptedChannel`]s for non-negative pins; an
/// exhausted provider hands out nothing at all.
pub struct ScriptedProvider {
    script: Arc<ChannelScript>,
    exhausted: bool,
}

impl ScriptedProvider {
    pub fn new(script: Arc<ChannelScript>) -> Self {
        Self {
            script,
            exhausted: false,
        }
    }

    /// Provider with no channels to give; `channel` always returns `None`.
    pub fn exhausted(script: Arc<ChannelScript>) -> Self {
        Self {
            script,
            exhausted: true,
        }
    }
}

impl AnalogProvider for ScriptedProvider {
    fn channel(&mut self, pin: i16) -> Option<Box<dyn AnalogChannel + Send>> {
        if self.exhausted || pin < 0 {
            return None;
        }
        Some(Box::new(ScriptedChannel::new(self.script.clone())))
    }
}
