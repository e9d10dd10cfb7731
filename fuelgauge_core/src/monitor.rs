//! Gauge backend seam and the single-tank monitor.

use crate::state::TankState;

/// One member of the gauge backend family.
///
/// Implementations update the shared record as a side effect of their read
/// cycle and never fail: sensor trouble is reported through
/// [`TankState::healthy`], not through an error path, so the host loop
/// keeps servicing its other subsystems.
pub trait GaugeBackend {
    fn read(&mut self, state: &mut TankState);
}

/// Owns one tank's state record and the backend that services it.
///
/// Single-writer contract: the backend gets exclusive write access to the
/// record for the duration of [`refresh`]; everything else reads between
/// cycles. Invocation is synchronous and periodic (an external scheduler
/// such as [`crate::runner::run_paced`]), never concurrent with itself, so
/// the record needs no locking.
///
/// [`refresh`]: TankMonitor::refresh
pub struct TankMonitor {
    state: TankState,
    backend: Box<dyn GaugeBackend + Send>,
}

impl core::fmt::Debug for TankMonitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TankMonitor")
            .field("healthy", &self.state.healthy)
            .field("voltage", &self.state.voltage)
            .field("consumed_ml", &self.state.consumed_ml)
            .finish()
    }
}

impl TankMonitor {
    pub fn new(backend: impl GaugeBackend + Send + 'static) -> Self {
        Self {
            state: TankState::default(),
            backend: Box::new(backend),
        }
    }

    /// Run one read cycle on the registered backend.
    pub fn refresh(&mut self) {
        self.backend.read(&mut self.state);
    }

    pub fn state(&self) -> &TankState {
        &self.state
    }

    pub fn healthy(&self) -> bool {
        self.state.healthy
    }

    pub fn voltage(&self) -> f32 {
        self.state.voltage
    }

    pub fn consumed_ml(&self) -> f32 {
        self.state.consumed_ml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingBackend {
        reads: u32,
    }

    impl GaugeBackend for CountingBackend {
        fn read(&mut self, state: &mut TankState) {
            self.reads += 1;
            state.healthy = true;
            state.consumed_ml = self.reads as f32;
        }
    }

    #[test]
    fn starts_unhealthy_with_zeroed_record() {
        let monitor = TankMonitor::new(CountingBackend { reads: 0 });
        assert!(!monitor.healthy());
        assert_eq!(monitor.consumed_ml(), 0.0);
        assert!(monitor.state().last_sample_at.is_none());
    }

    #[test]
    fn refresh_delegates_to_the_backend() {
        let mut monitor = TankMonitor::new(CountingBackend { reads: 0 });
        monitor.refresh();
        monitor.refresh();
        assert!(monitor.healthy());
        assert_eq!(monitor.consumed_ml(), 2.0);
    }
}
