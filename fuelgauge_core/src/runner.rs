//! Fixed-rate orchestration of the monitor's read cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use fuelgauge_traits::clock::Clock;

use crate::monitor::TankMonitor;
use crate::state::TankState;
use crate::util::period_us;

/// Drive `monitor.refresh()` at `hz` until `cycles` have completed (when
/// given) or `shutdown` is raised. `observer` sees the state after every
/// cycle. Returns the number of cycles that ran.
///
/// This is the external scheduler of the gauge design: strictly
/// synchronous, one cycle at a time, no cycle ever overlapping another.
pub fn run_paced<F>(
    monitor: &mut TankMonitor,
    hz: u32,
    cycles: Option<u64>,
    shutdown: &AtomicBool,
    clock: &dyn Clock,
    mut observer: F,
) -> u64
where
    F: FnMut(u64, &TankState),
{
    let period = Duration::from_micros(period_us(hz));
    let mut completed = 0u64;
    tracing::info!(hz, ?cycles, "gauge loop start");
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::debug!(completed, "gauge loop shutdown requested");
            break;
        }
        if let Some(max) = cycles
            && completed >= max
        {
            break;
        }
        monitor.refresh();
        completed += 1;
        observer(completed, monitor.state());
        clock.sleep(period);
    }
    tracing::info!(completed, "gauge loop end");
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::GaugeBackend;
    use fuelgauge_traits::clock::test_clock::TestClock;

    struct TickBackend;

    impl GaugeBackend for TickBackend {
        fn read(&mut self, state: &mut TankState) {
            state.healthy = true;
            state.consumed_ml += 1.0;
        }
    }

    #[test]
    fn runs_the_requested_number_of_cycles() {
        let mut monitor = TankMonitor::new(TickBackend);
        let shutdown = AtomicBool::new(false);
        let clock = TestClock::new();
        let mut seen = Vec::new();

        let completed = run_paced(&mut monitor, 50, Some(5), &shutdown, &clock, |n, s| {
            seen.push((n, s.consumed_ml));
        });

        assert_eq!(completed, 5);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[4], (5, 5.0));
    }

    #[test]
    fn shutdown_flag_stops_the_loop() {
        let mut monitor = TankMonitor::new(TickBackend);
        let shutdown = AtomicBool::new(false);
        let clock = TestClock::new();

        let completed = run_paced(&mut monitor, 50, Some(100), &shutdown, &clock, |n, _| {
            if n == 3 {
                shutdown.store(true, Ordering::Relaxed);
            }
        });

        assert_eq!(completed, 3);
    }

    #[test]
    fn zero_cycles_never_touches_the_monitor() {
        let mut monitor = TankMonitor::new(TickBackend);
        let shutdown = AtomicBool::new(false);
        let clock = TestClock::new();

        let completed = run_paced(&mut monitor, 50, Some(0), &shutdown, &clock, |_, _| {});
        assert_eq!(completed, 0);
        assert!(!monitor.healthy());
    }
}
