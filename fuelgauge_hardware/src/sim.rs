//! Deterministic tank simulator.
//!
//! Produces the sender voltage of a tank draining at a constant rate with
//! sinusoidal slosh on top. Simulated time advances with the sample count
//! at a fixed nominal rate, so runs are reproducible sample for sample.

use std::sync::{Arc, Mutex};

use fuelgauge_traits::{AnalogChannel, AnalogProvider};

/// Static description of the simulated tank and its sender.
#[derive(Debug, Clone, Copy)]
pub struct TankProfile {
    /// Sender voltage with the tank empty.
    pub empty_voltage: f32,
    /// Sender voltage with the tank full.
    pub full_voltage: f32,
    /// Fill fraction at t = 0.
    pub initial_fill: f32,
    /// Fill fraction drained per simulated second.
    pub drain_per_sec: f32,
    /// Slosh amplitude as a fraction of the sender voltage span.
    pub slosh_amplitude: f32,
    /// Slosh frequency in Hz.
    pub slosh_hz: f32,
    /// Nominal sampling rate used to advance simulated time per read.
    pub sample_rate_hz: u32,
}

impl Default for TankProfile {
    fn default() -> Self {
        Self {
            empty_voltage: 0.5,
            full_voltage: 2.5,
            initial_fill: 1.0,
            drain_per_sec: 0.002,
            slosh_amplitude: 0.05,
            slosh_hz: 1.2,
            sample_rate_hz: 10,
        }
    }
}

impl TankProfile {
    /// A still tank: same drain, no slosh. Handy for assertions.
    pub fn calm(mut self) -> Self {
        self.slosh_amplitude = 0.0;
        self
    }
}

#[derive(Debug)]
struct SimState {
    profile: TankProfile,
    samples: u64,
}

impl SimState {
    fn elapsed_secs(&self) -> f32 {
        self.samples as f32 / self.profile.sample_rate_hz.max(1) as f32
    }

    fn fill_at(&self, t: f32) -> f32 {
        (self.profile.initial_fill - self.profile.drain_per_sec * t).max(0.0)
    }

    fn next_voltage(&mut self) -> f32 {
        let t = self.elapsed_secs();
        self.samples += 1;
        let span = self.profile.full_voltage - self.profile.empty_voltage;
        let slosh = self.profile.slosh_amplitude
            * span
            * (core::f32::consts::TAU * self.profile.slosh_hz * t).sin();
        self.profile.empty_voltage + self.fill_at(t) * span + slosh
    }
}

/// Provider handing out channels that read a shared simulated tank.
///
/// Cloning shares the tank, so several channels drain the same fuel.
#[derive(Debug, Clone)]
pub struct SimulatedTank {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedTank {
    pub fn new(profile: TankProfile) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                profile,
                samples: 0,
            })),
        }
    }

    /// Current fill fraction, for assertions in tests and demos.
    pub fn fill(&self) -> f32 {
        self.state
            .lock()
            .map(|s| s.fill_at(s.elapsed_secs()))
            .unwrap_or(0.0)
    }
}

impl Default for SimulatedTank {
    fn default() -> Self {
        Self::new(TankProfile::default())
    }
}

struct SimChannel {
    state: Arc<Mutex<SimState>>,
    pin: i16,
}

impl AnalogChannel for SimChannel {
    fn set_pin(&mut self, pin: i16) -> bool {
        if pin < 0 {
            return false;
        }
        if pin != self.pin {
            tracing::trace!(from = self.pin, to = pin, "sim channel retargeted");
        }
        self.pin = pin;
        true
    }

    fn voltage_average(&mut self) -> f32 {
        self.state
            .lock()
            .map(|mut s| s.next_voltage())
            .unwrap_or(0.0)
    }
}

impl AnalogProvider for SimulatedTank {
    fn channel(&mut self, pin: i16) -> Option<Box<dyn AnalogChannel + Send>> {
        if pin < 0 {
            return None;
        }
        tracing::debug!(pin, "simulated tank channel allocated");
        Some(Box::new(SimChannel {
            state: self.state.clone(),
            pin,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn calm_tank_drains_monotonically() {
        let mut tank = SimulatedTank::new(
            TankProfile {
                drain_per_sec: 0.01,
                sample_rate_hz: 1,
                ..TankProfile::default()
            }
            .calm(),
        );
        let mut ch = tank.channel(2).expect("channel");
        let mut prev = f32::INFINITY;
        for _ in 0..50 {
            let v = ch.voltage_average();
            assert!(v <= prev, "voltage rose on a calm draining tank");
            prev = v;
        }
    }

    #[test]
    fn full_tank_starts_at_full_voltage() {
        let mut tank = SimulatedTank::new(TankProfile::default().calm());
        let mut ch = tank.channel(2).expect("channel");
        assert!((ch.voltage_average() - 2.5).abs() < 1e-6);
        assert!((tank.fill() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn drained_tank_floors_at_empty_voltage() {
        let mut tank = SimulatedTank::new(
            TankProfile {
                drain_per_sec: 1.0,
                sample_rate_hz: 1,
                ..TankProfile::default()
            }
            .calm(),
        );
        let mut ch = tank.channel(2).expect("channel");
        for _ in 0..10 {
            ch.voltage_average();
        }
        assert!((ch.voltage_average() - 0.5).abs() < 1e-6);
        assert_eq!(tank.fill(), 0.0);
    }

    #[rstest]
    #[case(-1)]
    #[case(-7)]
    fn negative_pins_are_refused(#[case] pin: i16) {
        let mut tank = SimulatedTank::default();
        assert!(tank.channel(pin).is_none());

        let mut ch = tank.channel(2).expect("channel");
        assert!(!ch.set_pin(pin));
        assert!(ch.set_pin(3));
    }

    #[test]
    fn identical_profiles_replay_identically() {
        let run = || {
            let mut tank = SimulatedTank::new(TankProfile::default());
            let mut ch = tank.channel(2).expect("channel");
            (0..100).map(|_| ch.voltage_average()).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn channels_share_one_tank() {
        let mut tank = SimulatedTank::new(
            TankProfile {
                drain_per_sec: 0.01,
                sample_rate_hz: 1,
                ..TankProfile::default()
            }
            .calm(),
        );
        let mut a = tank.channel(2).expect("a");
        let mut b = tank.channel(3).expect("b");
        let first = a.voltage_average();
        let second = b.voltage_average();
        // b continues the same timeline instead of restarting it
        assert!(second < first);
    }
}
