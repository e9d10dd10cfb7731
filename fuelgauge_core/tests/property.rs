use fuelgauge_core::mocks::{ChannelScript, ScriptedProvider};
use fuelgauge_core::{FuelLevelAnalog, LowPassFilter, SensorCfg, TankCfg, TankState};
use fuelgauge_traits::clock::test_clock::TestClock;
use proptest::prelude::*;

proptest! {
    /// With filtering disabled and the identity curve, the consumed output
    /// is exactly the linear map of the raw reading: no clamping, no hidden
    /// scaling, for senders far outside their calibrated range too.
    #[test]
    fn consumed_is_the_unclamped_linear_map(
        raw in -10.0f32..10.0,
        empty in 0.0f32..5.0,
        mult in 0.05f32..10.0,
        capacity in 1.0f32..1_000_000.0,
    ) {
        let clock = TestClock::new();
        let mut est = FuelLevelAnalog::builder()
            .with_sensor(SensorCfg {
                pin: 2,
                empty_voltage: empty,
                voltage_multiplier: mult,
                filter_cutoff_hz: -1.0,
            })
            .with_tank(TankCfg { capacity_ml: capacity })
            .with_clock(clock)
            .try_build()
            .unwrap();
        est.bind(&mut ScriptedProvider::new(ChannelScript::new(raw))).unwrap();

        let mut state = TankState::default();
        est.read(&mut state);

        let expected = (1.0 - (raw - empty) * mult) * capacity;
        let tol = expected.abs().max(1.0) * 1e-5;
        prop_assert!(
            (state.consumed_ml - expected).abs() <= tol,
            "consumed {} vs {}", state.consumed_ml, expected
        );
        prop_assert_eq!(state.consumed_wh, state.consumed_ml);
    }

    /// A single-pole filter never overshoots: the output stays between the
    /// previous output and the new sample.
    #[test]
    fn filter_output_stays_between_prev_and_sample(
        seed in -100.0f32..100.0,
        samples in proptest::collection::vec(-100.0f32..100.0, 1..50),
        cutoff in 0.01f32..10.0,
        dt in 0.001f32..10.0,
    ) {
        let mut f = LowPassFilter::new(cutoff);
        let mut prev = f.apply(seed, 0.0);
        for s in samples {
            let out = f.apply(s, dt);
            let lo = prev.min(s);
            let hi = prev.max(s);
            prop_assert!(out >= lo - 1e-4 && out <= hi + 1e-4,
                "out {out} escaped [{lo}, {hi}]");
            prev = out;
        }
    }

    /// Feeding a constant converges to it, for any positive cutoff.
    #[test]
    fn filter_converges_to_constant(
        start in -50.0f32..50.0,
        target in -50.0f32..50.0,
        cutoff in 0.05f32..5.0,
    ) {
        let mut f = LowPassFilter::new(cutoff);
        f.apply(start, 0.0);
        let mut out = start;
        for _ in 0..10_000 {
            out = f.apply(target, 0.1);
        }
        prop_assert!((out - target).abs() < 1e-2,
            "did not converge: {out} vs {target}");
    }

    /// Unhealthy cycles never move the record, whatever the sender reads.
    #[test]
    fn rejected_pin_freezes_the_record(voltages in proptest::collection::vec(0.0f32..5.0, 1..20)) {
        let clock = TestClock::new();
        let mut est = FuelLevelAnalog::builder()
            .with_sensor(SensorCfg { pin: 2, ..SensorCfg::default() })
            .with_tank(TankCfg { capacity_ml: 1_000.0 })
            .with_clock(clock.clone())
            .try_build()
            .unwrap();
        let script = ChannelScript::new(1.0);
        est.bind(&mut ScriptedProvider::new(script.clone())).unwrap();

        let mut state = TankState::default();
        est.read(&mut state);
        let frozen = state;

        script.set_reject_pin(true);
        for v in voltages {
            clock.advance(std::time::Duration::from_millis(100));
            script.set_voltage(v);
            est.read(&mut state);
            prop_assert!(!state.healthy);
            prop_assert_eq!(state.voltage, frozen.voltage);
            prop_assert_eq!(state.consumed_ml, frozen.consumed_ml);
            prop_assert_eq!(state.last_sample_at, frozen.last_sample_at);
        }
    }
}
