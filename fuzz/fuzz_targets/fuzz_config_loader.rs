#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // We fuzz TOML parsing of Config and ensure it never panics and rejects invalids gracefully.
    // Accept both parse errors and validation errors, but do not allow panics.
    let parsed = toml::from_str::<fuelgauge_config::Config>(data);
    match parsed {
        Ok(cfg) => {
            // Neither validation nor the derived range helper may panic.
            let _ = cfg.validate();
            let _ = cfg.full_voltage();
        }
        Err(_e) => {
            // parse error is acceptable
        }
    }
});
