mod cli;

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;

use cli::{Cli, Commands, init_logging};
use fuelgauge_core::{FuelLevelAnalog, LevelCurve, SensorCfg, TankCfg, TankMonitor, runner};
use fuelgauge_traits::MonotonicClock;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let mut cfg = fuelgauge_config::load_toml(&text).wrap_err("parse config TOML")?;
    init_logging(&cli, &cfg.logging);

    if let Some(path) = &cli.calibration {
        let curve = fuelgauge_config::load_calibration_csv(path, cli.fit_degree)
            .wrap_err_with(|| format!("fit calibration from {}", path.display()))?;
        tracing::info!(?curve, "calibration curve fitted from CSV");
        cfg.curve = curve;
    }
    cfg.validate().wrap_err("invalid config")?;

    match &cli.cmd {
        Commands::Check => check(&cfg),
        Commands::Run { cycles, rate } => run(&cli, &cfg, *cycles, *rate),
    }
}

fn check(cfg: &fuelgauge_config::Config) -> eyre::Result<()> {
    println!("sensor pin:     {}", cfg.sensor.pin);
    println!("empty voltage:  {:.3} V", cfg.sensor.empty_voltage);
    println!("full voltage:   {:.3} V", cfg.full_voltage());
    println!("filter cutoff:  {} Hz", cfg.sensor.filter_cutoff_hz);
    println!("tank capacity:  {:.0} ml", cfg.tank.capacity_ml);
    println!(
        "curve:          {:+.4} v^3 {:+.4} v^2 {:+.4} v {:+.4}",
        cfg.curve.c3, cfg.curve.c2, cfg.curve.c1, cfg.curve.c0
    );
    if cfg.sensor.pin < 0 {
        println!("gauge disabled (pin = -1)");
    }
    Ok(())
}

fn run(
    cli: &Cli,
    cfg: &fuelgauge_config::Config,
    cycles: Option<u64>,
    rate: Option<u32>,
) -> eyre::Result<()> {
    let hz = rate.unwrap_or(cfg.runner.sample_rate_hz).max(1);
    let cycles = cycles.or(cfg.runner.cycles);

    let mut estimator = FuelLevelAnalog::builder()
        .with_sensor(SensorCfg::from(&cfg.sensor))
        .with_curve(LevelCurve::from(&cfg.curve))
        .with_tank(TankCfg::from(&cfg.tank))
        .try_build()?;

    // Choose hardware or simulation
    #[cfg(feature = "hardware")]
    let mut provider = fuelgauge_hardware::Mcp3008Provider::on_spi0(3.3, 8)
        .map_err(|e| eyre::eyre!("open ADC: {e}"))?;
    #[cfg(not(feature = "hardware"))]
    let mut provider = fuelgauge_hardware::SimulatedTank::new(fuelgauge_hardware::TankProfile {
        empty_voltage: cfg.sensor.empty_voltage,
        full_voltage: cfg.full_voltage(),
        sample_rate_hz: hz,
        ..fuelgauge_hardware::TankProfile::default()
    });

    estimator.bind(&mut provider).wrap_err("bind analog channel")?;
    let mut monitor = TankMonitor::new(estimator);

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .wrap_err("install ctrl-c handler")?;
    }

    let clock = MonotonicClock::new();
    let json = cli.json;
    let completed = runner::run_paced(
        &mut monitor,
        hz,
        cycles,
        &shutdown,
        &clock,
        |cycle, state| {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "cycle": cycle,
                        "healthy": state.healthy,
                        "voltage": state.voltage,
                        "consumed_ml": state.consumed_ml,
                        "consumed_wh": state.consumed_wh,
                        "current_amps": state.current_amps,
                    })
                );
            } else {
                println!(
                    "cycle {cycle:>6}  voltage {:>7.3} V  consumed {:>9.1} ml  healthy {}",
                    state.voltage, state.consumed_ml, state.healthy
                );
            }
        },
    );
    tracing::info!(completed, "gauge run finished");
    Ok(())
}
