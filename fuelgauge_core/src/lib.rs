#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core fuel-gauge logic (hardware-agnostic).
//!
//! This crate estimates the remaining volume in a tank from a single analog
//! level sender. All hardware interactions go through the
//! `fuelgauge_traits::AnalogChannel` / `AnalogProvider` traits.
//!
//! ## Architecture
//!
//! - **Calibration**: cubic curve mapping sender voltage to a level voltage
//!   (`calibration` module)
//! - **Filtering**: single-pole low-pass against tank slosh (`filter` module)
//! - **Estimation**: per-cycle read pipeline (`estimator` module)
//! - **Orchestration**: backend trait + single-tank monitor (`monitor`
//!   module) and a fixed-rate loop (`runner` module)
//!
//! The read cycle itself never fails: sensor trouble is surfaced through
//! `TankState::healthy` and the loop keeps running, as a control system
//! sharing its scheduler with other subsystems must.

pub mod calibration;
pub mod config;
pub mod conversions;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod mocks;
pub mod monitor;
pub mod runner;
pub mod state;
pub mod util;

pub use calibration::LevelCurve;
pub use config::{DEFAULT_SLOSH_CUTOFF_HZ, SensorCfg, TankCfg};
pub use error::{BindError, BuildError, Result};
pub use estimator::{FuelLevelAnalog, FuelLevelBuilder};
pub use filter::LowPassFilter;
pub use monitor::{GaugeBackend, TankMonitor};
pub use state::TankState;
