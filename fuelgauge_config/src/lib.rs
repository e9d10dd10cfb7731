#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and calibration-curve fitting for the fuel gauge.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The calibration CSV loader enforces headers and least-squares fits a
//!   polynomial (degree <= 3) through operator-tabulated (voltage, level)
//!   points, for senders that are easier to measure than to hand-fit.
use serde::Deserialize;

/// Highest calibration polynomial degree the gauge supports.
pub const MAX_FIT_DEGREE: usize = 3;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SensorCfg {
    /// Analog input pin the level sender is wired to; -1 disables the gauge.
    pub pin: i16,
    /// Sender voltage with the tank empty.
    pub empty_voltage: f32,
    /// 1 / (full_voltage - empty_voltage); scales a voltage delta to a
    /// [0, 1] fill ratio.
    pub voltage_multiplier: f32,
    /// Slosh filter corner frequency in Hz. Negative feeds the unfiltered
    /// calibrated value into the fill ratio. Suggested range 0.2-0.5 Hz.
    /// Takes effect when the estimator is built, not live.
    pub filter_cutoff_hz: f32,
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            pin: -1,
            empty_voltage: 0.5,
            voltage_multiplier: 0.5,
            filter_cutoff_hz: 0.3,
        }
    }
}

/// Calibration polynomial coefficients, `level = c3 v^3 + c2 v^2 + c1 v + c0`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CurveCfg {
    pub c0: f32,
    pub c1: f32,
    pub c2: f32,
    pub c3: f32,
}

impl Default for CurveCfg {
    fn default() -> Self {
        // Identity curve: a linear sender needs no fitting.
        Self {
            c0: 0.0,
            c1: 1.0,
            c2: 0.0,
            c3: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct TankCfg {
    /// Full-tank volume in millilitres; the consumed output scales with it.
    pub capacity_ml: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct RunnerCfg {
    /// Read-cycle rate for the gauge loop.
    pub sample_rate_hz: u32,
    /// Stop after this many cycles; absent means run until interrupted.
    pub cycles: Option<u64>,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            sample_rate_hz: 10,
            cycles: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sensor: SensorCfg,
    pub curve: CurveCfg,
    pub tank: TankCfg,
    pub runner: RunnerCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Sensor
        if self.sensor.pin < -1 {
            eyre::bail!("sensor.pin must be -1 (disabled) or a valid pin id");
        }
        if !self.sensor.empty_voltage.is_finite() {
            eyre::bail!("sensor.empty_voltage must be finite");
        }
        if !self.sensor.voltage_multiplier.is_finite() || self.sensor.voltage_multiplier == 0.0 {
            eyre::bail!("sensor.voltage_multiplier must be finite and non-zero");
        }
        if !self.sensor.filter_cutoff_hz.is_finite() {
            eyre::bail!("sensor.filter_cutoff_hz must be finite");
        }

        // Curve
        for (name, c) in [
            ("curve.c0", self.curve.c0),
            ("curve.c1", self.curve.c1),
            ("curve.c2", self.curve.c2),
            ("curve.c3", self.curve.c3),
        ] {
            if !c.is_finite() {
                eyre::bail!("{name} must be finite");
            }
        }

        // Tank
        if !self.tank.capacity_ml.is_finite() || self.tank.capacity_ml <= 0.0 {
            eyre::bail!("tank.capacity_ml must be > 0");
        }

        // Runner
        if self.runner.sample_rate_hz == 0 {
            eyre::bail!("runner.sample_rate_hz must be > 0");
        }
        if self.runner.sample_rate_hz > 1000 {
            eyre::bail!("runner.sample_rate_hz is unreasonably large (>1kHz)");
        }

        Ok(())
    }

    /// Sender voltage of a full tank implied by the sensor scaling.
    pub fn full_voltage(&self) -> f32 {
        self.sensor.empty_voltage + 1.0 / self.sensor.voltage_multiplier
    }
}

/// Calibration CSV schema.
///
/// Expected headers:
/// voltage,level
///
/// Example:
/// voltage,level
/// 0.52,0.50
/// 2.48,2.50
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CalibrationRow {
    pub voltage: f32,
    pub level: f32,
}

/// Least-squares fit a polynomial of the given degree through the rows,
/// returning gauge curve coefficients (unused orders are zero).
///
/// Normal equations are assembled and solved in f64; the point counts here
/// are small (an operator tabulates a handful of dips), so the classic
/// Vandermonde approach is well within its numerical comfort zone.
pub fn fit_curve(rows: &[CalibrationRow], degree: usize) -> eyre::Result<CurveCfg> {
    if degree == 0 || degree > MAX_FIT_DEGREE {
        eyre::bail!("fit degree must be in 1..={MAX_FIT_DEGREE}, got {degree}");
    }
    let n_coef = degree + 1;
    if rows.len() < n_coef {
        eyre::bail!(
            "degree-{degree} fit requires at least {n_coef} rows, got {}",
            rows.len()
        );
    }
    for (idx, r) in rows.iter().enumerate() {
        if !r.voltage.is_finite() || !r.level.is_finite() {
            eyre::bail!("calibration row {} is not finite", idx + 1);
        }
    }
    let mut distinct: Vec<f32> = rows.iter().map(|r| r.voltage).collect();
    distinct.sort_by(f32::total_cmp);
    distinct.dedup();
    if distinct.len() < n_coef {
        eyre::bail!(
            "degree-{degree} fit requires {n_coef} distinct voltages, got {}",
            distinct.len()
        );
    }

    // Normal equations: (V^T V) c = V^T y with V[i][j] = voltage_i^j.
    let mut ata = vec![vec![0.0f64; n_coef]; n_coef];
    let mut aty = vec![0.0f64; n_coef];
    for r in rows {
        let x = f64::from(r.voltage);
        let y = f64::from(r.level);
        let mut pow = [1.0f64; MAX_FIT_DEGREE + 1];
        for j in 1..n_coef {
            pow[j] = pow[j - 1] * x;
        }
        for i in 0..n_coef {
            aty[i] += pow[i] * y;
            for j in 0..n_coef {
                ata[i][j] += pow[i] * pow[j];
            }
        }
    }

    let coef = solve_linear(ata, aty)
        .ok_or_else(|| eyre::eyre!("calibration fit is degenerate (singular system)"))?;
    for c in &coef {
        if !c.is_finite() {
            eyre::bail!("calibration fit produced non-finite coefficients");
        }
    }

    let get = |i: usize| coef.get(i).copied().unwrap_or(0.0) as f32;
    Ok(CurveCfg {
        c0: get(0),
        c1: get(1),
        c2: get(2),
        c3: get(3),
    })
}

/// Gaussian elimination with partial pivoting. Returns None on a singular
/// (or numerically singular) system.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let f = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }
    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in row + 1..n {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}

pub fn load_calibration_csv(path: &std::path::Path, degree: usize) -> eyre::Result<CurveCfg> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open calibration CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["voltage", "level"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "calibration CSV must have headers 'voltage,level', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<CalibrationRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    fit_curve(&rows, degree)
}
