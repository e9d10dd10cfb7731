//! Common time/period helpers for fuelgauge_core.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Compute the period in microseconds for a given cycle rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures the result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}
