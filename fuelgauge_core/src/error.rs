use thiserror::Error;

/// Failure to acquire the analog channel during two-phase initialization.
///
/// A failed bind leaves the estimator inert: every subsequent read cycle is
/// a no-op and the shared state keeps its default `healthy = false`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    #[error("fuel level pin is disabled")]
    PinDisabled,
    #[error("no analog channel available for pin {0}")]
    ChannelUnavailable(i16),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
