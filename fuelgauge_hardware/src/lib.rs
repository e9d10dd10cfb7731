//! Analog providers for the fuel gauge: a deterministic tank simulator for
//! development and tests, and (behind the `hardware` feature) an MCP3008
//! SPI ADC front end for Raspberry Pi class boards.

pub mod error;
#[cfg(feature = "hardware")]
pub mod mcp3008;
pub mod sim;

pub use sim::{SimulatedTank, TankProfile};

#[cfg(feature = "hardware")]
pub use mcp3008::Mcp3008Provider;
