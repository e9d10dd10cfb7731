//! MCP3008 10-bit SPI ADC front end.
//!
//! Exposes the eight ADC inputs as gauge pins 0-7. Each `voltage_average`
//! takes a short burst of conversions and averages them; a failed transfer
//! keeps the previous value so one bad cycle does not spike the gauge.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::{trace, warn};

use fuelgauge_traits::{AnalogChannel, AnalogProvider};

use crate::error::{HwError, Result};

const ADC_FULL_SCALE: f32 = 1023.0;
const ADC_CHANNELS: i16 = 8;

pub struct Mcp3008 {
    spi: Spi,
    vref: f32,
}

impl Mcp3008 {
    pub fn new(bus: Bus, slave: SlaveSelect, vref: f32) -> Result<Self> {
        // 1.35 MHz keeps the conversion clock inside the datasheet limit
        // for 2.7 V supplies.
        let spi = Spi::new(bus, slave, 1_350_000, Mode::Mode0)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self { spi, vref })
    }

    /// One single-ended conversion on `channel` (0-7), raw 10-bit counts.
    pub fn read_counts(&mut self, channel: u8) -> Result<u16> {
        if channel > 7 {
            return Err(HwError::InvalidChannel(channel));
        }
        // Start bit, single-ended mode + channel, one clock-out byte.
        let tx = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let counts = (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]);
        trace!(channel, counts, "mcp3008 conversion");
        Ok(counts)
    }

    pub fn counts_to_volts(&self, counts: u16) -> f32 {
        f32::from(counts) * self.vref / ADC_FULL_SCALE
    }
}

/// Provider over one shared MCP3008.
pub struct Mcp3008Provider {
    adc: Arc<Mutex<Mcp3008>>,
    samples_per_read: u32,
}

impl Mcp3008Provider {
    pub fn new(bus: Bus, slave: SlaveSelect, vref: f32, samples_per_read: u32) -> Result<Self> {
        Ok(Self {
            adc: Arc::new(Mutex::new(Mcp3008::new(bus, slave, vref)?)),
            samples_per_read: samples_per_read.max(1),
        })
    }

    /// Provider on SPI0/CE0, the usual Raspberry Pi wiring.
    pub fn on_spi0(vref: f32, samples_per_read: u32) -> Result<Self> {
        Self::new(Bus::Spi0, SlaveSelect::Ss0, vref, samples_per_read)
    }
}

impl AnalogProvider for Mcp3008Provider {
    fn channel(&mut self, pin: i16) -> Option<Box<dyn AnalogChannel + Send>> {
        if !(0..ADC_CHANNELS).contains(&pin) {
            return None;
        }
        Some(Box::new(Mcp3008Channel {
            adc: self.adc.clone(),
            pin,
            samples_per_read: self.samples_per_read,
            last_volts: 0.0,
        }))
    }
}

struct Mcp3008Channel {
    adc: Arc<Mutex<Mcp3008>>,
    pin: i16,
    samples_per_read: u32,
    last_volts: f32,
}

impl AnalogChannel for Mcp3008Channel {
    fn set_pin(&mut self, pin: i16) -> bool {
        if !(0..ADC_CHANNELS).contains(&pin) {
            return false;
        }
        self.pin = pin;
        true
    }

    fn voltage_average(&mut self) -> f32 {
        let Ok(mut adc) = self.adc.lock() else {
            return self.last_volts;
        };
        let mut sum = 0.0f32;
        let mut ok = 0u32;
        for _ in 0..self.samples_per_read {
            match adc.read_counts(self.pin as u8) {
                Ok(counts) => {
                    sum += adc.counts_to_volts(counts);
                    ok += 1;
                }
                Err(e) => {
                    warn!(pin = self.pin, error = %e, "adc conversion failed");
                }
            }
            // Settle between conversions; the sender moves far slower.
            std::thread::sleep(Duration::from_micros(100));
        }
        if ok > 0 {
            self.last_volts = sum / ok as f32;
        }
        self.last_volts
    }
}
