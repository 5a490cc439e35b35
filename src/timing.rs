//! Protocol constants for driving ws2812 leds from a spi bus

use crate::error::ConfigError;

/// How one led bit is stretched over spi bits, and how long the line has to
/// stay low to latch a frame.
///
/// `one` and `zero` hold the symbol patterns in their low `symbol_bits` bits,
/// sent most significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Spi bits per led bit, the bus clock multiplier
    pub symbol_bits: u8,
    /// Pattern for a 1 bit
    pub one: u8,
    /// Pattern for a 0 bit
    pub zero: u8,
    /// Led data rate, 800 kHz for ws2812
    pub data_rate_hz: u32,
    /// Minimum low time that commits a frame
    pub reset_us: u32,
    /// Extra zero bytes after the reset period, absorbs rounding
    pub trailer_bytes: usize,
}

impl Timing {
    /// Four spi bits per led bit, spi at 3.2 MHz
    ///
    /// A 1 is 0.625 µs high / 0.625 µs low, a 0 is 0.3125 µs high / 0.9375 µs low.
    pub const WS2812: Timing = Timing {
        symbol_bits: 4,
        one: 0b1100,
        zero: 0b1000,
        data_rate_hz: 800_000,
        reset_us: 60,
        trailer_bytes: 8,
    };

    /// Three spi bits per led bit, spi at 2.4 MHz
    ///
    /// Smaller frames, a 1 is high for two thirds of the bit, a 0 for one third.
    pub const WS2812_3BIT: Timing = Timing {
        symbol_bits: 3,
        one: 0b110,
        zero: 0b100,
        data_rate_hz: 800_000,
        reset_us: 60,
        trailer_bytes: 8,
    };

    /// Spi clock this timing assumes
    ///
    /// Configure the bus with this frequency once, before handing it to the
    /// device.
    pub const fn bus_frequency_hz(&self) -> u32 {
        self.data_rate_hz * self.symbol_bits as u32
    }

    /// Spi bits the reset period lasts
    pub const fn reset_bits(&self) -> usize {
        (self.reset_us as u64 * self.bus_frequency_hz() as u64 / 1_000_000) as usize
    }

    /// Reject timings that can not produce a decodable waveform
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol_bits == 0 || self.symbol_bits > 8 || self.data_rate_hz == 0 {
            return Err(ConfigError::InvalidTiming);
        }
        let width = u32::from(self.symbol_bits);
        let msb = 1u8 << (width - 1);
        for pattern in [self.one, self.zero] {
            // must fit, start high and end low
            if u32::from(pattern) >> width != 0 || pattern & msb == 0 || pattern & 1 != 0 {
                return Err(ConfigError::InvalidTiming);
            }
        }
        if self.one.count_ones() <= self.zero.count_ones() {
            return Err(ConfigError::InvalidTiming);
        }
        Ok(())
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::WS2812
    }
}
