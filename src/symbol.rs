//! Bit encoder: one led bit becomes a fixed width run of spi bits

use crate::timing::Timing;

/// Spi bit pattern standing for one led bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pattern: u8,
    width: u8,
}

impl Symbol {
    pub const fn new(pattern: u8, width: u8) -> Self {
        Self { pattern, width }
    }

    pub const fn pattern(&self) -> u8 {
        self.pattern
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Line level for each spi bit, first sent first
    pub fn sub_bits(self) -> impl Iterator<Item = bool> {
        (0..self.width)
            .rev()
            .map(move |i| self.pattern & (1 << i) != 0)
    }
}

/// Maps led bits to symbols
///
/// Both symbols have the same width, so the led bit clock doesn't depend on
/// the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    one: Symbol,
    zero: Symbol,
}

impl Encoder {
    pub const fn new(timing: &Timing) -> Self {
        Self {
            one: Symbol::new(timing.one, timing.symbol_bits),
            zero: Symbol::new(timing.zero, timing.symbol_bits),
        }
    }

    pub const fn encode(&self, bit: bool) -> Symbol {
        if bit {
            self.one
        } else {
            self.zero
        }
    }

    /// Spi bits per led bit
    pub const fn width(&self) -> u8 {
        self.one.width
    }

    /// Inverse of [`encode`](Self::encode)
    pub fn decode(&self, pattern: u8) -> Option<bool> {
        if pattern == self.one.pattern {
            Some(true)
        } else if pattern == self.zero.pattern {
            Some(false)
        } else {
            None
        }
    }
}
