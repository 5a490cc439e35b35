//! Frame renderer
//!
//! Packs the symbols of every channel's brightness, msb first, into a byte
//! buffer. Symbols are not byte aligned: a symbol may start in one byte and
//! end in the next, and channels follow each other without padding.

use crate::symbol::Encoder;

/// Write position inside the frame, msb of byte 0 first
struct BitCursor<'f> {
    frame: &'f mut [u8],
    byte: usize,
    bit: u8,
}

impl<'f> BitCursor<'f> {
    fn new(frame: &'f mut [u8]) -> Self {
        Self {
            frame,
            byte: 0,
            bit: 7,
        }
    }

    fn put(&mut self, high: bool) {
        let mask = 1u8 << self.bit;
        let byte = &mut self.frame[self.byte];
        *byte &= !mask;
        if high {
            *byte |= mask;
        }
        if self.bit == 0 {
            self.byte += 1;
            self.bit = 7;
        } else {
            self.bit -= 1;
        }
    }

    /// Pull the line low for the rest of the frame
    fn clear_rest(self) {
        // eight symbols per channel, so every channel ends on a byte boundary
        debug_assert_eq!(self.bit, 7);
        if let Some(rest) = self.frame.get_mut(self.byte..) {
            rest.fill(0);
        }
    }
}

/// Overwrite `frame` with the waveform for `levels`
///
/// Every bit of the display region is written, everything after it is set
/// to zero (line low) so the reset period follows.
///
/// # Panics
///
/// When `frame` is shorter than [`display_len`](crate::display_len) for
/// `levels.len()` channels. The device checks this once at construction.
pub fn render(levels: &[u8], encoder: &Encoder, frame: &mut [u8]) {
    let mut cursor = BitCursor::new(frame);
    for &level in levels {
        for bit in (0..8).rev() {
            let symbol = encoder.encode(level & (1 << bit) != 0);
            for high in symbol.sub_bits() {
                cursor.put(high);
            }
        }
    }
    cursor.clear_rest();
}
