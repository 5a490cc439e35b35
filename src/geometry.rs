//! Frame buffer sizing

use crate::timing::Timing;

/// Bytes needed for a frame of `channel_count` channels
///
/// Display bits (8 led bits per channel, `symbol_bits` spi bits each) plus
/// the reset period, rounded down to whole bytes, plus the timing's trailer
/// margin. Usable in const context to size the buffer:
///
/// ```
/// use ws2812_spi_led::{buffer_size, Timing};
///
/// const FRAME_LEN: usize = buffer_size(3, &Timing::WS2812);
/// let frame = [0u8; FRAME_LEN];
/// assert_eq!(frame.len(), 44);
/// ```
pub const fn buffer_size(channel_count: usize, timing: &Timing) -> usize {
    let display_bits = channel_count * 8 * timing.symbol_bits as usize;
    (display_bits + timing.reset_bits()) / 8 + timing.trailer_bytes
}

/// Bytes touched by the display part of a frame
pub const fn display_len(channel_count: usize, timing: &Timing) -> usize {
    (channel_count * 8 * timing.symbol_bits as usize + 7) / 8
}
