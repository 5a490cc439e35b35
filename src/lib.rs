//! # Use ws2812 leds via spi, one brightness control per color
//!
//! - Every color of every led is a channel with its own 8 bit brightness
//! - For usage with `smart-leds`, implements the `SmartLedsWrite` trait
//! - Safe to update from several contexts, render + transmit run under one
//!   lock so a torn frame never reaches the strip
//!
//! Needs a type implementing the `spi::FullDuplex` or the blocking
//! `spi::Write` trait, see [`FullDuplexBus`] and [`BlockingBus`].
//!
//! The spi peripheral should run at [`Timing::bus_frequency_hz`], 3.2 MHz
//! for [`Timing::WS2812`].
//!
//! ```
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use ws2812_spi_led::{buffer_size, DeviceConfig, Timing, Transmit, Ws2812};
//!
//! struct Sink;
//!
//! impl Transmit for Sink {
//!     type Error = ();
//!
//!     fn transmit(&mut self, _frame: &[u8]) -> Result<(), ()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut frame = [0u8; buffer_size(6, &Timing::WS2812)];
//! let config = DeviceConfig::new().with_led_count(2).with_color_order("GRB");
//! let strip: Ws2812<_, NoopRawMutex, 6> =
//!     Ws2812::new(Sink, &mut frame, config, Timing::WS2812).unwrap();
//!
//! strip.set_brightness(1, 0x40).unwrap();
//! assert_eq!(strip.channel(1).unwrap().name(), "red-0");
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod color;
pub mod config;
pub mod device;
pub mod error;
pub mod geometry;
pub mod registry;
pub mod render;
pub mod symbol;
pub mod timing;

use embedded_hal as hal;

use hal::spi::{Mode, Phase, Polarity};

pub use bus::{BlockingBus, FullDuplexBus, Transmit};
pub use color::{ColorOrder, ColorRole, COLORS_PER_LED};
pub use config::DeviceConfig;
pub use device::{Led, Ws2812};
pub use error::{AllocError, ConfigError, Error, InitError};
pub use geometry::{buffer_size, display_len};
pub use registry::Channel;
pub use symbol::{Encoder, Symbol};
pub use timing::Timing;

/// SPI mode that can be used for this crate
///
/// Provided for convenience
/// The data line has to idle low between frames
pub const MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};
