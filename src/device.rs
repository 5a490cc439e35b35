//! Device: owns the frame, the bus and every channel, and serializes
//! render + transmit under one lock.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use smart_leds_trait::{SmartLedsWrite, RGB8};

use crate::bus::Transmit;
use crate::color::{ColorOrder, ColorRole, COLORS_PER_LED};
use crate::config::DeviceConfig;
use crate::error::{AllocError, Error, InitError};
use crate::geometry::buffer_size;
use crate::registry::{Channel, ChannelRegistry, Levels};
use crate::render::render;
use crate::symbol::Encoder;
use crate::timing::Timing;

/// Everything guarded by the device lock
struct State<'a, BUS, const N: usize> {
    bus: BUS,
    levels: Levels<N>,
    frame: &'a mut [u8],
}

impl<'a, BUS, const N: usize> State<'a, BUS, N>
where
    BUS: Transmit,
{
    /// Rendering -> Transmitting -> Idle
    fn commit(&mut self, encoder: &Encoder) -> Result<(), BUS::Error> {
        trace!("ws2812: rendering {} channels", self.levels.as_slice().len());
        render(self.levels.as_slice(), encoder, self.frame);

        trace!("ws2812: transmitting {} bytes", self.frame.len());
        let result = self.bus.transmit(&*self.frame);
        if result.is_err() {
            warn!("ws2812: transmit failed, frame goes out with the next update");
        }
        trace!("ws2812: idle");
        result
    }
}

/// A strip of ws2812 leds behind a spi bus
///
/// Every color of every led is a channel with its own 8 bit brightness.
/// Any change re-renders the whole frame and sends it, the protocol has no
/// partial updates. Changes from several callers are serialized through one
/// lock held for the whole render + transmit, so a frame on the wire always
/// matches a consistent set of channel values.
///
/// - `BUS` sends the frame, see [`BlockingBus`](crate::BlockingBus) and
///   [`FullDuplexBus`](crate::FullDuplexBus)
/// - `M` is the lock, [`CriticalSectionRawMutex`] by default. Use
///   `NoopRawMutex` when the device never leaves one execution context.
/// - `N` is the channel capacity, at least 3 per led
pub struct Ws2812<'a, BUS, M = CriticalSectionRawMutex, const N: usize = 3> {
    state: Mutex<M, RefCell<State<'a, BUS, N>>>,
    registry: ChannelRegistry<N>,
    encoder: Encoder,
    timing: Timing,
}

impl<'a, BUS, M, const N: usize> Ws2812<'a, BUS, M, N>
where
    BUS: Transmit,
    M: RawMutex,
{
    /// Build a device with all channels off
    ///
    /// `frame` must hold at least [`buffer_size`] bytes for the configured
    /// channels, only that many are used. The bus is expected to already
    /// run at [`Timing::bus_frequency_hz`] in [`MODE`](crate::MODE).
    ///
    /// Nothing is sent until the first update.
    pub fn new(
        bus: BUS,
        frame: &'a mut [u8],
        config: DeviceConfig<'_>,
        timing: Timing,
    ) -> Result<Self, InitError> {
        timing.validate()?;
        let led_count = config.led_count()?;
        let order = config.color_order()?;

        let registry = ChannelRegistry::new(led_count, order)?;
        let levels = Levels::new(registry.len())?;

        let required = buffer_size(registry.len(), &timing);
        let available = frame.len();
        if available < required {
            return Err(AllocError::FrameTooSmall {
                required,
                available,
            }
            .into());
        }
        let frame = &mut frame[..required];
        frame.fill(0);

        debug!(
            "ws2812: {} leds, {} byte frame, spi at {} Hz",
            led_count,
            required,
            timing.bus_frequency_hz()
        );

        Ok(Self {
            state: Mutex::new(RefCell::new(State { bus, levels, frame })),
            registry,
            encoder: Encoder::new(&timing),
            timing,
        })
    }

    /// Idle -> Rendering, apply `change`, then render and send
    ///
    /// Nothing is rendered when `change` fails.
    fn update<F>(&self, change: F) -> Result<(), Error<BUS::Error>>
    where
        F: FnOnce(&mut Levels<N>) -> Result<(), Error<BUS::Error>>,
    {
        self.state.lock(|cell| {
            let mut state = cell.borrow_mut();
            change(&mut state.levels)?;
            state.commit(&self.encoder).map_err(Error::Transmit)
        })
    }

    fn invalid_channel(&self, index: usize) -> Error<BUS::Error> {
        Error::InvalidChannel {
            index,
            count: self.registry.len(),
        }
    }

    /// Set one channel and send the new frame
    ///
    /// A transmit error is returned as is. The new value stays set and
    /// the frame stays rendered, the next successful update sends it.
    pub fn set_brightness(&self, index: usize, value: u8) -> Result<(), Error<BUS::Error>> {
        let invalid = self.invalid_channel(index);
        self.update(|levels| levels.set_brightness(index, value).ok_or(invalid))
    }

    /// Current brightness of a channel
    pub fn brightness(&self, index: usize) -> Option<u8> {
        self.state
            .lock(|cell| cell.borrow().levels.get_brightness(index))
    }

    /// Set the first `values.len()` channels at once, one frame sent
    pub fn write_levels(&self, values: &[u8]) -> Result<(), Error<BUS::Error>> {
        if values.len() > self.registry.len() {
            return Err(self.invalid_channel(values.len() - 1));
        }
        self.update(|levels| {
            for (index, value) in values.iter().enumerate() {
                levels.set_brightness(index, *value);
            }
            Ok(())
        })
    }

    /// Spread colors over the leds in the device's color order
    ///
    /// Leds past the end of `colors` keep their values, colors past the
    /// last led are ignored.
    pub fn write_colors<I>(&self, colors: I) -> Result<(), Error<BUS::Error>>
    where
        I: IntoIterator<Item = RGB8>,
    {
        let roles = self.registry.order().roles();
        let led_count = self.registry.led_count();
        self.update(|levels| {
            for (led, color) in colors.into_iter().take(led_count).enumerate() {
                for (offset, role) in roles.iter().enumerate() {
                    levels.set_brightness(led * COLORS_PER_LED + offset, role.component(color));
                }
            }
            Ok(())
        })
    }

    /// Render and send the current values again
    pub fn refresh(&self) -> Result<(), Error<BUS::Error>> {
        self.update(|_| Ok(()))
    }

    /// Look at the last rendered frame
    ///
    /// The lock is held while `f` runs.
    pub fn with_frame<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        self.state.lock(|cell| f(&*cell.borrow().frame))
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.registry.get(index)
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.registry.iter()
    }

    /// Brightness endpoint for one channel
    pub fn led(&self, index: usize) -> Option<Led<'_, 'a, BUS, M, N>> {
        self.registry.get(index).map(|channel| Led {
            device: self,
            channel,
        })
    }

    /// Endpoints for all channels, in channel order
    pub fn leds(&self) -> impl Iterator<Item = Led<'_, 'a, BUS, M, N>> {
        self.registry.iter().map(move |channel| Led {
            device: self,
            channel,
        })
    }

    pub fn led_count(&self) -> usize {
        self.registry.led_count()
    }

    pub fn channel_count(&self) -> usize {
        self.registry.len()
    }

    pub fn color_order(&self) -> ColorOrder {
        self.registry.order()
    }

    /// Bytes sent per frame
    pub fn frame_len(&self) -> usize {
        buffer_size(self.registry.len(), &self.timing)
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Tear the device down, handing back the bus and the frame buffer
    pub fn release(self) -> (BUS, &'a mut [u8]) {
        let state = self.state.into_inner().into_inner();
        (state.bus, state.frame)
    }
}

impl<'a, BUS, M, const N: usize> SmartLedsWrite for Ws2812<'a, BUS, M, N>
where
    BUS: Transmit,
    M: RawMutex,
{
    type Error = Error<BUS::Error>;
    type Color = RGB8;
    /// Write all the items of an iterator to the strip
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: Iterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.write_colors(iterator.map(Into::into))
    }
}

/// Brightness control of a single channel
///
/// What a led host exposes per channel: a name and a 0 - 255 level.
/// Handles are cheap to copy and can be used from several threads when
/// the device's lock allows it.
pub struct Led<'d, 'a, BUS, M, const N: usize> {
    device: &'d Ws2812<'a, BUS, M, N>,
    channel: &'d Channel,
}

impl<BUS, M, const N: usize> Clone for Led<'_, '_, BUS, M, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<BUS, M, const N: usize> Copy for Led<'_, '_, BUS, M, N> {}

impl<'d, 'a, BUS, M, const N: usize> Led<'d, 'a, BUS, M, N>
where
    BUS: Transmit,
    M: RawMutex,
{
    pub const MAX_BRIGHTNESS: u8 = u8::MAX;

    pub fn name(&self) -> &'d str {
        self.channel.name()
    }

    pub fn index(&self) -> usize {
        self.channel.index()
    }

    pub fn led_number(&self) -> usize {
        self.channel.led_number()
    }

    pub fn role(&self) -> ColorRole {
        self.channel.role()
    }

    pub fn brightness(&self) -> u8 {
        self.device
            .brightness(self.channel.index())
            .unwrap_or_default()
    }

    pub fn set_brightness(&self, value: u8) -> Result<(), Error<BUS::Error>> {
        self.device.set_brightness(self.channel.index(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[derive(Default)]
    struct Capture {
        frames: std::vec::Vec<std::vec::Vec<u8>>,
        fail_next: bool,
    }

    #[derive(Debug, PartialEq)]
    struct Refused;

    impl Transmit for Capture {
        type Error = Refused;

        fn transmit(&mut self, frame: &[u8]) -> Result<(), Refused> {
            if self.fail_next {
                self.fail_next = false;
                return Err(Refused);
            }
            self.frames.push(frame.to_vec());
            Ok(())
        }
    }

    type Device<'a> = Ws2812<'a, Capture, NoopRawMutex, 6>;

    #[test]
    fn new_device_is_dark_and_silent() {
        let mut frame = [0xAAu8; 128];
        let device = Device::new(
            Capture::default(),
            &mut frame,
            DeviceConfig::new().with_led_count(2),
            Timing::WS2812,
        )
        .unwrap();
        assert_eq!(device.channel_count(), 6);
        assert_eq!(device.frame_len(), buffer_size(6, &Timing::WS2812));
        assert!(device.with_frame(|f| f.iter().all(|b| *b == 0)));
        assert_eq!(device.brightness(5), Some(0));
        let (bus, frame) = device.release();
        assert!(bus.frames.is_empty());
        assert_eq!(frame.len(), buffer_size(6, &Timing::WS2812));
    }

    #[test]
    fn set_brightness_sends_whole_frame() {
        let mut frame = [0u8; 64];
        let device = Device::new(Capture::default(), &mut frame, DeviceConfig::new(), Timing::WS2812)
            .unwrap();
        device.set_brightness(2, 0x80).unwrap();
        assert_eq!(device.brightness(2), Some(0x80));
        let sent = device.with_frame(|f| f.to_vec());
        let (bus, _) = device.release();
        assert_eq!(bus.frames, [sent]);
        assert_eq!(bus.frames[0].len(), 44);
    }

    #[test]
    fn invalid_channel_sends_nothing() {
        let mut frame = [0u8; 64];
        let device = Device::new(Capture::default(), &mut frame, DeviceConfig::new(), Timing::WS2812)
            .unwrap();
        assert_eq!(
            device.set_brightness(3, 1),
            Err(Error::InvalidChannel { index: 3, count: 3 })
        );
        assert_eq!(
            device.write_levels(&[1, 2, 3, 4]),
            Err(Error::InvalidChannel { index: 3, count: 3 })
        );
        let (bus, _) = device.release();
        assert!(bus.frames.is_empty());
    }

    #[test]
    fn transmit_error_keeps_value() {
        let mut frame = [0u8; 64];
        let bus = Capture {
            fail_next: true,
            ..Capture::default()
        };
        let device = Device::new(bus, &mut frame, DeviceConfig::new(), Timing::WS2812).unwrap();
        assert_eq!(device.set_brightness(0, 9), Err(Error::Transmit(Refused)));
        assert_eq!(device.brightness(0), Some(9));
        device.refresh().unwrap();
        let (bus, _) = device.release();
        assert_eq!(bus.frames.len(), 1);
    }

    #[test]
    fn colors_follow_color_order() {
        let mut frame = [0u8; 128];
        let mut device = Device::new(
            Capture::default(),
            &mut frame,
            DeviceConfig::new().with_led_count(2).with_color_order("GRB"),
            Timing::WS2812_3BIT,
        )
        .unwrap();
        device.set_brightness(5, 0x55).unwrap();
        let colors = [RGB8 { r: 1, g: 2, b: 3 }];
        device.write(colors.iter().cloned()).unwrap();
        let levels: std::vec::Vec<u8> = (0..6).filter_map(|i| device.brightness(i)).collect();
        assert_eq!(levels, [2, 1, 3, 0, 0, 0x55]);
    }

    #[test]
    fn init_errors() {
        let mut frame = [0u8; 16];
        let short = Device::new(Capture::default(), &mut frame, DeviceConfig::new(), Timing::WS2812);
        assert_eq!(
            short.err(),
            Some(InitError::Alloc(AllocError::FrameTooSmall {
                required: 44,
                available: 16
            }))
        );

        let mut frame = [0u8; 256];
        let too_many = Device::new(
            Capture::default(),
            &mut frame,
            DeviceConfig::new().with_led_count(3),
            Timing::WS2812,
        );
        assert_eq!(
            too_many.err(),
            Some(InitError::Alloc(AllocError::TooManyChannels {
                requested: 9,
                capacity: 6
            }))
        );

        let mut frame = [0u8; 256];
        let bad_order = Device::new(
            Capture::default(),
            &mut frame,
            DeviceConfig::new().with_color_order("RGBW"),
            Timing::WS2812,
        );
        assert!(matches!(bad_order, Err(InitError::Config(_))));
    }

    #[test]
    fn led_handles() {
        let mut frame = [0u8; 128];
        let device = Device::new(
            Capture::default(),
            &mut frame,
            DeviceConfig::new().with_led_count(2).with_color_order("RGB"),
            Timing::WS2812,
        )
        .unwrap();
        let names: std::vec::Vec<&str> = device.leds().map(|led| led.name()).collect();
        assert_eq!(names, ["red-0", "green-0", "blue-0", "red-1", "green-1", "blue-1"]);

        let led = device.led(4).unwrap();
        assert_eq!(led.role(), ColorRole::Green);
        assert_eq!(led.led_number(), 1);
        led.set_brightness(u8::MAX).unwrap();
        assert_eq!(led.brightness(), 255);
        assert!(device.led(6).is_none());
    }
}
