use core::fmt;

/// The device description can not be turned into a working device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A device needs at least one LED
    NoLeds,
    /// Color order letter that is not one of R, G or B
    UnknownColor(char),
    /// Color order with a letter count other than three
    ColorOrderLength(usize),
    /// Color order naming the same color twice
    DuplicateColor(char),
    /// Symbol patterns or rates that can not drive a ws2812
    InvalidTiming,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLeds => f.write_str("led count must be at least 1"),
            Self::UnknownColor(c) => write!(f, "unknown color '{}' in color order", c),
            Self::ColorOrderLength(len) => {
                write!(f, "color order needs 3 colors, got {}", len)
            }
            Self::DuplicateColor(c) => write!(f, "color '{}' appears twice in color order", c),
            Self::InvalidTiming => f.write_str("invalid symbol timing"),
        }
    }
}

/// Storage handed to the device is too small
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AllocError {
    /// More channels than the device's channel capacity
    TooManyChannels { requested: usize, capacity: usize },
    /// Frame buffer shorter than the computed frame length
    FrameTooSmall { required: usize, available: usize },
    /// Display name does not fit its buffer
    ChannelName,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyChannels {
                requested,
                capacity,
            } => write!(
                f,
                "{} channels requested, capacity is {}",
                requested, capacity
            ),
            Self::FrameTooSmall {
                required,
                available,
            } => write!(
                f,
                "frame buffer holds {} bytes, {} required",
                available, required
            ),
            Self::ChannelName => f.write_str("channel name too long"),
        }
    }
}

/// Construction failure, the device is never created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    Config(ConfigError),
    Alloc(AllocError),
}

impl From<ConfigError> for InitError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<AllocError> for InitError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {}", err),
            Self::Alloc(err) => write!(f, "allocation error: {}", err),
        }
    }
}

/// Failure of a brightness update
///
/// `E` is the error type of the bus transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Channel index past the last channel
    InvalidChannel { index: usize, count: usize },
    /// The bus refused the frame. The rendered frame is kept and goes out
    /// again with the next update.
    Transmit(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel { index, count } => {
                write!(f, "channel {} out of range (device has {})", index, count)
            }
            Self::Transmit(err) => write!(f, "bus transmit failed: {:?}", err),
        }
    }
}
