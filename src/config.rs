//! Device description

use crate::color::ColorOrder;
use crate::error::ConfigError;

/// Board level settings, read once when the device is built
///
/// Missing values fall back to a single led in GRB order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct DeviceConfig<'a> {
    #[cfg_attr(feature = "serde", serde(default))]
    pub led_count: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default, borrow))]
    pub color_order: Option<&'a str>,
}

impl<'a> DeviceConfig<'a> {
    pub const DEFAULT_LED_COUNT: usize = 1;

    pub const fn new() -> Self {
        Self {
            led_count: None,
            color_order: None,
        }
    }

    pub const fn with_led_count(mut self, led_count: usize) -> Self {
        self.led_count = Some(led_count);
        self
    }

    pub const fn with_color_order(mut self, color_order: &'a str) -> Self {
        self.color_order = Some(color_order);
        self
    }

    pub fn led_count(&self) -> Result<usize, ConfigError> {
        match self.led_count.unwrap_or(Self::DEFAULT_LED_COUNT) {
            0 => Err(ConfigError::NoLeds),
            count => Ok(count),
        }
    }

    pub fn color_order(&self) -> Result<ColorOrder, ConfigError> {
        self.color_order
            .map_or(Ok(ColorOrder::default()), str::parse::<ColorOrder>)
    }
}
