//! Channel registry: identity and brightness of every color channel

use core::fmt::Write;

use heapless::{String, Vec};

use crate::color::{ColorOrder, ColorRole, COLORS_PER_LED};
use crate::error::AllocError;

/// Longest channel name, "green-" plus a 64 bit led number
pub const NAME_LEN: usize = 32;

/// One controllable color of one led
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    index: usize,
    role: ColorRole,
    name: String<NAME_LEN>,
}

impl Channel {
    fn new(index: usize, role: ColorRole) -> Result<Self, AllocError> {
        let mut name = String::new();
        write!(name, "{}-{}", role.name(), index / COLORS_PER_LED)
            .map_err(|_| AllocError::ChannelName)?;
        Ok(Self { index, role, name })
    }

    /// Position in the frame, 0 based
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn led_number(&self) -> usize {
        self.index / COLORS_PER_LED
    }

    pub fn role(&self) -> ColorRole {
        self.role
    }

    /// Display name, e.g. `green-0`
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Fixed set of channels for one device
#[derive(Debug, Clone)]
pub struct ChannelRegistry<const N: usize> {
    channels: Vec<Channel, N>,
    order: ColorOrder,
}

impl<const N: usize> ChannelRegistry<N> {
    pub fn new(led_count: usize, order: ColorOrder) -> Result<Self, AllocError> {
        let requested = led_count.saturating_mul(COLORS_PER_LED);
        if requested > N {
            return Err(AllocError::TooManyChannels {
                requested,
                capacity: N,
            });
        }
        let mut channels = Vec::new();
        for index in 0..requested {
            channels
                .push(Channel::new(index, order.role(index))?)
                .map_err(|_| AllocError::TooManyChannels {
                    requested,
                    capacity: N,
                })?;
        }
        Ok(Self { channels, order })
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn led_count(&self) -> usize {
        self.channels.len() / COLORS_PER_LED
    }

    pub fn order(&self) -> ColorOrder {
        self.order
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Channel> {
        self.channels.iter()
    }
}

/// Brightness of every channel, in channel order
///
/// Lives inside the device lock together with the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels<const N: usize> {
    values: Vec<u8, N>,
}

impl<const N: usize> Levels<N> {
    /// All channels off
    pub fn new(count: usize) -> Result<Self, AllocError> {
        let mut values = Vec::new();
        values
            .resize(count, 0)
            .map_err(|_| AllocError::TooManyChannels {
                requested: count,
                capacity: N,
            })?;
        Ok(Self { values })
    }

    /// `None` when `index` is past the last channel
    pub fn set_brightness(&mut self, index: usize, value: u8) -> Option<()> {
        let slot = self.values.get_mut(index)?;
        *slot = value;
        Some(())
    }

    pub fn get_brightness(&self, index: usize) -> Option<u8> {
        self.values.get(index).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}
