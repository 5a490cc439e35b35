//! Color roles and per device color order

use core::str::FromStr;

use crate::error::ConfigError;

/// Colors per led
pub const COLORS_PER_LED: usize = 3;

/// Physical color a channel drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorRole {
    Red,
    Green,
    Blue,
}

impl ColorRole {
    const TABLE: [(char, ColorRole); 3] = [
        ('R', ColorRole::Red),
        ('G', ColorRole::Green),
        ('B', ColorRole::Blue),
    ];

    /// Role for a color order letter, case insensitive
    pub fn from_letter(letter: char) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        Self::TABLE
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, role)| *role)
    }

    pub const fn letter(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
        }
    }

    /// Lowercase name used in channel names
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    /// This role's component of an rgb color
    pub const fn component(self, color: smart_leds_trait::RGB8) -> u8 {
        match self {
            Self::Red => color.r,
            Self::Green => color.g,
            Self::Blue => color.b,
        }
    }
}

/// Order in which a led expects its colors on the wire
///
/// Applied cyclically: channel `i` drives `order[i % 3]` of led `i / 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorOrder([ColorRole; COLORS_PER_LED]);

impl ColorOrder {
    /// Order of ws2812 and most of its clones
    pub const GRB: ColorOrder = ColorOrder([ColorRole::Green, ColorRole::Red, ColorRole::Blue]);
    pub const RGB: ColorOrder = ColorOrder([ColorRole::Red, ColorRole::Green, ColorRole::Blue]);

    pub const fn roles(&self) -> [ColorRole; COLORS_PER_LED] {
        self.0
    }

    /// Role of the channel at `index`
    pub const fn role(&self, index: usize) -> ColorRole {
        self.0[index % COLORS_PER_LED]
    }
}

impl Default for ColorOrder {
    fn default() -> Self {
        Self::GRB
    }
}

impl FromStr for ColorOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut roles = [ColorRole::Red; COLORS_PER_LED];
        let mut count = 0;
        for letter in s.chars() {
            let role = ColorRole::from_letter(letter).ok_or(ConfigError::UnknownColor(letter))?;
            if roles[..count.min(COLORS_PER_LED)].contains(&role) {
                return Err(ConfigError::DuplicateColor(role.letter()));
            }
            if count < COLORS_PER_LED {
                roles[count] = role;
            }
            count += 1;
        }
        if count != COLORS_PER_LED {
            return Err(ConfigError::ColorOrderLength(count));
        }
        Ok(Self(roles))
    }
}
