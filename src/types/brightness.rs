//! Brightness values as reported by the bridge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw Hue brightness (`bri`).
///
/// The bridge documents a range of 1 to 254. Values read from a light are kept
/// exactly as reported so a write-back reproduces what the light showed.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 254;

    pub fn new(value: u8) -> Self {
        Brightness { value }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Whether the value lies in the documented range.
    pub fn is_valid(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.value)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Brightness::new(value)
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
