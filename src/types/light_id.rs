//! Hue light identifiers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Identifier of a light on the bridge.
///
/// The REST API keys lights by decimal strings (`"1"`, `"2"`, ...); this keeps
/// the numeric value and converts at the serde boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        LightId(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for LightId {
    fn from(id: u32) -> Self {
        LightId(id)
    }
}

impl FromStr for LightId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(LightId)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
