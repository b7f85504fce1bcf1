use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use dm_display::{DisplayMode, VirtualScreen};
use crate::BridgeError;

/// Type prefix carried by screen (as opposed to window) capture sources.
const SCREEN_PREFIX: &str = "screen:";

/// Index of a display device in OS enumeration order, as encoded in a
/// screen-capture source id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u32);

impl SourceId {
    /// Accepts `"screen:1:0"`, `"1:0"` and `"1"`; all name device index 1.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        raw.parse()
    }

    /// Numeric form used by callers that already split the id. Negative
    /// indices never name a device.
    pub fn from_index(index: i32) -> Option<Self> {
        u32::try_from(index).ok().map(SourceId)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl FromStr for SourceId {
    type Err = BridgeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || BridgeError::InvalidSourceId(raw.to_string());

        let trimmed = raw.trim();
        let id = trimmed.strip_prefix(SCREEN_PREFIX).unwrap_or(trimmed);
        // "<device>:<window>" from the capture enumerator; only the device matters
        let device = id.split(':').next().unwrap_or(id).trim();

        if device.is_empty() || !device.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        device.parse::<u32>().map(SourceId).map_err(|_| invalid())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl From<DisplayMode> for Rect {
    fn from(mode: DisplayMode) -> Self {
        Self {
            x: mode.x,
            y: mode.y,
            width: mode.width,
            height: mode.height,
        }
    }
}

/// Where a capture source sits on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCoordinates {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Virtual desktop bounds as refreshed by the lookup
    pub virtual_screen: VirtualScreen,
}

impl SourceCoordinates {
    pub fn new(mode: DisplayMode, virtual_screen: VirtualScreen) -> Self {
        Self {
            x: mode.x,
            y: mode.y,
            width: mode.width,
            height: mode.height,
            virtual_screen,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
