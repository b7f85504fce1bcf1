#[cfg(target_os = "windows")]
mod win32;
#[cfg(not(target_os = "windows"))]
mod unsupported;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DisplayError>;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Platform not supported")]
    UnsupportedPlatform,

    #[error("No display device at index {0}")]
    NotFound(u32),

    #[error("Display device {0} is not active")]
    Inactive(u32),

    #[error("Current settings unavailable for display {index} ({name})")]
    SettingsUnavailable { index: u32, name: String },
}

/// Bounding box of the virtual desktop, in pixels.
///
/// `min_x`/`min_y` are negative when a monitor sits left of or above the
/// primary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualScreen {
    pub width: i32,
    pub height: i32,
    pub min_x: i32,
    pub min_y: i32,
}

impl VirtualScreen {
    pub fn new(min_x: i32, min_y: i32, width: i32, height: i32) -> Self {
        Self { width, height, min_x, min_y }
    }

    /// True when either extent is zero or negative, i.e. no usable desktop.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.min_x as i64
            && y >= self.min_y as i64
            && x < self.min_x as i64 + self.width as i64
            && y < self.min_y as i64 + self.height as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    LandscapeFlipped,
    PortraitFlipped,
}

impl Orientation {
    /// Maps the DMDO_* value reported by the OS; unknown values read as landscape.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Orientation::Portrait,
            2 => Orientation::LandscapeFlipped,
            3 => Orientation::PortraitFlipped,
            _ => Orientation::Landscape,
        }
    }
}

/// Current settings of one display device, in virtual-desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMode {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDevice {
    pub index: u32,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub primary: bool,
    pub mode: Option<DisplayMode>,
}

/// Read access to the OS display configuration.
///
/// Device indices follow the OS enumeration order, which is also the order
/// screen-capture source ids are numbered in.
pub trait DisplaySource: Send + Sync {
    /// Queries the virtual desktop bounds. Never cached by implementors.
    fn virtual_screen(&self) -> VirtualScreen;

    /// Current settings of the device at `index`.
    fn current_mode(&self, index: u32) -> Result<DisplayMode>;

    /// Every device the OS enumerates, active or not.
    fn devices(&self) -> Result<Vec<DisplayDevice>>;

    fn active_devices(&self) -> Result<Vec<DisplayDevice>> {
        Ok(self
            .devices()?
            .into_iter()
            .filter(|d| d.active && d.mode.is_some())
            .collect())
    }
}

// Select the correct platform implementation at compile time
#[cfg(target_os = "windows")]
pub type PlatformDisplaySource = win32::Win32DisplaySource;

#[cfg(not(target_os = "windows"))]
pub type PlatformDisplaySource = unsupported::UnsupportedDisplaySource;
