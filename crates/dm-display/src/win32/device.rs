use std::mem::size_of;
use windows::core::PCWSTR;
use windows::Win32::Graphics::Gdi::{
    EnumDisplayDevicesW, EnumDisplaySettingsExW, DEVMODEW, DISPLAY_DEVICEW,
    DISPLAY_DEVICE_ACTIVE, DISPLAY_DEVICE_PRIMARY_DEVICE, ENUM_CURRENT_SETTINGS,
    ENUM_DISPLAY_SETTINGS_FLAGS,
};
use crate::{DisplayMode, Orientation};

/// One adapter output as returned by `EnumDisplayDevicesW`.
pub(super) struct RawDevice(DISPLAY_DEVICEW);

impl RawDevice {
    /// The device at `index` in enumeration order, if there is one.
    pub(super) fn at(index: u32) -> Option<Self> {
        let mut device = DISPLAY_DEVICEW {
            cb: size_of::<DISPLAY_DEVICEW>() as u32,
            ..Default::default()
        };

        let found = unsafe { EnumDisplayDevicesW(PCWSTR::null(), index, &mut device, 0) };
        found.as_bool().then_some(Self(device))
    }

    pub(super) fn is_active(&self) -> bool {
        self.0.StateFlags.0 & DISPLAY_DEVICE_ACTIVE.0 != 0
    }

    pub(super) fn is_primary(&self) -> bool {
        self.0.StateFlags.0 & DISPLAY_DEVICE_PRIMARY_DEVICE.0 != 0
    }

    pub(super) fn name(&self) -> String {
        wide_to_string(&self.0.DeviceName)
    }

    pub(super) fn description(&self) -> String {
        wide_to_string(&self.0.DeviceString)
    }

    /// Reads `ENUM_CURRENT_SETTINGS` for this device.
    pub(super) fn current_mode(&self) -> Option<DisplayMode> {
        let mut settings = DEVMODEW {
            dmSize: size_of::<DEVMODEW>() as u16,
            dmDriverExtra: 0,
            ..Default::default()
        };

        let ok = unsafe {
            EnumDisplaySettingsExW(
                PCWSTR(self.0.DeviceName.as_ptr()),
                ENUM_CURRENT_SETTINGS,
                &mut settings,
                ENUM_DISPLAY_SETTINGS_FLAGS(0),
            )
        };
        if !ok.as_bool() {
            return None;
        }

        // dmPosition and dmDisplayOrientation live in the display half of the union.
        let (position, orientation) = unsafe {
            let display = settings.Anonymous1.Anonymous2;
            (display.dmPosition, display.dmDisplayOrientation.0)
        };

        Some(DisplayMode {
            x: position.x,
            y: position.y,
            width: settings.dmPelsWidth,
            height: settings.dmPelsHeight,
            refresh_rate: settings.dmDisplayFrequency,
            orientation: Orientation::from_raw(orientation),
        })
    }
}

fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}
