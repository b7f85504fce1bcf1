use tracing::{debug, trace};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};
use crate::{DisplayDevice, DisplayError, DisplayMode, DisplaySource, Result, VirtualScreen};

mod device;

use device::RawDevice;

/// Display enumeration through `EnumDisplayDevicesW` / `EnumDisplaySettingsExW`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32DisplaySource;

impl Win32DisplaySource {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySource for Win32DisplaySource {
    fn virtual_screen(&self) -> VirtualScreen {
        let screen = unsafe {
            VirtualScreen {
                width: GetSystemMetrics(SM_CXVIRTUALSCREEN),
                height: GetSystemMetrics(SM_CYVIRTUALSCREEN),
                min_x: GetSystemMetrics(SM_XVIRTUALSCREEN),
                min_y: GetSystemMetrics(SM_YVIRTUALSCREEN),
            }
        };
        trace!("Virtual screen: {:?}", screen);
        screen
    }

    fn current_mode(&self, index: u32) -> Result<DisplayMode> {
        let device = RawDevice::at(index).ok_or(DisplayError::NotFound(index))?;

        if !device.is_active() {
            debug!("Display {} ({}) is not active", index, device.name());
            return Err(DisplayError::Inactive(index));
        }

        device.current_mode().ok_or_else(|| DisplayError::SettingsUnavailable {
            index,
            name: device.name(),
        })
    }

    fn devices(&self) -> Result<Vec<DisplayDevice>> {
        let mut devices = Vec::new();
        let mut index = 0;

        while let Some(device) = RawDevice::at(index) {
            let active = device.is_active();
            devices.push(DisplayDevice {
                index,
                name: device.name(),
                description: device.description(),
                active,
                primary: device.is_primary(),
                mode: if active { device.current_mode() } else { None },
            });
            index += 1;
        }

        debug!("Enumerated {} display devices", devices.len());
        Ok(devices)
    }
}
