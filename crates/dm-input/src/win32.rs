use std::mem::size_of;
use tracing::{debug, warn};
use windows::Win32::Foundation::GetLastError;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_MOVE,
    MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT,
};
use crate::{InputError, MouseInjector, MouseMove, Result};

/// Pointer injection through `SendInput`.
#[derive(Debug, Default)]
pub struct WindowsMouseInjector;

impl WindowsMouseInjector {
    pub fn new() -> Self {
        Self
    }
}

impl MouseInjector for WindowsMouseInjector {
    fn inject_move(&mut self, event: MouseMove) -> Result<u32> {
        let mut flags = MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_MOVE;
        if event.flags.virtual_desk {
            flags |= MOUSEEVENTF_VIRTUALDESK;
        }

        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: event.x,
                    dy: event.y,
                    mouseData: 0,
                    dwFlags: flags,
                    // System provides the timestamp
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };

        let sent = unsafe { SendInput(&[input], size_of::<INPUT>() as i32) };

        if sent == 0 {
            let code = unsafe { GetLastError() };
            warn!("SendInput rejected mouse move (error {})", code.0);
            return Err(InputError::InjectionFailed(format!("SendInput failed with error {}", code.0)));
        }

        debug!("Injected absolute move to ({}, {})", event.x, event.y);
        Ok(sent)
    }
}
