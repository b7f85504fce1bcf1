use crate::{DisplayDevice, DisplayError, DisplayMode, DisplaySource, Result, VirtualScreen};

/// Stand-in for platforms where source ids are matched to screens by the
/// host itself. Every lookup fails and the virtual desktop reads as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDisplaySource;

impl UnsupportedDisplaySource {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySource for UnsupportedDisplaySource {
    fn virtual_screen(&self) -> VirtualScreen {
        VirtualScreen::default()
    }

    fn current_mode(&self, _index: u32) -> Result<DisplayMode> {
        Err(DisplayError::UnsupportedPlatform)
    }

    fn devices(&self) -> Result<Vec<DisplayDevice>> {
        Err(DisplayError::UnsupportedPlatform)
    }
}
