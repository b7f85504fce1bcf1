use crate::{InputError, MouseInjector, MouseMove, Result};

#[derive(Debug, Default)]
pub struct UnsupportedInjector;

impl UnsupportedInjector {
    pub fn new() -> Self {
        Self
    }
}

impl MouseInjector for UnsupportedInjector {
    fn inject_move(&mut self, _event: MouseMove) -> Result<u32> {
        Err(InputError::UnsupportedPlatform)
    }
}
