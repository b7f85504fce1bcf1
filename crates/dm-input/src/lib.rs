use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(target_os = "windows")]
mod win32;
#[cfg(not(target_os = "windows"))]
mod unsupported;

pub mod events;
pub use events::*;

pub use dm_display::VirtualScreen;

pub type Result<T> = std::result::Result<T, InputError>;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Platform not supported")]
    UnsupportedPlatform,

    #[error("Injection failed: {0}")]
    InjectionFailed(String),

    #[error("Virtual screen has no area")]
    DegenerateScreen,
}

/// Trait for platform-specific pointer injection
pub trait MouseInjector: Send + Sync {
    /// Injects one absolute move. Returns the number of events the OS accepted.
    fn inject_move(&mut self, event: MouseMove) -> Result<u32>;
}

// Platform selection at compile time
#[cfg(target_os = "windows")]
pub type PlatformInjector = win32::WindowsMouseInjector;

#[cfg(not(target_os = "windows"))]
pub type PlatformInjector = unsupported::UnsupportedInjector;
