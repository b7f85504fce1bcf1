pub mod bridge;
pub mod config;
pub mod error;
pub mod remote;
pub mod types;

pub use bridge::{BridgeStats, DisplayBridge};
pub use config::{BridgeConfig, InputConfig};
pub use error::{BridgeError, Result};
pub use remote::{select_target, RemoteTarget};
pub use types::{Rect, SourceCoordinates, SourceId};

// Re-export for convenience
pub use dm_display::{
    DisplayDevice, DisplayError, DisplayMode, DisplaySource, Orientation, PlatformDisplaySource,
    VirtualScreen,
};
pub use dm_input::{InputError, MouseInjector, MouseMove, MoveFlags, PlatformInjector};
