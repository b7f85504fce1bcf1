use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint};
use std::sync::OnceLock;

use dm_core::{
    BridgeConfig, BridgeError, DisplayBridge, DisplayError, DisplaySource, InputConfig,
    MouseInjector, PlatformDisplaySource, PlatformInjector, SourceCoordinates, SourceId,
    VirtualScreen,
};

// Initialize logging once
static INIT: std::sync::Once = std::sync::Once::new();

static BRIDGE: OnceLock<DisplayBridge<PlatformDisplaySource, PlatformInjector>> = OnceLock::new();

fn init_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        // The host may already own the global subscriber
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

fn bridge() -> &'static DisplayBridge<PlatformDisplaySource, PlatformInjector> {
    BRIDGE.get_or_init(|| {
        DisplayBridge::new(
            PlatformDisplaySource::new(),
            PlatformInjector::new(),
            BridgeConfig::default(),
        )
    })
}

// ============================================
// C-Compatible Types
// ============================================

/// Status codes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmStatus {
    Success = 0,
    NotFound = 1,
    InvalidSourceId = 2,
    NullPointer = 3,
    Unsupported = 4,
}

impl From<&BridgeError> for DmStatus {
    fn from(e: &BridgeError) -> Self {
        match e {
            BridgeError::Display(DisplayError::UnsupportedPlatform) => DmStatus::Unsupported,
            BridgeError::InvalidSourceId(_) => DmStatus::InvalidSourceId,
            _ => DmStatus::NotFound,
        }
    }
}

/// Virtual desktop bounding box
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DmVirtualScreen {
    pub width: c_int,
    pub height: c_int,
    pub min_x: c_int,
    pub min_y: c_int,
}

impl From<VirtualScreen> for DmVirtualScreen {
    fn from(s: VirtualScreen) -> Self {
        Self {
            width: s.width,
            height: s.height,
            min_x: s.min_x,
            min_y: s.min_y,
        }
    }
}

/// Position and size of a capture source on the virtual desktop
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DmSourceCoordinates {
    pub x: c_int,
    pub y: c_int,
    pub width: c_uint,
    pub height: c_uint,
    pub virtual_screen: DmVirtualScreen,
}

impl From<SourceCoordinates> for DmSourceCoordinates {
    fn from(c: SourceCoordinates) -> Self {
        Self {
            x: c.x,
            y: c.y,
            width: c.width,
            height: c.height,
            virtual_screen: c.virtual_screen.into(),
        }
    }
}

/// Configuration struct
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DmConfig {
    pub mouse_enabled: c_int,
    pub virtual_desk: c_int,
}

impl Default for DmConfig {
    fn default() -> Self {
        Self {
            mouse_enabled: 1,
            virtual_desk: 1,
        }
    }
}

impl From<DmConfig> for BridgeConfig {
    fn from(c: DmConfig) -> Self {
        BridgeConfig {
            input: InputConfig {
                mouse_enabled: c.mouse_enabled != 0,
                virtual_desk: c.virtual_desk != 0,
            },
        }
    }
}

// ============================================
// Bridge Functions
// ============================================

/// Initialize logging (optional, call once at startup)
#[unsafe(no_mangle)]
pub extern "C" fn dm_init() {
    init_logging();
    tracing::info!("deskmap {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get default configuration
#[unsafe(no_mangle)]
pub extern "C" fn dm_get_default_config() -> DmConfig {
    DmConfig::default()
}

/// Replace the bridge configuration
///
/// # Safety
/// - config must be a valid pointer
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dm_configure(config: *const DmConfig) -> DmStatus {
    if config.is_null() {
        return DmStatus::NullPointer;
    }

    bridge().update_config(unsafe { *config }.into());
    DmStatus::Success
}

fn write_resolved(result: dm_core::Result<SourceCoordinates>, out: &mut DmSourceCoordinates) -> DmStatus {
    match result {
        Ok(coords) => {
            *out = coords.into();
            DmStatus::Success
        }
        Err(e) => {
            tracing::debug!("Source not resolved: {}", e);
            DmStatus::from(&e)
        }
    }
}

/// Parses and resolves a C source id, refreshing the cached bounds even when
/// the id is not valid UTF-8 or fails to parse.
fn resolve_c_str<D, I>(bridge: &DisplayBridge<D, I>, source_id: &CStr) -> dm_core::Result<SourceCoordinates>
where
    D: DisplaySource,
    I: MouseInjector,
{
    let parsed = source_id
        .to_str()
        .map_err(|_| BridgeError::InvalidSourceId(source_id.to_string_lossy().into_owned()))
        .and_then(SourceId::parse);

    match parsed {
        Ok(id) => bridge.try_resolve(id),
        Err(e) => {
            bridge.refresh_virtual_screen();
            Err(e)
        }
    }
}

/// Resolve a capture source id ("screen:1:0", "1:0" or "1") to its display
///
/// Refreshes the cached virtual desktop bounds used by dm_move_mouse().
/// `out` is left untouched unless Success is returned.
///
/// # Safety
/// - source_id must be a valid NUL-terminated string
/// - out must be a valid pointer to store the result
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dm_resolve_source(
    source_id: *const c_char,
    out: *mut DmSourceCoordinates,
) -> DmStatus {
    if out.is_null() {
        return DmStatus::NullPointer;
    }
    if source_id.is_null() {
        bridge().refresh_virtual_screen();
        return DmStatus::NullPointer;
    }

    let result = resolve_c_str(bridge(), unsafe { CStr::from_ptr(source_id) });
    write_resolved(result, unsafe { &mut *out })
}

/// Resolve a display by its enumeration index
///
/// # Safety
/// - out must be a valid pointer to store the result
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dm_resolve_source_index(
    index: c_int,
    out: *mut DmSourceCoordinates,
) -> DmStatus {
    if out.is_null() {
        return DmStatus::NullPointer;
    }

    match SourceId::from_index(index) {
        Some(id) => write_resolved(bridge().try_resolve(id), unsafe { &mut *out }),
        None => {
            bridge().refresh_virtual_screen();
            DmStatus::NotFound
        }
    }
}

/// Move the pointer to virtual desktop position (x, y)
///
/// Returns the number of input events injected: 1 on success, 0 on failure
/// or on platforms without support.
#[unsafe(no_mangle)]
pub extern "C" fn dm_move_mouse(x: c_int, y: c_int) -> c_uint {
    bridge().move_mouse(x, y)
}

/// Get the cached virtual desktop bounds
///
/// # Safety
/// - out must be a valid pointer to store the result
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dm_get_virtual_screen(out: *mut DmVirtualScreen) -> DmStatus {
    if out.is_null() {
        return DmStatus::NullPointer;
    }

    unsafe { *out = bridge().virtual_screen().into() };
    DmStatus::Success
}

// ============================================
// Utility Functions
// ============================================

/// Get message for a status code
///
/// # Safety
/// - The returned string is static and must not be freed
#[unsafe(no_mangle)]
pub extern "C" fn dm_status_string(status: DmStatus) -> *const c_char {
    let msg = match status {
        DmStatus::Success => c"Success",
        DmStatus::NotFound => c"Display not found or inactive",
        DmStatus::InvalidSourceId => c"Invalid source id",
        DmStatus::NullPointer => c"Null pointer",
        DmStatus::Unsupported => c"Platform not supported",
    };

    msg.as_ptr()
}

/// Get library version
///
/// # Safety
/// - The returned string is static and must not be freed
#[unsafe(no_mangle)]
pub extern "C" fn dm_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
