use super::*;

/// Extent of the absolute pointer coordinate space used by `SendInput`.
pub const ABSOLUTE_RANGE: i64 = 65536;

/// Converts a virtual-desktop pixel position to the normalized absolute
/// pointer range, relative to `screen`.
///
/// Integer division truncates toward zero. Positions outside the desktop map
/// outside `0..65536` and are left for the OS to clamp. Returns `None` for a
/// degenerate desktop.
pub fn to_absolute(x: i32, y: i32, screen: &VirtualScreen) -> Option<(i32, i32)> {
    if screen.is_degenerate() {
        return None;
    }

    let scale = |coord: i32, min: i32, extent: i32| -> i32 {
        let value = ABSOLUTE_RANGE * (coord as i64 - min as i64) / extent as i64;
        value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    };

    Some((
        scale(x, screen.min_x, screen.width),
        scale(y, screen.min_y, screen.height),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    /// Map the absolute range onto the whole virtual desktop rather than the
    /// primary monitor only.
    pub virtual_desk: bool,
}

impl Default for MoveFlags {
    fn default() -> Self {
        Self { virtual_desk: true }
    }
}

/// An absolute pointer move, already normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseMove {
    pub x: i32,
    pub y: i32,
    pub flags: MoveFlags,
}

impl MouseMove {
    /// Normalizes a desktop pixel position against `screen`.
    pub fn to(x: i32, y: i32, screen: &VirtualScreen, flags: MoveFlags) -> Result<Self> {
        let (x, y) = to_absolute(x, y, screen).ok_or(InputError::DegenerateScreen)?;
        Ok(Self { x, y, flags })
    }
}
