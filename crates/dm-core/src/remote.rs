//! Choosing the display a remote-control session drives, and mapping the
//! remote side's normalized pointer positions onto it.

use tracing::debug;
use dm_display::DisplaySource;
use dm_input::MouseInjector;
use crate::{bridge::DisplayBridge, types::Rect};

/// The display a remote-control session drives.
///
/// `bounds` are in physical desktop pixels, as read from the display's
/// current settings, so no scale factor applies on top of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteTarget {
    pub bounds: Rect,
}

impl RemoteTarget {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Maps a position given as fractions of the shared display (`0.0..=1.0`
    /// on each axis) to desktop pixels, rounded to the nearest pixel.
    pub fn map_normalized(&self, nx: f64, ny: f64) -> (i32, i32) {
        let x = self.bounds.x as f64 + nx * self.bounds.width as f64;
        let y = self.bounds.y as f64 + ny * self.bounds.height as f64;
        (x.round() as i32, y.round() as i32)
    }
}

/// Picks the display behind `source_id`.
///
/// With a single active display that display is used regardless of the id;
/// with several, the id is resolved through the bridge. A display whose
/// origin falls outside the refreshed virtual desktop is stale and selects
/// nothing.
pub fn select_target<D, I>(bridge: &DisplayBridge<D, I>, source_id: &str) -> Option<RemoteTarget>
where
    D: DisplaySource,
    I: MouseInjector,
{
    let displays = match bridge.active_displays() {
        Ok(displays) => displays,
        Err(e) => {
            debug!("Cannot enumerate displays: {}", e);
            return None;
        }
    };

    let bounds = match displays.as_slice() {
        [] => None,
        [only] => only.mode.map(Rect::from),
        _ => bridge.resolve_str(source_id).map(|coords| coords.bounds()),
    }?;

    let screen = bridge.refresh_virtual_screen();
    if !screen.contains(bounds.x, bounds.y) {
        debug!("Display {:?} lies outside virtual screen {:?}", bounds, screen);
        return None;
    }

    debug!("Remote control target for {:?}: {:?}", source_id, bounds);
    Some(RemoteTarget::new(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_display::VirtualScreen;
    use crate::bridge::tests::{mode, FakeDisplays, RecordingInjector};
    use crate::BridgeConfig;

    fn bridge_over(
        screen: VirtualScreen,
        modes: Vec<Option<dm_display::DisplayMode>>,
    ) -> DisplayBridge<FakeDisplays, RecordingInjector> {
        let displays = FakeDisplays::new(screen, modes);
        DisplayBridge::new(displays, RecordingInjector::default(), BridgeConfig::default())
    }

    fn bridge(modes: Vec<Option<dm_display::DisplayMode>>) -> DisplayBridge<FakeDisplays, RecordingInjector> {
        bridge_over(VirtualScreen::new(0, 0, 3840, 1080), modes)
    }

    #[test]
    fn test_no_active_display_selects_nothing() {
        let bridge = bridge(vec![None]);
        assert!(select_target(&bridge, "screen:0:0").is_none());
    }

    #[test]
    fn test_single_display_ignores_source_id() {
        let bridge = bridge(vec![Some(mode(0, 0, 1920, 1080)), None]);
        let target = select_target(&bridge, "garbage").unwrap();
        assert_eq!(target.bounds, Rect { x: 0, y: 0, width: 1920, height: 1080 });
    }

    #[test]
    fn test_multiple_displays_resolve_source_id() {
        let bridge = bridge(vec![Some(mode(0, 0, 1920, 1080)), Some(mode(1920, 0, 1920, 1080))]);

        let target = select_target(&bridge, "screen:1:0").unwrap();
        assert_eq!(target.bounds.x, 1920);

        assert!(select_target(&bridge, "screen:9:0").is_none());
        assert!(select_target(&bridge, "window:1:0").is_none());
    }

    #[test]
    fn test_scaled_display_maps_within_its_physical_bounds() {
        // 150% monitor: the current settings already report physical pixels
        let bridge = bridge_over(
            VirtualScreen::new(0, 0, 4800, 1620),
            vec![Some(mode(0, 0, 1920, 1080)), Some(mode(1920, 0, 2880, 1620))],
        );

        let target = select_target(&bridge, "screen:1:0").unwrap();
        assert_eq!(target.bounds, Rect { x: 1920, y: 0, width: 2880, height: 1620 });

        assert_eq!(target.map_normalized(0.0, 0.0), (1920, 0));
        assert_eq!(target.map_normalized(0.5, 0.5), (3360, 810));
        assert_eq!(target.map_normalized(1.0, 1.0), (4800, 1620));
    }

    #[test]
    fn test_map_normalized_handles_negative_origin() {
        let target = RemoteTarget::new(Rect { x: -1920, y: -100, width: 1920, height: 1080 });
        assert_eq!(target.map_normalized(0.0, 0.0), (-1920, -100));
        assert_eq!(target.map_normalized(0.25, 0.5), (-1440, 440));
    }

    #[test]
    fn test_display_outside_virtual_screen_selects_nothing() {
        let bridge = bridge_over(
            VirtualScreen::new(0, 0, 1920, 1080),
            vec![Some(mode(0, 0, 1920, 1080)), Some(mode(1920, 0, 1920, 1080))],
        );
        assert!(select_target(&bridge, "screen:0:0").is_some());
        assert!(select_target(&bridge, "screen:1:0").is_none());
    }
}
