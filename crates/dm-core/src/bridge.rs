use std::sync::{Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};
use dm_display::{DisplayDevice, DisplaySource, VirtualScreen};
use dm_input::{MouseInjector, MouseMove, MoveFlags};
use crate::{config::BridgeConfig, error::Result, types::*, BridgeError};

/// Resolves capture sources to desktop geometry and moves the pointer.
///
/// The virtual desktop bounds are cached: every lookup refreshes them, and
/// pointer moves are normalized against whatever the last refresh saw.
pub struct DisplayBridge<D, I> {
    display: D,
    injector: Mutex<I>,
    config: RwLock<BridgeConfig>,
    virtual_screen: RwLock<VirtualScreen>,
    stats: RwLock<BridgeStats>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BridgeStats {
    pub resolves: u64,
    pub resolve_misses: u64,
    pub moves_injected: u64,
    pub moves_failed: u64,
}

impl<D: DisplaySource, I: MouseInjector> DisplayBridge<D, I> {
    pub fn new(display: D, injector: I, config: BridgeConfig) -> Self {
        let virtual_screen = display.virtual_screen();
        info!("Created display bridge, virtual screen: {:?}", virtual_screen);

        Self {
            display,
            injector: Mutex::new(injector),
            config: RwLock::new(config),
            virtual_screen: RwLock::new(virtual_screen),
            stats: RwLock::new(BridgeStats::default()),
        }
    }

    /// Looks up `id`, or `None` if it names no active display.
    pub fn resolve(&self, id: SourceId) -> Option<SourceCoordinates> {
        match self.try_resolve(id) {
            Ok(coords) => Some(coords),
            Err(e) => {
                debug!("Source {} not resolved: {}", id, e);
                None
            }
        }
    }

    /// String form of [`resolve`](Self::resolve); malformed ids resolve to `None`.
    pub fn resolve_str(&self, raw: &str) -> Option<SourceCoordinates> {
        match SourceId::parse(raw) {
            Ok(id) => self.resolve(id),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }

    pub fn try_resolve(&self, id: SourceId) -> Result<SourceCoordinates> {
        // Refresh before the lookup so a failed lookup still updates the cache
        let virtual_screen = self.refresh_virtual_screen();

        let result = self
            .display
            .current_mode(id.index())
            .map(|mode| SourceCoordinates::new(mode, virtual_screen))
            .map_err(BridgeError::from);

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.resolves += 1;
        if result.is_err() {
            stats.resolve_misses += 1;
        }

        result
    }

    /// Moves the pointer to desktop position `(x, y)`. Returns the number of
    /// events injected, zero on any failure.
    pub fn move_mouse(&self, x: i32, y: i32) -> u32 {
        match self.try_move_mouse(x, y) {
            Ok(count) => count,
            Err(e) => {
                debug!("Mouse move to ({}, {}) dropped: {}", x, y, e);
                0
            }
        }
    }

    pub fn try_move_mouse(&self, x: i32, y: i32) -> Result<u32> {
        let input = self.config.read().unwrap_or_else(PoisonError::into_inner).input.clone();
        if !input.mouse_enabled {
            return Err(BridgeError::InputDisabled);
        }

        let screen = self.virtual_screen();
        let flags = MoveFlags { virtual_desk: input.virtual_desk };

        let result = MouseMove::to(x, y, &screen, flags).and_then(|event| {
            self.injector
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .inject_move(event)
        });

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        match &result {
            Ok(count) => stats.moves_injected += *count as u64,
            Err(e) => {
                stats.moves_failed += 1;
                warn!("Mouse move failed: {}", e);
            }
        }

        Ok(result?)
    }

    /// Bounds used by the next pointer move.
    pub fn virtual_screen(&self) -> VirtualScreen {
        *self.virtual_screen.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn refresh_virtual_screen(&self) -> VirtualScreen {
        let screen = self.display.virtual_screen();
        let mut cached = self.virtual_screen.write().unwrap_or_else(PoisonError::into_inner);
        if *cached != screen {
            debug!("Virtual screen changed: {:?} -> {:?}", *cached, screen);
        }
        *cached = screen;
        screen
    }

    /// Every enumerated device, active or not.
    pub fn displays(&self) -> Result<Vec<DisplayDevice>> {
        Ok(self.display.devices()?)
    }

    pub fn active_displays(&self) -> Result<Vec<DisplayDevice>> {
        Ok(self.display.active_devices()?)
    }

    pub fn update_config(&self, new_config: BridgeConfig) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        info!("Updating configuration");
        *config = new_config;
    }

    pub fn get_stats(&self) -> BridgeStats {
        self.stats.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use dm_display::{DisplayError, DisplayMode, Orientation};
    use dm_input::InputError;
    use crate::InputConfig;

    /// Displays keyed by enumeration index; `None` entries are inactive.
    pub(crate) struct FakeDisplays {
        pub screens: Vec<VirtualScreen>,
        pub queries: Arc<AtomicUsize>,
        pub modes: Vec<Option<DisplayMode>>,
    }

    impl FakeDisplays {
        pub(crate) fn new(screen: VirtualScreen, modes: Vec<Option<DisplayMode>>) -> Self {
            Self {
                screens: vec![screen],
                queries: Arc::new(AtomicUsize::new(0)),
                modes,
            }
        }

        /// Successive `virtual_screen` calls walk through `screens`, then stick on the last.
        pub(crate) fn changing(screens: Vec<VirtualScreen>, modes: Vec<Option<DisplayMode>>) -> Self {
            Self {
                screens,
                queries: Arc::new(AtomicUsize::new(0)),
                modes,
            }
        }
    }

    impl DisplaySource for FakeDisplays {
        fn virtual_screen(&self) -> VirtualScreen {
            let n = self.queries.fetch_add(1, Ordering::SeqCst);
            self.screens[n.min(self.screens.len() - 1)]
        }

        fn current_mode(&self, index: u32) -> dm_display::Result<DisplayMode> {
            match self.modes.get(index as usize) {
                None => Err(DisplayError::NotFound(index)),
                Some(None) => Err(DisplayError::Inactive(index)),
                Some(Some(mode)) => Ok(*mode),
            }
        }

        fn devices(&self) -> dm_display::Result<Vec<DisplayDevice>> {
            Ok(self
                .modes
                .iter()
                .enumerate()
                .map(|(i, mode)| DisplayDevice {
                    index: i as u32,
                    name: format!("\\\\.\\DISPLAY{}", i + 1),
                    description: "Fake".into(),
                    active: mode.is_some(),
                    primary: i == 0,
                    mode: *mode,
                })
                .collect())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingInjector {
        pub events: Arc<Mutex<Vec<MouseMove>>>,
        pub fail: bool,
    }

    impl MouseInjector for RecordingInjector {
        fn inject_move(&mut self, event: MouseMove) -> dm_input::Result<u32> {
            if self.fail {
                return Err(InputError::InjectionFailed("rejected".into()));
            }
            self.events.lock().unwrap().push(event);
            Ok(1)
        }
    }

    pub(crate) fn mode(x: i32, y: i32, width: u32, height: u32) -> DisplayMode {
        DisplayMode { x, y, width, height, refresh_rate: 60, orientation: Orientation::Landscape }
    }

    /// Secondary 2560x1440 monitor left of a 1920x1080 primary, with an
    /// inactive third output.
    fn dual_left() -> (FakeDisplays, VirtualScreen) {
        let screen = VirtualScreen::new(-2560, 0, 4480, 1440);
        let displays = FakeDisplays::new(
            screen,
            vec![Some(mode(0, 0, 1920, 1080)), Some(mode(-2560, 0, 2560, 1440)), None],
        );
        (displays, screen)
    }

    #[test]
    fn test_resolve_returns_position_size_and_desktop() {
        let (displays, screen) = dual_left();
        let bridge = DisplayBridge::new(displays, RecordingInjector::default(), BridgeConfig::default());

        let coords = bridge.resolve(SourceId(1)).unwrap();
        assert_eq!((coords.x, coords.y), (-2560, 0));
        assert_eq!((coords.width, coords.height), (2560, 1440));
        assert_eq!(coords.virtual_screen, screen);
    }

    #[test]
    fn test_resolve_misses_out_of_range_and_inactive() {
        let (displays, _) = dual_left();
        let bridge = DisplayBridge::new(displays, RecordingInjector::default(), BridgeConfig::default());

        assert!(bridge.resolve(SourceId(2)).is_none());
        assert!(bridge.resolve(SourceId(7)).is_none());
        assert!(matches!(
            bridge.try_resolve(SourceId(2)),
            Err(BridgeError::Display(DisplayError::Inactive(2)))
        ));

        let stats = bridge.get_stats();
        assert_eq!(stats.resolves, 3);
        assert_eq!(stats.resolve_misses, 3);
    }

    #[test]
    fn test_resolve_str_parses_capture_ids() {
        let (displays, _) = dual_left();
        let bridge = DisplayBridge::new(displays, RecordingInjector::default(), BridgeConfig::default());

        assert_eq!(bridge.resolve_str("screen:1:0").map(|c| c.x), Some(-2560));
        assert_eq!(bridge.resolve_str("0:0").map(|c| c.x), Some(0));
        assert!(bridge.resolve_str("foo").is_none());
        assert!(bridge.resolve_str("").is_none());
    }

    #[test]
    fn test_every_resolve_refreshes_cache_even_on_miss() {
        let before = VirtualScreen::new(0, 0, 1920, 1080);
        let after = VirtualScreen::new(-1280, 0, 3200, 1080);
        let displays = FakeDisplays::changing(vec![before, after], vec![Some(mode(0, 0, 1920, 1080))]);
        let queries = displays.queries.clone();
        let bridge = DisplayBridge::new(displays, RecordingInjector::default(), BridgeConfig::default());

        assert_eq!(bridge.virtual_screen(), before);
        assert!(bridge.resolve(SourceId(5)).is_none());
        assert_eq!(bridge.virtual_screen(), after);

        bridge.resolve(SourceId(0));
        assert_eq!(queries.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_move_mouse_normalizes_against_cache() {
        let (displays, _) = dual_left();
        let injector = RecordingInjector::default();
        let events = injector.events.clone();
        let bridge = DisplayBridge::new(displays, injector, BridgeConfig::default());

        // Centre of the primary monitor
        assert_eq!(bridge.move_mouse(960, 540), 1);

        let sent = events.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].x, (65536i64 * (960 + 2560) / 4480) as i32);
        assert_eq!(sent[0].y, (65536i64 * 540 / 1440) as i32);
        assert!(sent[0].flags.virtual_desk);
    }

    #[test]
    fn test_move_mouse_uses_stale_cache_until_next_resolve() {
        let before = VirtualScreen::new(0, 0, 1920, 1080);
        let after = VirtualScreen::new(0, 0, 3840, 1080);
        let displays = FakeDisplays::changing(vec![before, after], vec![Some(mode(0, 0, 1920, 1080))]);
        let injector = RecordingInjector::default();
        let events = injector.events.clone();
        let bridge = DisplayBridge::new(displays, injector, BridgeConfig::default());

        bridge.move_mouse(960, 0);
        bridge.resolve(SourceId(0));
        bridge.move_mouse(960, 0);

        let sent = events.lock().unwrap();
        assert_eq!(sent[0].x, 32768);
        assert_eq!(sent[1].x, 16384);
    }

    #[test]
    fn test_move_mouse_failure_returns_zero() {
        let (displays, _) = dual_left();
        let injector = RecordingInjector { fail: true, ..Default::default() };
        let bridge = DisplayBridge::new(displays, injector, BridgeConfig::default());

        assert_eq!(bridge.move_mouse(10, 10), 0);
        assert_eq!(bridge.get_stats().moves_failed, 1);
    }

    #[test]
    fn test_move_mouse_on_degenerate_desktop_returns_zero() {
        let displays = FakeDisplays::new(VirtualScreen::default(), vec![]);
        let injector = RecordingInjector::default();
        let events = injector.events.clone();
        let bridge = DisplayBridge::new(displays, injector, BridgeConfig::default());

        assert_eq!(bridge.move_mouse(10, 10), 0);
        assert!(matches!(
            bridge.try_move_mouse(10, 10),
            Err(BridgeError::Input(InputError::DegenerateScreen))
        ));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_mouse_injects_nothing() {
        let (displays, _) = dual_left();
        let injector = RecordingInjector::default();
        let events = injector.events.clone();
        let bridge = DisplayBridge::new(displays, injector, BridgeConfig::default());

        bridge.update_config(BridgeConfig {
            input: InputConfig { mouse_enabled: false, virtual_desk: true },
        });

        assert_eq!(bridge.move_mouse(0, 0), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_virtual_desk_flag_follows_config() {
        let (displays, _) = dual_left();
        let injector = RecordingInjector::default();
        let events = injector.events.clone();
        let config = BridgeConfig {
            input: InputConfig { mouse_enabled: true, virtual_desk: false },
        };
        let bridge = DisplayBridge::new(displays, injector, config);

        bridge.move_mouse(0, 0);
        assert!(!events.lock().unwrap()[0].flags.virtual_desk);
    }

    #[test]
    fn test_active_displays_skip_inactive() {
        let (displays, _) = dual_left();
        let bridge = DisplayBridge::new(displays, RecordingInjector::default(), BridgeConfig::default());

        let active = bridge.active_displays().unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(bridge.displays().unwrap().len(), 3);
    }
}
