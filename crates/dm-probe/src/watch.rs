use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use dm_core::{DisplayBridge, DisplaySource, MouseInjector};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    pub ticks: u64,
    pub changes: u64,
}

/// Polls the desktop layout until `shutdown` resolves, logging every change
/// to the virtual desktop bounds or to the number of active displays.
pub async fn run<D, I, F>(bridge: &DisplayBridge<D, I>, every: Duration, shutdown: F) -> WatchSummary
where
    D: DisplaySource,
    I: MouseInjector,
    F: Future<Output = ()>,
{
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut summary = WatchSummary::default();
    let mut screen = bridge.virtual_screen();
    let mut active = bridge.active_displays().map(|d| d.len()).ok();

    info!("Watching display layout every {:?}, virtual screen: {:?}", every, screen);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                summary.ticks += 1;

                let current = bridge.refresh_virtual_screen();
                if current != screen {
                    info!("Virtual screen changed: {:?} -> {:?}", screen, current);
                    screen = current;
                    summary.changes += 1;
                }

                let count = bridge.active_displays().map(|d| d.len()).ok();
                if count != active {
                    info!("Active displays: {:?} -> {:?}", active, count);
                    active = count;
                    summary.changes += 1;
                }

                debug!("Tick {}", summary.ticks);
            }
        }
    }

    summary
}
