//! Polling loop.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::application::{CycleReport, Detector};

/// Run detection cycles until `shutdown` flips to `true` or its sender is
/// dropped.
///
/// Cycles never overlap: the next one starts on the first poll tick after
/// the previous report was published. A shutdown request abandons an
/// in-flight cycle. `on_report` sees every published report.
pub async fn run_with_shutdown<F>(
    detector: Arc<Detector>,
    mut shutdown: watch::Receiver<bool>,
    mut on_report: F,
) where
    F: FnMut(&CycleReport),
{
    let poll = detector.config().poll_interval();
    info!(
        symbols = detector.symbols().len(),
        poll_secs = poll.as_secs(),
        "Starting detection loop"
    );

    let mut ticker = interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    info!("Shutdown signal received");
                    break;
                }
            }
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    result = shutdown.changed() => {
                        if result.is_err() || *shutdown.borrow() {
                            info!("Shutdown signal received during cycle");
                            break;
                        }
                    }
                    report = detector.run_cycle() => on_report(&report),
                }
            }
        }
    }
}
