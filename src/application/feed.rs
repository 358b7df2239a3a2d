//! Publication of cycle reports.

use std::sync::Arc;

use tokio::sync::watch;

use super::report::CycleReport;
use crate::domain::ScoredOpportunity;

/// Read handle on the most recent cycle report.
///
/// Cheap to clone. Each published report fully replaces the previous one.
#[derive(Debug, Clone)]
pub struct OpportunityFeed {
    rx: watch::Receiver<Arc<CycleReport>>,
}

/// Write side of the feed, owned by the detector.
#[derive(Debug)]
pub(crate) struct FeedPublisher {
    tx: watch::Sender<Arc<CycleReport>>,
}

pub(crate) fn channel() -> (FeedPublisher, OpportunityFeed) {
    let (tx, rx) = watch::channel(Arc::new(CycleReport::empty()));
    (FeedPublisher { tx }, OpportunityFeed { rx })
}

impl FeedPublisher {
    pub(crate) fn publish(&self, report: Arc<CycleReport>) {
        self.tx.send_replace(report);
    }

    pub(crate) fn subscribe(&self) -> OpportunityFeed {
        OpportunityFeed {
            rx: self.tx.subscribe(),
        }
    }
}

impl OpportunityFeed {
    /// The latest report (cycle 0 until the first cycle completes).
    pub fn latest(&self) -> Arc<CycleReport> {
        Arc::clone(&self.rx.borrow())
    }

    /// Ranked opportunities from the latest report.
    pub fn latest_opportunities(&self) -> Vec<ScoredOpportunity> {
        self.rx.borrow().opportunities.clone()
    }

    /// Wait for the next report. Returns `None` once the detector is gone.
    pub async fn changed(&mut self) -> Option<Arc<CycleReport>> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }
}
