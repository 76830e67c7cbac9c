//! app.rs — top-level flow tying the cache and the acquirer together.
//!
//! Four statuses: `Idle → Loading → {Success, Error}`, and back to
//! `Loading` on a user-triggered refresh. There is no automatic retry and
//! no cancellation; at most one acquisition runs at a time because the
//! flow is sequential.

use tracing::{info, warn};

use crate::acquire::Acquirer;
use crate::cache::ReportCache;
use crate::clock;
use crate::error::AcquireError;
use crate::report::DailyReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

pub struct TrendApp {
    cache: ReportCache,
    acquirer: Acquirer,
    status: FetchStatus,
    report: Option<DailyReport>,
    /// Date key of the report currently held, for the "last updated" line.
    last_updated: Option<String>,
    /// Whether the held report came from the cache rather than the network.
    from_cache: bool,
}

impl TrendApp {
    pub fn new(cache: ReportCache, acquirer: Acquirer) -> Self {
        Self {
            cache,
            acquirer,
            status: FetchStatus::Idle,
            report: None,
            last_updated: None,
            from_cache: false,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn report(&self) -> Option<&DailyReport> {
        self.report.as_ref()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Mount behavior: serve today's cached report without touching the
    /// network, otherwise fall through to an acquisition.
    pub async fn start(&mut self) -> Result<&DailyReport, AcquireError> {
        let today = clock::today_key();
        if let Some(report) = self.cache.load(&today) {
            info!(date_key = %today, "serving cached daily report");
            self.report = Some(report);
            self.last_updated = Some(today);
            self.from_cache = true;
            self.status = FetchStatus::Success;
            return Ok(self.report.as_ref().expect("report just set"));
        }
        self.refresh().await
    }

    /// User-triggered refresh: always acquires. A failure leaves any
    /// previously held report and the cached copy of a prior success
    /// untouched; the user retries manually.
    pub async fn refresh(&mut self) -> Result<&DailyReport, AcquireError> {
        self.status = FetchStatus::Loading;
        match self.acquirer.acquire().await {
            Ok(report) => {
                let today = clock::today_key();
                if let Err(e) = self.cache.store(&today, &report) {
                    // A persist failure degrades the next run, not this one.
                    warn!(error = %e, "failed to persist daily report");
                }
                self.report = Some(report);
                self.last_updated = Some(today);
                self.from_cache = false;
                self.status = FetchStatus::Success;
                Ok(self.report.as_ref().expect("report just set"))
            }
            Err(e) => {
                self.status = FetchStatus::Error;
                Err(e)
            }
        }
    }
}
