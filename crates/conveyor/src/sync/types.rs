//! Shared sync values used by every domain adapter and the scheduler.

use chrono::{DateTime, Duration, Utc};

/// Default number of legacy records fetched per batch.
pub const DEFAULT_BATCH_SIZE: u64 = 1000;

/// Outcome of one per-record sync attempt.
///
/// Record-level errors are not an outcome; they surface as `Err` from the
/// per-record path and are tallied as failed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new target row was written.
    Synced,
    /// The target row already existed (natural-key hit).
    Skipped,
    /// The owning entity has no counterpart in the target yet. Expected and
    /// transient; the owner domain is scheduled ahead of its dependents.
    Unmapped,
}

/// Running counters for one migration or incremental pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunTally {
    pub synced: u64,
    pub skipped: u64,
    pub unmapped: u64,
    pub failed: u64,
}

impl RunTally {
    /// Record a per-record outcome.
    pub fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Synced => self.synced += 1,
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::Unmapped => self.unmapped += 1,
        }
    }

    /// Record a per-record failure.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Fold the tally into a [`SyncResult`].
    ///
    /// Unmapped and failed both mean "could not converge this run", so they
    /// are unioned into the result's failed count; a run is a success only
    /// when both are zero.
    pub fn into_result(
        self,
        domain: &str,
        started_at: DateTime<Utc>,
    ) -> SyncResult {
        let not_converged = self.unmapped + self.failed;
        if not_converged == 0 {
            SyncResult::success(domain, self.synced, self.skipped, started_at)
        } else {
            SyncResult::partial(
                domain,
                self.synced,
                self.skipped,
                not_converged,
                started_at,
                format!(
                    "{} records did not converge ({} unmapped, {} failed)",
                    not_converged, self.unmapped, self.failed
                ),
            )
        }
    }
}

/// Immutable outcome of one sync execution (initial or incremental) for one
/// domain. Produced once per run; the sole input for status-store updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Domain this run belonged to.
    pub domain: String,
    /// Records written to the target.
    pub synced_count: u64,
    /// Records already present at the target.
    pub skipped_count: u64,
    /// Records that did not converge (unmapped + failed).
    pub failed_count: u64,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run completed. Becomes the domain's checkpoint on success.
    pub completed_at: DateTime<Utc>,
    /// Error summary, None on a clean run.
    pub error_message: Option<String>,
}

impl SyncResult {
    /// A clean run: every processed record converged.
    pub fn success(
        domain: &str,
        synced_count: u64,
        skipped_count: u64,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: domain.to_string(),
            synced_count,
            skipped_count,
            failed_count: 0,
            started_at,
            completed_at: Utc::now(),
            error_message: None,
        }
    }

    /// A run that completed but left some records unconverged.
    pub fn partial(
        domain: &str,
        synced_count: u64,
        skipped_count: u64,
        failed_count: u64,
        started_at: DateTime<Utc>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.to_string(),
            synced_count,
            skipped_count,
            failed_count,
            started_at,
            completed_at: Utc::now(),
            error_message: Some(error_message.into()),
        }
    }

    /// A run that aborted before producing real counters (run-level failure).
    /// Synthesized by the scheduler so the status row is never silently
    /// stale.
    pub fn failure(domain: &str, started_at: DateTime<Utc>, error_message: impl Into<String>) -> Self {
        Self {
            domain: domain.to_string(),
            synced_count: 0,
            skipped_count: 0,
            failed_count: 0,
            started_at,
            completed_at: Utc::now(),
            error_message: Some(error_message.into()),
        }
    }

    /// True iff nothing failed and no error was recorded.
    pub fn is_successful(&self) -> bool {
        self.failed_count == 0 && self.error_message.is_none()
    }

    /// Total records this run looked at.
    pub fn total_processed(&self) -> u64 {
        self.synced_count + self.skipped_count + self.failed_count
    }

    /// Wall-clock duration of the run.
    pub fn duration(&self) -> Duration {
        self.completed_at - self.started_at
    }
}
