use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::domain::{AmendmentReview, AmendmentReviewId, FellingApplication};

/// Time source injected into every scanner so thresholds can be exercised
/// against a fixed instant in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used by the deployed scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cooperative cancellation handle shared between the scheduler and a running
/// scan.
///
/// Scanners observe the flag on entry and again immediately before the
/// unit-of-work commit; a cancellation seen at either point aborts the scan
/// with nothing persisted, so the whole scan is safe to rerun.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("unit of work commit failed: {0}")]
    CommitFailed(String),
}

/// Storage abstraction over the application population.
///
/// Query methods return detached copies; mutations are staged on those copies
/// and handed back through [`ApplicationRepository::commit`], which persists
/// the whole batch atomically. There is no per-application partial commit: on
/// `Err` nothing staged is durable and the scan can simply be rerun.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Applications whose `final_action_date` falls within
    /// `[window_start, window_end]`, excluding rows already extended and rows
    /// in a status no longer eligible for extension.
    async fn approaching_final_action_date(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<FellingApplication>, RepositoryError>;

    /// Applications currently in the awaiting-applicant status family whose
    /// latest entry into that family is at or before `cutoff`, excluding
    /// applications already notified for this withdrawal cycle.
    async fn awaiting_applicant_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FellingApplication>, RepositoryError>;

    /// Persist the staged batch as one unit of work, all or nothing.
    async fn commit(&self, staged: Vec<FellingApplication>) -> Result<(), RepositoryError>;
}

/// Outcome of the conditional reminder-timestamp write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderMark {
    /// The timestamp was unset and has now been recorded.
    Recorded,
    /// A previous run already recorded it; nothing was overwritten.
    AlreadyRecorded,
}

/// Storage abstraction over amendment reviews.
#[async_trait]
pub trait AmendmentReviewRepository: Send + Sync {
    /// Uncompleted reviews with no reminder recorded whose deadline is within
    /// `reminder_period` of `now` (or already past).
    async fn approaching_deadline(
        &self,
        reminder_period: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<AmendmentReview>, RepositoryError>;

    /// Uncompleted reviews whose response deadline is at or before `now`.
    async fn past_deadline(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AmendmentReview>, RepositoryError>;

    async fn fetch(
        &self,
        id: &AmendmentReviewId,
    ) -> Result<Option<AmendmentReview>, RepositoryError>;

    /// Set `reminder_notification_timestamp` to `sent_at` only if it is still
    /// unset, compare-and-set style.
    ///
    /// Two overlapping scan runs must resolve to one [`ReminderMark::Recorded`]
    /// and one [`ReminderMark::AlreadyRecorded`]; the second writer never
    /// overwrites the first timestamp.
    async fn record_reminder_if_unset(
        &self,
        id: &AmendmentReviewId,
        sent_at: DateTime<Utc>,
    ) -> Result<ReminderMark, RepositoryError>;
}
