use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use super::domain::{AmendmentReview, AmendmentReviewId, ApplicationId};
use super::error::ScanError;
use super::records::ReminderRecord;
use super::repository::{
    AmendmentReviewRepository, CancellationFlag, Clock, ReminderMark, RepositoryError,
};

/// Two-stage escalation over amendment reviews: a reminder ahead of the
/// response deadline, then withdrawal candidacy once the deadline passes.
///
/// The two scans are pure detection and never mutate state.
/// [`AmendmentEscalationScanner::mark_reminder_sent`] is the sole mutation
/// path and the sole idempotency gate: the caller invokes it only after the
/// reminder has actually been dispatched, so a crash between detection and
/// dispatch leaves the timestamp unset and the next scan re-detects the
/// review, while a confirmed dispatch can never be repeated.
pub struct AmendmentEscalationScanner<R, C> {
    reviews: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AmendmentEscalationScanner<R, C>
where
    R: AmendmentReviewRepository,
    C: Clock,
{
    pub fn new(reviews: Arc<R>, clock: Arc<C>) -> Self {
        Self { reviews, clock }
    }

    /// Uncompleted reviews inside the reminder window with no reminder
    /// recorded yet.
    pub async fn reminders_due(
        &self,
        reminder_period: Duration,
        cancel: &CancellationFlag,
    ) -> Result<Vec<ReminderRecord>, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let now = self.clock.now();
        let due = self
            .reviews
            .approaching_deadline(reminder_period, now)
            .await?;

        let records: Vec<ReminderRecord> = due
            .into_iter()
            .filter(|review| {
                !review.completed && review.reminder_notification_timestamp.is_none()
            })
            .map(|review| ReminderRecord {
                application_id: review.application_id,
                amendment_review_id: review.id,
                response_deadline: review.response_deadline,
                reminder_period_days: reminder_period.num_days(),
            })
            .collect();

        info!(due = records.len(), "amendment reminder scan complete");
        Ok(records)
    }

    /// Uncompleted reviews whose response deadline has passed, whether or not
    /// a reminder was ever sent. Acting on a candidate is the caller's call.
    pub async fn withdrawal_candidates(
        &self,
        cancel: &CancellationFlag,
    ) -> Result<Vec<AmendmentReview>, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let now = self.clock.now();
        let candidates: Vec<AmendmentReview> = self
            .reviews
            .past_deadline(now)
            .await?
            .into_iter()
            .filter(|review| !review.completed)
            .collect();

        info!(
            candidates = candidates.len(),
            "amendment withdrawal scan complete"
        );
        Ok(candidates)
    }

    /// Record that the reminder for `review_id` was dispatched.
    ///
    /// Conditional at the storage layer: the timestamp is set only if still
    /// unset, so overlapping runs resolve to one [`ReminderMark::Recorded`]
    /// and the rest [`ReminderMark::AlreadyRecorded`]. Fails with
    /// [`ScanError::ReviewNotFound`] when the review does not exist or
    /// belongs to a different application.
    pub async fn mark_reminder_sent(
        &self,
        application_id: &ApplicationId,
        review_id: &AmendmentReviewId,
    ) -> Result<ReminderMark, ScanError> {
        let not_found = || ScanError::ReviewNotFound {
            application: application_id.clone(),
            review: review_id.clone(),
        };

        let review = self.reviews.fetch(review_id).await?.ok_or_else(not_found)?;
        if review.application_id != *application_id {
            return Err(not_found());
        }

        let mark = self
            .reviews
            .record_reminder_if_unset(review_id, self.clock.now())
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => not_found(),
                other => ScanError::Repository(other),
            })?;

        info!(
            application = %application_id,
            review = %review_id,
            already_recorded = matches!(mark, ReminderMark::AlreadyRecorded),
            "amendment reminder recorded"
        );
        Ok(mark)
    }
}
