use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use super::error::ScanError;
use super::records::WithdrawalRecord;
use super::repository::{ApplicationRepository, CancellationFlag, Clock};

/// Periodic scan that detects applications left with the applicant past the
/// voluntary-withdrawal threshold.
///
/// Read-mostly: the scan never marks anything as notified. The caller marks
/// applications once dispatch has actually succeeded, so a crash between
/// detection and dispatch re-detects the same candidates on the next run.
pub struct WithdrawalThresholdScanner<R, C> {
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> WithdrawalThresholdScanner<R, C>
where
    R: ApplicationRepository,
    C: Clock,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Applications whose latest entry into the awaiting-applicant family is
    /// at or before `now - threshold` and that are not yet notified.
    ///
    /// `with_applicant_date` on each record is the latest awaiting-applicant
    /// timestamp in the history; simultaneous family events are
    /// interchangeable, so any one of them is acceptable.
    pub async fn find_withdrawal_candidates(
        &self,
        threshold: Duration,
        cancel: &CancellationFlag,
    ) -> Result<Vec<WithdrawalRecord>, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let now = self.clock.now();
        let candidates = self
            .repository
            .awaiting_applicant_since(now - threshold)
            .await?;

        let mut records = Vec::with_capacity(candidates.len());
        for application in candidates {
            let Some(entered) = application.latest_awaiting_applicant_event() else {
                // Query contract guarantees a family event; a row without one
                // is a data-integrity fault, not grounds to fail the scan.
                warn!(
                    application = %application.id,
                    reference = %application.reference,
                    "skipping withdrawal candidate: no awaiting-applicant event in history"
                );
                continue;
            };

            records.push(WithdrawalRecord {
                application_id: application.id.clone(),
                application_reference: application.reference.clone(),
                property_name: application.property_name.clone(),
                created_by: application.created_by.clone(),
                with_applicant_date: entered.occurred_at,
                woodland_owner_id: application.woodland_owner_id.clone(),
                notification_date_sent: now,
                administrative_region: application.administrative_region.clone(),
            });
        }

        info!(candidates = records.len(), "withdrawal threshold scan complete");
        Ok(records)
    }
}
