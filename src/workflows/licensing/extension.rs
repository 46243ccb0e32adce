use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ApplicationId, FellingStatus};
use super::error::ScanError;
use super::records::ExtensionRecord;
use super::repository::{ApplicationRepository, CancellationFlag, Clock};

/// Periodic scan that pushes out the final action date of applications
/// approaching it, once per application.
pub struct DeadlineExtensionScanner<R, C> {
    repository: Arc<R>,
    clock: Arc<C>,
}

/// Result of one extension scan: the records staged and committed, plus the
/// applications rejected for missing history.
#[derive(Debug, Default)]
pub struct ExtensionOutcome {
    pub records: Vec<ExtensionRecord>,
    pub rejected: Vec<RejectedExtension>,
}

/// Per-application validation failure isolated from the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedExtension {
    pub application_id: ApplicationId,
    pub application_reference: String,
    pub reason: String,
}

impl<R, C> DeadlineExtensionScanner<R, C>
where
    R: ApplicationRepository,
    C: Clock,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Extend every application whose final action date falls within
    /// `period_before_threshold` of now.
    ///
    /// Mutations are staged in memory and persisted through a single
    /// unit-of-work commit; on any `Err` nothing is durable and the returned
    /// records must not be acted on. An application without a `Submitted`
    /// history event cannot produce a valid record: it is excluded from both
    /// the records and the staged set and reported in
    /// [`ExtensionOutcome::rejected`] instead of aborting the batch.
    pub async fn apply_extensions(
        &self,
        extension_length: Duration,
        period_before_threshold: Duration,
        cancel: &CancellationFlag,
    ) -> Result<ExtensionOutcome, ScanError> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let now = self.clock.now();
        let matched = self
            .repository
            .approaching_final_action_date(now, now + period_before_threshold)
            .await?;

        let mut outcome = ExtensionOutcome::default();
        let mut staged = Vec::new();

        for mut application in matched {
            // The query contract already excludes extended rows; a row that
            // slips through must still never be re-extended.
            if application.final_action_date_extended {
                continue;
            }
            let Some(current_deadline) = application.final_action_date else {
                continue;
            };

            let Some(submitted) =
                application.latest_event_with_status(FellingStatus::Submitted)
            else {
                warn!(
                    application = %application.id,
                    reference = %application.reference,
                    "skipping extension: no submitted status event in history"
                );
                outcome.rejected.push(RejectedExtension {
                    application_id: application.id.clone(),
                    application_reference: application.reference.clone(),
                    reason: ScanError::MissingSubmission {
                        application: application.id.clone(),
                        reference: application.reference.clone(),
                    }
                    .to_string(),
                });
                continue;
            };

            let new_final_action_date = current_deadline + extension_length;
            outcome.records.push(ExtensionRecord {
                application_id: application.id.clone(),
                application_reference: application.reference.clone(),
                assigned_user_ids: application.assigned_user_ids.clone(),
                created_by: application.created_by.clone(),
                submission_date: submitted.occurred_at,
                woodland_owner_id: application.woodland_owner_id.clone(),
                admin_hub_name: application.admin_hub_name.clone(),
                extension_length_days: extension_length.num_days(),
                new_final_action_date,
            });

            application.final_action_date = Some(new_final_action_date);
            application.final_action_date_extended = true;
            staged.push(application);
        }

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        if !staged.is_empty() {
            self.repository.commit(staged).await?;
        }

        info!(
            extended = outcome.records.len(),
            rejected = outcome.rejected.len(),
            "deadline extension scan complete"
        );
        Ok(outcome)
    }
}
