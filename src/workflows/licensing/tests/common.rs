use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::licensing::domain::{
    AmendmentReview, AmendmentReviewId, ApplicationId, FellingApplication, FellingStatus,
    StatusEvent, UserId,
};
use crate::workflows::licensing::repository::{
    AmendmentReviewRepository, ApplicationRepository, Clock, ReminderMark, RepositoryError,
};

pub(super) fn day_zero() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().expect("valid datetime")
}

pub(super) fn days(count: i64) -> Duration {
    Duration::days(count)
}

pub(super) fn event(status: FellingStatus, at: DateTime<Utc>) -> StatusEvent {
    StatusEvent {
        status,
        occurred_at: at,
    }
}

pub(super) fn application(suffix: &str) -> FellingApplication {
    let t0 = day_zero();
    FellingApplication {
        id: ApplicationId(format!("app-{suffix}")),
        reference: format!("FLA/2026/{suffix}"),
        property_name: Some("Thornbury Coppice".to_string()),
        final_action_date: Some(t0 + days(60)),
        final_action_date_extended: false,
        status_history: vec![
            event(FellingStatus::Draft, t0 - days(3)),
            event(FellingStatus::Submitted, t0),
            event(FellingStatus::AdminOfficerReview, t0 + days(2)),
        ],
        created_by: UserId(format!("user-{suffix}")),
        woodland_owner_id: UserId(format!("owner-{suffix}")),
        assigned_user_ids: vec![UserId("officer-1".to_string()), UserId("officer-2".to_string())],
        admin_hub_name: "Bucks Horn Oak".to_string(),
        administrative_region: "South East".to_string(),
    }
}

pub(super) fn review(suffix: &str, deadline: DateTime<Utc>) -> AmendmentReview {
    AmendmentReview {
        id: AmendmentReviewId(format!("rev-{suffix}")),
        application_id: ApplicationId(format!("app-{suffix}")),
        response_deadline: deadline,
        reminder_notification_timestamp: None,
        completed: false,
    }
}

/// Deterministic clock pinned to one instant.
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory application store exercising the unit-of-work contract.
#[derive(Default)]
pub(super) struct MemoryApplications {
    pub(super) records: Mutex<HashMap<ApplicationId, FellingApplication>>,
    pub(super) notified: Mutex<Vec<ApplicationId>>,
    pub(super) fail_commit: Mutex<bool>,
}

impl MemoryApplications {
    pub(super) fn with_population(
        applications: impl IntoIterator<Item = FellingApplication>,
    ) -> Arc<Self> {
        let store = Self::default();
        {
            let mut records = store.records.lock().expect("repository mutex poisoned");
            for application in applications {
                records.insert(application.id.clone(), application);
            }
        }
        Arc::new(store)
    }

    pub(super) fn fail_next_commit(&self) {
        *self.fail_commit.lock().expect("repository mutex poisoned") = true;
    }

    pub(super) fn stored(&self, id: &ApplicationId) -> FellingApplication {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .expect("application present")
    }

    fn current_status(application: &FellingApplication) -> Option<FellingStatus> {
        application
            .status_history
            .iter()
            .max_by_key(|event| event.occurred_at)
            .map(|event| event.status)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplications {
    async fn approaching_final_action_date(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<FellingApplication>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        Ok(records
            .values()
            .filter(|application| !application.final_action_date_extended)
            .filter(|application| {
                application
                    .final_action_date
                    .is_some_and(|date| date >= window_start && date <= window_end)
            })
            .cloned()
            .collect())
    }

    async fn awaiting_applicant_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<FellingApplication>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let notified = self.notified.lock().expect("repository mutex poisoned");
        Ok(records
            .values()
            .filter(|application| !notified.contains(&application.id))
            .filter(|application| {
                Self::current_status(application).is_some_and(FellingStatus::awaiting_applicant)
            })
            .filter(|application| {
                application
                    .latest_awaiting_applicant_event()
                    .is_some_and(|event| event.occurred_at <= cutoff)
            })
            .cloned()
            .collect())
    }

    async fn commit(&self, staged: Vec<FellingApplication>) -> Result<(), RepositoryError> {
        let mut fail = self.fail_commit.lock().expect("repository mutex poisoned");
        if *fail {
            *fail = false;
            return Err(RepositoryError::CommitFailed("storage offline".to_string()));
        }
        let mut records = self.records.lock().expect("repository mutex poisoned");
        for application in staged {
            records.insert(application.id.clone(), application);
        }
        Ok(())
    }
}

/// In-memory amendment review store with a compare-and-set reminder marker.
#[derive(Default)]
pub(super) struct MemoryReviews {
    pub(super) records: Mutex<HashMap<AmendmentReviewId, AmendmentReview>>,
}

impl MemoryReviews {
    pub(super) fn with_reviews(
        reviews: impl IntoIterator<Item = AmendmentReview>,
    ) -> Arc<Self> {
        let store = Self::default();
        {
            let mut records = store.records.lock().expect("review mutex poisoned");
            for review in reviews {
                records.insert(review.id.clone(), review);
            }
        }
        Arc::new(store)
    }

    pub(super) fn stored(&self, id: &AmendmentReviewId) -> AmendmentReview {
        self.records
            .lock()
            .expect("review mutex poisoned")
            .get(id)
            .cloned()
            .expect("review present")
    }
}

#[async_trait]
impl AmendmentReviewRepository for MemoryReviews {
    async fn approaching_deadline(
        &self,
        reminder_period: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<AmendmentReview>, RepositoryError> {
        let records = self.records.lock().expect("review mutex poisoned");
        Ok(records
            .values()
            .filter(|review| !review.completed)
            .filter(|review| review.reminder_notification_timestamp.is_none())
            .filter(|review| now >= review.response_deadline - reminder_period)
            .cloned()
            .collect())
    }

    async fn past_deadline(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AmendmentReview>, RepositoryError> {
        let records = self.records.lock().expect("review mutex poisoned");
        Ok(records
            .values()
            .filter(|review| !review.completed)
            .filter(|review| now >= review.response_deadline)
            .cloned()
            .collect())
    }

    async fn fetch(
        &self,
        id: &AmendmentReviewId,
    ) -> Result<Option<AmendmentReview>, RepositoryError> {
        let records = self.records.lock().expect("review mutex poisoned");
        Ok(records.get(id).cloned())
    }

    async fn record_reminder_if_unset(
        &self,
        id: &AmendmentReviewId,
        sent_at: DateTime<Utc>,
    ) -> Result<ReminderMark, RepositoryError> {
        let mut records = self.records.lock().expect("review mutex poisoned");
        let review = records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if review.reminder_notification_timestamp.is_some() {
            return Ok(ReminderMark::AlreadyRecorded);
        }
        review.reminder_notification_timestamp = Some(sent_at);
        Ok(ReminderMark::Recorded)
    }
}

/// Application store that always refuses queries.
pub(super) struct UnavailableApplications;

#[async_trait]
impl ApplicationRepository for UnavailableApplications {
    async fn approaching_final_action_date(
        &self,
        _window_start: DateTime<Utc>,
        _window_end: DateTime<Utc>,
    ) -> Result<Vec<FellingApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn awaiting_applicant_since(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<Vec<FellingApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn commit(&self, _staged: Vec<FellingApplication>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
