use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for felling licence applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for internal and external user accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for amendment reviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmendmentReviewId(pub String);

impl fmt::Display for AmendmentReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status codes tracked throughout the felling licence application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FellingStatus {
    Draft,
    Submitted,
    Received,
    AdminOfficerReview,
    WoodlandOfficerReview,
    WithApplicant,
    ReturnedToApplicant,
    SentForApproval,
    Approved,
    Refused,
    Withdrawn,
}

impl FellingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Received => "Received",
            Self::AdminOfficerReview => "Admin Officer Review",
            Self::WoodlandOfficerReview => "Woodland Officer Review",
            Self::WithApplicant => "With Applicant",
            Self::ReturnedToApplicant => "Returned to Applicant",
            Self::SentForApproval => "Sent for Approval",
            Self::Approved => "Approved",
            Self::Refused => "Refused",
            Self::Withdrawn => "Withdrawn",
        }
    }

    /// Statuses where progress is blocked on the applicant responding.
    pub const fn awaiting_applicant(self) -> bool {
        matches!(self, Self::WithApplicant | Self::ReturnedToApplicant)
    }
}

/// A single entry in an application's append-only status history.
///
/// Events are meaningfully ordered by `occurred_at`; equal timestamps keep
/// their insertion order. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: FellingStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Cumulative dwell time in one status, merged across recurrences.
///
/// Derived per calculation call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDuration {
    pub status: FellingStatus,
    pub duration: Duration,
}

/// Read/write projection of a felling licence application.
///
/// Owned and persisted by the external repository. The scanners mutate only
/// `final_action_date` and `final_action_date_extended`; the status history
/// is read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FellingApplication {
    pub id: ApplicationId,
    pub reference: String,
    pub property_name: Option<String>,
    pub final_action_date: Option<DateTime<Utc>>,
    pub final_action_date_extended: bool,
    pub status_history: Vec<StatusEvent>,
    pub created_by: UserId,
    pub woodland_owner_id: UserId,
    pub assigned_user_ids: Vec<UserId>,
    pub admin_hub_name: String,
    pub administrative_region: String,
}

impl FellingApplication {
    /// Chronologically latest history event carrying `status`, if any.
    ///
    /// Ties on `occurred_at` resolve to the later history entry, which is
    /// acceptable since simultaneous events are semantically interchangeable.
    pub fn latest_event_with_status(&self, status: FellingStatus) -> Option<&StatusEvent> {
        self.status_history
            .iter()
            .filter(|event| event.status == status)
            .max_by_key(|event| event.occurred_at)
    }

    /// Latest history event whose status is in the awaiting-applicant family.
    pub fn latest_awaiting_applicant_event(&self) -> Option<&StatusEvent> {
        self.status_history
            .iter()
            .filter(|event| event.status.awaiting_applicant())
            .max_by_key(|event| event.occurred_at)
    }
}

/// An amendment review awaiting an applicant response.
///
/// `reminder_notification_timestamp` doubles as the idempotency guard for the
/// escalation reminder: unset until a reminder has been dispatched and
/// confirmed by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentReview {
    pub id: AmendmentReviewId,
    pub application_id: ApplicationId,
    pub response_deadline: DateTime<Utc>,
    pub reminder_notification_timestamp: Option<DateTime<Utc>>,
    pub completed: bool,
}
