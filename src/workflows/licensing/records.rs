use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AmendmentReviewId, ApplicationId, UserId};

/// Pre-extension snapshot of an application whose final action date was
/// pushed out, carrying everything the notification templates need without a
/// follow-up query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionRecord {
    pub application_id: ApplicationId,
    pub application_reference: String,
    pub assigned_user_ids: Vec<UserId>,
    pub created_by: UserId,
    pub submission_date: DateTime<Utc>,
    pub woodland_owner_id: UserId,
    pub admin_hub_name: String,
    pub extension_length_days: i64,
    pub new_final_action_date: DateTime<Utc>,
}

/// An application parked with the applicant long enough to warn about
/// voluntary withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalRecord {
    pub application_id: ApplicationId,
    pub application_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    pub created_by: UserId,
    pub with_applicant_date: DateTime<Utc>,
    pub woodland_owner_id: UserId,
    pub notification_date_sent: DateTime<Utc>,
    pub administrative_region: String,
}

/// An amendment review close enough to its response deadline that the
/// applicant should be reminded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderRecord {
    pub application_id: ApplicationId,
    pub amendment_review_id: AmendmentReviewId,
    pub response_deadline: DateTime<Utc>,
    pub reminder_period_days: i64,
}
