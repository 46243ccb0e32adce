use super::domain::{AmendmentReviewId, ApplicationId};
use super::repository::RepositoryError;

/// Error raised by the threshold scanners.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("amendment review {review} not found for application {application}")]
    ReviewNotFound {
        application: ApplicationId,
        review: AmendmentReviewId,
    },
    #[error("application {reference} has no submitted status event")]
    MissingSubmission {
        application: ApplicationId,
        reference: String,
    },
    #[error("scan cancelled before commit")]
    Cancelled,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
