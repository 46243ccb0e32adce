//! Time-threshold scans over the felling licence application population.
//!
//! Three scanners share the data model and the [`repository::Clock`] seam and
//! nothing else: deadline extension (stage-and-commit unit of work),
//! withdrawal thresholds (read-only detection), and amendment escalation
//! (reminder then withdrawal, guarded by a conditional reminder timestamp).
//! Each is driven by an external scheduler and hands its records to an
//! external notification dispatcher.

pub mod amendment;
pub mod domain;
pub mod duration;
pub mod error;
pub mod extension;
pub mod records;
pub mod repository;
pub mod withdrawal;


pub use amendment::AmendmentEscalationScanner;
pub use domain::{
    AmendmentReview, AmendmentReviewId, ApplicationId, FellingApplication, FellingStatus,
    StatusDuration, StatusEvent, UserId,
};
pub use duration::status_durations;
pub use error::ScanError;
pub use extension::{DeadlineExtensionScanner, ExtensionOutcome, RejectedExtension};
pub use records::{ExtensionRecord, ReminderRecord, WithdrawalRecord};
pub use repository::{
    AmendmentReviewRepository, ApplicationRepository, CancellationFlag, Clock, ReminderMark,
    RepositoryError, SystemClock,
};
pub use withdrawal::WithdrawalThresholdScanner;
