//! Workflow automation engine for felling licence case management.
//!
//! The crate owns the time-threshold logic of the casework backend: status
//! dwell-time calculation and the periodic scans that extend final action
//! dates, flag stale applicant-held applications for withdrawal, and escalate
//! amendment reviews from reminder to withdrawal. Persistence, notification
//! delivery, and scheduling live behind the trait seams in
//! [`workflows::licensing::repository`].

pub mod config;
pub mod telemetry;
pub mod workflows;
