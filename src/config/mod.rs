use std::env;
use std::fmt;

use chrono::Duration;

/// Threshold configuration for the periodic scans, loaded from the
/// environment with deployment defaults.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub extension: ExtensionThresholds,
    pub withdrawal: WithdrawalThresholds,
    pub amendment: AmendmentThresholds,
    pub telemetry: TelemetryConfig,
}

impl ScanConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let extension = ExtensionThresholds {
            extension_length_days: positive_days("CASEWORK_EXTENSION_LENGTH_DAYS", 90)?,
            window_days: positive_days("CASEWORK_EXTENSION_WINDOW_DAYS", 14)?,
        };
        let withdrawal = WithdrawalThresholds {
            threshold_days: positive_days("CASEWORK_WITHDRAWAL_THRESHOLD_DAYS", 28)?,
        };
        let amendment = AmendmentThresholds {
            reminder_period_days: positive_days("CASEWORK_AMENDMENT_REMINDER_DAYS", 14)?,
        };
        let telemetry = TelemetryConfig {
            log_level: env::var("CASEWORK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            extension,
            withdrawal,
            amendment,
            telemetry,
        })
    }
}

fn positive_days(var: &'static str, default: i64) -> Result<i64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ConfigError::InvalidDays { var, value: raw }),
    }
}

/// How far a final action date is pushed out, and how close to the date an
/// application must be before the extension fires.
#[derive(Debug, Clone)]
pub struct ExtensionThresholds {
    pub extension_length_days: i64,
    pub window_days: i64,
}

impl ExtensionThresholds {
    pub fn extension_length(&self) -> Duration {
        Duration::days(self.extension_length_days)
    }

    pub fn period_before_threshold(&self) -> Duration {
        Duration::days(self.window_days)
    }
}

/// How long an application may sit with the applicant before a withdrawal
/// notification is raised.
#[derive(Debug, Clone)]
pub struct WithdrawalThresholds {
    pub threshold_days: i64,
}

impl WithdrawalThresholds {
    pub fn threshold(&self) -> Duration {
        Duration::days(self.threshold_days)
    }
}

/// How far ahead of an amendment response deadline the reminder fires.
#[derive(Debug, Clone)]
pub struct AmendmentThresholds {
    pub reminder_period_days: i64,
}

impl AmendmentThresholds {
    pub fn reminder_period(&self) -> Duration {
        Duration::days(self.reminder_period_days)
    }
}

/// Tracing controls for the embedding scheduler.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDays { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDays { var, value } => {
                write!(f, "{var} must be a positive whole number of days, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
