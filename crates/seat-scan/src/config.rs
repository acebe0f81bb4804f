use std::fs;
use std::path::Path;
use std::time::Duration;

use notification_services::EmailSettings;
use registration_api::{SectionQuery, UniversitySettings};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::scan_types::ConfigError;

/// Location of the configuration file, relative to the working directory
pub const CONFIG_PATH: &str = "config.json";

/// Complete tracker configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Config {
    /// Mail server and recipients
    #[validate(nested)]
    pub email_settings: EmailSettings,

    /// Registration system endpoints
    #[validate(nested)]
    pub university_settings: UniversitySettings,

    /// Polling cadence and error tolerance
    #[validate(nested)]
    pub script_settings: ScriptSettings,

    /// Sections to watch, checked in this order
    #[serde(default)]
    pub courses_to_check: Vec<CourseToCheck>,
}

/// Polling cadence and error tolerance
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScriptSettings {
    /// Failed checks in a row after which the tracker alerts and stops
    #[validate(range(min = 1, message = "consecutive_error_limit must be at least 1"))]
    pub consecutive_error_limit: u32,

    /// Pause between two course checks, in seconds
    pub inter_course_delay_seconds: u64,

    /// Pause between two full cycles, in seconds
    pub main_interval_seconds: u64,
}

impl ScriptSettings {
    /// Pause between two course checks
    pub fn inter_course_delay(&self) -> Duration {
        Duration::from_secs(self.inter_course_delay_seconds)
    }

    /// Pause between two full cycles
    pub fn main_interval(&self) -> Duration {
        Duration::from_secs(self.main_interval_seconds)
    }
}

/// A course section to watch
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseToCheck {
    /// Subject code, e.g. `CS`
    pub subject: String,

    /// Course number, e.g. `3114`
    pub course_number: String,

    /// Course reference number of the section
    pub crn: String,

    /// Term the section belongs to, e.g. `202509`
    #[serde(default)]
    pub term_id: Option<String>,
}

impl CourseToCheck {
    /// Human readable name used in logs and notifications
    pub fn display_name(&self) -> String {
        format!("{} {} (CRN: {})", self.subject, self.course_number, self.crn)
    }

    /// Search parameters for this section, or `None` when no term is configured
    pub fn section_query(&self) -> Option<SectionQuery> {
        let term_id = self.term_id.as_deref().map(str::trim)?;
        if term_id.is_empty() {
            return None;
        }

        Some(SectionQuery {
            subject: self.subject.clone(),
            course_number: self.course_number.clone(),
            term_id: term_id.to_string(),
        })
    }
}

/// Read, parse and validate the configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let config: Config = serde_json::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}
