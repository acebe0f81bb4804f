/// Outcome of checking one course section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// No seat available, keep polling
    Continue,
    /// A seat was found and the notification was dispatched
    Stop,
    /// The check failed on the network or while parsing the response
    Error,
}

/// What the registration system reported for a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The search was unsuccessful or returned no sections
    NoSections,
    /// Sections exist but none carries the configured CRN
    CrnNotFound,
    /// The section exists and has no open seats
    Full {
        /// Open seats (zero or negative)
        seats: i64,
        /// Enrollment capacity
        capacity: i64,
    },
    /// The section has at least one open seat
    Open {
        /// Open seats
        seats: i64,
        /// Enrollment capacity
        capacity: i64,
    },
}

impl Availability {
    /// Status label shown in the logs
    pub fn status_label(&self) -> &'static str {
        match self {
            Availability::Open { .. } => "Available",
            _ => "Full",
        }
    }
}

/// Why the polling loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A seat opened in the section with this CRN
    SeatFound {
        /// CRN of the section with an open seat
        crn: String,
    },
    /// Too many checks in a row failed
    ErrorLimitReached {
        /// Number of consecutive failed checks
        errors: u32,
    },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::SeatFound { crn } => write!(f, "seat found for CRN {}", crn),
            StopReason::ErrorLimitReached { errors } => {
                write!(f, "{} consecutive errors", errors)
            }
        }
    }
}

/// Errors raised while loading the configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Could not read {path}: {source}")]
    Io {
        /// Path of the configuration file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the expected shape
    #[error("Could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range or malformed
    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
