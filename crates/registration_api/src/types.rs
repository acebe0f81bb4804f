use serde::{Deserialize, Serialize};
use validator::Validate;

/// Location of the registration system and the endpoints used for a search
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UniversitySettings {
    /// Base URL of the registration system, e.g. `https://reg.example.edu/StudentRegistrationSsb/ssb`
    #[validate(length(min = 1, message = "base_url is required"))]
    pub base_url: String,

    /// Path appended to the base URL to authorize the session for a term
    #[validate(length(min = 1, message = "term_search_endpoint is required"))]
    pub term_search_endpoint: String,

    /// Path appended to the base URL to search course sections
    #[validate(length(min = 1, message = "course_search_endpoint is required"))]
    pub course_search_endpoint: String,
}

impl UniversitySettings {
    /// Full URL of the term-authorization endpoint
    pub fn term_search_url(&self) -> String {
        format!("{}{}", self.trimmed_base_url(), self.term_search_endpoint)
    }

    /// Full URL of the section search endpoint
    pub fn course_search_url(&self) -> String {
        format!("{}{}", self.trimmed_base_url(), self.course_search_endpoint)
    }

    fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Parameters of a single section search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionQuery {
    /// Subject code, e.g. `CS`
    pub subject: String,
    /// Course number within the subject, e.g. `3114`
    pub course_number: String,
    /// Term identifier, e.g. `202509`
    pub term_id: String,
}

/// Payload returned by the section search endpoint.
///
/// Only the fields the seat check relies on are modeled; anything else in
/// the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Whether the search itself succeeded
    #[serde(default)]
    pub success: Option<bool>,

    /// Number of sections matching the search
    #[serde(default)]
    pub total_count: Option<i64>,

    /// Sections on the returned page
    #[serde(default)]
    pub data: Option<Vec<Section>>,
}

impl SearchResponse {
    /// True when the search reports at least one section for the course
    pub fn has_sections(&self) -> bool {
        self.success.unwrap_or(false) && self.total_count != Some(0)
    }

    /// Find the section with the given course reference number
    pub fn find_section(&self, crn: &str) -> Option<&Section> {
        self.data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|section| section.course_reference_number.as_deref() == Some(crn))
    }
}

/// A scheduled section of a course
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Course reference number (CRN) of the section
    #[serde(default)]
    pub course_reference_number: Option<String>,

    /// Open seats, zero or negative when full
    #[serde(default)]
    pub seats_available: Option<i64>,

    /// Enrollment capacity
    #[serde(default)]
    pub maximum_enrollment: Option<i64>,
}

impl Section {
    /// Open seats, defaulting to zero when not reported
    pub fn seats(&self) -> i64 {
        self.seats_available.unwrap_or(0)
    }

    /// Capacity, defaulting to zero when not reported
    pub fn capacity(&self) -> i64 {
        self.maximum_enrollment.unwrap_or(0)
    }
}

/// Errors raised while talking to the registration system
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    /// Connection failure, timeout or other transport error
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status returned by the server
        status: reqwest::StatusCode,
        /// URL that was requested
        url: String,
    },

    /// The response body was not valid JSON
    #[error("Failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}
