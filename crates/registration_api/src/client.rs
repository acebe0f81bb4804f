use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, cookie::Jar};
use serde_json::Value;
use tracing::debug;

use crate::types::{ApiError, SectionQuery, UniversitySettings};

/// Browser identification sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Timeout applied to each HTTP request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of sections requested per search page
pub const PAGE_MAX_SIZE: u32 = 50;

/// Searches course sections on the registration system
#[async_trait]
pub trait CourseSearchApi: Send + Sync {
    /// Authorize the session for the query's term, then search its sections.
    ///
    /// Returns the raw JSON payload of the search.
    async fn search_sections(&self, query: &SectionQuery) -> Result<Value, ApiError>;
}

/// Client for the registration system.
///
/// Holds a single cookie-carrying session which is reused for every search, so
/// the authorization set by the term POST is visible to the following GET.
pub struct RegistrationClient {
    client: Client,
    settings: UniversitySettings,
}

impl RegistrationClient {
    /// Create a new registration client
    pub fn new(settings: UniversitySettings) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());

        let client = Client::builder()
            .cookie_provider(jar)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self { client, settings })
    }

    /// Authorize the session for a term
    pub async fn authorize_term(&self, term_id: &str) -> Result<(), ApiError> {
        let url = self.settings.term_search_url();
        debug!("Authorizing session for term {} at {}", term_id, url);

        let response = self
            .client
            .post(&url)
            .query(&[("mode", "search")])
            .form(&[("term", term_id)])
            .send()
            .await?;

        ensure_success(response, &url)?;
        Ok(())
    }

    /// Fetch the first page of sections for a course
    pub async fn fetch_sections(&self, query: &SectionQuery) -> Result<Value, ApiError> {
        let url = self.settings.course_search_url();
        debug!(
            "Searching sections of {} {} in term {}",
            query.subject, query.course_number, query.term_id
        );

        let params = [
            ("txt_subject", query.subject.clone()),
            ("txt_courseNumber", query.course_number.clone()),
            ("txt_term", query.term_id.clone()),
            ("pageOffset", "0".to_string()),
            ("pageMaxSize", PAGE_MAX_SIZE.to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let response = ensure_success(response, &url)?;

        let body = response.text().await?;
        let payload = serde_json::from_str(&body)?;

        Ok(payload)
    }
}

#[async_trait]
impl CourseSearchApi for RegistrationClient {
    async fn search_sections(&self, query: &SectionQuery) -> Result<Value, ApiError> {
        self.authorize_term(&query.term_id).await?;
        self.fetch_sections(query).await
    }
}

fn ensure_success(response: Response, url: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status,
            url: url.to_string(),
        })
    }
}
