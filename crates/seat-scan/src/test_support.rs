//! Mocks shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use notification_services::Notifier;
use registration_api::{ApiError, CourseSearchApi, SectionQuery, StatusCode};
use serde_json::{Value, json};

use crate::config::{CourseToCheck, ScriptSettings};

/// Configuration file contents with two courses, the second one lacking a term
pub fn sample_config_json(error_limit: u32) -> String {
    json!({
        "email_settings": {
            "sender_email": "tracker@example.com",
            "receiver_email": "student@example.com",
            "sms_gateway_email": "",
            "smtp_server": "smtp.example.com",
            "smtp_port": 587,
            "sender_password": "app-password"
        },
        "university_settings": {
            "base_url": "https://reg.example.edu/StudentRegistrationSsb/ssb/",
            "term_search_endpoint": "/term/search",
            "course_search_endpoint": "/searchResults/searchResults"
        },
        "script_settings": {
            "consecutive_error_limit": error_limit,
            "inter_course_delay_seconds": 5,
            "main_interval_seconds": 300
        },
        "courses_to_check": [
            {"subject": "CS", "course_number": "3114", "crn": "12345", "term_id": "202509"},
            {"subject": "MATH", "course_number": "2114", "crn": "54321"}
        ]
    })
    .to_string()
}

pub fn course(crn: &str, term_id: Option<&str>) -> CourseToCheck {
    CourseToCheck {
        subject: "CS".to_string(),
        course_number: "3114".to_string(),
        crn: crn.to_string(),
        term_id: term_id.map(str::to_string),
    }
}

/// Settings with no pauses so loop tests run instantly
pub fn script_settings(error_limit: u32) -> ScriptSettings {
    ScriptSettings {
        consecutive_error_limit: error_limit,
        inter_course_delay_seconds: 0,
        main_interval_seconds: 0,
    }
}

pub fn open_seats_payload(crn: &str, seats: i64, capacity: i64) -> Value {
    json!({
        "success": true,
        "totalCount": 1,
        "data": [
            {"courseReferenceNumber": crn, "seatsAvailable": seats, "maximumEnrollment": capacity}
        ]
    })
}

pub fn no_sections_payload() -> Value {
    json!({"success": true, "totalCount": 0, "data": []})
}

/// A canned answer of the search API
#[derive(Debug, Clone)]
pub enum Scripted {
    Payload(Value),
    /// Stands in for any request failure (connect error, timeout, non-2xx); answered as a 504
    Unavailable,
    /// Body that is not JSON
    BadJson,
}

impl Scripted {
    fn into_result(self) -> Result<Value, ApiError> {
        match self {
            Scripted::Payload(value) => Ok(value),
            Scripted::Unavailable => Err(ApiError::Status {
                status: StatusCode::GATEWAY_TIMEOUT,
                url: "https://reg.example.edu/searchResults".to_string(),
            }),
            Scripted::BadJson => Err(ApiError::Decode(
                serde_json::from_str::<Value>("<html>").unwrap_err(),
            )),
        }
    }
}

/// Search API answering from a script; the last answer repeats once the script runs out
pub struct ScriptedApi {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    queries: Mutex<Vec<SectionQuery>>,
}

impl ScriptedApi {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<SectionQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CourseSearchApi for ScriptedApi {
    async fn search_sections(&self, query: &SectionQuery) -> Result<Value, ApiError> {
        self.queries.lock().unwrap().push(query.clone());

        let next = self.script.lock().unwrap().pop_front();
        let answer = match next {
            Some(answer) => {
                *self.last.lock().unwrap() = Some(answer.clone());
                answer
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(Scripted::Payload(no_sections_payload())),
        };

        answer.into_result()
    }
}

/// Notifier remembering every (subject, body) it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, body: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
    }
}
