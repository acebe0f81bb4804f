use std::sync::Arc;

use notification_services::Notifier;
use registration_api::{ApiError, CourseSearchApi, SearchResponse, SectionQuery};
use serde_json::Value;
use tracing::{error, info};

use crate::config::CourseToCheck;
use crate::scan_types::{Availability, CheckResult};

/// Checks course sections for open seats and notifies when one is found
pub struct CourseChecker {
    api: Arc<dyn CourseSearchApi>,
    notifier: Arc<dyn Notifier>,
    debug: bool,
}

impl CourseChecker {
    /// Create a new checker. In debug mode every search payload is logged in full.
    pub fn new(api: Arc<dyn CourseSearchApi>, notifier: Arc<dyn Notifier>, debug: bool) -> Self {
        Self {
            api,
            notifier,
            debug,
        }
    }

    /// Check one section and notify when it has an open seat.
    ///
    /// Network failures, non-2xx answers and undecodable payloads yield
    /// [`CheckResult::Error`]; a course with no sections this term is not an error.
    pub async fn check_course(&self, course: &CourseToCheck, query: &SectionQuery) -> CheckResult {
        let course_name = course.display_name();
        info!("Checking {}...", course_name);

        let payload = match self.api.search_sections(query).await {
            Ok(payload) => payload,
            Err(ApiError::Decode(e)) => {
                error!("Failed to decode JSON response for {}: {}", course_name, e);
                return CheckResult::Error;
            }
            Err(e) => {
                error!("Network or HTTP error for {}: {}", course_name, e);
                return CheckResult::Error;
            }
        };

        if self.debug {
            log_payload(&payload);
        }

        let response: SearchResponse = match serde_json::from_value(payload) {
            Ok(response) => response,
            Err(e) => {
                error!("Unexpected search response for {}: {}", course_name, e);
                return CheckResult::Error;
            }
        };

        match evaluate(&response, &course.crn) {
            Availability::NoSections => {
                info!(
                    "No sections found for {} {}. The course might not be offered this term.",
                    course.subject, course.course_number
                );
                CheckResult::Continue
            }
            Availability::CrnNotFound => {
                info!("CRN {} not found in search results for this term.", course.crn);
                CheckResult::Continue
            }
            availability @ Availability::Full { seats, capacity } => {
                log_status(seats, capacity, availability);
                CheckResult::Continue
            }
            availability @ Availability::Open { seats, capacity } => {
                log_status(seats, capacity, availability);
                info!("Seat found! Preparing notification...");

                let (subject, body) = seat_available_message(course, seats, capacity);
                self.notifier.notify(&subject, &body).await;
                CheckResult::Stop
            }
        }
    }
}

/// Decide what a search response says about the section with this CRN
pub fn evaluate(response: &SearchResponse, crn: &str) -> Availability {
    if !response.has_sections() {
        return Availability::NoSections;
    }

    let Some(section) = response.find_section(crn) else {
        return Availability::CrnNotFound;
    };

    let seats = section.seats();
    let capacity = section.capacity();

    if seats > 0 {
        Availability::Open { seats, capacity }
    } else {
        Availability::Full { seats, capacity }
    }
}

/// Subject and body of the seat-found notification
pub fn seat_available_message(course: &CourseToCheck, seats: i64, capacity: i64) -> (String, String) {
    let course_name = course.display_name();

    let subject = format!("Seat available for {}", course_name);
    let body = format!(
        "A spot has opened up for {}\n\n\
         Seats available: {}\n\
         Total capacity: {}\n\n\
         Register as soon as possible!",
        course_name, seats, capacity
    );

    (subject, body)
}

fn log_status(seats: i64, capacity: i64, availability: Availability) {
    info!(
        "Status: {} seats available out of {} [{}]",
        seats,
        capacity,
        availability.status_label()
    );
}

fn log_payload(payload: &Value) {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    info!("Debug: Full JSON response received:\n{}", pretty);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::*;

    fn checker(api: Arc<ScriptedApi>, notifier: Arc<RecordingNotifier>) -> CourseChecker {
        CourseChecker::new(api, notifier, false)
    }

    async fn run_check(script: Vec<Scripted>) -> (CheckResult, Vec<(String, String)>) {
        let api = Arc::new(ScriptedApi::new(script));
        let notifier = Arc::new(RecordingNotifier::default());
        let course = course("12345", Some("202509"));
        let query = course.section_query().unwrap();

        let result = checker(api, notifier.clone())
            .check_course(&course, &query)
            .await;

        (result, notifier.sent())
    }

    #[tokio::test]
    async fn test_open_seat_stops_and_notifies_once() {
        let (result, sent) =
            run_check(vec![Scripted::Payload(open_seats_payload("12345", 2, 30))]).await;

        assert_eq!(result, CheckResult::Stop);
        assert_eq!(sent.len(), 1);

        let (subject, body) = &sent[0];
        assert!(subject.contains("CS 3114"));
        assert!(subject.contains("12345"));
        assert!(body.contains("Seats available: 2"));
        assert!(body.contains("Total capacity: 30"));
    }

    #[tokio::test]
    async fn test_no_sections_continues_without_notification() {
        let (result, sent) = run_check(vec![Scripted::Payload(no_sections_payload())]).await;

        assert_eq!(result, CheckResult::Continue);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_unsuccessful_search_continues() {
        let payload = json!({
            "success": false,
            "totalCount": 1,
            "data": [{"courseReferenceNumber": "12345", "seatsAvailable": 9}]
        });

        let (result, sent) = run_check(vec![Scripted::Payload(payload)]).await;

        assert_eq!(result, CheckResult::Continue);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_missing_crn_continues() {
        let (result, sent) =
            run_check(vec![Scripted::Payload(open_seats_payload("99999", 5, 30))]).await;

        assert_eq!(result, CheckResult::Continue);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_full_section_continues() {
        let (result, sent) =
            run_check(vec![Scripted::Payload(open_seats_payload("12345", 0, 30))]).await;

        assert_eq!(result, CheckResult::Continue);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_server_is_error() {
        let (result, sent) = run_check(vec![Scripted::Unavailable]).await;

        assert_eq!(result, CheckResult::Error);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_is_error() {
        let (result, sent) = run_check(vec![Scripted::BadJson]).await;

        assert_eq!(result, CheckResult::Error);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_error() {
        let payload = json!({"success": true, "totalCount": "many"});

        let (result, _) = run_check(vec![Scripted::Payload(payload)]).await;

        assert_eq!(result, CheckResult::Error);
    }

    #[tokio::test]
    async fn test_debug_mode_does_not_change_outcome() {
        let api = Arc::new(ScriptedApi::new(vec![Scripted::Payload(open_seats_payload(
            "12345", 1, 10,
        ))]));
        let notifier = Arc::new(RecordingNotifier::default());
        let course = course("12345", Some("202509"));
        let query = course.section_query().unwrap();

        let result = CourseChecker::new(api.clone(), notifier.clone(), true)
            .check_course(&course, &query)
            .await;

        assert_eq!(result, CheckResult::Stop);
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(api.queries(), vec![query]);
    }

    #[test]
    fn test_evaluate() {
        let response: SearchResponse =
            serde_json::from_value(open_seats_payload("12345", -1, 25)).unwrap();

        assert_eq!(
            evaluate(&response, "12345"),
            Availability::Full {
                seats: -1,
                capacity: 25
            }
        );
        assert_eq!(evaluate(&response, "00000"), Availability::CrnNotFound);
    }
}
