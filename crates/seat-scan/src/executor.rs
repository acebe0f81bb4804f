use std::sync::Arc;

use chrono::Local;
use notification_services::Notifier;
use registration_api::CourseSearchApi;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::checker::CourseChecker;
use crate::config::{Config, CourseToCheck, ScriptSettings};
use crate::scan_types::{CheckResult, StopReason};

/// Subject of the mail sent at startup in debug mode
pub const TEST_EMAIL_SUBJECT: &str = "Course Checker - Test email";

/// Subject of the alert sent when the error limit is reached
pub const FAILURE_ALERT_SUBJECT: &str = "Course Checker script has failed";

/// Error bookkeeping carried across checks
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollState {
    consecutive_errors: u32,
}

impl PollState {
    /// Record the outcome of a check: errors count up, anything else resets the count
    pub fn record(&mut self, result: CheckResult) {
        match result {
            CheckResult::Error => self.consecutive_errors += 1,
            CheckResult::Continue | CheckResult::Stop => self.consecutive_errors = 0,
        }
    }

    /// Number of failed checks in a row
    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// Whether the failed checks reached the configured limit
    pub fn limit_reached(&self, limit: u32) -> bool {
        self.consecutive_errors >= limit
    }
}

/// Main polling loop
pub struct PollExecutor {
    checker: CourseChecker,
    notifier: Arc<dyn Notifier>,
    settings: ScriptSettings,
    courses: Vec<CourseToCheck>,
    debug: bool,
}

impl PollExecutor {
    /// Create a new executor
    pub fn new(
        api: Arc<dyn CourseSearchApi>,
        notifier: Arc<dyn Notifier>,
        settings: ScriptSettings,
        courses: Vec<CourseToCheck>,
        debug: bool,
    ) -> Self {
        Self {
            checker: CourseChecker::new(api, notifier.clone(), debug),
            notifier,
            settings,
            courses,
            debug,
        }
    }

    /// Create an executor for a loaded configuration
    pub fn from_config(
        config: &Config,
        api: Arc<dyn CourseSearchApi>,
        notifier: Arc<dyn Notifier>,
        debug: bool,
    ) -> Self {
        Self::new(
            api,
            notifier,
            config.script_settings.clone(),
            config.courses_to_check.clone(),
            debug,
        )
    }

    /// Poll the configured courses until a seat is found or the error limit is reached.
    ///
    /// Courses are checked one at a time in configured order, pausing between
    /// courses and between cycles. Without a stop condition this never returns.
    pub async fn run(&self) -> StopReason {
        if self.debug {
            info!("Debug mode enabled, sending a test email to verify configuration...");
            self.notifier
                .notify(
                    TEST_EMAIL_SUBJECT,
                    "This is a test of your email notification settings. \
                     If you received this, the script can send emails successfully.",
                )
                .await;
        }

        if self.courses.is_empty() {
            warn!("No courses configured in courses_to_check, nothing will be checked");
        }

        let limit = self.settings.consecutive_error_limit;
        let mut state = PollState::default();

        loop {
            info!(
                "--- Starting new check cycle at {} ---",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            );

            for course in &self.courses {
                let Some(query) = course.section_query() else {
                    warn!(
                        "'term_id' (e.g. '202509') not found for course {}. Skipping.",
                        course.crn
                    );
                    continue;
                };

                let result = self.checker.check_course(course, &query).await;
                state.record(result);

                match result {
                    CheckResult::Stop => {
                        info!("--- Seat found and notification sent. Stopping. ---");
                        return StopReason::SeatFound {
                            crn: course.crn.clone(),
                        };
                    }
                    CheckResult::Error => {
                        info!("Consecutive error count: {}", state.consecutive_errors());
                    }
                    CheckResult::Continue => {}
                }

                if state.limit_reached(limit) {
                    return self.give_up(limit).await;
                }

                sleep(self.settings.inter_course_delay()).await;
            }

            info!(
                "--- Cycle complete. Waiting {}s for next cycle. ---",
                self.settings.main_interval_seconds
            );
            sleep(self.settings.main_interval()).await;
        }
    }

    async fn give_up(&self, limit: u32) -> StopReason {
        warn!("Reached {} consecutive errors. Sending alert and stopping.", limit);

        let body = format!(
            "The script has failed {} times in a row and is shutting down. Please check the logs.",
            limit
        );
        self.notifier.notify(FAILURE_ALERT_SUBJECT, &body).await;

        StopReason::ErrorLimitReached { errors: limit }
    }
}
