//! Failure classification and handling.
//!
//! `FailureClassifier` is the single point where raw backend and transport
//! errors turn into user-visible text. Each call classifies the failure,
//! records it in the `EventLog`, sends exactly one notification and, for
//! authentication failures, schedules a forced navigation to the login page.
pub mod failure;
pub mod messages;
pub mod rules;
pub mod validation;

pub use failure::Failure;
pub use messages::{user_message, VALIDATION_FALLBACK_MESSAGE};
pub use rules::{Rule, RuleSet};
pub use validation::{FieldError, ValidationErrors};

use crate::connectivity::Connectivity;
use crate::logging::EventLog;
use crate::navigation::{NavigationScheduler, NavigationTicket};
use crate::notify::{Notifier, Severity};
use crate::types::{ErrorCategory, LogLevel};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The outcome of one classification call.
#[derive(Debug, Clone)]
pub struct ClassificationResult<E = Failure> {
    pub category: ErrorCategory,
    /// The user-facing message. Never contains raw error text.
    pub message: String,
    /// The unmodified input, for programmatic inspection only.
    pub original_error: E,
    /// The navigation scheduled (or joined) for an AUTH failure.
    pub navigation: Option<NavigationTicket>,
}

/// What gets written to the log's data field for a classified failure.
#[derive(Serialize)]
struct FailureSnapshot<'a> {
    category: ErrorCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a Value>,
}

pub struct FailureClassifier {
    log: Arc<EventLog>,
    connectivity: Arc<dyn Connectivity + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    navigation: NavigationScheduler,
    rules: RuleSet,
}

impl FailureClassifier {
    pub fn new(
        log: Arc<EventLog>,
        connectivity: Arc<dyn Connectivity + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        navigation: NavigationScheduler,
    ) -> Self {
        Self {
            log,
            connectivity,
            notifier,
            navigation,
            rules: RuleSet::default(),
        }
    }

    /// Replaces the rule table.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Assigns a category without logging, notifying or navigating.
    pub fn classify(&self, failure: &Failure) -> ErrorCategory {
        self.rules.classify(failure, self.connectivity.is_online())
    }

    /// Classifies `failure`, logs it, notifies the user and runs the
    /// category's side effects.
    ///
    /// Logging and notification are fire-and-forget; the AUTH navigation is
    /// deferred. This never fails.
    pub fn classify_and_handle(&self, failure: Failure, context: &str) -> ClassificationResult {
        let category = self.classify(&failure);
        let message = user_message(category);
        debug!("Classified failure in {} as {}", context_label(context), category);

        let snapshot = FailureSnapshot {
            category,
            status: failure.status,
            message: &failure.message,
            code: failure.code.as_deref(),
            url: failure.url.as_deref(),
            method: failure.method.as_deref(),
            response: failure.payload.as_ref(),
        };
        self.log.record_serialized(
            LogLevel::Error,
            format!("{} error in {}", category, context_label(context)),
            &snapshot,
        );

        // The user sees the message before any redirect can fire.
        self.notifier.notify(Severity::Error, message);

        let navigation = match category {
            ErrorCategory::Auth => Some(self.navigation.schedule()),
            ErrorCategory::Network
            | ErrorCategory::Validation
            | ErrorCategory::Server
            | ErrorCategory::Unknown => None,
        };

        ClassificationResult {
            category,
            message: message.to_string(),
            original_error: failure,
            navigation,
        }
    }

    /// Handles form validation errors reported by the backend.
    ///
    /// The whole list is logged at WARN; the user sees the first error's
    /// message, or a fixed fallback when it has none.
    pub fn classify_validation_errors(
        &self,
        errors: impl Into<ValidationErrors>,
        context: &str,
    ) -> ClassificationResult<ValidationErrors> {
        let errors = errors.into();
        self.log.record_serialized(
            LogLevel::Warn,
            format!("Validation errors in {}", context_label(context)),
            &errors,
        );

        let message = errors
            .first_message()
            .unwrap_or(VALIDATION_FALLBACK_MESSAGE)
            .to_string();
        self.notifier.notify(Severity::Error, &message);

        ClassificationResult {
            category: ErrorCategory::Validation,
            message,
            original_error: errors,
            navigation: None,
        }
    }

    pub fn navigation(&self) -> &NavigationScheduler {
        &self.navigation
    }

    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }
}

fn context_label(context: &str) -> &str {
    let trimmed = context.trim();
    if trimmed.is_empty() {
        "unknown context"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryConfig;
    use crate::connectivity::ConnectivityFlag;
    use crate::navigation::ChannelNavigator;
    use crate::notify::{ChannelNotifier, Notification};
    use crate::storage::MemoryLogStore;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct Harness {
        classifier: FailureClassifier,
        log: Arc<EventLog>,
        connectivity: Arc<ConnectivityFlag>,
        notifications: mpsc::UnboundedReceiver<Notification>,
        navigations: mpsc::UnboundedReceiver<String>,
    }

    fn harness() -> Harness {
        let log = Arc::new(EventLog::new(
            &TelemetryConfig::default().with_dev_build(false),
            Arc::new(MemoryLogStore::new()),
        ));
        let connectivity = Arc::new(ConnectivityFlag::new(true));
        let (notifier, notifications) = ChannelNotifier::channel();
        let (navigator, navigations) = ChannelNavigator::channel();
        let scheduler =
            NavigationScheduler::new(Arc::new(navigator), "/volunteer/login", Duration::from_secs(2));
        let classifier = FailureClassifier::new(
            log.clone(),
            connectivity.clone(),
            Arc::new(notifier),
            scheduler,
        );
        Harness {
            classifier,
            log,
            connectivity,
            notifications,
            navigations,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failure_redirects_to_login() {
        let mut h = harness();
        let result = h.classifier.classify_and_handle(Failure::status(401), "login");

        assert_eq!(result.category, ErrorCategory::Auth);
        assert_eq!(result.message, "Session expired. Please login again.");
        assert!(result.navigation.is_some());
        assert!(h.navigations.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(h.navigations.try_recv().unwrap(), "/volunteer/login");
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_auth_failures_share_one_navigation() {
        let mut h = harness();
        let first = h.classifier.classify_and_handle(Failure::status(401), "profile");
        let second = h.classifier.classify_and_handle(Failure::status(403), "logs");
        assert_eq!(first.navigation, second.navigation);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(h.navigations.try_recv().is_ok());
        assert!(h.navigations.try_recv().is_err());
        assert!(h.notifications.try_recv().is_ok());
        assert!(h.notifications.try_recv().is_ok());
        assert!(h.notifications.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn offline_client_is_always_network() {
        let mut h = harness();
        h.connectivity.set_online(false);

        let result = h.classifier.classify_and_handle(Failure::default(), "fetch");
        assert_eq!(result.category, ErrorCategory::Network);

        let result = h.classifier.classify_and_handle(Failure::status(401), "fetch");
        assert_eq!(result.category, ErrorCategory::Network);
        assert!(result.navigation.is_none());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(h.navigations.try_recv().is_err());
    }

    #[test]
    fn non_auth_categories_never_navigate() {
        let h = harness();
        for failure in [
            Failure::transport("down"),
            Failure::status(422),
            Failure::status(502),
            Failure::new("boom"),
        ] {
            let result = h.classifier.classify_and_handle(failure, "announcements");
            assert!(result.navigation.is_none());
        }
        assert!(h.classifier.navigation().pending().is_none());
    }

    #[test]
    fn every_failure_is_logged_at_error_with_a_snapshot() {
        let h = harness();
        let failure = Failure::new("Request failed with status code 422")
            .with_status(422)
            .with_request("POST", "/api/volunteers/3")
            .with_payload(serde_json::json!({ "detail": "email taken" }));

        let result = h.classifier.classify_and_handle(failure.clone(), "profile save");

        assert_eq!(result.category, ErrorCategory::Validation);
        assert_eq!(result.original_error, failure);
        assert!(!result.message.contains("422"));

        let entries = h.log.query(Some(LogLevel::Error));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "VALIDATION error in profile save");
        let data = entries[0].data.as_ref().unwrap();
        assert_eq!(data["category"], "VALIDATION");
        assert_eq!(data["status"], 422);
        assert_eq!(data["method"], "POST");
        assert_eq!(data["url"], "/api/volunteers/3");
        assert_eq!(data["message"], "Request failed with status code 422");
        assert_eq!(data["response"]["detail"], "email taken");
    }

    #[test]
    fn same_category_same_message_single_notification() {
        let mut h = harness();
        let a = h.classifier.classify_and_handle(Failure::status(500), "a");
        let b = h.classifier.classify_and_handle(Failure::status(503), "b");
        assert_eq!(a.message, b.message);

        let first = h.notifications.try_recv().unwrap();
        assert_eq!(first.severity, Severity::Error);
        assert_eq!(first.message, user_message(ErrorCategory::Server));
        assert!(h.notifications.try_recv().is_ok());
        assert!(h.notifications.try_recv().is_err());
    }

    #[test]
    fn validation_list_uses_first_message() {
        let mut h = harness();
        let errors = vec![
            FieldError::new("email", "Email is required"),
            FieldError::new("phone", "Phone is invalid"),
        ];

        let result = h.classifier.classify_validation_errors(errors, "profile form");

        assert_eq!(result.category, ErrorCategory::Validation);
        assert_eq!(result.message, "Email is required");
        assert_eq!(h.notifications.try_recv().unwrap().message, "Email is required");

        let entries = h.log.query(Some(LogLevel::Warn));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Validation errors in profile form");
        assert_eq!(entries[0].data.as_ref().unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn validation_without_message_falls_back() {
        let h = harness();
        let result = h
            .classifier
            .classify_validation_errors(FieldError::default(), "feedback");
        assert_eq!(result.message, VALIDATION_FALLBACK_MESSAGE);

        let result = h
            .classifier
            .classify_validation_errors(Vec::<FieldError>::new(), "feedback");
        assert_eq!(result.message, VALIDATION_FALLBACK_MESSAGE);
    }

    #[test]
    fn blank_context_gets_a_label() {
        let h = harness();
        h.classifier.classify_and_handle(Failure::new("boom"), "  ");
        assert_eq!(
            h.log.query(None)[0].message,
            "UNKNOWN error in unknown context"
        );
    }

    #[test]
    fn custom_rules_extend_the_table() {
        let mut h = harness();
        let mut rules = RuleSet::default();
        rules.push(Rule {
            name: "rate-limited-payload",
            category: ErrorCategory::Server,
            matches: |failure, _| failure.payload.is_some(),
        });
        h.classifier = h.classifier.with_rules(rules);

        let failure = Failure::new("slow down").with_payload(serde_json::json!({ "retry": 5 }));
        assert_eq!(h.classifier.classify(&failure), ErrorCategory::Server);
        assert_eq!(h.classifier.classify(&Failure::status(401)), ErrorCategory::Auth);
    }

    /// Records notifications and navigations in the order they happen.
    #[derive(Default)]
    struct Timeline {
        events: std::sync::Mutex<Vec<(String, std::time::Instant)>>,
    }

    impl Timeline {
        fn push(&self, event: String) {
            self.events
                .lock()
                .unwrap()
                .push((event, std::time::Instant::now()));
        }

        fn events(&self) -> Vec<(String, std::time::Instant)> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for Timeline {
        fn notify(&self, _severity: Severity, message: &str) {
            self.push(format!("notify {}", message));
        }
    }

    impl crate::navigation::Navigator for Timeline {
        fn navigate(&self, path: &str) {
            self.push(format!("navigate {}", path));
        }
    }

    #[test]
    fn auth_notifies_before_the_delayed_redirect_without_a_runtime() {
        let timeline = Arc::new(Timeline::default());
        let delay = Duration::from_millis(100);
        let log = Arc::new(EventLog::new(
            &TelemetryConfig::default().with_dev_build(false),
            Arc::new(MemoryLogStore::new()),
        ));
        let classifier = FailureClassifier::new(
            log,
            Arc::new(ConnectivityFlag::new(true)),
            timeline.clone(),
            NavigationScheduler::new(timeline.clone(), "/volunteer/login", delay),
        );

        let started = std::time::Instant::now();
        let result = classifier.classify_and_handle(Failure::status(401), "login");
        assert_eq!(result.category, ErrorCategory::Auth);
        assert_eq!(timeline.events().len(), 1);

        std::thread::sleep(delay * 4);
        let events = timeline.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "notify Session expired. Please login again.");
        assert_eq!(events[1].0, "navigate /volunteer/login");
        assert!(events[1].1.duration_since(started) >= delay);
    }
}
