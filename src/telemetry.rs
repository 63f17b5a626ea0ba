//! The composition root wiring the event log and the classifier together.
use crate::classify::FailureClassifier;
use crate::config::TelemetryConfig;
use crate::connectivity::ConnectivityFlag;
use crate::logging::{DiagnosticSink, EventLog, TracingDiagnostics};
use crate::navigation::{ChannelNavigator, NavigationScheduler};
use crate::notify::{ChannelNotifier, Notification};
use crate::storage::LogStore;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One event log and one classifier per process, shared by every consumer.
#[derive(Clone)]
pub struct Telemetry {
    pub log: Arc<EventLog>,
    pub classifier: Arc<FailureClassifier>,
    pub connectivity: Arc<ConnectivityFlag>,
}

/// The receiving ends of the notifications and navigations the core emits.
pub struct TelemetryChannels {
    pub notifications: mpsc::UnboundedReceiver<Notification>,
    pub navigations: mpsc::UnboundedReceiver<String>,
}

impl Telemetry {
    pub fn build(
        config: &TelemetryConfig,
        store: Arc<dyn LogStore + Send + Sync>,
    ) -> (Self, TelemetryChannels) {
        Self::build_with_diagnostics(config, store, Arc::new(TracingDiagnostics))
    }

    pub fn build_with_diagnostics(
        config: &TelemetryConfig,
        store: Arc<dyn LogStore + Send + Sync>,
        diagnostics: Arc<dyn DiagnosticSink + Send + Sync>,
    ) -> (Self, TelemetryChannels) {
        let log = Arc::new(EventLog::with_diagnostics(config, store, diagnostics));
        let connectivity = Arc::new(ConnectivityFlag::default());
        let (notifier, notifications) = ChannelNotifier::channel();
        let (navigator, navigations) = ChannelNavigator::channel();
        let scheduler = NavigationScheduler::new(
            Arc::new(navigator),
            config.login_path.clone(),
            config.auth_redirect_delay,
        );
        let classifier = Arc::new(FailureClassifier::new(
            log.clone(),
            connectivity.clone(),
            Arc::new(notifier),
            scheduler,
        ));

        (
            Self {
                log,
                classifier,
                connectivity,
            },
            TelemetryChannels {
                notifications,
                navigations,
            },
        )
    }
}
