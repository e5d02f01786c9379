use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    domain::{HistoryEntry, LastEmailSnapshot, SubmissionInput, ValidationError},
    fallback::FormSubmitter,
    predict::{ClassificationEndpoint, PredictOutcome},
    storage::LocalHistory,
    ui::{render_verdict, Notice, SubmissionView, VerdictView},
};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Raw state of the scan form at the moment it is submitted.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub store_locally: bool,
}

/// How a submission ended. A fallback does not say why; the reason is only
/// logged.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(ValidationError),
    FellBack,
    ServerError(String),
    Rendered(VerdictView),
}

pub struct SubmissionController {
    endpoint: Arc<dyn ClassificationEndpoint>,
    form: Arc<dyn FormSubmitter>,
    history: LocalHistory,
    view: Arc<dyn SubmissionView>,
    clock: Clock,
}

impl SubmissionController {
    pub fn new(
        endpoint: Arc<dyn ClassificationEndpoint>,
        form: Arc<dyn FormSubmitter>,
        history: LocalHistory,
        view: Arc<dyn SubmissionView>,
    ) -> Self {
        let clock: Clock = Arc::new(Utc::now);
        Self {
            endpoint,
            form,
            history,
            view,
            clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn handle_submit(&self, form: &SubmissionForm) -> SubmitOutcome {
        let input = SubmissionInput::from_fields(form.subject.as_deref(), form.body.as_deref());
        if let Err(err) = input.validate() {
            self.view.notify(&Notice::Validation(err.clone()));
            return SubmitOutcome::Rejected(err);
        }

        if form.store_locally {
            if let Err(err) = self
                .history
                .save_last_email(&LastEmailSnapshot::from(&input))
            {
                tracing::warn!(target: "controller", error = %err, "saving last email failed");
            }
        }

        self.view.show_overlay(true);

        let data = match self.endpoint.classify(&input).await {
            PredictOutcome::Success(data) => data,
            PredictOutcome::Fallback(reason) => {
                // The overlay stays up: the classic submission replaces the page.
                tracing::info!(
                    target: "controller",
                    reason = %reason,
                    "falling back to classic form submit"
                );
                if let Err(err) = self.form.submit(&input).await {
                    tracing::error!(target: "controller", error = %err, "classic form submit failed");
                }
                return SubmitOutcome::FellBack;
            }
        };

        self.view.show_overlay(false);

        if let Some(message) = data.server_error() {
            tracing::error!(target: "controller", error = %message, "server returned error");
            self.view.notify(&Notice::ServerError(message.clone()));
            return SubmitOutcome::ServerError(message);
        }

        let verdict = data.verdict();
        let rendered = render_verdict(&verdict, &input.subject, &input.body, data.confidence());
        self.view.render_verdict(&rendered);
        self.view.reveal_verdict_panel();

        let entry = HistoryEntry {
            timestamp: (self.clock)().timestamp_millis(),
            subject: input.subject,
            body: input.body,
            verdict,
        };
        if let Err(err) = self.history.record(entry) {
            tracing::warn!(target: "controller", error = %err, "saving history failed");
        }

        SubmitOutcome::Rendered(rendered)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    use anyhow::{anyhow, Result};
    use chrono::TimeZone;
    use futures::future::BoxFuture;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{ClassificationResult, RiskLevel},
        predict::{FallbackReason, NetworkIssueKind},
        storage::{
            history::{HISTORY_KEY, LAST_EMAIL_KEY},
            KeyValueStore, MemoryStore, StorageError,
        },
    };

    struct ScriptedEndpoint {
        outcome: PredictOutcome,
        calls: AtomicUsize,
    }

    impl ScriptedEndpoint {
        fn new(outcome: PredictOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ClassificationEndpoint for ScriptedEndpoint {
        fn classify<'a>(&'a self, _input: &'a SubmissionInput) -> BoxFuture<'a, PredictOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcome.clone();
            Box::pin(async move { outcome })
        }
    }

    #[derive(Default)]
    struct RecordingSubmitter {
        submitted: Mutex<Vec<SubmissionInput>>,
        fail: bool,
    }

    impl FormSubmitter for RecordingSubmitter {
        fn submit<'a>(&'a self, input: &'a SubmissionInput) -> BoxFuture<'a, Result<()>> {
            self.submitted.lock().push(input.clone());
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(anyhow!("action unreachable"))
                } else {
                    Ok(())
                }
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        Overlay(bool),
        Rendered(VerdictView),
        Revealed,
        Notice(Notice),
    }

    #[derive(Default)]
    struct RecordingView {
        events: Mutex<Vec<ViewEvent>>,
    }

    impl RecordingView {
        fn events(&self) -> Vec<ViewEvent> {
            self.events.lock().clone()
        }
    }

    impl SubmissionView for RecordingView {
        fn show_overlay(&self, visible: bool) {
            self.events.lock().push(ViewEvent::Overlay(visible));
        }

        fn render_verdict(&self, view: &VerdictView) {
            self.events.lock().push(ViewEvent::Rendered(view.clone()));
        }

        fn reveal_verdict_panel(&self) {
            self.events.lock().push(ViewEvent::Revealed);
        }

        fn notify(&self, notice: &Notice) {
            self.events.lock().push(ViewEvent::Notice(notice.clone()));
        }
    }

    /// A view with none of the optional elements.
    struct BareView;

    impl SubmissionView for BareView {}

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "quota exceeded",
            )))
        }
    }

    struct Harness {
        endpoint: Arc<ScriptedEndpoint>,
        submitter: Arc<RecordingSubmitter>,
        view: Arc<RecordingView>,
        store: Arc<MemoryStore>,
        controller: SubmissionController,
    }

    fn success(payload: serde_json::Value) -> PredictOutcome {
        PredictOutcome::Success(ClassificationResult::from_payload(payload))
    }

    fn harness(outcome: PredictOutcome) -> Harness {
        let endpoint = ScriptedEndpoint::new(outcome);
        let submitter = Arc::new(RecordingSubmitter::default());
        let view = Arc::new(RecordingView::default());
        let store = Arc::new(MemoryStore::new());
        let controller = SubmissionController::new(
            endpoint.clone(),
            submitter.clone(),
            LocalHistory::new(store.clone()),
            view.clone(),
        );
        Harness {
            endpoint,
            submitter,
            view,
            store,
            controller,
        }
    }

    fn form(subject: &str, body: &str) -> SubmissionForm {
        SubmissionForm {
            subject: Some(subject.to_string()),
            body: Some(body.to_string()),
            store_locally: false,
        }
    }

    fn history(store: &Arc<MemoryStore>) -> Vec<HistoryEntry> {
        LocalHistory::new(store.clone()).entries().unwrap()
    }

    #[tokio::test]
    async fn empty_submission_is_rejected_without_side_effects() {
        let h = harness(success(json!({"result": "Safe Email"})));
        let empty = SubmissionForm {
            subject: None,
            body: Some(String::new()),
            store_locally: true,
        };

        let outcome = h.controller.handle_submit(&empty).await;

        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::EmptySubmission));
        assert_eq!(h.endpoint.calls(), 0);
        assert_eq!(
            h.view.events(),
            vec![ViewEvent::Notice(Notice::Validation(ValidationError::EmptySubmission))]
        );
        assert_eq!(h.store.get(HISTORY_KEY).unwrap(), None);
        assert_eq!(h.store.get(LAST_EMAIL_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn phishing_verdict_with_confidence_is_rendered_and_recorded() {
        let h = harness(success(json!({"result": "Phishing", "confidence": 0.93})));

        let outcome = h
            .controller
            .handle_submit(&form("Verify account", "visit http://evil.example/login"))
            .await;

        let view = match outcome {
            SubmitOutcome::Rendered(view) => view,
            other => panic!("expected a rendered verdict, got {other:?}"),
        };
        assert_eq!(view.percent, 93);
        assert_eq!(view.risk, RiskLevel::Phishing);
        assert_eq!(view.domains, vec!["evil.example"]);
        assert_eq!(
            h.view.events(),
            vec![
                ViewEvent::Overlay(true),
                ViewEvent::Overlay(false),
                ViewEvent::Rendered(view),
                ViewEvent::Revealed,
            ]
        );

        let entries = history(&h.store);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].verdict, "Phishing");
        assert_eq!(entries[0].subject, "Verify account");
        assert!(h.submitter.submitted.lock().is_empty());
    }

    #[tokio::test]
    async fn safe_verdict_without_confidence_shows_placeholder() {
        let h = harness(success(json!({"result": "Looks Safe"})));

        let SubmitOutcome::Rendered(view) = h.controller.handle_submit(&form("Lunch", "")).await
        else {
            panic!("expected a rendered verdict");
        };
        assert_eq!(view.percent, 12);
        assert_eq!(view.risk, RiskLevel::Safe);
    }

    #[tokio::test]
    async fn missing_result_is_recorded_as_no_result() {
        let h = harness(success(json!({})));

        h.controller.handle_submit(&form("s", "b")).await;

        assert_eq!(history(&h.store)[0].verdict, "No result");
    }

    #[tokio::test]
    async fn server_error_is_surfaced_and_nothing_is_recorded() {
        let h = harness(success(json!({"error": "Model or vectorizer not loaded."})));

        let outcome = h.controller.handle_submit(&form("s", "b")).await;

        assert_eq!(
            outcome,
            SubmitOutcome::ServerError("Model or vectorizer not loaded.".into())
        );
        let events = h.view.events();
        assert_eq!(
            events,
            vec![
                ViewEvent::Overlay(true),
                ViewEvent::Overlay(false),
                ViewEvent::Notice(Notice::ServerError("Model or vectorizer not loaded.".into())),
            ]
        );
        assert!(!events.contains(&ViewEvent::Revealed));
        assert!(history(&h.store).is_empty());
    }

    #[tokio::test]
    async fn fallback_submits_the_classic_form_and_keeps_overlay() {
        for reason in [
            FallbackReason::EndpointUnavailable { status: 404 },
            FallbackReason::EndpointUnavailable { status: 405 },
            FallbackReason::UnexpectedContentType {
                content_type: "text/html".into(),
            },
            FallbackReason::Transport {
                kind: NetworkIssueKind::Timeout,
                detail: "operation timed out".into(),
            },
        ] {
            let h = harness(PredictOutcome::Fallback(reason));

            let outcome = h.controller.handle_submit(&form("Hello", "body")).await;

            assert_eq!(outcome, SubmitOutcome::FellBack);
            assert_eq!(h.view.events(), vec![ViewEvent::Overlay(true)]);
            assert_eq!(
                *h.submitter.submitted.lock(),
                vec![SubmissionInput::from_fields(Some("Hello"), Some("body"))]
            );
            assert!(history(&h.store).is_empty());
        }
    }

    #[tokio::test]
    async fn failed_classic_submit_is_only_logged() {
        let endpoint = ScriptedEndpoint::new(PredictOutcome::Fallback(
            FallbackReason::EndpointUnavailable { status: 404 },
        ));
        let submitter = Arc::new(RecordingSubmitter {
            fail: true,
            ..Default::default()
        });
        let controller = SubmissionController::new(
            endpoint,
            submitter.clone(),
            LocalHistory::new(Arc::new(MemoryStore::new())),
            Arc::new(BareView),
        );

        assert_eq!(
            controller.handle_submit(&form("s", "")).await,
            SubmitOutcome::FellBack
        );
        assert_eq!(submitter.submitted.lock().len(), 1);
    }

    #[tokio::test]
    async fn opted_in_submission_overwrites_last_email() {
        let h = harness(success(json!({"result": "Safe Email"})));
        for subject in ["first", "second"] {
            let mut f = form(subject, "body");
            f.store_locally = true;
            h.controller.handle_submit(&f).await;
        }

        let last = LocalHistory::new(h.store.clone()).last_email().unwrap().unwrap();
        assert_eq!(
            last,
            LastEmailSnapshot {
                subject: "second".into(),
                body: "body".into()
            }
        );
    }

    #[tokio::test]
    async fn history_keeps_the_latest_twenty_five() {
        let h = harness(success(json!({"result": "Safe Email", "confidence": 0.1})));
        let tick = Arc::new(AtomicI64::new(0));
        let clock: Clock = {
            let tick = tick.clone();
            Arc::new(move || {
                let n = tick.fetch_add(1, Ordering::SeqCst);
                Utc.timestamp_millis_opt(1_700_000_000_000 + n).unwrap()
            })
        };
        let Harness {
            store, controller, ..
        } = h;
        let controller = controller.with_clock(clock);

        for i in 0..30 {
            controller.handle_submit(&form(&format!("mail {i}"), "")).await;
        }

        let entries = history(&store);
        assert_eq!(entries.len(), 25);
        let subjects: Vec<String> = entries.iter().map(|e| e.subject.clone()).collect();
        let expected: Vec<String> = (5..30).rev().map(|i| format!("mail {i}")).collect();
        assert_eq!(subjects, expected);
        assert!(entries.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[tokio::test]
    async fn storage_failures_never_change_the_verdict() {
        let endpoint = ScriptedEndpoint::new(success(json!({"result": "Phishing Email"})));
        let view = Arc::new(RecordingView::default());
        let controller = SubmissionController::new(
            endpoint,
            Arc::new(RecordingSubmitter::default()),
            LocalHistory::new(Arc::new(ReadOnlyStore)),
            view.clone(),
        );
        let mut f = form("s", "b");
        f.store_locally = true;

        let outcome = controller.handle_submit(&f).await;

        assert!(matches!(outcome, SubmitOutcome::Rendered(ref v) if v.percent == 87));
        assert_eq!(view.events().last(), Some(&ViewEvent::Revealed));
    }

    #[tokio::test]
    async fn view_without_elements_still_completes() {
        let controller = SubmissionController::new(
            ScriptedEndpoint::new(success(json!({"result": "Safe Email"}))),
            Arc::new(RecordingSubmitter::default()),
            LocalHistory::new(Arc::new(MemoryStore::new())),
            Arc::new(BareView),
        );

        let outcome = controller.handle_submit(&form("s", "<script>x</script>")).await;
        let SubmitOutcome::Rendered(view) = outcome else {
            panic!("expected a rendered verdict");
        };
        assert_eq!(view.preview_body, "&lt;script&gt;x&lt;/script&gt;");
    }
}
