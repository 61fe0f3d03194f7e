// tests/controller_test.rs — Integration tests: controller with mock collaborators

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use manualmate::core::binding::DocumentBinder;
use manualmate::core::controller::{Controller, Status};
use manualmate::core::persona::{PRIMING_ACK, PRIMING_INSTRUCTION};
use manualmate::infra::config::UploadConfig;
use manualmate::infra::errors::ManualMateError;
use manualmate::provider::{DocumentHandle, DocumentStore, Inference, Role, Turn};

/// A mock store that returns sequential handles without any network calls.
struct MockStore {
    uploads: AtomicU32,
    fail: bool,
}

impl MockStore {
    fn new() -> Self {
        Self {
            uploads: AtomicU32::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            uploads: AtomicU32::new(0),
            fail: true,
        }
    }

    fn upload_count(&self) -> u32 {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn upload(
        &self,
        _bytes: &[u8],
        _suggested_name: &str,
    ) -> Result<DocumentHandle, ManualMateError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(ManualMateError::Upload {
                message: "store unreachable".into(),
                retriable: true,
            });
        }
        Ok(DocumentHandle {
            name: format!("files/h{}", n),
            uri: format!("https://example.test/files/h{}", n),
            mime_type: "application/pdf".into(),
        })
    }
}

/// Responses the mock inference service plays back, in order.
enum Reply {
    Text(&'static str),
    Fail,
    Expired,
}

/// A mock inference service that records every request it receives.
struct MockInference {
    replies: Mutex<Vec<Reply>>,
    requests: Mutex<Vec<Vec<Turn>>>,
}

impl MockInference {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> Vec<Turn> {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Inference for MockInference {
    async fn generate(&self, turns: &[Turn]) -> Result<String, ManualMateError> {
        self.requests.lock().unwrap().push(turns.to_vec());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok("ok".into());
        }
        match replies.remove(0) {
            Reply::Text(t) => Ok(t.to_string()),
            Reply::Fail => Err(ManualMateError::Inference {
                message: "model overloaded".into(),
                retriable: true,
            }),
            Reply::Expired => Err(ManualMateError::DocumentExpired),
        }
    }
}

fn controller_with(store: Arc<MockStore>, inference: Arc<MockInference>) -> Controller {
    let binder = DocumentBinder::new(store, &UploadConfig::default());
    Controller::new(binder, inference)
}

#[tokio::test]
async fn test_ask_about_oil_level() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![Reply::Text("See page 12...")]));
    let mut controller = controller_with(store.clone(), inference.clone());

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    assert_eq!(controller.status(), &Status::Idle);

    controller
        .on_question_submitted("How do I check oil level?")
        .await;

    // Request shape: document, priming pair, final user turn
    let turns = inference.last_request();
    assert_eq!(turns.len(), 4);
    assert!(matches!(turns[0], Turn::Document(ref h) if h.name == "files/h1"));
    assert_eq!(turns[1], Turn::user(PRIMING_INSTRUCTION));
    assert_eq!(turns[2], Turn::assistant(PRIMING_ACK));
    assert_eq!(turns[3], Turn::user("How do I check oil level?"));

    let messages = controller.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "How do I check oil level?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "See page 12...");
}

#[tokio::test]
async fn test_followup_replays_history_without_duplicating_question() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![
        Reply::Text("See page 12."),
        Reply::Text("Every 250 hours."),
    ]));
    let mut controller = controller_with(store, inference.clone());

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    controller.on_question_submitted("How do I check oil?").await;
    controller.on_question_submitted("How often?").await;

    let turns = inference.last_request();
    // doc + priming pair + 2 history turns + in-flight question
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[3], Turn::user("How do I check oil?"));
    assert_eq!(turns[4], Turn::assistant("See page 12."));
    assert_eq!(turns[5], Turn::user("How often?"));

    let dupes = turns
        .iter()
        .filter(|t| matches!(t, Turn::Text { content, .. } if content == "How often?"))
        .count();
    assert_eq!(dupes, 1);
}

#[tokio::test]
async fn test_question_without_manual_is_rejected() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![]));
    let mut controller = controller_with(store, inference.clone());

    controller.on_question_submitted("How do I check oil?").await;

    assert!(controller.messages().is_empty());
    assert_eq!(inference.call_count(), 0);
    assert!(matches!(controller.status(), Status::Error(_)));
}

#[tokio::test]
async fn test_reselecting_same_manual_uploads_once() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![]));
    let mut controller = controller_with(store.clone(), inference);

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;

    assert_eq!(store.upload_count(), 1);
}

#[tokio::test]
async fn test_switching_manual_before_asking() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![]));
    let mut controller = controller_with(store.clone(), inference);

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    controller.on_file_selected(b"%PDF-1.4", "pump.pdf").await;

    assert!(controller.messages().is_empty());
    assert_eq!(store.upload_count(), 2);
    assert_eq!(controller.session().current_file(), Some("pump.pdf"));
    assert_eq!(
        controller.session().document().map(|h| h.name.as_str()),
        Some("files/h2")
    );
}

#[tokio::test]
async fn test_upload_failure_shows_error_and_binds_nothing() {
    let store = Arc::new(MockStore::failing());
    let inference = Arc::new(MockInference::new(vec![]));
    let mut controller = controller_with(store, inference);

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;

    assert!(matches!(controller.status(), Status::Error(_)));
    assert!(controller.session().document().is_none());
}

#[tokio::test]
async fn test_inference_failure_recorded_in_transcript() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![Reply::Fail]));
    let mut controller = controller_with(store, inference);

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    controller.on_question_submitted("How do I check oil?").await;

    // The failure is a conversation turn, not a fatal error.
    let messages = controller.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].content.contains("Sorry, I encountered an error"));
    assert_eq!(controller.status(), &Status::Idle);
}

#[tokio::test]
async fn test_expired_handle_unbinds_document() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![Reply::Expired]));
    let mut controller = controller_with(store.clone(), inference);

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    controller.on_question_submitted("How do I check oil?").await;

    // The expired handle is dropped so re-opening the file re-uploads.
    assert!(controller.session().document().is_none());
    assert!(controller.messages()[1].content.contains("expired"));

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    assert_eq!(store.upload_count(), 2);
    assert!(controller.session().document().is_some());
}

#[tokio::test]
async fn test_clear_empties_transcript_keeps_binding() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![Reply::Text("See page 12.")]));
    let mut controller = controller_with(store, inference);

    controller.on_file_selected(b"%PDF-1.4", "engine.pdf").await;
    controller.on_question_submitted("How do I check oil?").await;
    assert_eq!(controller.messages().len(), 2);

    controller.on_clear_requested();

    assert!(controller.messages().is_empty());
    assert!(controller.session().document().is_some());
}

#[tokio::test]
async fn test_clear_on_empty_transcript() {
    let store = Arc::new(MockStore::new());
    let inference = Arc::new(MockInference::new(vec![]));
    let mut controller = controller_with(store, inference);

    controller.on_clear_requested();
    assert!(controller.messages().is_empty());
    assert_eq!(controller.status(), &Status::Idle);
}
