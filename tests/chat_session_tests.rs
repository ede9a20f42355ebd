use prompt_relay::routes::create_router;
use prompt_relay::services::chat_session::{ChatSession, Speaker};
use prompt_relay::services::model_backend::{BackendError, ModelBackend};
use prompt_relay::services::relay_client::{ClientError, RelayApi, RelayClient};
use prompt_relay::state::AppState;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

/// Counts calls and always answers "hi".
#[derive(Default)]
struct CountingRelay {
    calls: AtomicUsize,
}

impl RelayApi for CountingRelay {
    async fn generate(&self, _query: &str) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("hi".to_string())
    }
}

struct HiBackend;

impl ModelBackend for HiBackend {
    fn generate(&self, _model: &str, _prompt: &str) -> Result<Value, BackendError> {
        Ok(json!({ "response": "hi" }))
    }
}

struct DownBackend;

impl ModelBackend for DownBackend {
    fn generate(&self, _model: &str, _prompt: &str) -> Result<Value, BackendError> {
        Err(BackendError::Unavailable("connection refused".to_string()))
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn serve_relay(backend: Arc<dyn ModelBackend>) -> SocketAddr {
    let state = Arc::new(AppState::new(backend, "finetuned_model:latest", 2));
    serve(create_router().with_state(state)).await
}

fn client_for(addr: SocketAddr) -> RelayClient {
    RelayClient::new(&format!("http://{addr}"), Duration::from_secs(60)).unwrap()
}

fn pairs(session: &ChatSession) -> Vec<(&'static str, String)> {
    session
        .transcript()
        .iter()
        .map(|e| (e.speaker.label(), e.text.clone()))
        .collect()
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let relay = CountingRelay::default();
    let mut session = ChatSession::new();

    assert!(!session.submit(&relay, "").await);
    assert!(!session.submit(&relay, "   ").await);
    assert!(!session.submit(&relay, "\n\t").await);

    assert!(session.transcript().is_empty());
    assert_eq!(relay.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn each_submission_appends_a_pair() {
    let relay = CountingRelay::default();
    let mut session = ChatSession::new();

    session.submit(&relay, "one").await;
    session.submit(&relay, "two").await;

    let speakers: Vec<_> = session.transcript().iter().map(|e| e.speaker).collect();
    assert_eq!(
        speakers,
        vec![Speaker::You, Speaker::Bot, Speaker::You, Speaker::Bot]
    );
    assert_eq!(relay.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn hello_against_live_relay() {
    let addr = serve_relay(Arc::new(HiBackend)).await;
    let relay = client_for(addr);
    let mut session = ChatSession::new();
    session.set_input("hello");

    assert!(session.submit_input(&relay).await);

    assert_eq!(
        pairs(&session),
        vec![("You", "hello".to_string()), ("Bot", "hi".to_string())]
    );
    assert_eq!(session.input(), "");
}

#[tokio::test]
async fn unreachable_relay_becomes_error_line() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = client_for(addr);
    let mut session = ChatSession::new();

    assert!(session.submit(&relay, "hello").await);

    let entries = pairs(&session);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], ("You", "hello".to_string()));
    assert_eq!(entries[1].0, "Bot");
    assert!(entries[1].1.starts_with("Error:"), "got {:?}", entries[1].1);
}

#[tokio::test]
async fn failed_call_still_clears_input() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = client_for(addr);
    let mut session = ChatSession::new();
    session.set_input("hello");

    assert!(session.submit_input(&relay).await);

    assert_eq!(session.input(), "");
    assert_eq!(session.transcript().len(), 2);
    assert!(session.transcript()[1].text.starts_with("Error:"));
}

#[tokio::test]
async fn blank_input_buffer_is_left_alone() {
    let relay = CountingRelay::default();
    let mut session = ChatSession::new();
    session.set_input("   ");

    assert!(!session.submit_input(&relay).await);

    assert_eq!(session.input(), "   ");
    assert!(session.transcript().is_empty());
    assert_eq!(relay.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn relay_server_error_becomes_error_line() {
    let addr = serve_relay(Arc::new(DownBackend)).await;
    let relay = client_for(addr);
    let mut session = ChatSession::new();

    session.submit(&relay, "hello").await;

    let reply = &session.transcript()[1];
    assert_eq!(reply.speaker, Speaker::Bot);
    assert!(reply.text.starts_with("Error:"));
    assert!(reply.text.contains("500"));
}

#[tokio::test]
async fn malformed_relay_reply_becomes_error_line() {
    let app = Router::new().route("/generate/", post(|| async { "not json" }));
    let addr = serve(app).await;
    let relay = client_for(addr);
    let mut session = ChatSession::new();

    session.submit(&relay, "hello").await;

    assert!(session.transcript()[1].text.starts_with("Error:"));
}

#[tokio::test]
async fn reply_without_response_field_is_empty() {
    let app = Router::new().route(
        "/generate/",
        post(|| async { (StatusCode::OK, Json(json!({ "answer": "hi" }))) }),
    );
    let addr = serve(app).await;
    let relay = client_for(addr);
    let mut session = ChatSession::new();

    session.submit(&relay, "hello").await;

    assert_eq!(
        pairs(&session),
        vec![("You", "hello".to_string()), ("Bot", String::new())]
    );
}

#[tokio::test]
async fn client_times_out() {
    let app = Router::new().route(
        "/generate/",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "response": "too late" }))
        }),
    );
    let addr = serve(app).await;
    let relay = RelayClient::new(&format!("http://{addr}"), Duration::from_millis(100)).unwrap();
    let mut session = ChatSession::new();

    session.submit(&relay, "hello").await;

    assert!(session.transcript()[1].text.starts_with("Error:"));
}
