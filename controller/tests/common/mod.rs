#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use form_controller::{ControllerConfig, FormController, NoopRenderer, ResponseOrder};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UploadedField {
    pub name: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum Recorded {
    Query {
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Upload {
        content_type: Option<String>,
        fields: Vec<UploadedField>,
    },
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct BackendState {
    recorded: Mutex<Vec<Recorded>>,
    answers: Mutex<HashMap<String, Reply>>,
    upload_reply: Mutex<Option<Reply>>,
}

/// In-process stand-in for the document Q&A backend.
pub struct FakeBackend {
    pub base_url: String,
    state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/query", post(handle_query))
            .route("/upload", post(handle_upload))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Scripts the reply for one question; unscripted questions are echoed.
    pub fn on_question(&self, question: &str, reply: Reply) {
        self.state.answers.lock().insert(question.to_string(), reply);
    }

    pub fn on_upload(&self, reply: Reply) {
        *self.state.upload_reply.lock() = Some(reply);
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().clone()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.state.recorded.lock().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("backend never saw {} requests", count);
    }

    pub fn controller(&self) -> FormController {
        self.controller_with(ResponseOrder::LastResolved)
    }

    pub fn controller_with(&self, order: ResponseOrder) -> FormController {
        let mut config = ControllerConfig::default()
            .with_base_url(&self.base_url)
            .unwrap();
        config.response_order = order;
        FormController::new(config, Arc::new(NoopRenderer)).unwrap()
    }
}

/// Base url of a port nobody listens on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

async fn respond(reply: Reply) -> Response {
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

async fn handle_query(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.recorded.lock().push(Recorded::Query {
        content_type: content_type(&headers),
        body: body.to_vec(),
    });

    let question = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("question").and_then(|q| q.as_str()).map(|q| q.to_string()));

    let reply = match question {
        Some(question) => state
            .answers
            .lock()
            .get(&question)
            .cloned()
            .unwrap_or_else(|| {
                Reply::json(
                    StatusCode::OK,
                    serde_json::json!({ "answer": format!("उत्तर: {}", question) }),
                )
            }),
        None => Reply::json(
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "No question provided" }),
        ),
    };

    respond(reply).await
}

async fn handle_upload(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(|f| f.to_string());
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(UploadedField {
            name,
            file_name,
            bytes,
        });
    }

    let has_file = fields.iter().any(|f| f.name == "file");
    state.recorded.lock().push(Recorded::Upload {
        content_type: content_type(&headers),
        fields,
    });

    let scripted = state.upload_reply.lock().clone();
    let reply = match scripted {
        Some(reply) => reply,
        None if has_file => Reply::json(
            StatusCode::OK,
            serde_json::json!({ "message": "Document uploaded successfully" }),
        ),
        None => Reply::json(
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "No file provided" }),
        ),
    };

    respond(reply).await
}
