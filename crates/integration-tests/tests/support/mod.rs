#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use api_server::http::{AppState, GENERATE_PATH, build_router};
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use shared::llm::{
    LlmCompletion, LlmCompletionRequest, LlmGateway, LlmGatewayError, LlmGatewayFuture,
};
use tokio::sync::oneshot;
use tower::ServiceExt;

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    ProviderFailure(String),
}

/// Gateway double that counts calls and records the requests it receives.
pub struct MockLlmGateway {
    reply: ScriptedReply,
    calls: AtomicUsize,
    requests: Mutex<Vec<LlmCompletionRequest>>,
}

impl MockLlmGateway {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self::new(ScriptedReply::Text(text.to_string())))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::new(ScriptedReply::ProviderFailure(message.to_string())))
    }

    fn new(reply: ScriptedReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LlmCompletionRequest> {
        self.requests
            .lock()
            .expect("request log lock should not be poisoned")
            .last()
            .cloned()
    }
}

impl LlmGateway for MockLlmGateway {
    fn complete<'a>(&'a self, request: LlmCompletionRequest) -> LlmGatewayFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .expect("request log lock should not be poisoned")
                .push(request);

            match &self.reply {
                ScriptedReply::Text(text) => Ok(LlmCompletion {
                    model: "mock-model".to_string(),
                    provider_request_id: Some("mock-req".to_string()),
                    content: text.clone(),
                    usage: None,
                }),
                ScriptedReply::ProviderFailure(message) => {
                    Err(LlmGatewayError::ProviderFailure(message.clone()))
                }
            }
        })
    }
}

pub fn test_router(gateway: Arc<MockLlmGateway>) -> axum::Router {
    build_router(AppState {
        llm_gateway: gateway,
    })
}

pub struct JsonResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &axum::Router, method: Method, body: Option<&str>) -> JsonResponse {
    let mut builder = Request::builder().method(method).uri(GENERATE_PATH);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|raw| Body::from(raw.to_string())).unwrap_or_else(Body::empty))
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    JsonResponse {
        status,
        headers,
        body,
    }
}

/// Real api-server bound to an ephemeral port, shut down on drop.
pub struct RunningApiServer {
    pub generate_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl RunningApiServer {
    pub async fn start(gateway: Arc<MockLlmGateway>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("api listener should bind");
        let bind_addr = listener
            .local_addr()
            .expect("api listener local address should exist");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = test_router(gateway);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("api server should run");
        });

        Self {
            generate_url: format!("http://{bind_addr}{GENERATE_PATH}"),
            shutdown: Some(shutdown_tx),
            handle,
        }
    }
}

impl Drop for RunningApiServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

/// An address nothing listens on.
pub async fn closed_generate_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("probe listener should bind");
    let addr = listener
        .local_addr()
        .expect("probe listener local address should exist");
    drop(listener);
    format!("http://{addr}{GENERATE_PATH}")
}
