//! テスト用の使い捨てHTTPサーバー
//!
//! axumで `/api/health` と `/api/generate` を立て、パスごとに固定のステータスとボディを返す。
//! 受け取ったリクエストはmultipartのフィールド単位で記録する。

#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// multipartの1フィールド
#[derive(Debug, Clone)]
pub struct CapturedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl CapturedField {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub fields: Vec<CapturedField>,
}

impl CapturedRequest {
    pub fn field(&self, name: &str) -> Option<&CapturedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, (u16, String)>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubState {
    fn record(&self, request: CapturedRequest) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
        let (status, body) = self
            .routes
            .get(&request.path)
            .cloned()
            .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));
        self.requests.lock().expect("lock").push(request);

        let status = StatusCode::from_u16(status).expect("status code");
        (status, [(header::CONTENT_TYPE, "application/json")], body)
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl StubServer {
    /// `routes`: パス → (ステータス, ボディ)。未登録のパスは404
    pub async fn start(routes: Vec<(&str, u16, String)>) -> Self {
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(path, status, body)| (path.to_string(), (status, body)))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes),
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/generate", post(generate))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            task,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("lock").clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<CapturedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn health(State(state): State<StubState>) -> impl axum::response::IntoResponse {
    state.record(CapturedRequest {
        method: "GET".to_string(),
        path: "/api/health".to_string(),
        content_type: None,
        fields: Vec::new(),
    })
}

async fn generate(
    State(state): State<StubState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl axum::response::IntoResponse {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(CapturedField { name, file_name, content_type, data });
    }

    state.record(CapturedRequest {
        method: "POST".to_string(),
        path: "/api/generate".to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        fields,
    })
}

/// 接続を受け付けないアドレス（バインドしてすぐ閉じる）
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

/// 接続は受け付けるが一切応答しないサーバー
pub struct SilentServer {
    pub base_url: String,
    task: tokio::task::JoinHandle<()>,
}

impl SilentServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            // 受け付けた接続は閉じずに抱えておく
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            task,
        }
    }
}

impl Drop for SilentServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn images_body(images: &[&str]) -> String {
    serde_json::json!({ "images": images }).to_string()
}
