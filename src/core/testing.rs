use crate::domain::http::{HttpRequest, HttpResponse};
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Records every request and answers from a queue of canned responses.
/// An empty queue answers `200 {}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn push_raw(&self, status: u16, body: &[u8]) {
        self.responses.lock().await.push_back(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_vec(),
        });
    }

    pub async fn push_with_headers(
        &self,
        status: u16,
        headers: Vec<(String, String)>,
        json: serde_json::Value,
    ) {
        self.responses.lock().await.push_back(HttpResponse {
            status,
            headers,
            body: json.to_string().into_bytes(),
        });
    }

    pub async fn push_json(&self, status: u16, json: serde_json::Value) {
        self.push_raw(status, json.to_string().as_bytes()).await;
    }

    pub async fn push_status(&self, status: u16) {
        self.push_raw(status, b"").await;
    }

    pub async fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().await.push(request);
        let response = self.responses.lock().await.pop_front();
        Ok(response.unwrap_or(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"{}".to_vec(),
        }))
    }
}
