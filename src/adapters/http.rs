use crate::domain::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::domain::ports::{ConnectionProvider, HttpTransport};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// `HttpTransport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    access_token: Option<String>,
    extra_headers: Vec<(String, String)>,
    timeout: Duration,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            access_token: None,
            extra_headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    pub fn from_connection<C: ConnectionProvider + ?Sized>(connection: &C) -> Self {
        let mut transport = Self::new().with_timeout(Duration::from_secs(connection.timeout_seconds()));
        if let Some(token) = connection.access_token() {
            transport = transport.with_access_token(token);
        }
        for (name, value) in connection.extra_headers() {
            transport = transport.with_header(name, value);
        }
        transport
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url).timeout(self.timeout);

        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        // 請求本身的標頭優先於設定檔中的額外標頭
        for (name, value) in &self.extra_headers {
            if request.header(name).is_none() {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            Some(body) => builder.body(body),
            // the server wants Content-Length: 0 on empty POSTs
            None if request.method == HttpMethod::Post => builder.body(Vec::new()),
            None => builder,
        };

        tracing::debug!("{} {}", request.method, request.url);
        let response = builder.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
