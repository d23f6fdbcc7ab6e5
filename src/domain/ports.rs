use crate::domain::http::{HttpRequest, HttpResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Executes one HTTP round-trip. Non-2xx statuses are returned as responses, not errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

pub trait ConnectionProvider: Send + Sync {
    fn site_url(&self) -> &str;
    fn access_token(&self) -> Option<&str>;
    fn extra_headers(&self) -> Vec<(String, String)>;
    fn timeout_seconds(&self) -> u64;
}
