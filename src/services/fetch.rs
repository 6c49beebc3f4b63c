// src/services/fetch.rs

//! HTTP fetch boundary.
//!
//! The orchestrator issues one request at a time through this trait and
//! treats any transport error or non-success status uniformly as a fetch
//! failure. Rate limiting lives here: the client sleeps the configured
//! delay before every request, which under single-flight execution bounds
//! the request rate.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// HTTP method for a fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    Post,
}

/// A single request through the fetch boundary.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: FetchMethod,
    /// Form fields for POST requests
    pub form: Option<Vec<(String, String)>>,
}

impl FetchRequest {
    /// Build a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: FetchMethod::Get,
            form: None,
        }
    }

    /// Build a form POST request.
    pub fn post(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            method: FetchMethod::Post,
            form: Some(form),
        }
    }
}

/// Response from the fetch boundary.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    /// URL after redirects; listing links resolve against this
    pub final_url: String,
}

/// Rate-limited HTTP client boundary.
#[async_trait]
pub trait FetchClient: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

/// Production fetch client backed by reqwest.
pub struct HttpFetchClient {
    client: reqwest::Client,
    delay: Duration,
}

impl HttpFetchClient {
    /// Create a configured HTTP fetch client.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            delay: Duration::from_millis(config.request_delay_ms),
        })
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let builder = match request.method {
            FetchMethod::Get => self.client.get(&request.url),
            FetchMethod::Post => {
                let form = request.form.as_deref().unwrap_or_default();
                self.client.post(&request.url).form(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(AppError::fetch(
                request.url.clone(),
                format!("status {status}"),
            ));
        }

        let body = response.text().await?;
        Ok(FetchResponse {
            status: status.as_u16(),
            body,
            final_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let get = FetchRequest::get("https://example.com");
        assert_eq!(get.method, FetchMethod::Get);
        assert!(get.form.is_none());

        let post = FetchRequest::post(
            "https://example.com",
            vec![("a".to_string(), "1".to_string())],
        );
        assert_eq!(post.method, FetchMethod::Post);
        assert_eq!(post.form.unwrap().len(), 1);
    }

    #[test]
    fn test_client_builds_from_config() {
        let config = CrawlerConfig::default();
        assert!(HttpFetchClient::new(&config).is_ok());
    }
}
